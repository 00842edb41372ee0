//! Health-expenditure dashboard pipeline.
//!
//! Window change → `FetchOrchestrator` issues a fetch → `RecordStore`
//! returns records → `aggregate` builds series and totals → the view is
//! updated only if that request is still the latest one.

mod aggregate;
mod colors;
mod error;
mod orchestrator;
mod state;
mod types;

pub use aggregate::*;
pub use colors::*;
pub use error::*;
pub use orchestrator::*;
pub use state::*;
pub use types::*;

#[cfg(test)]
pub(crate) use orchestrator::testing;
