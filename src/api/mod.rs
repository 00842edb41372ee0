//! Dashboard HTTP API.
//!
//! The presentation-layer boundary: clients read the current view and
//! change the window or session. Routes are nested under `/api/`; nothing
//! here writes derived dashboard data directly.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::dashboard_api_router;
pub use server::{start_dashboard_server, DashboardServer};
pub use types::ApiContext;
