//! Record source for the dashboard pipeline.
//!
//! The pipeline only knows the `RecordStore` seam: given a user and a
//! time window, eventually produce that user's records or an error. The
//! error's contents are never interpreted beyond its message.

mod sqlite;

pub use sqlite::SqliteRecordStore;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::{MedicalRecord, TimeWindow, UserId};

/// Future returned by [`RecordStore::fetch`]. Owns everything it needs so
/// it can be spawned onto the runtime.
pub type RecordFuture = BoxFuture<'static, Result<Vec<MedicalRecord>, StoreError>>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Internal lock error")]
    LockPoisoned,

    #[error("Store worker failed: {0}")]
    Worker(String),

    #[error("Record store unavailable: {0}")]
    Unavailable(String),
}

pub trait RecordStore: Send + Sync {
    /// Fetch the records of `user_id` that fall inside `window`, in display
    /// order. May be slow; may fail.
    fn fetch(&self, user_id: &UserId, window: TimeWindow) -> RecordFuture;
}
