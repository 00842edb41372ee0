use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::Connection;

use super::{RecordFuture, RecordStore, StoreError};
use crate::db::{self, DatabaseError};
use crate::models::{TimeWindow, UserId};

/// `RecordStore` over a single rusqlite connection.
///
/// Queries run on the blocking pool; the connection is shared behind a
/// mutex so fetches issued in quick succession serialize at the database.
#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(db::open_database(path)?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` against the underlying connection on the calling thread.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, StoreError> {
        let guard = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&guard).map_err(StoreError::from)
    }
}

impl RecordStore for SqliteRecordStore {
    fn fetch(&self, user_id: &UserId, window: TimeWindow) -> RecordFuture {
        let store = self.clone();
        let user_id = user_id.clone();
        Box::pin(async move {
            let cutoff = window.cutoff(Utc::now());
            tokio::task::spawn_blocking(move || {
                store.with_connection(|conn| {
                    db::fetch_records_since(conn, user_id.as_str(), cutoff)
                })
            })
            .await
            .map_err(|e| StoreError::Worker(e.to_string()))?
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_medical_record, open_memory_database};
    use crate::models::MedicalRecord;
    use chrono::Duration;

    fn seeded_store() -> SqliteRecordStore {
        let store = SqliteRecordStore::from_connection(open_memory_database().unwrap());
        let now = Utc::now();
        store
            .with_connection(|conn| {
                for (issue, days_ago) in [("Fever", 3), ("Fracture", 60), ("Allergy", 400)] {
                    let record = MedicalRecord::new(
                        "IUMC-7",
                        issue,
                        100.0,
                        50.0,
                        now - Duration::days(days_ago),
                    );
                    insert_medical_record(conn, &record)?;
                }
                insert_medical_record(
                    conn,
                    &MedicalRecord::new("IUMC-8", "Other patient", 1.0, 1.0, now),
                )
            })
            .unwrap();
        store
    }

    fn user() -> UserId {
        UserId::parse("IUMC-7").unwrap()
    }

    #[tokio::test]
    async fn monthly_window_returns_recent_records_only() {
        let store = seeded_store();
        let records = store.fetch(&user(), TimeWindow::Monthly).await.unwrap();
        let issues: Vec<_> = records.iter().map(|r| r.issue.as_str()).collect();
        assert_eq!(issues, vec!["Fever"]);
    }

    #[tokio::test]
    async fn wider_windows_include_older_records() {
        let store = seeded_store();
        assert_eq!(store.fetch(&user(), TimeWindow::ThreeMonths).await.unwrap().len(), 2);
        assert_eq!(store.fetch(&user(), TimeWindow::Yearly).await.unwrap().len(), 2);
        assert_eq!(store.fetch(&user(), TimeWindow::Lifetime).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unknown_user_gets_empty_set() {
        let store = seeded_store();
        let nobody = UserId::parse("nobody").unwrap();
        let records = store.fetch(&nobody, TimeWindow::Lifetime).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn open_creates_file_backed_store() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SqliteRecordStore::open(&tmp.path().join("records.db")).unwrap();
        let records = store.fetch(&user(), TimeWindow::Lifetime).await.unwrap();
        assert!(records.is_empty());
    }
}
