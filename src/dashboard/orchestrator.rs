//! Fetch lifecycle with request-id staleness.
//!
//! Every `request_fetch` allocates the next request id and becomes the
//! current request. When a store call completes, its result is applied
//! only if its request is still current; anything else is dropped. The
//! check and the publication happen under the same lock, so a result can
//! never land after a newer request has been issued.
//!
//! There is no cancellation and no timeout: a superseded call runs to
//! completion and is ignored, and a store call that never completes leaves
//! the view `Loading`.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::aggregate::aggregate_with;
use super::colors::ColorAssigner;
use super::types::*;
use crate::models::{MedicalRecord, TimeWindow, UserId};
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Default)]
struct Ledger {
    last_issued: u64,
    current: Option<FetchRequest>,
}

struct Shared {
    ledger: Mutex<Ledger>,
    view: watch::Sender<DashboardView>,
}

impl Shared {
    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        // Plain counters; still consistent after a poisoning panic.
        self.ledger.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn resolve(
        &self,
        request: FetchRequest,
        result: Result<Vec<MedicalRecord>, StoreError>,
        colors: &ColorAssigner,
    ) -> FetchOutcome {
        let mut ledger = self.ledger();
        if ledger.current != Some(request) {
            tracing::debug!(
                request_id = request.id,
                window = %request.window,
                latest = ledger.last_issued,
                "Discarding stale fetch result"
            );
            return FetchOutcome::Superseded;
        }
        ledger.current = None;

        match result {
            Ok(records) => {
                let (series, totals) = aggregate_with(&records, colors);
                let record_count = records.len();
                let live = Arc::new(LiveData {
                    request,
                    records,
                    series,
                    totals,
                });
                self.view.send_modify(|view| {
                    view.status = FetchStatus::Resolved;
                    view.loading = false;
                    view.pending = None;
                    view.failure = None;
                    view.live = Some(live);
                });
                tracing::info!(
                    request_id = request.id,
                    window = %request.window,
                    record_count,
                    grand_total = totals.grand_total,
                    "Dashboard data applied"
                );
                FetchOutcome::Applied { record_count }
            }
            Err(e) => {
                let failure = FetchFailure {
                    request_id: request.id,
                    window: request.window,
                    reason: e.to_string(),
                };
                tracing::warn!(
                    request_id = request.id,
                    window = %request.window,
                    error = %e,
                    "Record fetch failed"
                );
                let surfaced = failure.clone();
                self.view.send_modify(|view| {
                    view.status = FetchStatus::Failed;
                    view.loading = false;
                    view.pending = None;
                    view.failure = Some(surfaced);
                });
                FetchOutcome::Failed(failure)
            }
        }
    }
}

/// Handle to an issued fetch.
///
/// Awaiting [`PendingFetch::outcome`] is optional; dropping the handle
/// leaves the fetch running and its result is still applied if current.
#[derive(Debug)]
pub struct PendingFetch {
    request: FetchRequest,
    handle: JoinHandle<FetchOutcome>,
}

impl PendingFetch {
    pub fn request(&self) -> FetchRequest {
        self.request
    }

    pub async fn outcome(self) -> FetchOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(request_id = self.request.id, error = %e, "Fetch task aborted");
                FetchOutcome::Aborted
            }
        }
    }
}

/// Owns the request lifecycle and is the only writer of the live view.
pub struct FetchOrchestrator {
    store: Arc<dyn RecordStore>,
    colors: ColorAssigner,
    shared: Arc<Shared>,
}

impl FetchOrchestrator {
    pub fn new(store: Arc<dyn RecordStore>, colors: ColorAssigner, window: TimeWindow) -> Self {
        let (view, _) = watch::channel(DashboardView::idle(window));
        Self {
            store,
            colors,
            shared: Arc::new(Shared {
                ledger: Mutex::new(Ledger::default()),
                view,
            }),
        }
    }

    /// Issue a fetch for `(user_id, window)`, superseding any request in
    /// flight. Returns immediately; must be called within a tokio runtime.
    pub fn request_fetch(&self, user_id: &UserId, window: TimeWindow) -> PendingFetch {
        let request = {
            let mut ledger = self.shared.ledger();
            ledger.last_issued += 1;
            let request = FetchRequest {
                id: ledger.last_issued,
                window,
            };
            if let Some(previous) = ledger.current.replace(request) {
                tracing::debug!(
                    superseded = previous.id,
                    by = request.id,
                    "Superseding in-flight fetch"
                );
            }
            self.shared.view.send_modify(|view| {
                view.window = window;
                view.status = FetchStatus::Loading;
                view.loading = true;
                view.pending = Some(request);
                view.failure = None;
            });
            request
        };

        tracing::info!(request_id = request.id, window = %window, "Record fetch issued");

        let fetch = self.store.fetch(user_id, window);
        let shared = Arc::clone(&self.shared);
        let colors = self.colors;
        let handle = tokio::spawn(async move {
            let result = fetch.await;
            shared.resolve(request, result, &colors)
        });

        PendingFetch { request, handle }
    }

    /// Record the active window without fetching (no user signed in).
    pub fn select_window(&self, window: TimeWindow) {
        self.shared.view.send_modify(|view| view.window = window);
    }

    /// Supersede everything in flight and drop the live tuple, returning
    /// to `Idle`.
    pub fn invalidate(&self, window: TimeWindow) {
        let mut ledger = self.shared.ledger();
        if let Some(previous) = ledger.current.take() {
            tracing::debug!(superseded = previous.id, "Invalidating in-flight fetch");
        }
        self.shared.view.send_replace(DashboardView::idle(window));
    }

    pub fn status(&self) -> FetchStatus {
        self.shared.view.borrow().status
    }

    pub fn current_request(&self) -> Option<FetchRequest> {
        self.shared.ledger().current
    }

    pub fn current_view(&self) -> DashboardView {
        self.shared.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.shared.view.subscribe()
    }
}
