//! The reactive container the presentation layer talks to.
//!
//! Holds the session user and the active window, and forwards every
//! change that needs data to the `FetchOrchestrator`. It never writes the
//! live tuple itself.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use super::colors::ColorAssigner;
use super::error::DashboardError;
use super::orchestrator::{FetchOrchestrator, PendingFetch};
use super::types::DashboardView;
use crate::config::DashboardConfig;
use crate::models::{TimeWindow, UserId};
use crate::store::RecordStore;

#[derive(Debug)]
struct Selection {
    user: Option<UserId>,
    window: TimeWindow,
}

pub struct DashboardState {
    orchestrator: FetchOrchestrator,
    // Held while issuing fetches so selection order and request-id order agree.
    selection: Mutex<Selection>,
}

impl DashboardState {
    pub fn new(store: Arc<dyn RecordStore>, config: &DashboardConfig) -> Self {
        let colors = ColorAssigner::new(config.color_scheme);
        Self {
            orchestrator: FetchOrchestrator::new(store, colors, config.default_window),
            selection: Mutex::new(Selection {
                user: None,
                window: config.default_window,
            }),
        }
    }

    fn selection(&self) -> MutexGuard<'_, Selection> {
        self.selection.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Attach the session user and fetch the active window for them.
    ///
    /// Switching to a different user first drops the previous user's data
    /// so it is never shown under the new identity.
    pub fn sign_in(&self, raw_user_id: &str) -> Result<PendingFetch, DashboardError> {
        let user = UserId::parse(raw_user_id)?;
        let mut selection = self.selection();
        if selection.user.as_ref().is_some_and(|current| current != &user) {
            self.orchestrator.invalidate(selection.window);
        }
        tracing::info!(user_id = %user, window = %selection.window, "Dashboard session started");
        let pending = self.orchestrator.request_fetch(&user, selection.window);
        selection.user = Some(user);
        Ok(pending)
    }

    /// Detach the user; any fetch in flight becomes stale and the view
    /// returns to `Idle`.
    pub fn sign_out(&self) {
        let mut selection = self.selection();
        if let Some(user) = selection.user.take() {
            tracing::info!(user_id = %user, "Dashboard session ended");
        }
        self.orchestrator.invalidate(selection.window);
    }

    /// Make `window` active and fetch it. Without a signed-in user the
    /// selection is only recorded and nothing is fetched.
    pub fn set_window(&self, window: TimeWindow) -> Option<PendingFetch> {
        let mut selection = self.selection();
        selection.window = window;
        match selection.user.as_ref() {
            Some(user) => Some(self.orchestrator.request_fetch(user, window)),
            None => {
                tracing::debug!(window = %window, "Window selected with no user; not fetching");
                self.orchestrator.select_window(window);
                None
            }
        }
    }

    /// Re-issue the fetch for the active window (user-initiated retry).
    pub fn refresh(&self) -> Option<PendingFetch> {
        let selection = self.selection();
        selection
            .user
            .as_ref()
            .map(|user| self.orchestrator.request_fetch(user, selection.window))
    }

    pub fn window(&self) -> TimeWindow {
        self.selection().window
    }

    pub fn user(&self) -> Option<UserId> {
        self.selection().user.clone()
    }

    pub fn current_view(&self) -> DashboardView {
        self.orchestrator.current_view()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardView> {
        self.orchestrator.subscribe()
    }
}
