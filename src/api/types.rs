//! Shared types for the dashboard API layer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::dashboard::{DashboardState, FetchRequest};

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub dashboard: Arc<DashboardState>,
}

impl ApiContext {
    pub fn new(dashboard: Arc<DashboardState>) -> Self {
        Self { dashboard }
    }
}

/// Body of `PUT /api/dashboard/window`.
#[derive(Debug, Deserialize)]
pub struct WindowSelection {
    pub window: String,
}

/// Body of `POST /api/session`.
#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub user_id: String,
}

/// Answer to calls that may issue a fetch. `request` is `None` when no
/// fetch could be issued (no user signed in).
#[derive(Debug, Serialize)]
pub struct FetchTicket {
    pub request: Option<FetchRequest>,
}
