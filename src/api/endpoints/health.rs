//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub signed_in: bool,
    pub version: &'static str,
}

/// `GET /api/health`: liveness check for the presentation client.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        signed_in: ctx.dashboard.user().is_some(),
        version: crate::config::APP_VERSION,
    })
}
