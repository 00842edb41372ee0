//! Dashboard view and window selection endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, FetchTicket, WindowSelection};
use crate::dashboard::{DashboardError, DashboardView, PendingFetch};
use crate::models::TimeWindow;

fn ticket(pending: Option<PendingFetch>) -> (StatusCode, Json<FetchTicket>) {
    // Dropping the handle detaches the fetch; its result still lands in
    // the view if it is current when it completes.
    let request = pending.map(|p| p.request());
    (StatusCode::ACCEPTED, Json(FetchTicket { request }))
}

/// `GET /api/dashboard`: current read-only view.
pub async fn view(State(ctx): State<ApiContext>) -> Json<DashboardView> {
    Json(ctx.dashboard.current_view())
}

/// `PUT /api/dashboard/window`: make a window active and fetch it.
pub async fn set_window(
    State(ctx): State<ApiContext>,
    Json(body): Json<WindowSelection>,
) -> Result<(StatusCode, Json<FetchTicket>), ApiError> {
    let window: TimeWindow = body.window.parse().map_err(DashboardError::from)?;
    Ok(ticket(ctx.dashboard.set_window(window)))
}

/// `POST /api/dashboard/refresh`: re-issue the fetch for the active window.
pub async fn refresh(State(ctx): State<ApiContext>) -> (StatusCode, Json<FetchTicket>) {
    ticket(ctx.dashboard.refresh())
}
