//! Session boundary: the external auth layer hands over the user id here.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, FetchTicket, SessionRequest};

/// `POST /api/session`: attach a user and fetch their active window.
pub async fn sign_in(
    State(ctx): State<ApiContext>,
    Json(body): Json<SessionRequest>,
) -> Result<(StatusCode, Json<FetchTicket>), ApiError> {
    let pending = ctx.dashboard.sign_in(&body.user_id)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(FetchTicket {
            request: Some(pending.request()),
        }),
    ))
}

/// `DELETE /api/session`: detach the user and clear dashboard data.
pub async fn sign_out(State(ctx): State<ApiContext>) -> StatusCode {
    ctx.dashboard.sign_out();
    StatusCode::NO_CONTENT
}
