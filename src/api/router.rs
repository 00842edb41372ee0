//! Dashboard API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::dashboard::DashboardState;

/// Build the dashboard API router.
pub fn dashboard_api_router(dashboard: Arc<DashboardState>) -> Router {
    let ctx = ApiContext::new(dashboard);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/dashboard", get(endpoints::dashboard::view))
        .route("/dashboard/window", put(endpoints::dashboard::set_window))
        .route("/dashboard/refresh", post(endpoints::dashboard::refresh))
        .route(
            "/session",
            post(endpoints::session::sign_in).delete(endpoints::session::sign_out),
        )
        .with_state(ctx)
        // Views carry personal health data; never let intermediaries cache them.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    Router::new().nest("/api", api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::DashboardConfig;
    use crate::dashboard::testing::{records_for, ScriptedStore};
    use crate::models::TimeWindow;

    fn test_dashboard() -> (Arc<DashboardState>, Arc<ScriptedStore>) {
        let store = ScriptedStore::new();
        let dashboard = Arc::new(DashboardState::new(store.clone(), &DashboardConfig::default()));
        (dashboard, store)
    }

    fn request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_reports_version_and_session() {
        let (dashboard, _) = test_dashboard();
        let app = dashboard_api_router(dashboard);

        let response = app.oneshot(request("GET", "/api/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["signed_in"], false);
        assert_eq!(json["version"], crate::config::APP_VERSION);
    }

    #[tokio::test]
    async fn dashboard_starts_idle() {
        let (dashboard, _) = test_dashboard();
        let app = dashboard_api_router(dashboard);

        let response = app.oneshot(request("GET", "/api/dashboard", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "idle");
        assert_eq!(json["window"], "monthly");
        assert!(json["live"].is_null());
    }

    #[tokio::test]
    async fn window_change_without_session_issues_nothing() {
        let (dashboard, store) = test_dashboard();
        let app = dashboard_api_router(dashboard.clone());

        let body = serde_json::json!({ "window": "yearly" });
        let response = app
            .oneshot(request("PUT", "/api/dashboard/window", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let json = json_body(response).await;
        assert!(json["request"].is_null());
        assert!(store.calls().is_empty());
        assert_eq!(dashboard.window(), TimeWindow::Yearly);
    }

    #[tokio::test]
    async fn unknown_window_is_rejected() {
        let (dashboard, _) = test_dashboard();
        let app = dashboard_api_router(dashboard);

        let body = serde_json::json!({ "window": "weekly" });
        let response = app
            .oneshot(request("PUT", "/api/dashboard/window", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn blank_user_is_rejected() {
        let (dashboard, store) = test_dashboard();
        let app = dashboard_api_router(dashboard);

        let body = serde_json::json!({ "user_id": "   " });
        let response = app
            .oneshot(request("POST", "/api/session", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn sign_in_then_view_shows_resolved_data() {
        let (dashboard, store) = test_dashboard();
        let app = dashboard_api_router(dashboard.clone());

        let body = serde_json::json!({ "user_id": "IUMC-9" });
        let response = app
            .clone()
            .oneshot(request("POST", "/api/session", Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let json = json_body(response).await;
        assert_eq!(json["request"]["id"], 1);
        assert_eq!(json["request"]["window"], "monthly");

        let mut rx = dashboard.subscribe();
        store.release(0, Ok(records_for(TimeWindow::Monthly, 2)));
        rx.wait_for(|v| !v.loading).await.unwrap();

        let response = app.oneshot(request("GET", "/api/dashboard", None)).await.unwrap();
        let json = json_body(response).await;
        assert_eq!(json["status"], "resolved");
        assert_eq!(json["live"]["records"].as_array().unwrap().len(), 2);
        assert_eq!(json["live"]["series"]["labels"].as_array().unwrap().len(), 2);
        assert_eq!(json["live"]["totals"]["grand_total"], 220.0);
        assert!(json["live"]["series"]["colors"][0]
            .as_str()
            .unwrap()
            .starts_with("rgb("));
    }

    #[tokio::test]
    async fn refresh_and_sign_out() {
        let (dashboard, store) = test_dashboard();
        dashboard.sign_in("IUMC-9").unwrap();
        let app = dashboard_api_router(dashboard.clone());

        let response = app
            .clone()
            .oneshot(request("POST", "/api/dashboard/refresh", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(json_body(response).await["request"]["id"], 2);
        assert_eq!(store.calls().len(), 2);

        let response = app.oneshot(request("DELETE", "/api/session", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(dashboard.user().is_none());
        assert_eq!(dashboard.current_view().status, crate::dashboard::FetchStatus::Idle);
    }
}
