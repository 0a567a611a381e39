//! Contains all the routes that this application can handle.

pub mod api;

use crate::{web::Error, AppState};

use axum::{
    http::{StatusCode, Uri},
    routing::{any, get},
    Router,
};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn not_found(uri: Uri) -> Error {
    Error::RouteNotFound(uri.path().to_string())
}

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes(app_state))
        .route("/health-check", get(health_check))
        .fallback(not_found)
}

/// API - Routes nested under "/api" path.
/// The two form endpoints accept every method and answer anything but POST with a JSON 405.
fn api_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/create-checkout-session",
            any(api::create_checkout_session_endpoint),
        )
        .route("/subscribe", any(api::subscribe_endpoint))
        .route("/config", get(api::frontend_config))
        .with_state(app_state)
}
