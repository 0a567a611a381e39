use axum::{extract::State, Json};

use crate::{config::FrontendConfig, AppState};

/// The public configuration the landing page scripts read on load.
pub async fn frontend_config(State(app_state): State<AppState>) -> Json<FrontendConfig> {
    Json(app_state.frontend_config.clone())
}
