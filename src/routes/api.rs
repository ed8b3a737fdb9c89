use crate::handlers::{health_check, ready_check, get_log, get_editor_files};
use crate::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Create API routes
pub fn create_api_routes() -> Router<Arc<AppState>> {
    Router::<Arc<AppState>>::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/v1/log", get(get_log))
        .route("/v1/editor-files", get(get_editor_files))
}
