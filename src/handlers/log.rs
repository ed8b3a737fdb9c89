use std::sync::Arc;
use axum::{extract::State, Json};
use tracing::debug;

use crate::AppState;
use crate::models::LogEntry;

/// Current worker error log, oldest first
pub async fn get_log(State(app_state): State<Arc<AppState>>) -> Json<Vec<LogEntry>> {
    let log = app_state.error_log.get_log();
    debug!("Error log requested ({} entries)", log.len());
    Json(log)
}
