use std::sync::Arc;
use axum::{extract::State, Json};
use tracing::debug;

use crate::AppState;
use crate::models::PublishedState;

/// Files open across all connected editors
pub async fn get_editor_files(State(app_state): State<Arc<AppState>>) -> Json<PublishedState> {
    debug!("Editor files requested");
    Json(app_state.editor_files.state())
}
