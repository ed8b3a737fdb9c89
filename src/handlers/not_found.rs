use axum::{http::{StatusCode, Uri}, Json};
use tracing::debug;

use crate::models::ErrorResponse;

/// Fallback for unmatched routes
pub async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    debug!("No route for {}", uri);
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(StatusCode::NOT_FOUND, format!("No route for {}", uri.path()))),
    )
}
