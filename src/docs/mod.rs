use utoipa::OpenApi;
use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Worker is running", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Readiness check endpoint
#[utoipa::path(
    get,
    path = "/api/ready",
    responses(
        (status = 200, description = "Worker is ready", body = ReadyResponse)
    )
)]
#[allow(dead_code)]
pub async fn ready_check_doc() {}

/// Worker error log
#[utoipa::path(
    get,
    path = "/api/v1/log",
    responses(
        (status = 200, description = "Logged errors, oldest first", body = Vec<LogEntry>)
    )
)]
#[allow(dead_code)]
pub async fn get_log_doc() {}

/// Files open in connected editors
#[utoipa::path(
    get,
    path = "/api/v1/editor-files",
    responses(
        (status = 200, description = "Union of editor files", body = PublishedState)
    )
)]
#[allow(dead_code)]
pub async fn get_editor_files_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        ready_check_doc,
        get_log_doc,
        get_editor_files_doc,
    ),
    components(
        schemas(HealthResponse, ReadyResponse, ErrorResponse, LogEntry, LogKind, PublishedState)
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;
