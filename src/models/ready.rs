use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API response for readiness check
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ReadyResponse {
    pub status: String,
    pub message: String,
    /// Whether any editor is currently connected
    pub editors_active: bool,
    pub bus_listeners: usize,
    pub log_items: usize,
}
