use crate::websocket::{bus_handler::bus_socket_handler, handler::editor_socket_handler, worker_handler::worker_socket_handler};
use crate::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Create WebSocket routes
pub fn create_ws_routes() -> Router<Arc<AppState>> {
    Router::<Arc<AppState>>::new()
        .route("/editor", get(editor_socket_handler))
        .route("/worker", get(worker_socket_handler))
        .route("/bus", get(bus_socket_handler))
}
