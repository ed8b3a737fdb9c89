use std::sync::Arc;
use axum::{
    extract::{State, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::Response,
};
use tracing::{info, error};

use crate::AppState;
use crate::events::WorkerMessage;

/// Task processor WebSocket handler: every text frame is a worker status message
pub async fn worker_socket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    info!("New task processor connection attempt");
    ws.on_upgrade(move |socket| handle_worker_socket(socket, app_state))
}

async fn handle_worker_socket(mut socket: WebSocket, app_state: Arc<AppState>) {
    while let Some(received) = socket.recv().await {
        let text = match received {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                error!("Task processor receive error: {}", e);
                break;
            }
        };

        match serde_json::from_str::<WorkerMessage>(&text) {
            Ok(message) => app_state.processor.post(message),
            Err(e) => error!("Failed to parse task processor message: {}", e),
        }
    }
    info!("Task processor connection terminated");
}
