use std::sync::Arc;
use axum::{
    extract::{State, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::Response,
};
use tracing::{info, error};

use crate::AppState;
use crate::events::EventSource;
use crate::utils::scope_guard::ScopeGuard;
use crate::websocket::editor_channel::EditorChannel;

/// Editor channel WebSocket handler
pub async fn editor_socket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    info!("New editor channel connection attempt");
    ws.on_upgrade(move |socket| handle_editor_socket(socket, app_state))
}

/// Handle an editor channel for the lifetime of its socket
async fn handle_editor_socket(mut socket: WebSocket, app_state: Arc<AppState>) {
    let channel = EditorChannel::new();
    let channel_id = channel.source_id();
    app_state.editor_files.connect(&channel);
    info!("Editor channel {} established", channel_id);

    // However the loop below ends, editors behind this socket go away and the channel is detached
    let _guard = ScopeGuard::new(|| {
        channel.shutdown();
        app_state.editor_files.disconnect(&channel);
        info!("Editor channel {} terminated", channel_id);
    });

    while let Some(received) = socket.recv().await {
        match received {
            Ok(Message::Text(text)) => {
                channel.handle_frame(&text);
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                error!("Editor channel {} receive error: {}", channel_id, e);
                break;
            }
        }
    }
}
