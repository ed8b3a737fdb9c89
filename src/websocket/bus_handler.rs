use std::sync::Arc;
use axum::{
    extract::{State, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::Response,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Mutex;
use tracing::{info, error, warn};

use crate::AppState;
use crate::models::BusMessage;
use crate::websocket::msg_get_log_handler::handle_bus_frame;

/// Message bus WebSocket handler for other extension components
pub async fn bus_socket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    info!("New bus listener connection attempt");
    ws.on_upgrade(move |socket| handle_bus_socket(socket, app_state))
}

/// Push one notification. Returns `false` once the socket is gone.
async fn send_notification(sender: &Arc<Mutex<SplitSink<WebSocket, Message>>>, message: &BusMessage) -> bool {
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to serialize bus notification: {}", e);
            return true;
        }
    };
    sender.lock().await.send(Message::Text(text)).await.is_ok()
}

async fn handle_bus_socket(socket: WebSocket, app_state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let sender1 = Arc::new(Mutex::new(sender));
    let sender2 = sender1.clone();

    let mut notifications = app_state.bus.subscribe();
    let mut editor_files = app_state.editor_files.subscribe();
    let current = BusMessage::EditorFiles(editor_files.borrow_and_update().clone());
    let requests_state = app_state.clone();

    // Requests from the listener, answered on the same socket
    let mut request_task = tokio::spawn(async move {
        while let Some(Ok(received)) = receiver.next().await {
            match received {
                Message::Text(text) => handle_bus_frame(&text, &requests_state.bus, &sender1).await,
                Message::Close(_) => break,
                _ => continue,
            }
        }
    });

    // Current editor files first, then broadcasts and editor file changes
    let mut notify_task = tokio::spawn(async move {
        if !send_notification(&sender2, &current).await {
            return;
        }
        loop {
            let message = tokio::select! {
                received = notifications.recv() => match received {
                    Ok(message) => message,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Bus listener lagged, skipped {} notification(s)", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                },
                changed = editor_files.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = editor_files.borrow_and_update().clone();
                    BusMessage::EditorFiles(state)
                }
            };

            if !send_notification(&sender2, &message).await {
                break;
            }
        }
    });

    tokio::select! {
        _ = (&mut request_task) => notify_task.abort(),
        _ = (&mut notify_task) => request_task.abort(),
    };
    info!("Bus listener connection terminated");
}
