use tracing::{info, error};
use std::sync::Arc;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use tokio::sync::Mutex;

use crate::models::BusRequest;
use crate::services::bus::MessageBus;

/// Parse a bus frame and produce the text of its answer, if any
pub fn answer_bus_frame(text: &str, bus: &MessageBus) -> Option<String> {
    let request = match serde_json::from_str::<BusRequest>(text) {
        Ok(request) => request,
        Err(e) => {
            error!("Failed to parse bus request: {}", e);
            return None;
        }
    };
    info!("Bus request received: {:?}", request);

    let response = bus.request(&request)?;
    match serde_json::to_string(&response) {
        Ok(text) => Some(text),
        Err(e) => {
            error!("Failed to serialize response to {:?}: {}", request, e);
            None
        }
    }
}

/// Answer a bus frame on the socket it came in on
pub async fn handle_bus_frame(text: &str, bus: &MessageBus, sender: &Arc<Mutex<SplitSink<WebSocket, Message>>>) {
    let Some(response_text) = answer_bus_frame(text, bus) else {
        return;
    };

    if sender.lock().await.send(Message::Text(response_text)).await.is_err() {
        error!("Failed to send bus response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use serde_json::Value;

    #[test]
    fn get_log_is_answered_with_the_log() {
        let state = AppState::default();
        state.error_log.record("broken rule");

        let answer = answer_bus_frame(r#"{"name":"get-log"}"#, &state.bus).unwrap();
        let value: Value = serde_json::from_str(&answer).unwrap();
        assert_eq!(value["name"], "log");
        assert_eq!(value["data"][0]["message"], "broken rule");
    }

    #[test]
    fn unknown_requests_get_no_answer() {
        let state = AppState::default();
        assert_eq!(answer_bus_frame(r#"{"name":"get-files"}"#, &state.bus), None);
        assert_eq!(answer_bus_frame("garbage", &state.bus), None);
    }
}
