use indexmap::IndexSet;
use std::sync::Mutex;
use tracing::{debug, error};
use uuid::Uuid;

use crate::events::{ClientEvent, ClientEventKind, EventEmitter, EventSource, Handler, Subscription};
use crate::models::ClientFrame;

/// One `/ws/editor` socket seen as an event source.
///
/// Several sockets can feed the registry at once, so ending one socket only
/// disconnects the editors that reported through it. A `close` event still
/// clears everything when a caller emits one.
#[derive(Default)]
pub struct EditorChannel {
    emitter: EventEmitter<ClientEvent>,
    reported: Mutex<IndexSet<String>>,
}

impl EditorChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one text frame and forward it. Returns `false` when the frame was skipped.
    pub fn handle_frame(&self, text: &str) -> bool {
        match serde_json::from_str::<ClientFrame>(text) {
            Ok(frame) => {
                debug!("Editor channel {} frame: {:?}", self.source_id(), frame);
                self.dispatch(ClientEvent::from(frame));
                true
            }
            Err(e) => {
                error!("Failed to parse editor frame on channel {}: {}", self.source_id(), e);
                false
            }
        }
    }

    pub fn dispatch(&self, event: ClientEvent) {
        {
            let mut reported = self.reported.lock().unwrap_or_else(|p| p.into_inner());
            match &event {
                ClientEvent::EditorFiles { id, .. } => {
                    reported.insert(id.clone());
                }
                ClientEvent::EditorDisconnect { id } => {
                    reported.shift_remove(id);
                }
                ClientEvent::Close => reported.clear(),
            }
        }
        self.emitter.emit(&event);
    }

    /// Disconnect every editor that reported through this channel.
    pub fn shutdown(&self) {
        let ids: Vec<String> = self
            .reported
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .drain(..)
            .collect();
        debug!("Editor channel {} shutting down with {} editor(s)", self.source_id(), ids.len());
        for id in ids {
            self.emitter.emit(&ClientEvent::EditorDisconnect { id });
        }
    }

    /// Editor ids currently reported through this channel.
    pub fn reported_editors(&self) -> Vec<String> {
        self.reported
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

impl EventSource<ClientEvent> for EditorChannel {
    fn source_id(&self) -> Uuid {
        self.emitter.source_id()
    }

    fn subscribe(&self, kind: ClientEventKind, handler: Handler<ClientEvent>) -> Subscription<ClientEventKind> {
        self.emitter.subscribe(kind, handler)
    }

    fn unsubscribe(&self, subscription: &Subscription<ClientEventKind>) -> bool {
        self.emitter.unsubscribe(subscription)
    }
}
