use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::{BusMessage, BusRequest, BusResponse};

/// Answers requests arriving over the message bus.
pub trait RequestHandler: Send + Sync {
    /// Return `None` to let another handler answer.
    fn respond(&self, request: &BusRequest) -> Option<BusResponse>;
}

/// Extension-wide message bus: broadcast notifications plus request/response.
#[derive(Clone)]
pub struct MessageBus {
    tx: broadcast::Sender<BusMessage>,
    handlers: Arc<RwLock<Vec<Arc<dyn RequestHandler>>>>,
}

impl MessageBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            handlers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Send `message` to every current listener. Dropped silently when nobody listens.
    pub fn broadcast(&self, message: BusMessage) {
        debug!("Bus broadcast to {} listener(s)", self.tx.receiver_count());
        let _ = self.tx.send(message);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn add_handler(&self, handler: Arc<dyn RequestHandler>) {
        self.handlers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(handler);
    }

    /// First answer from the registered handlers, in registration order.
    pub fn request(&self, request: &BusRequest) -> Option<BusResponse> {
        let handlers = self
            .handlers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        let response = handlers.iter().find_map(|h| h.respond(request));
        if response.is_none() {
            debug!("No handler answered bus request {:?}", request);
        }
        response
    }
}
