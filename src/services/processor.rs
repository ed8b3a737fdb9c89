use uuid::Uuid;

use crate::events::{EventEmitter, EventSource, Handler, Subscription, WorkerEventKind, WorkerMessage};

/// Handle to the background patch worker.
///
/// The worker itself lives elsewhere; this only carries its message channel so
/// observers such as the error log can attach to it.
#[derive(Default)]
pub struct TaskProcessor {
    channel: EventEmitter<WorkerMessage>,
}

impl TaskProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a message from the worker to every observer.
    pub fn post(&self, message: WorkerMessage) {
        self.channel.emit(&message);
    }
}

impl EventSource<WorkerMessage> for TaskProcessor {
    fn source_id(&self) -> Uuid {
        self.channel.source_id()
    }

    fn subscribe(&self, kind: WorkerEventKind, handler: Handler<WorkerMessage>) -> Subscription<WorkerEventKind> {
        self.channel.subscribe(kind, handler)
    }

    fn unsubscribe(&self, subscription: &Subscription<WorkerEventKind>) -> bool {
        self.channel.unsubscribe(subscription)
    }
}
