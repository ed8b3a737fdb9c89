use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, info};
use uuid::Uuid;

use crate::events::{EventSource, Handler, Subscription, WorkerEventKind, WorkerMessage};
use crate::models::{BusMessage, BusRequest, BusResponse, LogEntry, LogKind};
use crate::services::bus::{MessageBus, RequestHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Maximum number of entries kept; oldest are evicted first
    pub capacity: usize,
    /// Entry ids are taken modulo this value
    pub id_wrap: u32,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            capacity: 50,
            id_wrap: 10_000,
        }
    }
}

struct LogState {
    items: VecDeque<LogEntry>,
    next_id: u32,
}

struct Inner {
    settings: LogSettings,
    state: Mutex<LogState>,
    bus: MessageBus,
    watched: Mutex<HashMap<Uuid, Subscription<WorkerEventKind>>>,
}

impl Inner {
    fn record(&self, message: String) -> LogEntry {
        let (entry, snapshot) = {
            let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
            state.items.retain(|item| item.message != message);

            let entry = LogEntry {
                id: state.next_id,
                timestamp: Utc::now(),
                message,
                kind: LogKind::Error,
            };
            state.next_id = state.next_id.wrapping_add(1) % self.settings.id_wrap.max(1);
            state.items.push_back(entry.clone());

            while state.items.len() > self.settings.capacity {
                state.items.pop_front();
            }
            (entry, state.items.iter().cloned().collect::<Vec<_>>())
        };

        debug!("Logged worker error #{}: {}", entry.id, entry.message);
        self.bus.broadcast(BusMessage::LogUpdated(snapshot));
        entry
    }

    fn handle(&self, message: &WorkerMessage) {
        if let Some(text) = message.error_text() {
            self.record(text);
        }
    }

    fn snapshot(&self) -> Vec<LogEntry> {
        self.state
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .items
            .iter()
            .cloned()
            .collect()
    }
}

/// Bounded, de-duplicated log of errors reported by task processors.
///
/// Recording a message that is already present moves it to the newest position
/// under a fresh id. Every change is broadcast on the bus as `log-updated`.
#[derive(Clone)]
pub struct ErrorLog {
    inner: Arc<Inner>,
}

impl ErrorLog {
    pub fn new(bus: MessageBus, settings: LogSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                settings,
                state: Mutex::new(LogState {
                    items: VecDeque::with_capacity(settings.capacity + 1),
                    next_id: 0,
                }),
                bus,
                watched: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Start recording error messages from `processor`. Returns `false` if already watched.
    pub fn watch<S>(&self, processor: &S) -> bool
    where
        S: EventSource<WorkerMessage> + ?Sized,
    {
        let source = processor.source_id();
        let mut watched = self.inner.watched.lock().unwrap_or_else(|p| p.into_inner());
        if watched.contains_key(&source) {
            debug!("Task processor {} already watched", source);
            return false;
        }

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let handler: Handler<WorkerMessage> = Arc::new(move |message: &WorkerMessage| {
            if let Some(inner) = weak.upgrade() {
                inner.handle(message);
            }
        });
        watched.insert(source, processor.subscribe(WorkerEventKind::Message, handler));
        info!("Watching task processor {} for errors", source);
        true
    }

    /// Stop recording from `processor`. Returns `false` if it was not watched.
    pub fn unwatch<S>(&self, processor: &S) -> bool
    where
        S: EventSource<WorkerMessage> + ?Sized,
    {
        let source = processor.source_id();
        let removed = self
            .inner
            .watched
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&source);
        match removed {
            Some(subscription) => {
                processor.unsubscribe(&subscription);
                info!("Stopped watching task processor {}", source);
                true
            }
            None => false,
        }
    }

    pub fn record(&self, message: impl Into<String>) -> LogEntry {
        self.inner.record(message.into())
    }

    /// Copy of the current log, oldest first.
    pub fn get_log(&self) -> Vec<LogEntry> {
        self.inner.snapshot()
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().unwrap_or_else(|p| p.into_inner()).items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RequestHandler for ErrorLog {
    fn respond(&self, request: &BusRequest) -> Option<BusResponse> {
        match request {
            BusRequest::GetLog => Some(BusResponse::Log(self.get_log())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::processor::TaskProcessor;
    use serde_json::json;

    fn messages(log: &ErrorLog) -> Vec<String> {
        log.get_log().into_iter().map(|e| e.message).collect()
    }

    fn new_log() -> ErrorLog {
        ErrorLog::new(MessageBus::new(16), LogSettings::default())
    }

    #[test]
    fn duplicate_message_moves_to_the_end_with_new_id() {
        let log = new_log();
        let a = log.record("A");
        log.record("B");
        let again = log.record("A");

        assert_eq!(messages(&log), vec!["B", "A"]);
        assert_ne!(a.id, again.id);
        let ids: Vec<u32> = log.get_log().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn duplicate_keeps_length_unchanged() {
        let log = new_log();
        log.record("A");
        log.record("B");
        log.record("C");
        log.record("B");
        assert_eq!(log.len(), 3);
        assert_eq!(messages(&log), vec!["A", "C", "B"]);
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let log = new_log();
        for i in 0..51 {
            log.record(format!("error {}", i));
        }
        let log_msgs = messages(&log);
        assert_eq!(log_msgs.len(), 50);
        assert!(!log_msgs.contains(&"error 0".to_string()));
        assert_eq!(log_msgs.first().map(String::as_str), Some("error 1"));
        assert_eq!(log_msgs.last().map(String::as_str), Some("error 50"));
    }

    #[test]
    fn ids_wrap_around() {
        let log = ErrorLog::new(MessageBus::new(4), LogSettings { capacity: 2, id_wrap: 3 });
        let ids: Vec<u32> = (0..5).map(|i| log.record(format!("e{}", i)).id).collect();
        assert_eq!(ids, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn snapshot_is_detached_from_the_log() {
        let log = new_log();
        log.record("A");
        let mut copy = log.get_log();
        copy.clear();
        assert_eq!(log.len(), 1);
    }

    #[tokio::test]
    async fn every_record_broadcasts_the_full_log() {
        let bus = MessageBus::new(16);
        let mut rx = bus.subscribe();
        let log = ErrorLog::new(bus, LogSettings::default());

        log.record("A");
        log.record("B");

        match rx.recv().await.unwrap() {
            BusMessage::LogUpdated(items) => assert_eq!(items.len(), 1),
            other => panic!("unexpected message {:?}", other),
        }
        match rx.recv().await.unwrap() {
            BusMessage::LogUpdated(items) => {
                let msgs: Vec<_> = items.into_iter().map(|e| e.message).collect();
                assert_eq!(msgs, vec!["A", "B"]);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn watches_only_error_messages_from_processor() {
        let log = new_log();
        let processor = TaskProcessor::new();
        assert!(log.watch(&processor));
        assert!(!log.watch(&processor));

        processor.post(WorkerMessage::error("parse failed"));
        processor.post(serde_json::from_value(json!({"status": "ok", "data": "patched"})).unwrap());
        processor.post(WorkerMessage::default());

        assert_eq!(messages(&log), vec!["parse failed"]);

        assert!(log.unwatch(&processor));
        assert!(!log.unwatch(&processor));
        processor.post(WorkerMessage::error("after unwatch"));
        assert_eq!(messages(&log), vec!["parse failed"]);
    }

    #[test]
    fn answers_get_log_requests_through_the_bus() {
        let bus = MessageBus::new(16);
        let log = ErrorLog::new(bus.clone(), LogSettings::default());
        bus.add_handler(Arc::new(log.clone()));

        log.record("A");
        match bus.request(&BusRequest::GetLog) {
            Some(BusResponse::Log(items)) => assert_eq!(items.len(), 1),
            None => panic!("get-log was not answered"),
        }
    }
}
