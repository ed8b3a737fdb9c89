use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// An event that can be dispatched through an [`EventSource`].
pub trait Event {
    type Kind: Copy + Eq + Hash + std::fmt::Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

pub type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Registration handle returned by [`EventSource::subscribe`].
///
/// Passing it back to [`EventSource::unsubscribe`] removes exactly the handler
/// that was added, no matter how many other handlers share the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription<K> {
    pub kind: K,
    pub id: u64,
}

/// Anything that emits events of type `E` to subscribed handlers.
pub trait EventSource<E: Event> {
    /// Stable identity of this source, used by observers to track what they are attached to.
    fn source_id(&self) -> Uuid;

    fn subscribe(&self, kind: E::Kind, handler: Handler<E>) -> Subscription<E::Kind>;

    /// Returns `false` when the handle was not (or is no longer) registered.
    fn unsubscribe(&self, subscription: &Subscription<E::Kind>) -> bool;
}

type HandlerMap<E> = HashMap<<E as Event>::Kind, Vec<(u64, Handler<E>)>>;

/// Thread-safe in-process event emitter.
pub struct EventEmitter<E: Event> {
    id: Uuid,
    next_id: AtomicU64,
    handlers: Mutex<HandlerMap<E>>,
}

impl<E: Event> EventEmitter<E> {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            next_id: AtomicU64::new(0),
            handlers: Mutex::new(HashMap::new()),
        }
    }

    /// Dispatch `event` to every handler registered for its kind, in registration order.
    ///
    /// Handlers are collected before any of them runs, so a handler may subscribe or
    /// unsubscribe on this emitter without deadlocking.
    pub fn emit(&self, event: &E) {
        let kind = event.kind();
        let handlers: Vec<Handler<E>> = self
            .lock_handlers()
            .get(&kind)
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        debug!("Emitting {:?} from source {} to {} handler(s)", kind, self.id, handlers.len());
        for handler in handlers {
            handler(event);
        }
    }

    /// Number of handlers currently registered for `kind`.
    pub fn handler_count(&self, kind: E::Kind) -> usize {
        self.lock_handlers().get(&kind).map_or(0, |list| list.len())
    }

    fn lock_handlers(&self) -> std::sync::MutexGuard<'_, HandlerMap<E>> {
        self.handlers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<E: Event> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> EventSource<E> for EventEmitter<E> {
    fn source_id(&self) -> Uuid {
        self.id
    }

    fn subscribe(&self, kind: E::Kind, handler: Handler<E>) -> Subscription<E::Kind> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock_handlers().entry(kind).or_default().push((id, handler));
        Subscription { kind, id }
    }

    fn unsubscribe(&self, subscription: &Subscription<E::Kind>) -> bool {
        let mut map = self.lock_handlers();
        let Some(list) = map.get_mut(&subscription.kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != subscription.id);
        let removed = list.len() != before;
        if list.is_empty() {
            map.remove(&subscription.kind);
        }
        removed
    }
}
