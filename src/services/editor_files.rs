use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::events::{ClientEvent, ClientEventKind, EventSource, Handler, Subscription};
use crate::models::PublishedState;

/// Editor id -> files that editor reported, in first-report order of ids.
type ConnectedEditors = IndexMap<String, Vec<String>>;

struct Inner {
    editors: Mutex<ConnectedEditors>,
    published: watch::Sender<PublishedState>,
    connections: Mutex<HashMap<Uuid, Vec<Subscription<ClientEventKind>>>>,
}

impl Inner {
    fn handle(&self, event: &ClientEvent) {
        let mut editors = self.editors.lock().unwrap_or_else(|p| p.into_inner());
        match event {
            ClientEvent::EditorFiles { id, files } => {
                debug!("Editor {} reported {} file(s)", id, files.len());
                editors.insert(id.clone(), files.clone());
            }
            ClientEvent::EditorDisconnect { id } => {
                if editors.shift_remove(id).is_none() {
                    debug!("Ignoring disconnect of unknown editor {}", id);
                    return;
                }
                info!("Editor {} disconnected", id);
            }
            ClientEvent::Close => {
                info!("Editor channel closed, dropping {} editor(s)", editors.len());
                editors.clear();
            }
        }
        self.publish(&editors);
    }

    /// Recompute the published state from scratch. Caller holds the editors lock.
    fn publish(&self, editors: &ConnectedEditors) -> Vec<String> {
        let files: Vec<String> = editors
            .values()
            .flatten()
            .cloned()
            .collect::<IndexSet<String>>()
            .into_iter()
            .collect();
        let next = PublishedState {
            files: files.clone(),
            active: !editors.is_empty(),
        };

        let changed = self.published.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
        if changed {
            debug!("Published {} editor file(s), active: {}", files.len(), !editors.is_empty());
        }
        files
    }
}

/// Tracks which stylesheet files are open across all connected editors.
///
/// The published [`PublishedState`] is an observable value: readers call
/// [`EditorFiles::subscribe`] and are woken whenever `files` or `active` change.
#[derive(Clone)]
pub struct EditorFiles {
    inner: Arc<Inner>,
}

impl EditorFiles {
    pub fn new() -> Self {
        let (published, _) = watch::channel(PublishedState::default());
        let registry = Self {
            inner: Arc::new(Inner {
                editors: Mutex::new(IndexMap::new()),
                published,
                connections: Mutex::new(HashMap::new()),
            }),
        };
        registry.sync();
        registry
    }

    /// Start tracking editor events from `client`.
    ///
    /// Returns `false` without subscribing again if `client` is already connected.
    pub fn connect<S>(&self, client: &S) -> bool
    where
        S: EventSource<ClientEvent> + ?Sized,
    {
        let source = client.source_id();
        let mut connections = self.inner.connections.lock().unwrap_or_else(|p| p.into_inner());
        if connections.contains_key(&source) {
            debug!("Editor channel {} already connected", source);
            return false;
        }

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let handler: Handler<ClientEvent> = Arc::new(move |event: &ClientEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.handle(event);
            }
        });
        let subscriptions = ClientEventKind::ALL
            .iter()
            .map(|kind| client.subscribe(*kind, handler.clone()))
            .collect();
        connections.insert(source, subscriptions);
        info!("Editor channel {} connected", source);
        true
    }

    /// Stop tracking `client`. Returns `false` if it was not connected.
    pub fn disconnect<S>(&self, client: &S) -> bool
    where
        S: EventSource<ClientEvent> + ?Sized,
    {
        let source = client.source_id();
        let removed = self
            .inner
            .connections
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(&source);
        let Some(subscriptions) = removed else {
            return false;
        };
        for subscription in &subscriptions {
            client.unsubscribe(subscription);
        }
        info!("Editor channel {} disconnected", source);
        true
    }

    /// Recompute and publish the union of all editor files, returning it.
    pub fn sync(&self) -> Vec<String> {
        let editors = self.inner.editors.lock().unwrap_or_else(|p| p.into_inner());
        self.inner.publish(&editors)
    }

    pub fn subscribe(&self) -> watch::Receiver<PublishedState> {
        self.inner.published.subscribe()
    }

    pub fn state(&self) -> PublishedState {
        self.inner.published.borrow().clone()
    }

    pub fn files(&self) -> Vec<String> {
        self.inner.published.borrow().files.clone()
    }

    pub fn active(&self) -> bool {
        self.inner.published.borrow().active
    }

    /// Ids of the editors currently known, in registration order.
    pub fn connected_editors(&self) -> Vec<String> {
        self.inner
            .editors
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}

impl Default for EditorFiles {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventEmitter;

    fn files(id: &str, list: &[&str]) -> ClientEvent {
        ClientEvent::EditorFiles {
            id: id.to_string(),
            files: list.iter().map(|f| f.to_string()).collect(),
        }
    }

    fn gone(id: &str) -> ClientEvent {
        ClientEvent::EditorDisconnect { id: id.to_string() }
    }

    fn state(list: &[&str], active: bool) -> PublishedState {
        PublishedState {
            files: list.iter().map(|f| f.to_string()).collect(),
            active,
        }
    }

    #[test]
    fn starts_empty_and_inactive() {
        let registry = EditorFiles::new();
        assert_eq!(registry.state(), state(&[], false));
    }

    #[test]
    fn tracks_union_across_editors() {
        let registry = EditorFiles::new();
        let channel = EventEmitter::<ClientEvent>::new();
        assert!(registry.connect(&channel));

        channel.emit(&files("A", &["x.css", "y.css"]));
        assert_eq!(registry.state(), state(&["x.css", "y.css"], true));

        channel.emit(&files("B", &["y.css", "z.css"]));
        assert_eq!(registry.state(), state(&["x.css", "y.css", "z.css"], true));

        channel.emit(&gone("A"));
        assert_eq!(registry.state(), state(&["y.css", "z.css"], true));

        channel.emit(&ClientEvent::Close);
        assert_eq!(registry.state(), state(&[], false));
    }

    #[test]
    fn re_report_keeps_editor_position() {
        let registry = EditorFiles::new();
        let channel = EventEmitter::<ClientEvent>::new();
        registry.connect(&channel);

        channel.emit(&files("A", &["a.css"]));
        channel.emit(&files("B", &["b.css"]));
        channel.emit(&files("A", &["c.css"]));

        assert_eq!(registry.connected_editors(), vec!["A", "B"]);
        assert_eq!(registry.files(), vec!["c.css", "b.css"]);
    }

    #[test]
    fn editor_with_no_files_still_counts_as_active() {
        let registry = EditorFiles::new();
        let channel = EventEmitter::<ClientEvent>::new();
        registry.connect(&channel);

        channel.emit(&files("A", &[]));
        assert_eq!(registry.state(), state(&[], true));
    }

    #[test]
    fn unknown_disconnect_is_ignored() {
        let registry = EditorFiles::new();
        let channel = EventEmitter::<ClientEvent>::new();
        registry.connect(&channel);
        channel.emit(&files("A", &["a.css"]));

        channel.emit(&gone("nobody"));
        assert_eq!(registry.state(), state(&["a.css"], true));
    }

    #[test]
    fn connect_is_idempotent_and_disconnect_detaches() {
        let registry = EditorFiles::new();
        let channel = EventEmitter::<ClientEvent>::new();

        assert!(registry.connect(&channel));
        assert!(!registry.connect(&channel));
        for kind in ClientEventKind::ALL {
            assert_eq!(channel.handler_count(kind), 1);
        }

        assert!(registry.disconnect(&channel));
        assert!(!registry.disconnect(&channel));
        for kind in ClientEventKind::ALL {
            assert_eq!(channel.handler_count(kind), 0);
        }

        channel.emit(&files("A", &["a.css"]));
        assert_eq!(registry.state(), state(&[], false));
    }

    #[test]
    fn invariants_hold_over_mixed_event_sequence() {
        let registry = EditorFiles::new();
        let channel = EventEmitter::<ClientEvent>::new();
        registry.connect(&channel);

        let ids = ["A", "B", "C"];
        let pool = ["a.css", "b.css", "c.css", "d.css"];
        let mut seed: u32 = 7;
        for step in 0..200 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let id = ids[(seed >> 8) as usize % ids.len()];
            let event = match (seed >> 16) % 10 {
                0 => ClientEvent::Close,
                1..=3 => gone(id),
                _ => {
                    let take = (seed >> 4) as usize % pool.len();
                    let list: Vec<&str> = pool.iter().cycle().skip(step % pool.len()).take(take).copied().collect();
                    files(id, &list)
                }
            };
            channel.emit(&event);

            let published = registry.state();
            let connected = registry.connected_editors();
            assert_eq!(published.active, !connected.is_empty());

            let unique: IndexSet<&String> = published.files.iter().collect();
            assert_eq!(unique.len(), published.files.len());
        }
    }

    #[tokio::test]
    async fn subscribers_are_notified_only_on_change() {
        let registry = EditorFiles::new();
        let channel = EventEmitter::<ClientEvent>::new();
        registry.connect(&channel);
        let mut rx = registry.subscribe();
        rx.borrow_and_update();

        channel.emit(&files("A", &["a.css"]));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().files, vec!["a.css"]);

        channel.emit(&files("A", &["a.css"]));
        assert!(!rx.has_changed().unwrap());

        assert_eq!(registry.sync(), vec!["a.css"]);
        assert!(!rx.has_changed().unwrap());
    }
}
