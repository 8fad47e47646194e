//! Event dispatch system
//!
//! Window-level scroll and resize notifications, delivered to listeners that
//! register and remove themselves explicitly. Components that register a
//! listener on mount must remove it on unmount, otherwise repeated
//! mount/unmount cycles would accumulate duplicate handlers.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;

    // Component lifecycle events
    pub const MOUNT: EventType = 60;
    pub const UNMOUNT: EventType = 61;
}

new_key_type! {
    /// Handle for a registered listener
    pub struct ListenerId;
}

/// A window event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub data: EventData,
    pub timestamp: u64,
    pub propagation_stopped: bool,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    /// Native document scroll position in pixels
    Scroll { offset_y: f32 },
    /// Viewport size in pixels
    Resize { width: f32, height: f32 },
    None,
}

impl Event {
    /// Native scroll notification
    pub fn scroll(offset_y: f32) -> Self {
        Self {
            event_type: event_types::SCROLL,
            data: EventData::Scroll { offset_y },
            timestamp: 0,
            propagation_stopped: false,
        }
    }

    /// Viewport resize notification
    pub fn resize(width: f32, height: f32) -> Self {
        Self {
            event_type: event_types::RESIZE,
            data: EventData::Resize { width, height },
            timestamp: 0,
            propagation_stopped: false,
        }
    }

    /// Event without payload
    pub fn bare(event_type: EventType) -> Self {
        Self {
            event_type,
            data: EventData::None,
            timestamp: 0,
            propagation_stopped: false,
        }
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Event handler function type
pub type EventHandler = Arc<dyn Fn(&mut Event) + Send + Sync>;

struct Listener {
    event_type: EventType,
    handler: EventHandler,
}

#[derive(Default)]
struct DispatcherInner {
    listeners: SlotMap<ListenerId, Listener>,
    /// Registration order per event type
    by_type: FxHashMap<EventType, Vec<ListenerId>>,
}

/// Dispatches events to registered listeners.
///
/// Cloning yields another handle to the same listener table.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    inner: Arc<Mutex<DispatcherInner>>,
}

fn lock(inner: &Mutex<DispatcherInner>) -> MutexGuard<'_, DispatcherInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for an event type
    pub fn add_listener<F>(&self, event_type: EventType, handler: F) -> ListenerId
    where
        F: Fn(&mut Event) + Send + Sync + 'static,
    {
        let mut inner = lock(&self.inner);
        let id = inner.listeners.insert(Listener {
            event_type,
            handler: Arc::new(handler),
        });
        inner.by_type.entry(event_type).or_default().push(id);
        tracing::trace!(event_type, ?id, "listener added");
        id
    }

    /// Remove a listener. Returns false if it was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut inner = lock(&self.inner);
        let Some(listener) = inner.listeners.remove(id) else {
            return false;
        };
        if let Some(ids) = inner.by_type.get_mut(&listener.event_type) {
            ids.retain(|other| *other != id);
        }
        tracing::trace!(event_type = listener.event_type, ?id, "listener removed");
        true
    }

    /// Number of listeners registered for an event type
    pub fn listener_count(&self, event_type: EventType) -> usize {
        lock(&self.inner)
            .by_type
            .get(&event_type)
            .map_or(0, Vec::len)
    }

    /// Dispatch an event to all listeners of its type, in registration order.
    ///
    /// Returns the number of handlers that ran. Handlers run outside the
    /// dispatcher lock, so they may add or remove listeners; a listener
    /// removed during dispatch is not called afterwards.
    pub fn dispatch(&self, event: &mut Event) -> usize {
        let ids: SmallVec<[ListenerId; 8]> = match lock(&self.inner).by_type.get(&event.event_type)
        {
            Some(ids) => ids.iter().copied().collect(),
            None => return 0,
        };

        let mut handled = 0;
        for id in ids {
            if event.propagation_stopped {
                break;
            }
            let handler = lock(&self.inner)
                .listeners
                .get(id)
                .map(|listener| Arc::clone(&listener.handler));
            if let Some(handler) = handler {
                handler(event);
                handled += 1;
            }
        }
        handled
    }
}
