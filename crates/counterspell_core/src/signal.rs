//! Observable signals
//!
//! A [`Signal`] is a single-writer value that synchronously republishes every
//! write to its subscribers. Subscribers are registered with an explicit
//! [`Signal::subscribe`] call and stay registered for as long as the returned
//! [`Subscription`] handle is alive.
//!
//! Publication is last-value-wins: there is no queue, and every subscriber
//! notified by one `set` observes the same value.
//!
//! ```rust
//! use counterspell_core::signal::Signal;
//!
//! let scroll = Signal::new(0.0f32);
//! let reader = scroll.reader();
//!
//! scroll.set(48.0);
//! assert_eq!(reader.get(), 48.0);
//! assert_eq!(reader.version(), 1);
//! ```

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

new_key_type! {
    /// Identifier for a subscriber registered on a signal
    pub struct SubscriberId;
}

/// Subscriber callback
type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct SignalInner<T> {
    value: T,
    version: u64,
    subscribers: SlotMap<SubscriberId, Callback<T>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A writable observable value
pub struct Signal<T> {
    inner: Arc<Mutex<SignalInner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> Signal<T> {
    /// Create a signal holding `initial`
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SignalInner {
                value: initial,
                version: 0,
                subscribers: SlotMap::with_key(),
            })),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        lock(&self.inner).value.clone()
    }

    /// Number of writes since creation
    pub fn version(&self) -> u64 {
        lock(&self.inner).version
    }

    /// Store a new value and notify every subscriber with it.
    ///
    /// Callbacks run outside the signal's lock, so a subscriber may read the
    /// signal or drop its own subscription while being notified. A subscriber
    /// removed during this publication is not called afterwards.
    pub fn set(&self, value: T) {
        let (published, ids) = {
            let mut inner = lock(&self.inner);
            inner.value = value;
            inner.version += 1;
            let ids: SmallVec<[SubscriberId; 4]> = inner.subscribers.keys().collect();
            (inner.value.clone(), ids)
        };

        for id in ids {
            let callback = lock(&self.inner).subscribers.get(id).cloned();
            if let Some(callback) = callback {
                callback(&published);
            }
        }
    }

    /// Register a subscriber. It is removed when the returned handle is
    /// dropped or [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = lock(&self.inner).subscribers.insert(Arc::new(callback));
        let weak: Weak<Mutex<SignalInner<T>>> = Arc::downgrade(&self.inner);

        Subscription {
            release: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner).subscribers.remove(id);
                }
            })),
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).subscribers.len()
    }

    /// Read-only view of this signal
    pub fn reader(&self) -> ReadSignal<T> {
        ReadSignal {
            signal: self.clone(),
        }
    }
}

impl<T: Clone + Send + fmt::Debug + 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("Signal")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

/// Read-only handle to a [`Signal`]
pub struct ReadSignal<T> {
    signal: Signal<T>,
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> ReadSignal<T> {
    /// Current value
    pub fn get(&self) -> T {
        self.signal.get()
    }

    /// Number of writes the underlying signal has seen
    pub fn version(&self) -> u64 {
        self.signal.version()
    }

    /// Register a subscriber on the underlying signal
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.signal.subscribe(callback)
    }
}

/// Handle keeping a subscriber registered
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Remove the subscriber now
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
