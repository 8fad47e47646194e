//! Counterspell Core Runtime
//!
//! This crate provides the foundational primitives the site engine is built on:
//!
//! - **Signals**: Single-writer observable values with explicit subscription handles
//! - **Event Dispatch**: Scroll/resize listeners that can be registered and removed
//! - **Frame Scheduling**: Cancellable per-tick tasks and timeouts driven by an injectable clock
//! - **Storage**: A small key-value interface over memory, a JSON file, or browser local storage
//!
//! # Example
//!
//! ```rust
//! use counterspell_core::signal::Signal;
//! use std::sync::{Arc, Mutex};
//!
//! let offset = Signal::new(0.0f32);
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = seen.clone();
//! let subscription = offset.subscribe(move |value| sink.lock().unwrap().push(*value));
//!
//! offset.set(12.5);
//! subscription.unsubscribe();
//! offset.set(30.0);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![12.5]);
//! assert_eq!(offset.get(), 30.0);
//! ```

pub mod error;
pub mod events;
pub mod frame;
pub mod signal;
pub mod storage;

pub use error::{CoreError, Result};
pub use events::{event_types, Event, EventData, EventDispatcher, EventType, ListenerId};
pub use frame::{
    Clock, FrameControl, FrameInfo, FrameScheduler, FrameTask, ManualClock, SystemClock, TimerId,
};
pub use signal::{ReadSignal, Signal, Subscription};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};

#[cfg(feature = "web")]
pub use storage::LocalStorage;
