//! Frame scheduling
//!
//! The display-refresh loop as an explicit, steppable object. Components
//! request a per-frame callback and receive a [`FrameTask`] handle; cancelling
//! (or dropping) the handle guarantees the callback never runs again. One-shot
//! timeouts share the same clock so restart delays can be cleared before they
//! are rescheduled.
//!
//! The scheduler never sleeps. A host (browser frame callback, desktop loop,
//! or headless test) calls [`FrameScheduler::tick`] once per display refresh,
//! and time is read from an injected [`Clock`].

use crate::error::{CoreError, Result};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Instant;

/// Frame interval assumed for the very first tick (60 Hz)
pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Source of monotonic time in milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Wall clock anchored at creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced by hand, for tests and headless runs.
///
/// Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `ms`
    pub fn advance(&self, ms: f64) -> Result<()> {
        if !ms.is_finite() || ms < 0.0 {
            return Err(CoreError::InvalidClock(ms));
        }
        *lock(&self.now_ms) += ms;
        Ok(())
    }

    /// Jump to an absolute time; time never runs backwards
    pub fn set(&self, now_ms: f64) -> Result<()> {
        let mut current = lock(&self.now_ms);
        if !now_ms.is_finite() || now_ms < *current {
            return Err(CoreError::InvalidClock(now_ms));
        }
        *current = now_ms;
        Ok(())
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *lock(&self.now_ms)
    }
}

/// Timing information handed to every frame callback of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Tick counter, starting at 1
    pub frame: u64,
    /// Clock reading for this tick
    pub now_ms: f64,
    /// Seconds since the previous tick
    pub dt: f32,
}

/// Whether a frame callback wants to run again next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Stop,
}

new_key_type! {
    struct FrameTaskId;
    /// Handle for a pending timeout
    pub struct TimerId;
}

type FrameCallback = Box<dyn FnMut(&FrameInfo) -> FrameControl + Send>;
type TimeoutCallback = Box<dyn FnOnce() + Send>;

struct TaskSlot {
    /// `None` while the callback is executing
    callback: Option<FrameCallback>,
}

struct Timeout {
    due_ms: f64,
    callback: TimeoutCallback,
}

#[derive(Default)]
struct SchedulerInner {
    tasks: SlotMap<FrameTaskId, TaskSlot>,
    timers: SlotMap<TimerId, Timeout>,
    last_tick_ms: Option<f64>,
    frame: u64,
}

/// Drives per-frame callbacks and timeouts.
///
/// Cloning yields another handle to the same scheduler.
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    clock: Arc<dyn Clock>,
}

impl FrameScheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner::default())),
            clock,
        }
    }

    /// Scheduler reading the wall clock
    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock::new()))
    }

    /// Current clock reading
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Run `callback` on every tick until it returns [`FrameControl::Stop`]
    /// or the returned handle is cancelled.
    pub fn request_frames<F>(&self, callback: F) -> FrameTask
    where
        F: FnMut(&FrameInfo) -> FrameControl + Send + 'static,
    {
        let id = lock(&self.inner).tasks.insert(TaskSlot {
            callback: Some(Box::new(callback)),
        });
        tracing::trace!(?id, "frame task requested");
        FrameTask {
            id,
            scheduler: Arc::downgrade(&self.inner),
        }
    }

    /// Run `callback` once, on the first tick at least `delay_ms` from now
    pub fn set_timeout<F>(&self, delay_ms: f64, callback: F) -> TimerId
    where
        F: FnOnce() + Send + 'static,
    {
        let due_ms = self.clock.now_ms() + delay_ms.max(0.0);
        lock(&self.inner).timers.insert(Timeout {
            due_ms,
            callback: Box::new(callback),
        })
    }

    /// Cancel a pending timeout. Returns false if it already fired or was cleared.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        lock(&self.inner).timers.remove(id).is_some()
    }

    /// Number of live frame tasks
    pub fn active_tasks(&self) -> usize {
        lock(&self.inner).tasks.len()
    }

    /// Number of timeouts that have not fired yet
    pub fn pending_timeouts(&self) -> usize {
        lock(&self.inner).timers.len()
    }

    /// True while any frame task or timeout is outstanding
    pub fn has_work(&self) -> bool {
        let inner = lock(&self.inner);
        !inner.tasks.is_empty() || !inner.timers.is_empty()
    }

    /// Advance one display refresh.
    ///
    /// Due timeouts fire first (earliest first), then every live frame task
    /// runs once with the same [`FrameInfo`]. Returns the number of frame
    /// callbacks that ran.
    pub fn tick(&self) -> usize {
        let now_ms = self.clock.now_ms();
        let info = {
            let mut inner = lock(&self.inner);
            let dt_ms = match inner.last_tick_ms {
                Some(last) => (now_ms - last).max(0.0),
                None => NOMINAL_FRAME_MS,
            };
            inner.last_tick_ms = Some(now_ms);
            inner.frame += 1;
            FrameInfo {
                frame: inner.frame,
                now_ms,
                dt: (dt_ms / 1000.0) as f32,
            }
        };

        self.fire_due_timeouts(now_ms);

        let ids: SmallVec<[FrameTaskId; 8]> = lock(&self.inner).tasks.keys().collect();
        let mut ran = 0;
        for id in ids {
            let callback = lock(&self.inner)
                .tasks
                .get_mut(id)
                .and_then(|slot| slot.callback.take());
            let Some(mut callback) = callback else {
                continue;
            };

            let control = callback(&info);
            ran += 1;

            // A task cancelled while running is gone from the table; its
            // callback is dropped here.
            let mut inner = lock(&self.inner);
            match control {
                FrameControl::Continue => {
                    if let Some(slot) = inner.tasks.get_mut(id) {
                        slot.callback = Some(callback);
                    }
                }
                FrameControl::Stop => {
                    if inner.tasks.remove(id).is_some() {
                        tracing::trace!(?id, "frame task finished");
                    }
                }
            }
        }
        ran
    }

    fn fire_due_timeouts(&self, now_ms: f64) {
        let mut due: SmallVec<[(TimerId, f64); 4]> = lock(&self.inner)
            .timers
            .iter()
            .filter(|(_, timeout)| timeout.due_ms <= now_ms)
            .map(|(id, timeout)| (id, timeout.due_ms))
            .collect();
        due.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (id, _) in due {
            let timeout = lock(&self.inner).timers.remove(id);
            if let Some(timeout) = timeout {
                (timeout.callback)();
            }
        }
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("FrameScheduler")
            .field("frame", &inner.frame)
            .field("tasks", &inner.tasks.len())
            .field("timers", &inner.timers.len())
            .finish()
    }
}

/// Handle to a per-frame callback. Dropping the handle cancels the task.
#[must_use = "dropping a FrameTask cancels it"]
pub struct FrameTask {
    id: FrameTaskId,
    scheduler: Weak<Mutex<SchedulerInner>>,
}

impl FrameTask {
    /// Stop the task. Returns false if it had already stopped.
    pub fn cancel(&self) -> bool {
        match self.scheduler.upgrade() {
            Some(inner) => {
                let removed = lock(&inner).tasks.remove(self.id).is_some();
                if removed {
                    tracing::trace!(id = ?self.id, "frame task cancelled");
                }
                removed
            }
            None => false,
        }
    }

    /// True until the task stops itself or is cancelled
    pub fn is_active(&self) -> bool {
        self.scheduler
            .upgrade()
            .is_some_and(|inner| lock(&inner).tasks.contains_key(self.id))
    }
}

impl Drop for FrameTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for FrameTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameTask")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
