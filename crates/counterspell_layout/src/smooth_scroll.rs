//! Spring-smoothed scrolling
//!
//! The page content sits in a fixed overlay translated by the negative of a
//! smoothed scroll offset, while an empty spacer as tall as the content keeps
//! the native scroll range intact. Native scroll events only move the
//! spring's target; the spring advances on display refresh and the result is
//! published through a [`Signal`] once per frame.

use crate::error::{LayoutError, Result};
use counterspell_animation::{Spring, SpringConfig};
use counterspell_core::{
    event_types, EventData, EventDispatcher, FrameControl, FrameScheduler, FrameTask, ListenerId,
    ReadSignal, Signal,
};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Measures the current height of the page content
pub type ContentMeasure = Arc<dyn Fn() -> f32 + Send + Sync>;

struct ScrollState {
    spring: Spring,
    raw_offset: f32,
    content_height: f32,
    task: Option<FrameTask>,
    measure: ContentMeasure,
}

impl ScrollState {
    fn remeasure(&mut self) -> f32 {
        let height = (self.measure)();
        self.content_height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        self.content_height
    }

    fn animating(&self) -> bool {
        self.task.as_ref().is_some_and(FrameTask::is_active)
    }
}

fn lock(state: &Mutex<ScrollState>) -> MutexGuard<'_, ScrollState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Smoothed scroll wrapper mounted on the window's scroll and resize events
pub struct SmoothScroll {
    state: Arc<Mutex<ScrollState>>,
    published: Signal<f32>,
    dispatcher: EventDispatcher,
    scheduler: FrameScheduler,
    listeners: SmallVec<[ListenerId; 2]>,
}

impl SmoothScroll {
    /// Register scroll/resize listeners and measure the content.
    pub fn mount<M>(
        dispatcher: &EventDispatcher,
        scheduler: &FrameScheduler,
        config: SpringConfig,
        measure: M,
    ) -> Result<Self>
    where
        M: Fn() -> f32 + Send + Sync + 'static,
    {
        if !config.is_valid() {
            return Err(LayoutError::InvalidSpring(format!("{config:?}")));
        }

        let mut state = ScrollState {
            spring: Spring::new(config, 0.0),
            raw_offset: 0.0,
            content_height: 0.0,
            task: None,
            measure: Arc::new(measure),
        };
        state.remeasure();
        let state = Arc::new(Mutex::new(state));
        let published = Signal::new(0.0f32);

        let mut listeners = SmallVec::new();
        {
            let state = Arc::clone(&state);
            let published = published.clone();
            let scheduler = scheduler.clone();
            listeners.push(dispatcher.add_listener(event_types::SCROLL, move |event| {
                if let EventData::Scroll { offset_y } = event.data {
                    on_scroll(&state, &published, &scheduler, offset_y);
                }
            }));
        }
        {
            let state = Arc::clone(&state);
            let published = published.clone();
            let scheduler = scheduler.clone();
            listeners.push(dispatcher.add_listener(event_types::RESIZE, move |_| {
                on_resize(&state, &published, &scheduler);
            }));
        }

        tracing::debug!(
            content_height = lock(&state).content_height,
            "smooth scroll mounted"
        );
        Ok(Self {
            state,
            published,
            dispatcher: dispatcher.clone(),
            scheduler: scheduler.clone(),
            listeners,
        })
    }

    /// Read-only view of the smoothed offset
    pub fn reader(&self) -> ReadSignal<f32> {
        self.published.reader()
    }

    /// Last published smoothed offset
    pub fn smoothed_offset(&self) -> f32 {
        self.published.get()
    }

    /// Last native scroll position observed
    pub fn raw_offset(&self) -> f32 {
        lock(&self.state).raw_offset
    }

    /// Vertical translation of the fixed content overlay
    pub fn overlay_translate_y(&self) -> f32 {
        -self.published.get()
    }

    /// Height given to the spacer element
    pub fn spacer_height(&self) -> f32 {
        lock(&self.state).content_height
    }

    /// Re-measure the content after it changed
    pub fn refresh_layout(&self) {
        on_resize(&self.state, &self.published, &self.scheduler);
    }

    /// True while a frame task is advancing the spring
    pub fn is_animating(&self) -> bool {
        lock(&self.state).animating()
    }

    pub fn is_mounted(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Remove listeners and stop the in-flight animation. No value is
    /// published afterwards.
    pub fn unmount(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        for id in self.listeners.drain(..) {
            self.dispatcher.remove_listener(id);
        }
        let task = lock(&self.state).task.take();
        if let Some(task) = task {
            task.cancel();
        }
        tracing::debug!("smooth scroll unmounted");
    }
}

impl Drop for SmoothScroll {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn on_scroll(
    state: &Arc<Mutex<ScrollState>>,
    published: &Signal<f32>,
    scheduler: &FrameScheduler,
    offset_y: f32,
) {
    let mut guard = lock(state);
    guard.raw_offset = offset_y;
    if guard.content_height <= 0.0 && guard.remeasure() <= 0.0 {
        guard.spring.jump_to(0.0);
        drop(guard);
        if published.get() != 0.0 {
            published.set(0.0);
        }
        return;
    }

    follow_raw_offset(&mut guard, state, published, scheduler);
}

/// Aim the spring at the raw offset and start the frame task if idle
fn follow_raw_offset(
    guard: &mut ScrollState,
    state: &Arc<Mutex<ScrollState>>,
    published: &Signal<f32>,
    scheduler: &FrameScheduler,
) {
    let raw_offset = guard.raw_offset;
    guard.spring.set_target(raw_offset);
    if guard.animating() || guard.spring.is_settled() {
        return;
    }

    let weak = Arc::downgrade(state);
    let publisher = published.clone();
    guard.task = Some(scheduler.request_frames(move |info| {
        let Some(state) = weak.upgrade() else {
            return FrameControl::Stop;
        };
        let (value, settled) = {
            let mut state = lock(&state);
            state.spring.step(info.dt);
            (state.spring.value(), state.spring.is_settled())
        };
        publisher.set(value);
        if settled {
            tracing::trace!(value, "smooth scroll settled");
            FrameControl::Stop
        } else {
            FrameControl::Continue
        }
    }));
}

fn on_resize(
    state: &Arc<Mutex<ScrollState>>,
    published: &Signal<f32>,
    scheduler: &FrameScheduler,
) {
    let mut guard = lock(state);
    let height = guard.remeasure();
    tracing::trace!(height, "content re-measured");
    if height > 0.0 {
        // A scroll seen before layout left the spring parked at zero
        if guard.spring.target() != guard.raw_offset {
            follow_raw_offset(&mut guard, state, published, scheduler);
        }
        return;
    }

    guard.spring.jump_to(0.0);
    let task = guard.task.take();
    drop(guard);
    if let Some(task) = task {
        task.cancel();
    }
    if published.get() != 0.0 {
        published.set(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterspell_core::{Event, ManualClock};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn harness(height: f32) -> (ManualClock, EventDispatcher, FrameScheduler, SmoothScroll) {
        let clock = ManualClock::new();
        let dispatcher = EventDispatcher::new();
        let scheduler = FrameScheduler::new(Arc::new(clock.clone()));
        let scroll = SmoothScroll::mount(
            &dispatcher,
            &scheduler,
            SpringConfig::smooth_scroll(),
            move || height,
        )
        .unwrap();
        (clock, dispatcher, scheduler, scroll)
    }

    fn frame(clock: &ManualClock, scheduler: &FrameScheduler) {
        clock.advance(1000.0 / 60.0).unwrap();
        scheduler.tick();
    }

    #[test]
    fn test_scroll_sets_target_without_moving_immediately() {
        let (_, dispatcher, _, scroll) = harness(4000.0);
        dispatcher.dispatch(&mut Event::scroll(600.0));

        assert_eq!(scroll.raw_offset(), 600.0);
        assert_eq!(scroll.smoothed_offset(), 0.0);
        assert!(scroll.is_animating());
    }

    #[test]
    fn test_overlay_follows_negative_smoothed_value() {
        let (clock, dispatcher, scheduler, scroll) = harness(4000.0);
        dispatcher.dispatch(&mut Event::scroll(600.0));
        for _ in 0..5 {
            frame(&clock, &scheduler);
        }
        let smoothed = scroll.smoothed_offset();
        assert!(smoothed > 0.0 && smoothed < 600.0);
        assert_eq!(scroll.overlay_translate_y(), -smoothed);
    }

    #[test]
    fn test_zero_height_publishes_zero_and_waits() {
        let height = Arc::new(AtomicU32::new(0f32.to_bits()));
        let h = height.clone();
        let clock = ManualClock::new();
        let dispatcher = EventDispatcher::new();
        let scheduler = FrameScheduler::new(Arc::new(clock.clone()));
        let scroll = SmoothScroll::mount(
            &dispatcher,
            &scheduler,
            SpringConfig::smooth_scroll(),
            move || f32::from_bits(h.load(Ordering::SeqCst)),
        )
        .unwrap();

        dispatcher.dispatch(&mut Event::scroll(300.0));
        assert!(!scroll.is_animating());
        assert_eq!(scheduler.active_tasks(), 0);
        assert_eq!(scroll.smoothed_offset(), 0.0);

        height.store(2000f32.to_bits(), Ordering::SeqCst);
        dispatcher.dispatch(&mut Event::resize(1280.0, 800.0));
        assert_eq!(scroll.spacer_height(), 2000.0);

        dispatcher.dispatch(&mut Event::scroll(300.0));
        assert!(scroll.is_animating());
    }

    #[test]
    fn test_scroll_before_layout_converges_once_measured() {
        let height = Arc::new(AtomicU32::new(0f32.to_bits()));
        let h = height.clone();
        let clock = ManualClock::new();
        let dispatcher = EventDispatcher::new();
        let scheduler = FrameScheduler::new(Arc::new(clock.clone()));
        let scroll = SmoothScroll::mount(
            &dispatcher,
            &scheduler,
            SpringConfig::smooth_scroll(),
            move || f32::from_bits(h.load(Ordering::SeqCst)),
        )
        .unwrap();

        dispatcher.dispatch(&mut Event::scroll(300.0));
        assert_eq!(scroll.smoothed_offset(), 0.0);

        height.store(2000f32.to_bits(), Ordering::SeqCst);
        dispatcher.dispatch(&mut Event::resize(1280.0, 800.0));
        assert!(scroll.is_animating());

        for _ in 0..600 {
            frame(&clock, &scheduler);
        }
        assert_eq!(scroll.smoothed_offset(), 300.0);
        assert!(!scroll.is_animating());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dispatcher = EventDispatcher::new();
        let scheduler = FrameScheduler::new(Arc::new(ManualClock::new()));
        let result = SmoothScroll::mount(
            &dispatcher,
            &scheduler,
            SpringConfig::new(45.0, 10.0, 0.0),
            || 100.0,
        );
        assert!(matches!(result, Err(LayoutError::InvalidSpring(_))));
        assert_eq!(dispatcher.listener_count(event_types::SCROLL), 0);
    }

    #[test]
    fn test_drop_unmounts() {
        let (_, dispatcher, scheduler, scroll) = harness(1000.0);
        dispatcher.dispatch(&mut Event::scroll(100.0));
        assert_eq!(scheduler.active_tasks(), 1);

        drop(scroll);
        assert_eq!(dispatcher.listener_count(event_types::SCROLL), 0);
        assert_eq!(dispatcher.listener_count(event_types::RESIZE), 0);
        assert_eq!(scheduler.active_tasks(), 0);
    }
}
