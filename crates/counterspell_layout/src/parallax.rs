//! Scroll-linked horizontal parallax
//!
//! While the scrollbox is pinned in the viewport, vertical scroll progress is
//! turned into a horizontal slide of the card row and a faster, opposite
//! slide of the decorative layer. Every value is a pure function of the
//! smoothed scroll offset and measured geometry; nothing is tweened here.

use crate::geometry::{Rect, Viewport};
use counterspell_core::{event_types, EventDispatcher, ListenerId, ReadSignal, Subscription};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Parallax tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParallaxConfig {
    /// Pixels the scrollbox top may sit below the viewport top and still count as pinned
    pub buffer: f32,
    /// Decoration speed relative to the cards
    pub decoration_rate: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            buffer: 80.0,
            decoration_rate: 1.2,
        }
    }
}

/// Transforms for one scroll position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParallaxFrame {
    /// Normalized progress through the pinned window, in [0, 1]
    pub progress: f32,
    /// `translateY` of the sticky container
    pub container_translate_y: f32,
    /// `translateX` of every card (non-positive)
    pub card_translate_x: f32,
    /// `translateX` of every decoration (non-negative)
    pub decoration_translate_x: f32,
}

/// Transforms for a scrollbox at `rect` (viewport coordinates).
///
/// Returns `None` while the scrollbox is outside the pinned window; callers
/// keep the previous transforms in that case.
pub fn parallax_frame(
    rect: Rect,
    viewport: Viewport,
    container_width: f32,
    config: &ParallaxConfig,
) -> Option<ParallaxFrame> {
    let start = rect.top() - config.buffer;
    let end = rect.bottom() - viewport.height;
    if !(start <= 0.0 && end >= 0.0) {
        return None;
    }

    let range = rect.height - viewport.height;
    let progress = if range > 0.0 {
        (-start / range).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let travel = (container_width - viewport.width).max(0.0);
    let distance_x = progress * travel;

    Some(ParallaxFrame {
        progress,
        container_translate_y: progress * range.max(0.0),
        card_translate_x: -distance_x,
        decoration_translate_x: distance_x * config.decoration_rate,
    })
}

/// Measured scrollbox geometry
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollboxMetrics {
    /// Scrollbox top in document coordinates
    pub document_top: f32,
    /// Width of the horizontal card row
    pub container_width: f32,
    /// Height the scrollbox takes when laid out natively (touch devices)
    pub natural_height: f32,
}

struct ParallaxState {
    config: ParallaxConfig,
    metrics: ScrollboxMetrics,
    viewport: Viewport,
    last_offset: f32,
    frame: ParallaxFrame,
    updates: u64,
}

impl ParallaxState {
    fn scrollbox_height(&self) -> f32 {
        if self.viewport.is_touch() {
            self.metrics.natural_height
        } else {
            // Pointer devices scroll one container width vertically
            self.metrics.container_width
        }
    }

    fn update(&mut self, smoothed_offset: f32) {
        self.last_offset = smoothed_offset;
        if self.viewport.is_touch() {
            self.frame = ParallaxFrame::default();
            return;
        }
        let rect = Rect::new(
            0.0,
            self.metrics.document_top,
            self.viewport.width,
            self.scrollbox_height(),
        )
        .offset_y(-smoothed_offset);
        if let Some(frame) =
            parallax_frame(rect, self.viewport, self.metrics.container_width, &self.config)
        {
            self.frame = frame;
            self.updates += 1;
        }
    }
}

fn lock(state: &Mutex<ParallaxState>) -> MutexGuard<'_, ParallaxState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Horizontal scroll section subscribed to the smoothed scroll offset
pub struct HorizontalScroll {
    state: Arc<Mutex<ParallaxState>>,
    subscription: Option<Subscription>,
    dispatcher: EventDispatcher,
    resize_listener: Option<ListenerId>,
}

impl HorizontalScroll {
    /// Subscribe to `offset` and re-probe the viewport on every resize.
    ///
    /// `probe` reports the current viewport, including touch capability.
    pub fn mount<P>(
        offset: &ReadSignal<f32>,
        dispatcher: &EventDispatcher,
        metrics: ScrollboxMetrics,
        config: ParallaxConfig,
        probe: P,
    ) -> Self
    where
        P: Fn() -> Viewport + Send + Sync + 'static,
    {
        let state = Arc::new(Mutex::new(ParallaxState {
            config,
            metrics,
            viewport: probe(),
            last_offset: 0.0,
            frame: ParallaxFrame::default(),
            updates: 0,
        }));
        lock(&state).update(offset.get());

        let subscription = {
            let state = Arc::clone(&state);
            offset.subscribe(move |value| lock(&state).update(*value))
        };
        let resize_listener = {
            let state = Arc::clone(&state);
            dispatcher.add_listener(event_types::RESIZE, move |_| {
                let mut state = lock(&state);
                state.viewport = probe();
                let offset = state.last_offset;
                state.update(offset);
            })
        };

        tracing::debug!(touch = lock(&state).viewport.is_touch(), "horizontal scroll mounted");
        Self {
            state,
            subscription: Some(subscription),
            dispatcher: dispatcher.clone(),
            resize_listener: Some(resize_listener),
        }
    }

    /// Transforms currently applied
    pub fn frame(&self) -> ParallaxFrame {
        lock(&self.state).frame
    }

    /// Height given to the scrollbox element
    pub fn scrollbox_height(&self) -> f32 {
        lock(&self.state).scrollbox_height()
    }

    /// Touch devices get native horizontal scrolling instead of the effect
    pub fn is_touch(&self) -> bool {
        lock(&self.state).viewport.is_touch()
    }

    /// Number of in-window recomputations so far
    pub fn updates(&self) -> u64 {
        lock(&self.state).updates
    }

    /// Replace measured geometry after a content change
    pub fn set_metrics(&self, metrics: ScrollboxMetrics) {
        let mut state = lock(&self.state);
        state.metrics = metrics;
        let offset = state.last_offset;
        state.update(offset);
    }

    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        if let Some(id) = self.resize_listener.take() {
            self.dispatcher.remove_listener(id);
        }
    }
}

impl Drop for HorizontalScroll {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterspell_core::{Event, Signal};

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
        touch_points: 0,
    };

    fn rect(top: f32, height: f32) -> Rect {
        Rect::new(0.0, top, 1000.0, height)
    }

    #[test]
    fn test_outside_window_yields_none() {
        let config = ParallaxConfig::default();
        // Top more than the buffer below the viewport top
        assert_eq!(parallax_frame(rect(200.0, 3000.0), VIEWPORT, 3000.0, &config), None);
        // Bottom above the viewport bottom
        assert_eq!(parallax_frame(rect(-2500.0, 3000.0), VIEWPORT, 3000.0, &config), None);
    }

    #[test]
    fn test_progress_and_offsets() {
        let config = ParallaxConfig::default();
        // start = -1100, range = 2200
        let frame = parallax_frame(rect(-1020.0, 3000.0), VIEWPORT, 3000.0, &config).unwrap();

        assert!((frame.progress - 0.5).abs() < 1e-6);
        assert!((frame.container_translate_y - 1100.0).abs() < 1e-3);
        assert!((frame.card_translate_x + 1000.0).abs() < 1e-3);
        assert!((frame.decoration_translate_x - 1200.0).abs() < 1e-3);
    }

    #[test]
    fn test_progress_is_clamped() {
        let config = ParallaxConfig::default();
        let frame = parallax_frame(rect(-2200.0, 3000.0), VIEWPORT, 3000.0, &config).unwrap();
        assert_eq!(frame.progress, 1.0);

        let frame = parallax_frame(rect(80.0, 3000.0), VIEWPORT, 3000.0, &config).unwrap();
        assert_eq!(frame.progress, 0.0);
        assert_eq!(frame.card_translate_x, 0.0);
    }

    #[test]
    fn test_narrow_container_never_slides_backwards() {
        let config = ParallaxConfig::default();
        let frame = parallax_frame(rect(-500.0, 3000.0), VIEWPORT, 600.0, &config).unwrap();
        assert_eq!(frame.card_translate_x, 0.0);
        assert_eq!(frame.decoration_translate_x, 0.0);
    }

    #[test]
    fn test_mounted_effect_tracks_signal_and_keeps_last_frame() {
        let signal = Signal::new(0.0f32);
        let dispatcher = EventDispatcher::new();
        let metrics = ScrollboxMetrics {
            document_top: 1000.0,
            container_width: 3000.0,
            natural_height: 600.0,
        };
        let effect = HorizontalScroll::mount(
            &signal.reader(),
            &dispatcher,
            metrics,
            ParallaxConfig::default(),
            || VIEWPORT,
        );
        assert_eq!(effect.scrollbox_height(), 3000.0);

        signal.set(2100.0);
        let inside = effect.frame();
        assert!(inside.progress > 0.0);

        // Past the pinned window the last transforms stay
        signal.set(10_000.0);
        assert_eq!(effect.frame(), inside);
    }

    #[test]
    fn test_touch_devices_bypass_effect() {
        let signal = Signal::new(0.0f32);
        let dispatcher = EventDispatcher::new();
        let touch = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let probe_touch = touch.clone();
        let metrics = ScrollboxMetrics {
            document_top: 0.0,
            container_width: 3000.0,
            natural_height: 600.0,
        };
        let mut effect = HorizontalScroll::mount(
            &signal.reader(),
            &dispatcher,
            metrics,
            ParallaxConfig::default(),
            move || {
                let points = u32::from(probe_touch.load(std::sync::atomic::Ordering::SeqCst)) * 5;
                VIEWPORT.with_touch_points(points)
            },
        );
        signal.set(500.0);
        assert!(effect.frame().progress > 0.0);

        touch.store(true, std::sync::atomic::Ordering::SeqCst);
        dispatcher.dispatch(&mut Event::resize(1000.0, 800.0));
        assert!(effect.is_touch());
        assert_eq!(effect.frame(), ParallaxFrame::default());
        assert_eq!(effect.scrollbox_height(), 600.0);

        effect.unmount();
        assert_eq!(signal.subscriber_count(), 0);
        assert_eq!(dispatcher.listener_count(event_types::RESIZE), 0);
    }
}
