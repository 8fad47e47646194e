//! Looping "scroll down" hint
//!
//! A vertical line grows under the label, slides down by its own length,
//! shrinks away, and restarts after a short pause.

use counterspell_animation::Tween;
use counterspell_core::{FrameControl, FrameScheduler, FrameTask, TimerId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

const GROW_MS: f32 = 1000.0;
const MOVE_DOWN_MS: f32 = 500.0;
const SHRINK_MS: f32 = 1000.0;
const RESTART_DELAY_MS: f64 = 500.0;

/// Line length relative to the label height
const LINE_RATIO: f32 = 0.7;

/// Animation phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndicatorPhase {
    Growing,
    MovingDown,
    Shrinking,
    /// Waiting for the restart timeout
    Paused,
}

impl IndicatorPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Growing => "growing",
            Self::MovingDown => "moving_down",
            Self::Shrinking => "shrinking",
            Self::Paused => "paused",
        }
    }
}

struct IndicatorState {
    phase: IndicatorPhase,
    tween: Tween,
    line_length: f32,
    line_height: f32,
    translate_y: f32,
    cycles: u64,
    task: Option<FrameTask>,
    restart: Option<TimerId>,
    scheduler: FrameScheduler,
}

impl IndicatorState {
    fn enter(&mut self, phase: IndicatorPhase) {
        let length = self.line_length;
        self.phase = phase;
        self.tween = match phase {
            IndicatorPhase::Growing => Tween::linear(0.0, length, GROW_MS),
            IndicatorPhase::MovingDown => Tween::linear(0.0, length, MOVE_DOWN_MS),
            IndicatorPhase::Shrinking => Tween::linear(length, 0.0, SHRINK_MS),
            IndicatorPhase::Paused => Tween::linear(0.0, 0.0, 0.0),
        };
        self.tween.start();
    }

    /// Advance the current phase; false once the cycle reaches the pause
    fn advance(&mut self, dt_ms: f32) -> bool {
        self.tween.tick(dt_ms);
        let value = self.tween.value();
        match self.phase {
            IndicatorPhase::Growing | IndicatorPhase::Shrinking => self.line_height = value,
            IndicatorPhase::MovingDown => self.translate_y = value,
            IndicatorPhase::Paused => return false,
        }
        if !self.tween.is_finished() {
            return true;
        }
        match self.phase {
            IndicatorPhase::Growing => self.enter(IndicatorPhase::MovingDown),
            IndicatorPhase::MovingDown => self.enter(IndicatorPhase::Shrinking),
            _ => {
                self.enter(IndicatorPhase::Paused);
                return false;
            }
        }
        true
    }
}

fn lock(state: &Mutex<IndicatorState>) -> MutexGuard<'_, IndicatorState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Start a new cycle from an empty line
fn start_cycle(state: &Arc<Mutex<IndicatorState>>) {
    let mut guard = lock(state);
    guard.line_height = 0.0;
    guard.translate_y = 0.0;
    guard.enter(IndicatorPhase::Growing);

    let weak = Arc::downgrade(state);
    let task = guard.scheduler.request_frames(move |info| {
        let Some(state) = weak.upgrade() else {
            return FrameControl::Stop;
        };
        let mut guard = lock(&state);
        if guard.advance(info.dt * 1000.0) {
            return FrameControl::Continue;
        }
        guard.cycles += 1;
        schedule_restart(&mut guard, Arc::downgrade(&state));
        FrameControl::Stop
    });
    guard.task = Some(task);
}

/// Arm the restart timeout, replacing any pending one
fn schedule_restart(state: &mut IndicatorState, weak: Weak<Mutex<IndicatorState>>) {
    if let Some(previous) = state.restart.take() {
        state.scheduler.clear_timeout(previous);
    }
    state.restart = Some(state.scheduler.set_timeout(RESTART_DELAY_MS, move || {
        if let Some(state) = weak.upgrade() {
            lock(&state).restart = None;
            start_cycle(&state);
        }
    }));
}

/// Scroll hint animated on the frame scheduler
pub struct ScrollIndicator {
    state: Arc<Mutex<IndicatorState>>,
    label_height: f32,
    mounted: bool,
}

impl ScrollIndicator {
    /// Start animating below a label `label_height` pixels tall
    pub fn mount(scheduler: &FrameScheduler, label_height: f32) -> Self {
        let label_height = if label_height.is_finite() {
            label_height.max(0.0)
        } else {
            0.0
        };
        let line_length = label_height * LINE_RATIO;
        let state = Arc::new(Mutex::new(IndicatorState {
            phase: IndicatorPhase::Growing,
            tween: Tween::linear(0.0, line_length, GROW_MS),
            line_length,
            line_height: 0.0,
            translate_y: 0.0,
            cycles: 0,
            task: None,
            restart: None,
            scheduler: scheduler.clone(),
        }));
        start_cycle(&state);
        tracing::debug!(line_length, "scroll indicator mounted");
        Self {
            state,
            label_height,
            mounted: true,
        }
    }

    pub fn phase(&self) -> IndicatorPhase {
        lock(&self.state).phase
    }

    pub fn line_height(&self) -> f32 {
        lock(&self.state).line_height
    }

    pub fn translate_y(&self) -> f32 {
        lock(&self.state).translate_y
    }

    /// Full line length
    pub fn line_length(&self) -> f32 {
        lock(&self.state).line_length
    }

    /// Container reserves twice the label height
    pub fn container_height(&self) -> f32 {
        self.label_height * 2.0
    }

    /// Completed grow/move/shrink cycles
    pub fn cycles(&self) -> u64 {
        lock(&self.state).cycles
    }

    /// True while the restart timeout is armed
    pub fn restart_pending(&self) -> bool {
        lock(&self.state).restart.is_some()
    }

    /// Cancel the frame task and any pending restart
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        let (task, restart, scheduler) = {
            let mut state = lock(&self.state);
            (state.task.take(), state.restart.take(), state.scheduler.clone())
        };
        if let Some(task) = task {
            task.cancel();
        }
        if let Some(id) = restart {
            scheduler.clear_timeout(id);
        }
        tracing::debug!("scroll indicator unmounted");
    }
}

impl Drop for ScrollIndicator {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterspell_core::ManualClock;

    fn run(clock: &ManualClock, scheduler: &FrameScheduler, ms: f64) {
        let steps = (ms / 10.0).round() as usize;
        for _ in 0..steps {
            clock.advance(10.0).unwrap();
            scheduler.tick();
        }
    }

    fn setup() -> (ManualClock, FrameScheduler) {
        let clock = ManualClock::new();
        let scheduler = FrameScheduler::new(Arc::new(clock.clone()));
        (clock, scheduler)
    }

    #[test]
    fn test_phases_in_order() {
        let (clock, scheduler) = setup();
        let indicator = ScrollIndicator::mount(&scheduler, 100.0);
        assert_eq!(indicator.line_length(), 70.0);
        assert_eq!(indicator.container_height(), 200.0);

        run(&clock, &scheduler, 500.0);
        assert_eq!(indicator.phase(), IndicatorPhase::Growing);
        assert!(indicator.line_height() > 0.0 && indicator.line_height() < 70.0);

        run(&clock, &scheduler, 700.0);
        assert_eq!(indicator.phase(), IndicatorPhase::MovingDown);
        assert_eq!(indicator.line_height(), 70.0);

        run(&clock, &scheduler, 500.0);
        assert_eq!(indicator.phase(), IndicatorPhase::Shrinking);
        assert_eq!(indicator.translate_y(), 70.0);

        run(&clock, &scheduler, 1000.0);
        assert_eq!(indicator.phase(), IndicatorPhase::Paused);
        assert_eq!(indicator.line_height(), 0.0);
        assert!(indicator.restart_pending());
        assert_eq!(indicator.cycles(), 1);
        assert_eq!(scheduler.active_tasks(), 0);
    }

    #[test]
    fn test_restarts_after_pause() {
        let (clock, scheduler) = setup();
        let indicator = ScrollIndicator::mount(&scheduler, 50.0);

        run(&clock, &scheduler, 2600.0);
        assert_eq!(indicator.phase(), IndicatorPhase::Paused);
        run(&clock, &scheduler, 600.0);
        assert_eq!(indicator.phase(), IndicatorPhase::Growing);
        assert_eq!(indicator.translate_y(), 0.0);
        assert!(!indicator.restart_pending());
        assert_eq!(scheduler.pending_timeouts(), 0);
    }

    #[test]
    fn test_unmount_clears_timers_and_tasks() {
        let (clock, scheduler) = setup();
        let mut indicator = ScrollIndicator::mount(&scheduler, 50.0);
        run(&clock, &scheduler, 2600.0);
        assert_eq!(scheduler.pending_timeouts(), 1);

        indicator.unmount();
        assert_eq!(scheduler.pending_timeouts(), 0);
        assert_eq!(scheduler.active_tasks(), 0);

        run(&clock, &scheduler, 1000.0);
        assert_eq!(indicator.phase(), IndicatorPhase::Paused);
    }
}
