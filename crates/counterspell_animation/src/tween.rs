//! Fixed-duration tweens

use crate::easing::Easing;

/// Interpolates between two values over a fixed duration
#[derive(Clone, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: f32,
    easing: Easing,
    elapsed_ms: f32,
    playing: bool,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_ms: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            easing,
            elapsed_ms: 0.0,
            playing: false,
        }
    }

    /// Linear tween
    pub fn linear(from: f32, to: f32, duration_ms: f32) -> Self {
        Self::new(from, to, duration_ms, Easing::Linear)
    }

    /// Restart from the beginning
    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// True once the full duration has elapsed
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Advance by `dt_ms`; stops playing when the end is reached
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.playing || !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
        if self.is_finished() {
            self.playing = false;
        }
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Current eased value
    pub fn value(&self) -> f32 {
        self.value_at(self.elapsed_ms)
    }

    /// Eased value `elapsed_ms` after the start, independent of playback state
    pub fn value_at(&self, elapsed_ms: f32) -> f32 {
        let t = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        };
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_tween_midpoint() {
        let mut tween = Tween::linear(0.0, 100.0, 1000.0);
        tween.start();
        tween.tick(500.0);
        assert!((tween.value() - 50.0).abs() < 1e-4);
        assert!(tween.is_playing());
    }

    #[test]
    fn test_tween_stops_at_end() {
        let mut tween = Tween::linear(10.0, 0.0, 200.0);
        tween.start();
        tween.tick(150.0);
        tween.tick(150.0);
        assert_eq!(tween.value(), 0.0);
        assert!(tween.is_finished());
        assert!(!tween.is_playing());
    }

    #[test]
    fn test_not_started_tween_does_not_advance() {
        let mut tween = Tween::linear(0.0, 1.0, 100.0);
        tween.tick(50.0);
        assert_eq!(tween.value(), 0.0);
    }

    #[test]
    fn test_value_at_is_stateless() {
        let tween = Tween::new(0.0, 1.0, 1000.0, Easing::EaseOut);
        assert_eq!(tween.value_at(0.0), 0.0);
        assert_eq!(tween.value_at(1000.0), 1.0);
        assert_eq!(tween.value_at(5000.0), 1.0);
        assert!(tween.value_at(500.0) > 0.5);
    }

    #[test]
    fn test_zero_duration_is_immediately_at_end() {
        let tween = Tween::linear(3.0, 9.0, 0.0);
        assert_eq!(tween.value(), 9.0);
        assert!(tween.is_finished());
    }
}
