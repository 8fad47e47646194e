//! Spring physics
//!
//! A damped harmonic oscillator pulling a value toward a target:
//!
//! ```text
//! a = (-tension * (x - target) - friction * v) / mass
//! ```
//!
//! Integration uses classic RK4 on fixed sub-steps no longer than
//! [`MAX_SUBSTEP`], so a 30 Hz, 60 Hz or 144 Hz host (or an irregular one)
//! all trace the same curve and the integrator cannot blow up on a long frame.

/// Longest integration step in seconds
pub const MAX_SUBSTEP: f32 = 1.0 / 240.0;

/// Longest frame interval honoured by a single `step`; longer gaps (a
/// backgrounded tab, a debugger pause) are treated as this long.
pub const MAX_FRAME_DT: f32 = 1.0;

/// Displacement below which a spring may come to rest
pub const DEFAULT_PRECISION: f32 = 0.01;

/// Spring configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Spring stiffness
    pub tension: f32,
    /// Damping coefficient
    pub friction: f32,
    pub mass: f32,
    /// Rest threshold for displacement; velocity must be under a tenth of it
    pub precision: f32,
}

impl SpringConfig {
    pub fn new(tension: f32, friction: f32, mass: f32) -> Self {
        Self {
            tension,
            friction,
            mass,
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn with_precision(mut self, precision: f32) -> Self {
        self.precision = precision;
        self
    }

    /// Loose, slightly underdamped spring used for page scroll smoothing
    pub fn smooth_scroll() -> Self {
        Self::new(45.0, 10.0, 1.0)
    }

    /// Slow, soft motion
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// Quick, firm motion
    pub fn stiff() -> Self {
        Self::new(210.0, 20.0, 1.0)
    }

    /// ζ = friction / (2 √(tension · mass)); below 1 the spring overshoots
    pub fn damping_ratio(&self) -> f32 {
        self.friction / (2.0 * (self.tension * self.mass).sqrt())
    }

    /// Whether the configuration describes a stable, convergent spring
    pub fn is_valid(&self) -> bool {
        let finite = self.tension.is_finite()
            && self.friction.is_finite()
            && self.mass.is_finite()
            && self.precision.is_finite();
        finite && self.mass > 0.0 && self.tension > 0.0 && self.friction > 0.0 && self.precision > 0.0
    }

    fn rest_velocity(&self) -> f32 {
        self.precision / 10.0
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(170.0, 26.0, 1.0)
    }
}

/// A value animated by spring physics.
///
/// State is integrated in `f64`: at page-scroll magnitudes an `f32` position
/// can no longer absorb the tiny per-step moves of a nearly settled spring.
#[derive(Clone, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f64,
    velocity: f64,
    target: f64,
    settled: bool,
}

impl Spring {
    /// Spring at rest on `initial`
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial as f64,
            velocity: 0.0,
            target: initial as f64,
            settled: true,
        }
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    pub fn value(&self) -> f32 {
        self.value as f32
    }

    pub fn velocity(&self) -> f32 {
        self.velocity as f32
    }

    pub fn target(&self) -> f32 {
        self.target as f32
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Retarget the spring. Current velocity is kept, so interrupting an
    /// animation continues smoothly from where it is.
    pub fn set_target(&mut self, target: f32) {
        if !target.is_finite() {
            tracing::warn!(target, "ignoring non-finite spring target");
            return;
        }
        let target = target as f64;
        if target != self.target {
            self.target = target;
            self.settled = false;
        } else if !self.at_rest() {
            self.settled = false;
        }
    }

    /// Place the spring at `value` with no motion
    pub fn jump_to(&mut self, value: f32) {
        if value.is_finite() {
            self.value = value as f64;
            self.target = value as f64;
            self.velocity = 0.0;
            self.settled = true;
        }
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Returns true while the spring is still moving. Non-finite or
    /// non-positive `dt` leaves the spring untouched.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.settled {
            return false;
        }
        if !dt.is_finite() || dt <= 0.0 {
            return true;
        }

        let dt = dt.min(MAX_FRAME_DT) as f64;
        let substeps = (dt / MAX_SUBSTEP as f64).ceil().max(1.0) as u32;
        let h = dt / substeps as f64;

        for _ in 0..substeps {
            self.integrate(h);
            if self.at_rest() {
                // The remaining sub-precision offset is below anything visible.
                self.value = self.target;
                self.velocity = 0.0;
                self.settled = true;
                return false;
            }
        }
        true
    }

    fn at_rest(&self) -> bool {
        (self.value - self.target).abs() <= self.config.precision as f64
            && self.velocity.abs() <= self.config.rest_velocity() as f64
    }

    fn acceleration(&self, x: f64, v: f64) -> f64 {
        let tension = self.config.tension as f64;
        let friction = self.config.friction as f64;
        let mass = self.config.mass as f64;
        (-tension * (x - self.target) - friction * v) / mass
    }

    fn integrate(&mut self, h: f64) {
        let x = self.value;
        let v = self.velocity;

        let k1x = v;
        let k1v = self.acceleration(x, v);

        let k2x = v + k1v * h * 0.5;
        let k2v = self.acceleration(x + k1x * h * 0.5, v + k1v * h * 0.5);

        let k3x = v + k2v * h * 0.5;
        let k3v = self.acceleration(x + k2x * h * 0.5, v + k2v * h * 0.5);

        let k4x = v + k3v * h;
        let k4v = self.acceleration(x + k3x * h, v + k3v * h);

        self.value = x + h / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        self.velocity = v + h / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);
    }
}
