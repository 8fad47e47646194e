//! Counterspell Animation System
//!
//! Spring physics and timed tweens for scroll-driven effects.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated mass–spring–damper with tension, friction, mass
//! - **Variable Tick Rates**: Springs sub-step internally, so any frame interval is stable
//! - **Tweens**: Fixed-duration interpolation with easing, advanced by elapsed milliseconds

pub mod easing;
pub mod spring;
pub mod tween;

pub use easing::Easing;
pub use spring::{Spring, SpringConfig};
pub use tween::Tween;
