//! Counterspell Layout
//!
//! Scroll-driven page behaviour:
//!
//! - [`SmoothScroll`]: spring-smoothed scroll offset published once per frame
//! - [`HorizontalScroll`]: pinned horizontal parallax driven by that offset
//! - [`Carousel`]: cyclic single-focus card browsing
//! - [`ScrollIndicator`]: looping "scroll down" hint line
//! - [`Logo`]: image with placeholder fallback
//!
//! Components that register listeners or frame tasks on mount release them
//! on `unmount` (and on drop), so mount/unmount cycles never accumulate
//! handlers.

pub mod carousel;
pub mod error;
pub mod geometry;
pub mod logo;
pub mod parallax;
pub mod scroll_indicator;
pub mod smooth_scroll;

pub use carousel::{
    card_background, Breakpoint, CardPlacement, CardPosition, Carousel, CARD_PALETTE,
};
pub use error::{LayoutError, Result};
pub use geometry::{Rect, Viewport};
pub use logo::{Logo, LogoView};
pub use parallax::{
    parallax_frame, HorizontalScroll, ParallaxConfig, ParallaxFrame, ScrollboxMetrics,
};
pub use scroll_indicator::{IndicatorPhase, ScrollIndicator};
pub use smooth_scroll::{ContentMeasure, SmoothScroll};
