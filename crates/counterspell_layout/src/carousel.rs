//! Cyclic card carousel
//!
//! One card is focused at a time; its neighbours (modulo the card count)
//! flank it and every other card is hidden. Position labels alone drive the
//! card styling, so moving forward and backward play the same transition.

use crate::error::{LayoutError, Result};
use std::fmt;

/// Background colors cycled across cards
pub const CARD_PALETTE: [&str; 6] = [
    "#e0f7fa", "#ffe0b2", "#d1c4e9", "#b3e5fc", "#c8e6c9", "#ffccbc",
];

/// Background color of card `index`
pub fn card_background(index: usize) -> &'static str {
    CARD_PALETTE[index % CARD_PALETTE.len()]
}

/// Role of a card relative to the focused one
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardPosition {
    Center,
    Left,
    Right,
    Hidden,
}

impl CardPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Left => "left",
            Self::Right => "right",
            Self::Hidden => "hidden",
        }
    }

    /// Visual placement at a breakpoint
    pub fn placement(self, breakpoint: Breakpoint) -> CardPlacement {
        let (offset_vw, side_scale) = match breakpoint {
            Breakpoint::Desktop => (20.0, 0.9),
            Breakpoint::Tablet => (15.0, 0.85),
            Breakpoint::Mobile => (10.0, 0.8),
            Breakpoint::Compact => (7.0, 0.75),
        };
        match self {
            Self::Center => CardPlacement::new(0.0, 1.15, 1.0, 3),
            Self::Left => CardPlacement::new(-offset_vw, side_scale, 0.8, 2),
            Self::Right => CardPlacement::new(offset_vw, side_scale, 0.8, 2),
            Self::Hidden => CardPlacement::new(0.0, 0.8, 0.0, 1),
        }
    }
}

impl fmt::Display for CardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Viewport width classes used by card styling
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    /// Wider than 1024px
    Desktop,
    /// 769..=1024px
    Tablet,
    /// 501..=768px
    Mobile,
    /// 500px and below
    Compact,
}

impl Breakpoint {
    pub fn from_width(width: f32) -> Self {
        if width <= 500.0 {
            Self::Compact
        } else if width <= 768.0 {
            Self::Mobile
        } else if width <= 1024.0 {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }
}

/// Transform, opacity and stacking of one card
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardPlacement {
    /// Horizontal offset from the centered position, in `vw`
    pub translate_x_vw: f32,
    pub scale: f32,
    pub opacity: f32,
    pub z_index: i32,
}

impl CardPlacement {
    const fn new(translate_x_vw: f32, scale: f32, opacity: f32, z_index: i32) -> Self {
        Self {
            translate_x_vw,
            scale,
            opacity,
            z_index,
        }
    }

    /// CSS transform relative to a card centered with `translateX(-50%)`
    pub fn css_transform(&self) -> String {
        if self.translate_x_vw == 0.0 {
            format!("translateX(-50%) scale({})", self.scale)
        } else if self.translate_x_vw < 0.0 {
            format!(
                "translateX(calc(-50% - {}vw)) scale({})",
                -self.translate_x_vw, self.scale
            )
        } else {
            format!(
                "translateX(calc(-50% + {}vw)) scale({})",
                self.translate_x_vw, self.scale
            )
        }
    }
}

/// Focus state over `len` cards
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    current: usize,
}

impl Carousel {
    /// Carousel focused on the first card
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(LayoutError::EmptyCarousel);
        }
        Ok(Self { len, current: 0 })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a carousel has at least one card
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.len;
    }

    pub fn prev(&mut self) {
        self.current = (self.current + self.len - 1) % self.len;
    }

    /// Position of card `index`. Out-of-range indices are hidden.
    pub fn position_of(&self, index: usize) -> CardPosition {
        if index == self.current {
            CardPosition::Center
        } else if index == (self.current + self.len - 1) % self.len {
            CardPosition::Left
        } else if index == (self.current + 1) % self.len {
            CardPosition::Right
        } else {
            CardPosition::Hidden
        }
    }

    /// Position of every card, by index
    pub fn positions(&self) -> Vec<CardPosition> {
        (0..self.len).map(|index| self.position_of(index)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_from_first_of_five() {
        let mut carousel = Carousel::new(5).unwrap();
        carousel.next();

        assert_eq!(carousel.current_index(), 1);
        assert_eq!(
            carousel.positions(),
            vec![
                CardPosition::Left,
                CardPosition::Center,
                CardPosition::Right,
                CardPosition::Hidden,
                CardPosition::Hidden,
            ]
        );
    }

    #[test]
    fn test_prev_wraps_to_last() {
        let mut carousel = Carousel::new(5).unwrap();
        carousel.prev();
        assert_eq!(carousel.current_index(), 4);
        assert_eq!(carousel.position_of(0), CardPosition::Right);
        assert_eq!(carousel.position_of(3), CardPosition::Left);
    }

    #[test]
    fn test_empty_carousel_is_rejected() {
        assert_eq!(Carousel::new(0), Err(LayoutError::EmptyCarousel));
    }

    #[test]
    fn test_two_cards_prefer_left() {
        let carousel = Carousel::new(2).unwrap();
        assert_eq!(
            carousel.positions(),
            vec![CardPosition::Center, CardPosition::Left]
        );
    }

    #[test]
    fn test_out_of_range_is_hidden() {
        let carousel = Carousel::new(3).unwrap();
        assert_eq!(carousel.position_of(7), CardPosition::Hidden);
    }

    #[test]
    fn test_placements_per_breakpoint() {
        assert_eq!(Breakpoint::from_width(1280.0), Breakpoint::Desktop);
        assert_eq!(Breakpoint::from_width(1024.0), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(768.0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(500.0), Breakpoint::Compact);

        let left = CardPosition::Left.placement(Breakpoint::Tablet);
        assert_eq!(left.translate_x_vw, -15.0);
        assert_eq!(left.css_transform(), "translateX(calc(-50% - 15vw)) scale(0.85)");

        let center = CardPosition::Center.placement(Breakpoint::Compact);
        assert_eq!(center.css_transform(), "translateX(-50%) scale(1.15)");
        assert_eq!(CardPosition::Hidden.placement(Breakpoint::Desktop).opacity, 0.0);
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(card_background(0), "#e0f7fa");
        assert_eq!(card_background(6), "#e0f7fa");
        assert_eq!(card_background(5), "#ffccbc");
    }
}
