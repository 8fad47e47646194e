//! Geometry primitives

/// Axis-aligned rectangle in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Same rectangle shifted vertically
    pub fn offset_y(&self, dy: f32) -> Self {
        Self {
            y: self.y + dy,
            ..*self
        }
    }
}

/// Browser viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// `navigator.maxTouchPoints`; zero on pointer-only devices
    pub touch_points: u32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            touch_points: 0,
        }
    }

    pub fn with_touch_points(mut self, touch_points: u32) -> Self {
        self.touch_points = touch_points;
        self
    }

    pub fn is_touch(&self) -> bool {
        self.touch_points > 0
    }

    /// Taller than wide
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}
