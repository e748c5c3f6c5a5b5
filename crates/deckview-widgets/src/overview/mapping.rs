//! Mapping between normalized play position and widget pixels
//!
//! `pixel = a * value + b`, recomputed whenever the widget's principal
//! length changes so that value 0 lands on pixel 0 and value 1 on the last
//! pixel (`length - 1`).

use serde::{Deserialize, Serialize};

/// Principal axis of the overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Parse a skin orientation string; anything but "vertical" is horizontal
    pub fn parse(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("vertical") {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    /// Length along the principal axis
    pub fn length(self, width: f32, height: f32) -> f32 {
        match self {
            Orientation::Horizontal => width,
            Orientation::Vertical => height,
        }
    }

    /// Extent across the principal axis
    pub fn breadth(self, width: f32, height: f32) -> f32 {
        match self {
            Orientation::Horizontal => height,
            Orientation::Vertical => width,
        }
    }
}

// Play position controls accept out-of-range values (pre-roll), the
// overview only represents [0, 1].
const MIN_PLAYPOS: f64 = 0.0;
const MAX_PLAYPOS: f64 = 1.0;

/// Affine pixel <-> value transform for one widget length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionMapping {
    a: f64,
    b: f64,
    length: i32,
}

impl PositionMapping {
    pub fn new(length: i32) -> Self {
        let mut mapping = Self {
            a: 0.0,
            b: 0.0,
            length: 0,
        };
        mapping.resize(length);
        mapping
    }

    /// Recompute the coefficients for a new principal length
    pub fn resize(&mut self, length: i32) {
        let length = length.max(0);
        let zero = (0.0 - MIN_PLAYPOS) / (MAX_PLAYPOS - MIN_PLAYPOS);
        let one = (1.0 - MIN_PLAYPOS) / (MAX_PLAYPOS - MIN_PLAYPOS);
        self.a = ((length - 1).max(0) as f64) / (one - zero);
        self.b = zero * self.a;
        self.length = length;
    }

    pub fn length(&self) -> i32 {
        self.length
    }

    /// Last addressable pixel, never negative
    pub fn max_pixel(&self) -> i32 {
        (self.length - 1).max(0)
    }

    pub fn clamp_pixel(&self, pixel: i32) -> i32 {
        pixel.clamp(0, self.max_pixel())
    }

    /// Normalized value (clamped to [0, 1]) to pixel
    pub fn value_to_position(&self, value: f64) -> i32 {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        self.clamp_pixel((self.a * value + self.b).round() as i32)
    }

    /// Pixel to normalized value, clamped to [0, 1]
    pub fn position_to_value(&self, pixel: i32) -> f64 {
        if self.a <= 0.0 {
            return 0.0;
        }
        ((pixel as f64 - self.b) / self.a).clamp(0.0, 1.0)
    }
}

impl Default for PositionMapping {
    fn default() -> Self {
        Self::new(0)
    }
}
