//! Common types for deckview
//!
//! Identity, color and sample-position primitives used by every other module.

use serde::{Deserialize, Serialize};

/// Number of interleaved channels the engine plays (stereo).
///
/// Sample positions and track sample counts are expressed in interleaved
/// samples, so converting them to seconds divides by this as well.
pub const ENGINE_CHANNEL_COUNT: u32 = 2;

/// Default sample rate assumed until a track reports its own
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Sample position meaning "not set"
pub const INVALID_SAMPLE_POSITION: f64 = -1.0;

/// Unique identity of a track within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 24-bit RGB color as stored with cue points (0xRRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RgbColor(pub u32);

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub fn red(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    pub fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub fn blue(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Parse "#RRGGBB" or "RRGGBB"
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self)
    }

    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.0 & 0xFF_FFFF)
    }
}

/// Predefined hotcue palette (the colors a user can pick for a cue)
pub const HOTCUE_PALETTE: [RgbColor; 8] = [
    RgbColor::new(0xC5, 0x0A, 0x08), // Red
    RgbColor::new(0x32, 0xBE, 0x44), // Green
    RgbColor::new(0x0B, 0x62, 0xE6), // Blue
    RgbColor::new(0xF8, 0xD2, 0x00), // Yellow
    RgbColor::new(0x42, 0xD4, 0xF4), // Celeste
    RgbColor::new(0xAF, 0x00, 0xCC), // Purple
    RgbColor::new(0xFC, 0xA6, 0xD7), // Pink
    RgbColor::new(0xF2, 0xF2, 0xFF), // White
];
