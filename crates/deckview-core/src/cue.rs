//! Cue points stored with a track

use crate::types::{RgbColor, HOTCUE_PALETTE, INVALID_SAMPLE_POSITION};

/// Kind of cue point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueType {
    /// The deck's main cue
    MainCue,
    /// Numbered hotcue
    HotCue,
    /// Saved loop
    Loop,
    Intro,
    Outro,
}

/// A cue point in the track
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub cue_type: CueType,
    /// Hotcue number (0-based), only for [`CueType::HotCue`]
    pub hotcue: Option<u8>,
    /// Position in interleaved samples, `-1.0` when unset
    pub position: f64,
    /// Length in interleaved samples (loops, intro/outro)
    pub length: f64,
    /// Palette color chosen by the user, `None` for uncolored cues
    pub color: Option<RgbColor>,
    pub label: String,
}

impl Cue {
    /// Create a hotcue with the palette color for its number
    pub fn hotcue(number: u8, position: f64) -> Self {
        Self {
            cue_type: CueType::HotCue,
            hotcue: Some(number),
            position,
            length: 0.0,
            color: Some(HOTCUE_PALETTE[number as usize % HOTCUE_PALETTE.len()]),
            label: String::new(),
        }
    }

    /// Create the main cue
    pub fn main_cue(position: f64) -> Self {
        Self {
            cue_type: CueType::MainCue,
            hotcue: None,
            position,
            length: 0.0,
            color: None,
            label: String::new(),
        }
    }

    pub fn with_color(mut self, color: RgbColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn is_set(&self) -> bool {
        self.position != INVALID_SAMPLE_POSITION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotcue_palette_color() {
        let cue = Cue::hotcue(2, 1000.0);
        assert_eq!(cue.hotcue, Some(2));
        assert_eq!(cue.color, Some(HOTCUE_PALETTE[2]));
        assert!(cue.is_set());
    }

    #[test]
    fn test_unset_main_cue() {
        let cue = Cue::main_cue(INVALID_SAMPLE_POSITION);
        assert!(!cue.is_set());
        assert_eq!(cue.hotcue, None);
        assert_eq!(cue.color, None);
    }
}
