//! Rendering settings shared by every overview
//!
//! The host owns one `OverviewSettings` value (usually loaded from
//! `~/.config/deckview/overview.yaml`) and hands it to each widget.

use serde::{Deserialize, Serialize};

/// Settings file name inside the deckview config directory
pub const SETTINGS_FILE: &str = "overview.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewSettings {
    /// Vertical amplification of the overview waveform (>= 1 crops the image)
    pub visual_gain: f64,
    /// Scale the finished waveform so its peak fills the widget
    pub normalize: bool,
    /// UI scale factor (HiDPI) applied to pens and fonts
    pub scale_factor: f32,
    /// Accept dropped tracks while the deck is playing
    pub allow_load_to_playing_deck: bool,
}

impl Default for OverviewSettings {
    fn default() -> Self {
        Self {
            visual_gain: 1.0,
            normalize: true,
            scale_factor: 1.0,
            allow_load_to_playing_deck: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = OverviewSettings::default();
        assert_eq!(settings.visual_gain, 1.0);
        assert!(settings.normalize);
        assert!(!settings.allow_load_to_playing_deck);
    }

    #[test]
    fn test_partial_yaml() {
        let settings: OverviewSettings = serde_yaml::from_str("visual_gain: 2.0\n").unwrap();
        assert_eq!(settings.visual_gain, 2.0);
        assert!(settings.normalize);
        assert_eq!(settings.scale_factor, 1.0);
    }
}
