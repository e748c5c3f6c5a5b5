//! Marks (cue points) and mark ranges (loops) drawn over the overview
//!
//! The set of marks and ranges is fixed once the skin is set up. At runtime
//! only their values change: positions and colors from the track's cue
//! list, and positions/flags from control-value notifications.

use std::collections::HashMap;

use deckview_core::{ControlKey, Cue, CueType, RgbColor, INVALID_SAMPLE_POSITION};
use iced::Color;
use serde::{Deserialize, Serialize};

use crate::theme::{contrast_color, rgb_to_color};

/// Horizontal text alignment relative to the mark line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    Center,
    #[default]
    Right,
}

/// Vertical text alignment relative to the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alignment {
    pub horizontal: HAlign,
    pub vertical: VAlign,
}

impl Alignment {
    /// Parse "top|left", "bottom", "vcenter|hcenter"... (any order)
    ///
    /// Unknown words are ignored.
    pub fn parse(text: &str) -> Self {
        let mut align = Self::default();
        for word in text.split(|c: char| c == '|' || c == ',' || c.is_whitespace()) {
            match word.trim().to_ascii_lowercase().as_str() {
                "left" => align.horizontal = HAlign::Left,
                "hcenter" => align.horizontal = HAlign::Center,
                "right" => align.horizontal = HAlign::Right,
                "top" => align.vertical = VAlign::Top,
                "vcenter" => align.vertical = VAlign::Center,
                "bottom" => align.vertical = VAlign::Bottom,
                "center" => {
                    align.horizontal = HAlign::Center;
                    align.vertical = VAlign::Center;
                }
                _ => {}
            }
        }
        align
    }
}

/// Visual properties of a mark
#[derive(Debug, Clone, PartialEq)]
pub struct MarkProperties {
    pub fill_color: Color,
    pub border_color: Color,
    pub text_color: Color,
    pub text: String,
    pub align: Alignment,
}

impl MarkProperties {
    /// Recolor the mark: fill and text take the color, the border contrasts
    pub fn set_base_color(&mut self, color: Color) {
        self.fill_color = color;
        self.text_color = color;
        self.border_color = Color {
            a: 0.8,
            ..contrast_color(color)
        };
    }
}

/// Where a mark takes its position from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkSource {
    /// The deck's main cue
    MainCue,
    /// Hotcue number (0-based)
    HotCue(u8),
    /// A numeric control holding a sample position
    Control(ControlKey),
}

/// A point of interest drawn as a vertical line with optional text
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub source: MarkSource,
    /// Sample position, `-1.0` when unset
    pub sample_position: f64,
    /// Bound visibility flag; `None` means always visible
    pub visible: Option<bool>,
    pub visible_control: Option<ControlKey>,
    pub properties: MarkProperties,
}

impl Mark {
    pub fn new(source: MarkSource, properties: MarkProperties) -> Self {
        Self {
            source,
            sample_position: INVALID_SAMPLE_POSITION,
            visible: None,
            visible_control: None,
            properties,
        }
    }

    pub fn hotcue(&self) -> Option<u8> {
        match self.source {
            MarkSource::HotCue(n) => Some(n),
            _ => None,
        }
    }

    /// Has a position and is not hidden by its visibility binding
    pub fn is_drawable(&self) -> bool {
        self.sample_position >= 0.0 && self.visible != Some(false)
    }

    /// Apply a control change. Returns whether the mark changed.
    pub fn on_control_changed(&mut self, key: &ControlKey, value: f64) -> bool {
        let mut changed = false;
        if let MarkSource::Control(source) = &self.source {
            if source == key && self.sample_position != value {
                self.sample_position = value;
                changed = true;
            }
        }
        if self.visible_control.as_ref() == Some(key) {
            let visible = value > 0.0;
            if self.visible != Some(visible) {
                self.visible = Some(visible);
                changed = true;
            }
        }
        changed
    }
}

/// All point marks of one overview
#[derive(Debug, Clone, Default)]
pub struct MarkSet {
    marks: Vec<Mark>,
    /// Fill color of the skin's default (hotcue template) mark
    default_color: Option<Color>,
}

impl MarkSet {
    pub fn new(marks: Vec<Mark>, default_color: Option<Color>) -> Self {
        Self {
            marks,
            default_color,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.marks.iter()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn default_color(&self) -> Option<Color> {
        self.default_color
    }

    pub fn hotcue_mark(&self, number: u8) -> Option<&Mark> {
        self.marks.iter().find(|m| m.hotcue() == Some(number))
    }

    pub fn hotcue_mark_mut(&mut self, number: u8) -> Option<&mut Mark> {
        self.marks.iter_mut().find(|m| m.hotcue() == Some(number))
    }

    /// Apply the track's cue list: positions for cue-bound marks, colors
    /// for hotcue marks. Cue-bound marks without a cue become unset.
    pub fn update_from_cues(&mut self, cues: &[Cue], colors: &CueColorRepresentation) {
        for mark in &mut self.marks {
            let cue = match mark.source {
                MarkSource::MainCue => cues.iter().find(|c| c.cue_type == CueType::MainCue),
                MarkSource::HotCue(n) => cues
                    .iter()
                    .find(|c| c.cue_type == CueType::HotCue && c.hotcue == Some(n)),
                MarkSource::Control(_) => continue,
            };

            let Some(cue) = cue else {
                mark.sample_position = INVALID_SAMPLE_POSITION;
                continue;
            };
            mark.sample_position = cue.position;

            if mark.hotcue().is_some() {
                let color = colors.representation_for(cue.color);
                if color != mark.properties.fill_color || color != mark.properties.text_color {
                    mark.properties.set_base_color(color);
                }
            }
        }
    }

    /// Forget all cue-derived positions (track unloaded)
    pub fn clear_cue_positions(&mut self) {
        for mark in &mut self.marks {
            if !matches!(mark.source, MarkSource::Control(_)) {
                mark.sample_position = INVALID_SAMPLE_POSITION;
            }
        }
    }

    pub fn on_control_changed(&mut self, key: &ControlKey, value: f64) -> bool {
        let mut changed = false;
        for mark in &mut self.marks {
            changed |= mark.on_control_changed(key, value);
        }
        changed
    }
}

/// Where the duration label of a range is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationTextLocation {
    /// Left of (above) the range start
    Before,
    /// Right of (below) the range end
    #[default]
    After,
}

/// Control bindings of a mark range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkRangeControls {
    pub start: ControlKey,
    pub end: ControlKey,
    pub enabled: Option<ControlKey>,
    pub visible: Option<ControlKey>,
}

/// A labeled interval such as the active loop
#[derive(Debug, Clone, PartialEq)]
pub struct MarkRange {
    pub controls: MarkRangeControls,
    pub start: f64,
    pub end: f64,
    pub enabled: bool,
    pub visible: bool,
    pub show_duration: bool,
    pub duration_text_location: DurationTextLocation,
    pub active_color: Color,
    pub disabled_color: Color,
    pub duration_text_color: Color,
}

impl MarkRange {
    pub fn new(controls: MarkRangeControls) -> Self {
        Self {
            controls,
            start: INVALID_SAMPLE_POSITION,
            end: INVALID_SAMPLE_POSITION,
            enabled: true,
            visible: true,
            show_duration: false,
            duration_text_location: DurationTextLocation::default(),
            active_color: crate::theme::DEFAULT_RANGE_ACTIVE,
            disabled_color: crate::theme::DEFAULT_RANGE_DISABLED,
            duration_text_color: Color::WHITE,
        }
    }

    /// Both ends are set
    pub fn active(&self) -> bool {
        self.start != INVALID_SAMPLE_POSITION && self.end != INVALID_SAMPLE_POSITION
    }

    /// Apply a control change. Returns whether the range changed.
    pub fn on_control_changed(&mut self, key: &ControlKey, value: f64) -> bool {
        let before = (self.start, self.end, self.enabled, self.visible);
        if *key == self.controls.start {
            self.start = value;
        }
        if *key == self.controls.end {
            self.end = value;
        }
        if self.controls.enabled.as_ref() == Some(key) {
            self.enabled = value > 0.0;
        }
        if self.controls.visible.as_ref() == Some(key) {
            self.visible = value > 0.0;
        }
        before != (self.start, self.end, self.enabled, self.visible)
    }
}

/// Display colors for cue palette colors
///
/// Skins may override how each palette color is shown; cues without a
/// color use the default.
#[derive(Debug, Clone, PartialEq)]
pub struct CueColorRepresentation {
    overrides: HashMap<RgbColor, Color>,
    default: Color,
}

impl CueColorRepresentation {
    pub fn new(default: Color) -> Self {
        Self {
            overrides: HashMap::new(),
            default,
        }
    }

    pub fn with_override(mut self, palette: RgbColor, display: Color) -> Self {
        self.overrides.insert(palette, display);
        self
    }

    pub fn default_color(&self) -> Color {
        self.default
    }

    pub fn representation_for(&self, color: Option<RgbColor>) -> Color {
        match color {
            None => self.default,
            Some(rgb) => self
                .overrides
                .get(&rgb)
                .copied()
                .unwrap_or_else(|| rgb_to_color(rgb)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(text: &str) -> MarkProperties {
        MarkProperties {
            fill_color: Color::WHITE,
            border_color: Color::BLACK,
            text_color: Color::WHITE,
            text: text.to_string(),
            align: Alignment::default(),
        }
    }

    fn key(item: &str) -> ControlKey {
        ControlKey::new("[Channel1]", item)
    }

    #[test]
    fn test_alignment_parse() {
        let align = Alignment::parse("bottom|left");
        assert_eq!(align.horizontal, HAlign::Left);
        assert_eq!(align.vertical, VAlign::Bottom);

        let align = Alignment::parse("center");
        assert_eq!(align.horizontal, HAlign::Center);
        assert_eq!(align.vertical, VAlign::Center);

        assert_eq!(Alignment::parse("whatever"), Alignment::default());
    }

    #[test]
    fn test_mark_visibility_binding() {
        let mut mark = Mark::new(MarkSource::Control(key("intro_start_position")), props("I"));
        mark.visible_control = Some(key("intro_start_enabled"));
        assert!(!mark.is_drawable(), "Unset position should not draw");

        assert!(mark.on_control_changed(&key("intro_start_position"), 500.0));
        assert!(mark.is_drawable(), "Marks without a visibility value are visible");

        assert!(mark.on_control_changed(&key("intro_start_enabled"), 0.0));
        assert!(!mark.is_drawable());
        assert!(!mark.on_control_changed(&key("intro_start_enabled"), 0.0));
        assert!(!mark.on_control_changed(&key("rate"), 1.0));
    }

    #[test]
    fn test_update_from_cues_sets_position_and_color() {
        let mut set = MarkSet::new(
            vec![
                Mark::new(MarkSource::MainCue, props("C")),
                Mark::new(MarkSource::HotCue(0), props("1")),
                Mark::new(MarkSource::HotCue(1), props("2")),
            ],
            None,
        );
        let red = RgbColor::new(255, 0, 0);
        let colors = CueColorRepresentation::new(Color::WHITE)
            .with_override(red, Color::from_rgb(0.5, 0.0, 0.0));
        let cues = vec![
            Cue::main_cue(100.0),
            Cue::hotcue(0, 2000.0).with_color(red),
        ];

        set.update_from_cues(&cues, &colors);

        let marks: Vec<&Mark> = set.iter().collect();
        assert_eq!(marks[0].sample_position, 100.0);
        assert_eq!(marks[0].properties.fill_color, Color::WHITE, "Main cue keeps skin color");
        assert_eq!(marks[1].sample_position, 2000.0);
        assert_eq!(marks[1].properties.fill_color, Color::from_rgb(0.5, 0.0, 0.0));
        assert_eq!(marks[1].properties.text_color, Color::from_rgb(0.5, 0.0, 0.0));
        assert_eq!(marks[2].sample_position, INVALID_SAMPLE_POSITION, "Missing hotcue is unset");
    }

    #[test]
    fn test_range_activity_and_flags() {
        let mut range = MarkRange::new(MarkRangeControls {
            start: key("loop_start_position"),
            end: key("loop_end_position"),
            enabled: Some(key("loop_enabled")),
            visible: None,
        });
        assert!(!range.active());
        assert!(range.on_control_changed(&key("loop_start_position"), 1000.0));
        assert!(!range.active());
        assert!(range.on_control_changed(&key("loop_end_position"), 3000.0));
        assert!(range.active());
        assert!(range.enabled, "Enabled defaults to true");
        assert!(range.on_control_changed(&key("loop_enabled"), 0.0));
        assert!(!range.enabled);
        assert!(range.visible, "Unbound visibility stays true");
        assert!(!range.on_control_changed(&key("loop_end_position"), 3000.0));
    }

    #[test]
    fn test_color_representation_default() {
        let colors = CueColorRepresentation::new(Color::from_rgb(0.0, 0.0, 1.0));
        assert_eq!(colors.representation_for(None), Color::from_rgb(0.0, 0.0, 1.0));
        assert_eq!(
            colors.representation_for(Some(RgbColor::new(255, 255, 255))),
            Color::WHITE
        );
    }
}
