//! Overview skin: colors, orientation, marks and mark ranges
//!
//! The skin is described in YAML and parsed once. [`SkinConfig::setup`] turns
//! the description into the runtime [`OverviewSkin`] for one deck group,
//! resolving control item names against that group.
//!
//! ```yaml
//! background_color: "#101014"
//! background_image: overview_bg.png
//! end_of_track_color: "#C81914"
//! orientation: horizontal
//! signal_colors:
//!   axes: "#808080"
//!   played_overlay: "#60000000"
//! default_mark:
//!   color: "#FF8000"
//!   align: top|right
//! hotcues: 8
//! marks:
//!   - source: main_cue
//!     text: C
//!     color: "#FF0000"
//!     align: bottom|hcenter
//!   - source:
//!       control: intro_start_position
//!     text: IN
//! mark_ranges:
//!   - start_control: loop_start_position
//!     end_control: loop_end_position
//!     enabled_control: loop_enabled
//!     show_duration: true
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use deckview_core::{ControlKey, RgbColor};
use iced::widget::image::Handle;
use iced::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::mapping::Orientation;
use super::mark::{
    Alignment, CueColorRepresentation, DurationTextLocation, Mark, MarkProperties, MarkRange,
    MarkRangeControls, MarkSet, MarkSource,
};
use crate::theme::{self, color_or, contrast_color};

/// Errors while reading skin files
#[derive(Error, Debug)]
pub enum SkinError {
    #[error("Failed to read skin file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse skin: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to load skin image: {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, SkinError>;

/// Signal colors of the waveform and its overlays
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalColorsConfig {
    pub low: Option<String>,
    pub mid: Option<String>,
    pub high: Option<String>,
    pub axes: Option<String>,
    pub played_overlay: Option<String>,
    pub play_position: Option<String>,
}

/// Mark position source as written in the skin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkSourceConfig {
    MainCue,
    Hotcue(u8),
    /// Control item within the deck group
    Control(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkConfig {
    /// `main_cue`, `{hotcue: N}` or `{control: item}`
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub source: Option<MarkSourceConfig>,
    pub visible_control: Option<String>,
    pub text: String,
    pub color: Option<String>,
    pub text_color: Option<String>,
    pub border_color: Option<String>,
    pub align: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkRangeConfig {
    pub start_control: String,
    pub end_control: String,
    pub enabled_control: Option<String>,
    pub visible_control: Option<String>,
    pub color: Option<String>,
    pub disabled_color: Option<String>,
    pub duration_text_color: Option<String>,
    pub show_duration: bool,
    pub duration_text_location: DurationTextLocation,
}

/// Skin description of one overview
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinConfig {
    pub background_color: Option<String>,
    /// Background image, relative to the skin directory
    pub background_image: Option<PathBuf>,
    pub end_of_track_color: Option<String>,
    pub orientation: String,
    pub signal_colors: SignalColorsConfig,
    /// Template for hotcues without an explicit mark
    pub default_mark: Option<MarkConfig>,
    /// Number of hotcues that get a mark from the template
    pub hotcues: u8,
    pub marks: Vec<MarkConfig>,
    pub mark_ranges: Vec<MarkRangeConfig>,
    /// Palette color ("#RRGGBB") to display color
    pub hotcue_colors: BTreeMap<String, String>,
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            background_image: None,
            end_of_track_color: None,
            orientation: "horizontal".to_string(),
            signal_colors: SignalColorsConfig::default(),
            default_mark: Some(MarkConfig {
                color: Some("#FF8000".to_string()),
                align: Some("top|right".to_string()),
                ..MarkConfig::default()
            }),
            hotcues: 8,
            marks: vec![MarkConfig {
                source: Some(MarkSourceConfig::MainCue),
                text: "C".to_string(),
                color: Some("#FF0000".to_string()),
                align: Some("bottom|hcenter".to_string()),
                ..MarkConfig::default()
            }],
            mark_ranges: vec![MarkRangeConfig {
                start_control: "loop_start_position".to_string(),
                end_control: "loop_end_position".to_string(),
                enabled_control: Some("loop_enabled".to_string()),
                show_duration: true,
                ..MarkRangeConfig::default()
            }],
            hotcue_colors: BTreeMap::new(),
        }
    }
}

/// Resolved signal colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalColors {
    pub low: Color,
    pub mid: Color,
    pub high: Color,
    pub axes: Color,
    pub played_overlay: Color,
    pub play_position: Color,
}

impl Default for SignalColors {
    fn default() -> Self {
        Self {
            low: theme::DEFAULT_LOW,
            mid: theme::DEFAULT_MID,
            high: theme::DEFAULT_HIGH,
            axes: theme::DEFAULT_AXES,
            played_overlay: theme::DEFAULT_PLAYED_OVERLAY,
            play_position: theme::DEFAULT_PLAY_POSITION,
        }
    }
}

impl SignalColors {
    fn from_config(config: &SignalColorsConfig) -> Self {
        let d = Self::default();
        Self {
            low: color_or(config.low.as_deref(), d.low),
            mid: color_or(config.mid.as_deref(), d.mid),
            high: color_or(config.high.as_deref(), d.high),
            axes: color_or(config.axes.as_deref(), d.axes),
            played_overlay: color_or(config.played_overlay.as_deref(), d.played_overlay),
            play_position: color_or(config.play_position.as_deref(), d.play_position),
        }
    }
}

/// Runtime skin of one overview
#[derive(Debug, Clone)]
pub struct OverviewSkin {
    pub background_color: Color,
    pub background_image: Option<Handle>,
    pub end_of_track_color: Color,
    pub orientation: Orientation,
    pub signal_colors: SignalColors,
    pub marks: MarkSet,
    pub mark_ranges: Vec<MarkRange>,
    pub cue_colors: CueColorRepresentation,
}

impl Default for OverviewSkin {
    fn default() -> Self {
        SkinConfig::default().setup("[Channel1]", None)
    }
}

/// Read and parse a skin file
pub fn load_skin(path: &Path) -> Result<SkinConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| SkinError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_yaml::from_str(&contents)?;
    log::info!("load_skin: Loaded overview skin from {:?}", path);
    Ok(config)
}

/// Decode an image file into an iced image handle
pub fn load_background_image(path: &Path) -> Result<Handle> {
    let rgba = image::open(path)
        .map_err(|source| SkinError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Handle::from_rgba(width, height, rgba.into_raw()))
}

impl SkinConfig {
    /// Parse a skin from YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Build the runtime skin for `group`.
    ///
    /// `skin_dir` resolves a relative background image; an image that fails
    /// to load is skipped with a warning.
    pub fn setup(&self, group: &str, skin_dir: Option<&Path>) -> OverviewSkin {
        let signal_colors = SignalColors::from_config(&self.signal_colors);

        let background_image = self.background_image.as_ref().and_then(|image| {
            let path = match skin_dir {
                Some(dir) if image.is_relative() => dir.join(image),
                _ => image.clone(),
            };
            match load_background_image(&path) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    log::warn!("OverviewSkin: {}, drawing without background image", e);
                    None
                }
            }
        });

        let default_color = self
            .default_mark
            .as_ref()
            .map(|m| color_or(m.color.as_deref(), signal_colors.axes));

        let mut marks: Vec<Mark> = self
            .marks
            .iter()
            .filter_map(|config| build_mark(config, group, None, signal_colors.axes))
            .collect();

        // Hotcues without an explicit mark get one from the template
        if let Some(template) = &self.default_mark {
            for number in 0..self.hotcues {
                let explicit = marks.iter().any(|m| m.hotcue() == Some(number));
                if !explicit {
                    if let Some(mark) =
                        build_mark(template, group, Some(number), signal_colors.axes)
                    {
                        marks.push(mark);
                    }
                }
            }
        }

        let mark_ranges = self
            .mark_ranges
            .iter()
            .map(|config| build_mark_range(config, group))
            .collect();

        let mut cue_colors =
            CueColorRepresentation::new(default_color.unwrap_or(signal_colors.axes));
        for (palette, display) in &self.hotcue_colors {
            match (RgbColor::from_hex(palette), theme::parse_color(display)) {
                (Some(palette), Some(display)) => {
                    cue_colors = cue_colors.with_override(palette, display);
                }
                _ => log::warn!(
                    "OverviewSkin: Ignoring hotcue color mapping {} -> {}",
                    palette,
                    display
                ),
            }
        }

        let skin = OverviewSkin {
            background_color: color_or(self.background_color.as_deref(), theme::DEFAULT_BACKGROUND),
            background_image,
            end_of_track_color: color_or(
                self.end_of_track_color.as_deref(),
                theme::DEFAULT_END_OF_TRACK,
            ),
            orientation: Orientation::parse(&self.orientation),
            signal_colors,
            marks: MarkSet::new(marks, default_color),
            mark_ranges,
            cue_colors,
        };

        log::debug!(
            "OverviewSkin {}: {} marks, {} mark ranges",
            group,
            skin.marks.len(),
            skin.mark_ranges.len()
        );
        skin
    }
}

fn build_mark(
    config: &MarkConfig,
    group: &str,
    hotcue: Option<u8>,
    fallback_color: Color,
) -> Option<Mark> {
    let source = match (hotcue, &config.source) {
        (Some(number), _) => MarkSource::HotCue(number),
        (None, Some(MarkSourceConfig::MainCue)) => MarkSource::MainCue,
        (None, Some(MarkSourceConfig::Hotcue(number))) => MarkSource::HotCue(*number),
        (None, Some(MarkSourceConfig::Control(item))) => {
            MarkSource::Control(ControlKey::new(group, item.as_str()))
        }
        (None, None) => {
            log::warn!("OverviewSkin: Skipping mark '{}' without a source", config.text);
            return None;
        }
    };

    let fill_color = color_or(config.color.as_deref(), fallback_color);
    let text = match (hotcue, config.text.is_empty()) {
        (Some(number), true) => (number as u32 + 1).to_string(),
        _ => config.text.clone(),
    };

    let properties = MarkProperties {
        fill_color,
        border_color: color_or(
            config.border_color.as_deref(),
            Color {
                a: 0.8,
                ..contrast_color(fill_color)
            },
        ),
        text_color: color_or(config.text_color.as_deref(), fill_color),
        text,
        align: config
            .align
            .as_deref()
            .map(Alignment::parse)
            .unwrap_or_default(),
    };

    let mut mark = Mark::new(source, properties);
    if let Some(item) = &config.visible_control {
        mark.visible_control = Some(ControlKey::new(group, item.as_str()));
    }
    Some(mark)
}

fn build_mark_range(config: &MarkRangeConfig, group: &str) -> MarkRange {
    let key = |item: &str| ControlKey::new(group, item);
    let mut range = MarkRange::new(MarkRangeControls {
        start: key(&config.start_control),
        end: key(&config.end_control),
        enabled: config.enabled_control.as_deref().map(key),
        visible: config.visible_control.as_deref().map(key),
    });
    range.active_color = color_or(config.color.as_deref(), theme::DEFAULT_RANGE_ACTIVE);
    range.disabled_color =
        color_or(config.disabled_color.as_deref(), theme::DEFAULT_RANGE_DISABLED);
    range.duration_text_color = color_or(config.duration_text_color.as_deref(), Color::WHITE);
    range.show_duration = config.show_duration;
    range.duration_text_location = config.duration_text_location;
    range
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKIN: &str = r##"
background_color: "#000000"
end_of_track_color: not-a-color
orientation: Vertical
signal_colors:
  axes: "#FFFFFF"
default_mark:
  color: "#00FF00"
hotcues: 3
marks:
  - source: main_cue
    text: C
  - source:
      hotcue: 1
    text: B
    color: "#0000FF"
  - source:
      control: intro_start_position
    visible_control: intro_start_enabled
    text: IN
  - text: orphan
mark_ranges:
  - start_control: loop_start_position
    end_control: loop_end_position
    enabled_control: loop_enabled
    show_duration: true
    duration_text_location: before
hotcue_colors:
  "#C50A08": "#FF0000"
  "bad": "#FF0000"
"##;

    #[test]
    fn test_setup_from_yaml() {
        let config = SkinConfig::from_yaml(SKIN).unwrap();
        let skin = config.setup("[Channel2]", None);

        assert_eq!(skin.background_color, Color::BLACK);
        assert_eq!(
            skin.end_of_track_color,
            theme::DEFAULT_END_OF_TRACK,
            "Malformed color should fall back to the default"
        );
        assert_eq!(skin.orientation, Orientation::Vertical);
        assert_eq!(skin.signal_colors.axes, Color::WHITE);

        // main cue + hotcue 1 + intro + template hotcues 0 and 2 (orphan skipped)
        assert_eq!(skin.marks.len(), 5);
        let hotcue1 = skin.marks.hotcue_mark(1).unwrap();
        assert_eq!(hotcue1.properties.text, "B");
        assert_eq!(hotcue1.properties.fill_color, Color::from_rgb(0.0, 0.0, 1.0));
        let hotcue2 = skin.marks.hotcue_mark(2).unwrap();
        assert_eq!(hotcue2.properties.text, "3");
        assert_eq!(hotcue2.properties.fill_color, Color::from_rgb(0.0, 1.0, 0.0));

        let intro = skin
            .marks
            .iter()
            .find(|m| m.properties.text == "IN")
            .unwrap();
        assert_eq!(
            intro.source,
            MarkSource::Control(ControlKey::new("[Channel2]", "intro_start_position"))
        );
        assert_eq!(
            intro.visible_control,
            Some(ControlKey::new("[Channel2]", "intro_start_enabled"))
        );

        assert_eq!(skin.mark_ranges.len(), 1);
        let range = &skin.mark_ranges[0];
        assert!(range.show_duration);
        assert_eq!(range.duration_text_location, DurationTextLocation::Before);
        assert_eq!(
            range.controls.enabled,
            Some(ControlKey::new("[Channel2]", "loop_enabled"))
        );

        assert_eq!(
            skin.cue_colors
                .representation_for(Some(RgbColor::new(0xC5, 0x0A, 0x08))),
            Color::from_rgb(1.0, 0.0, 0.0)
        );
        assert_eq!(skin.cue_colors.default_color(), Color::from_rgb(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_mark_source_map_form() {
        let yaml = "source:\n  hotcue: 4\ntext: D\n";
        let mark: MarkConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(mark.source, Some(MarkSourceConfig::Hotcue(4)));

        let mark: MarkConfig = serde_yaml::from_str("source: main_cue\n").unwrap();
        assert_eq!(mark.source, Some(MarkSourceConfig::MainCue));

        let mark: MarkConfig = serde_yaml::from_str("text: no source\n").unwrap();
        assert_eq!(mark.source, None, "Missing source stays unset");

        let written = serde_yaml::to_string(&MarkConfig {
            source: Some(MarkSourceConfig::Control("outro_end_position".to_string())),
            ..MarkConfig::default()
        })
        .unwrap();
        let reread: MarkConfig = serde_yaml::from_str(&written).unwrap();
        assert_eq!(
            reread.source,
            Some(MarkSourceConfig::Control("outro_end_position".to_string())),
            "Written skins read back in map form"
        );
    }

    #[test]
    fn test_default_skin() {
        let skin = OverviewSkin::default();
        assert_eq!(skin.orientation, Orientation::Horizontal);
        assert_eq!(skin.marks.len(), 9, "Main cue plus 8 template hotcues");
        assert_eq!(skin.mark_ranges.len(), 1);
        assert!(skin.background_image.is_none());
    }

    #[test]
    fn test_missing_background_image_is_skipped() {
        let config = SkinConfig {
            background_image: Some(PathBuf::from("does-not-exist.png")),
            ..SkinConfig::default()
        };
        let skin = config.setup("[Channel1]", Some(Path::new("/nonexistent")));
        assert!(skin.background_image.is_none());
    }

    #[test]
    fn test_load_skin_errors() {
        let err = load_skin(Path::new("/nonexistent/skin.yaml")).unwrap_err();
        assert!(matches!(err, SkinError::Io { .. }));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skin.yaml");
        std::fs::write(&path, "marks: {not: [a list").unwrap();
        assert!(matches!(load_skin(&path).unwrap_err(), SkinError::Parse(_)));
    }
}
