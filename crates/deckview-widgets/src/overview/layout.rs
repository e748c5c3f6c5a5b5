//! Overlay geometry of the overview
//!
//! Pure functions computing where ranges, marks, labels and captions go.
//! The canvas only strokes and fills what these return, which keeps the
//! placement rules testable without a renderer.

use deckview_core::{duration::format_time, AnalyzerProgress, ENGINE_CHANNEL_COUNT};
use iced::Point;

use super::mapping::Orientation;
use super::mark::{DurationTextLocation, HAlign, MarkRange, VAlign};

/// Marker font size before scaling
pub const MARKER_FONT_SIZE: f32 = 10.0;

/// Caption font size before scaling
pub const CAPTION_FONT_SIZE: f32 = 12.0;

/// Gap between a range edge and its duration label
const DURATION_PADDING: f32 = 3.0;

/// Rough advance width of one glyph relative to the font size
const GLYPH_WIDTH_RATIO: f32 = 0.6;

/// Approximate rendered width of `text`
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH_RATIO
}

/// Sample position to pixel along the principal axis
///
/// One pixel of margin on each end keeps marks at the very start and end
/// of the track visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleScale {
    offset: f32,
    gain: f32,
}

impl SampleScale {
    /// `None` when the track length is unknown
    pub fn new(length: f32, track_samples: f64) -> Option<Self> {
        if !(track_samples > 0.0) {
            return None;
        }
        Some(Self {
            offset: 1.0,
            gain: ((length - 2.0) as f64 / track_samples) as f32,
        })
    }

    pub fn to_pixel(&self, sample: f64) -> f32 {
        self.offset + sample as f32 * self.gain
    }
}

/// Playback speed relative to the track's native tempo
pub fn rate_ratio(rate_dir: f64, rate_range: f64, rate: f64) -> f64 {
    1.0 + rate_dir * rate_range * rate
}

/// Real-time duration of a sample interval at the current rate
///
/// `None` when sample rate or rate ratio make the duration meaningless.
pub fn range_duration_seconds(start: f64, end: f64, sample_rate: f64, rate_ratio: f64) -> Option<f64> {
    if !(sample_rate > 0.0) || rate_ratio == 0.0 || !rate_ratio.is_finite() {
        return None;
    }
    Some((end - start) / sample_rate / ENGINE_CHANNEL_COUNT as f64 / rate_ratio)
}

/// Duration label of a mark range
#[derive(Debug, Clone, PartialEq)]
pub struct DurationLabel {
    pub text: String,
    /// Start of the text along the principal axis
    pub position: f32,
    pub width: f32,
}

/// Laid out mark range
#[derive(Debug, Clone, PartialEq)]
pub struct RangeLayout {
    pub start: f32,
    pub end: f32,
    pub enabled: bool,
    pub label: Option<DurationLabel>,
}

/// Inputs for duration labels, read from the playback controls at paint time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationContext {
    pub sample_rate: f64,
    pub rate_ratio: f64,
    pub font_size: f32,
}

/// Lay out one range; `None` means nothing is drawn for it
///
/// Inactive or hidden ranges are skipped, and so are ranges lying entirely
/// before the first or after the last pixel.
pub fn layout_mark_range(
    range: &MarkRange,
    scale: SampleScale,
    length: f32,
    duration: DurationContext,
) -> Option<RangeLayout> {
    if !range.active() || !range.visible {
        return None;
    }

    let start = scale.to_pixel(range.start);
    let end = scale.to_pixel(range.end);
    if (start < 0.0 && end < 0.0) || (start > length && end > length) {
        return None;
    }

    let label = if range.show_duration {
        range_duration_seconds(range.start, range.end, duration.sample_rate, duration.rate_ratio)
            .map(|seconds| {
                let text = format_time(seconds);
                let width = text_width(&text, duration.font_size);
                let mut position = match range.duration_text_location {
                    DurationTextLocation::Before => start - width - DURATION_PADDING,
                    DurationTextLocation::After => end + DURATION_PADDING,
                };
                // Keep the end of the text inside the widget
                if position + width > length {
                    position = length - width;
                }
                DurationLabel { text, position, width }
            })
    } else {
        None
    };

    Some(RangeLayout {
        start,
        end,
        enabled: range.enabled,
        label,
    })
}

/// Metrics of a mark's text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
    pub ascent: f32,
}

impl TextMetrics {
    pub fn measure(text: &str, size: f32) -> Self {
        Self {
            width: text_width(text, size),
            height: size,
            ascent: size * 0.8,
        }
    }
}

/// Baseline origin of a mark's label
pub fn mark_text_position(
    orientation: Orientation,
    horizontal: HAlign,
    vertical: VAlign,
    mark_position: f32,
    metrics: TextMetrics,
    width: f32,
    height: f32,
) -> Point {
    match orientation {
        Orientation::Horizontal => {
            let x = match horizontal {
                HAlign::Left => mark_position - metrics.width,
                HAlign::Center => mark_position - metrics.width / 2.0,
                HAlign::Right => mark_position + 0.5,
            };
            let y = match vertical {
                VAlign::Top => metrics.height + 0.5,
                VAlign::Center => (metrics.height + height) / 2.0,
                VAlign::Bottom => height - 0.5,
            };
            Point::new(x, y)
        }
        Orientation::Vertical => {
            let x = match horizontal {
                HAlign::Left => 1.0,
                HAlign::Center => (width - metrics.width) / 2.0,
                HAlign::Right => width - metrics.width,
            };
            let y = match vertical {
                VAlign::Top => mark_position - 1.0,
                VAlign::Center => mark_position + metrics.height / 2.0,
                VAlign::Bottom => mark_position + metrics.ascent,
            };
            Point::new(x, y)
        }
    }
}

/// Status text shown over the overview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caption {
    /// Samples are still being read from the source
    LoadingTrack,
    /// Playable, waveform not yet recognizable
    ReadyToPlay,
    Finalizing,
}

impl Caption {
    pub fn text(self) -> &'static str {
        match self {
            Caption::LoadingTrack => "Loading track ..",
            Caption::ReadyToPlay => "Ready to play, analyzing ..",
            Caption::Finalizing => "Finalizing ..",
        }
    }
}

/// Caption for the current analysis state
pub fn caption_for(progress: AnalyzerProgress, track_loaded: bool) -> Option<Caption> {
    if progress.is_in_progress() {
        if progress <= AnalyzerProgress::HALF {
            Some(if track_loaded {
                Caption::ReadyToPlay
            } else {
                Caption::LoadingTrack
            })
        } else if progress >= AnalyzerProgress::FINALIZING {
            Some(Caption::Finalizing)
        } else {
            // Waveform is recognizable by now
            None
        }
    } else if !track_loaded {
        Some(Caption::LoadingTrack)
    } else {
        None
    }
}

/// Font size that fits `text` into `length`, never below a readable floor
pub fn caption_font_size(text: &str, length: f32, scale_factor: f32) -> f32 {
    let size = CAPTION_FONT_SIZE * scale_factor;
    let width = text_width(text, size);
    if width <= length || width <= 0.0 {
        return size;
    }
    let fitted = size * (length - 5.0 * scale_factor) / width;
    fitted.max(6.0 * scale_factor)
}

/// Caption baseline start before rotation, in unscaled pixels
const CAPTION_ORIGIN: (f32, f32) = (10.0, 12.0);

/// Caption text and placement
///
/// The caption is drawn at `origin` after rotating the frame by `rotation`
/// about `pivot`. Vertical overviews turn it a quarter clockwise about the
/// top-right corner so it reads along the principal axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionLayout {
    pub text: &'static str,
    pub font_size: f32,
    pub origin: Point,
    /// Radians, clockwise on screen
    pub rotation: f32,
    pub pivot: Point,
}

impl CaptionLayout {
    /// Baseline start in widget coordinates
    pub fn screen_origin(&self) -> Point {
        let (sin, cos) = self.rotation.sin_cos();
        Point::new(
            self.pivot.x + self.origin.x * cos - self.origin.y * sin,
            self.pivot.y + self.origin.x * sin + self.origin.y * cos,
        )
    }
}

pub fn caption_layout(
    caption: Caption,
    orientation: Orientation,
    width: f32,
    height: f32,
    scale_factor: f32,
) -> CaptionLayout {
    let text = caption.text();
    let length = orientation.length(width, height);
    let (rotation, pivot) = match orientation {
        Orientation::Horizontal => (0.0, Point::ORIGIN),
        Orientation::Vertical => (std::f32::consts::FRAC_PI_2, Point::new(width, 0.0)),
    };
    CaptionLayout {
        text,
        font_size: caption_font_size(text, length, scale_factor),
        origin: Point::new(CAPTION_ORIGIN.0 * scale_factor, CAPTION_ORIGIN.1 * scale_factor),
        rotation,
        pivot,
    }
}

/// Analyzer progress line: from the progress point to the end of the axis
pub fn progress_line(
    progress: AnalyzerProgress,
    orientation: Orientation,
    width: f32,
    height: f32,
) -> Option<(Point, Point)> {
    if !progress.is_in_progress() || progress <= AnalyzerProgress::NONE {
        return None;
    }
    let p = progress.value() as f32;
    Some(match orientation {
        Orientation::Horizontal => (
            Point::new(width * p, height / 2.0),
            Point::new(width, height / 2.0),
        ),
        Orientation::Vertical => (
            Point::new(width / 2.0, height * p),
            Point::new(width / 2.0, height),
        ),
    })
}
