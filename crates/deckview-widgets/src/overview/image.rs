//! Overview waveform bitmap
//!
//! The source image is one pixel column per stereo summary column and
//! `2 * 255` rows, with the zero line at row 255: left channel amplitudes
//! grow upwards, right channel downwards. It is drawn incrementally as the
//! analyzer completes more of the summary.
//!
//! Before display the image is cropped vertically by the display gain,
//! transposed for vertical overviews and scaled to the widget size.

use deckview_core::{WaveformData, WaveformSummary};
use iced::Color;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::mapping::Orientation;
use super::skin::SignalColors;

/// Row of the zero line
pub const SOURCE_CENTER: u32 = 255;

/// Height of the source image
pub const SOURCE_HEIGHT: u32 = 2 * SOURCE_CENTER;

/// Incrementally drawn source image of one track
#[derive(Debug, Clone)]
pub struct WaveformImage {
    image: RgbaImage,
    /// Summary entries already drawn
    actual_completion: usize,
    /// Highest unfiltered amplitude seen so far, -1 before any data
    peak: i32,
    done: bool,
}

impl WaveformImage {
    /// Allocate a transparent image sized for `summary`
    ///
    /// Returns `None` for an empty summary.
    pub fn new(summary: &WaveformSummary) -> Option<Self> {
        let data_size = summary.data_size();
        if data_size < 2 {
            return None;
        }
        Some(Self {
            image: RgbaImage::new((data_size / 2) as u32, SOURCE_HEIGHT),
            actual_completion: 0,
            peak: -1,
            done: false,
        })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn actual_completion(&self) -> usize {
        self.actual_completion
    }

    pub fn peak(&self) -> i32 {
        self.peak
    }

    /// Every summary entry has been drawn
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Anything has been drawn yet
    pub fn has_content(&self) -> bool {
        self.actual_completion > 0
    }

    /// Restart drawing from the first column
    pub fn restart(&mut self) {
        self.actual_completion = 0;
        self.peak = -1;
        self.done = false;
    }

    /// Draw the summary columns completed since the last call.
    ///
    /// `length` is the widget's principal length: increments too small to
    /// move a single widget pixel are postponed until the summary is
    /// complete. Returns whether anything was drawn.
    pub fn draw_next_part(
        &mut self,
        summary: &WaveformSummary,
        colors: &SignalColors,
        length: u32,
    ) -> bool {
        let data = summary.read();
        let data_size = data.len();
        if data_size < 2 || self.done {
            return false;
        }

        let completion = summary.completion().min(data_size);
        // Only whole stereo columns
        let completion = completion - completion % 2;
        if completion <= self.actual_completion {
            return false;
        }

        let increment = completion - self.actual_completion;
        let visible_increment = increment * length as usize / data_size;
        let finishing = completion >= data_size;
        if increment < 2 || (visible_increment == 0 && !finishing) {
            return false;
        }

        let low = to_rgba(colors.low);
        let mid = to_rgba(colors.mid);
        let high = to_rgba(colors.high);

        for index in (self.actual_completion..completion).step_by(2) {
            let column = (index / 2) as u32;
            let left = data[index];
            let right = data[index + 1];

            // Painter's order: wide low band first, high band on top
            self.draw_column(column, left.low, right.low, low);
            self.draw_column(column, left.mid, right.mid, mid);
            self.draw_column(column, left.high, right.high, high);

            self.peak = self.peak.max(column_peak(left, right));
        }

        self.actual_completion = completion;
        if self.actual_completion >= data_size {
            self.done = true;
        }
        true
    }

    fn draw_column(&mut self, x: u32, up: u8, down: u8, color: Rgba<u8>) {
        if up == 0 && down == 0 {
            return;
        }
        let top = SOURCE_CENTER.saturating_sub(up as u32);
        let bottom = (SOURCE_CENTER + down as u32).min(SOURCE_HEIGHT - 1);
        for y in top..=bottom {
            self.image.put_pixel(x, y, color);
        }
    }
}

fn column_peak(left: WaveformData, right: WaveformData) -> i32 {
    left.all.max(right.all) as i32
}

fn to_rgba(color: Color) -> Rgba<u8> {
    Rgba(color.into_rgba8())
}

/// Rows cropped from the top and bottom of the source image
///
/// Normalized mode with a finished image and a real peak crops to the peak;
/// otherwise the configured visual gain decides.
pub fn diff_gain(normalize: bool, done: bool, peak: i32, visual_gain: f64) -> i32 {
    let gain = if normalize && done && peak > 1 {
        255 - peak - 1
    } else {
        let visual_gain = if visual_gain.is_finite() && visual_gain > 0.0 {
            visual_gain
        } else {
            1.0
        };
        (255.0 - 255.0 / visual_gain) as i32
    };
    gain.clamp(0, SOURCE_CENTER as i32 - 1)
}

/// Crop, orient and scale the source image for display.
///
/// Returns `None` when there is nothing to show (empty crop or a zero-sized
/// target).
pub fn scale_waveform(
    source: &RgbaImage,
    diff_gain: i32,
    orientation: Orientation,
    width: u32,
    height: u32,
) -> Option<RgbaImage> {
    if width == 0 || height == 0 || source.width() == 0 {
        return None;
    }

    let crop_top = diff_gain.max(0) as u32;
    let crop_height = source.height().checked_sub(2 * crop_top)?;
    if crop_height == 0 {
        return None;
    }

    let cropped = imageops::crop_imm(source, 0, crop_top, source.width(), crop_height).to_image();
    let oriented = match orientation {
        Orientation::Horizontal => cropped,
        Orientation::Vertical => transpose(&cropped),
    };

    Some(imageops::resize(&oriented, width, height, FilterType::Triangle))
}

/// Swap rows and columns
fn transpose(image: &RgbaImage) -> RgbaImage {
    RgbaImage::from_fn(image.height(), image.width(), |x, y| *image.get_pixel(y, x))
}
