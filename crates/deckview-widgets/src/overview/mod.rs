//! Waveform overview of a whole track
//!
//! The overview shows the complete waveform of the loaded track at widget
//! size, the playhead, cue marks, mark ranges such as the active loop, and
//! the analyzer's progress while the waveform is still being computed.
//! Clicking or dragging seeks; the seek is committed on release.
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State**: [`OverviewWidget`] holds the track, bitmaps and overlays and
//!   exposes one handler per collaborator notification
//! - **View function**: [`waveform_overview`] takes the widget and a message
//!   wrapper and returns an `Element`
//! - **Canvas program**: turns mouse and file events into
//!   [`OverviewMessage`]s and paints a [`RenderState`]
//!
//! ## Usage
//!
//! ```ignore
//! match message {
//!     Message::Overview(OverviewMessage::FileDropped(path)) => self.load(path),
//!     Message::Overview(message) => {
//!         if let Some(value) = self.overview.handle_message(&message) {
//!             self.controls.play_position.set(value);
//!         }
//!     }
//!     _ => {}
//! }
//! ```

mod canvas;
mod drop;
mod image;
mod layout;
mod mapping;
mod mark;
mod settings;
mod skin;
mod state;
mod view;

pub use canvas::{OverviewInteraction, OverviewMessage};
pub use drop::{accept_track_drop, is_supported_audio_file, SUPPORTED_EXTENSIONS};
pub use image::{diff_gain, scale_waveform, WaveformImage, SOURCE_CENTER, SOURCE_HEIGHT};
pub use layout::{
    caption_for, caption_font_size, caption_layout, layout_mark_range, mark_text_position,
    progress_line, range_duration_seconds, rate_ratio, text_width, Caption, CaptionLayout,
    DurationContext, DurationLabel, RangeLayout, SampleScale, TextMetrics, CAPTION_FONT_SIZE, MARKER_FONT_SIZE,
};
pub use mapping::{Orientation, PositionMapping};
pub use mark::{
    Alignment, CueColorRepresentation, DurationTextLocation, HAlign, Mark, MarkProperties,
    MarkRange, MarkRangeControls, MarkSet, MarkSource, VAlign,
};
pub use settings::{OverviewSettings, SETTINGS_FILE};
pub use skin::{
    load_background_image, load_skin, MarkConfig, MarkRangeConfig, MarkSourceConfig,
    OverviewSkin, SignalColors, SignalColorsConfig, SkinConfig, SkinError,
};
pub use state::{
    MarkRender, OverviewControls, OverviewStatus, OverviewWidget, RangeRender, RenderState,
    OVERVIEW_HEIGHT,
};
pub use view::waveform_overview;
