//! Overview widget state
//!
//! `OverviewWidget` owns everything the overview needs between paints: the
//! current track, the incrementally drawn waveform bitmap, the scaled display
//! image, marks, mark ranges and the playhead. Host applications call the
//! `on_*` handlers when a collaborator changes and hand the widget to
//! [`waveform_overview`](super::waveform_overview) for display.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use deckview_core::track::TrackEvent;
use deckview_core::{
    AnalyzerProgress, ControlHandle, ControlKey, ControlRegistry, TrackId, TrackPointer,
    WaveformSummary,
};
use iced::widget::image::Handle;
use iced::{Color, Point};

use super::canvas::OverviewMessage;
use super::drop::accept_track_drop;
use super::image::{diff_gain, scale_waveform, WaveformImage};
use super::layout::{
    caption_for, caption_layout, layout_mark_range, mark_text_position, progress_line,
    rate_ratio, CaptionLayout, DurationContext, RangeLayout, SampleScale, TextMetrics,
    MARKER_FONT_SIZE,
};
use super::mapping::{Orientation, PositionMapping};
use super::mark::MarkSource;
use super::settings::OverviewSettings;
use super::skin::{OverviewSkin, SignalColors};

/// Default overview height in pixels
pub const OVERVIEW_HEIGHT: f32 = 48.0;

/// Lifecycle of the displayed track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewStatus {
    /// No track
    Empty,
    /// Track set, nothing drawn yet
    Loading,
    /// Waveform partially drawn
    Rendering,
    /// Waveform complete
    Ready,
}

/// Playback controls the overview reads or reacts to
#[derive(Debug, Clone)]
pub struct OverviewControls {
    pub play_position: ControlHandle,
    pub end_of_track: ControlHandle,
    pub rate: ControlHandle,
    pub rate_range: ControlHandle,
    pub rate_dir: ControlHandle,
    pub track_samplerate: ControlHandle,
    pub track_samples: ControlHandle,
}

impl OverviewControls {
    /// Resolve the deck's controls, registering any the engine has not
    pub fn resolve(registry: &mut ControlRegistry, group: &str) -> Self {
        let mut control = |item: &str, default: f64| registry.register(ControlKey::new(group, item), default);
        Self {
            play_position: control("playposition", 0.0),
            end_of_track: control("end_of_track", 0.0),
            rate: control("rate", 0.0),
            rate_range: control("rateRange", 0.08),
            rate_dir: control("rate_dir", 1.0),
            track_samplerate: control("track_samplerate", 0.0),
            track_samples: control("track_samples", 0.0),
        }
    }

    /// Current speed relative to the track's native tempo
    pub fn rate_ratio(&self) -> f64 {
        rate_ratio(self.rate_dir.get(), self.rate_range.get(), self.rate.get())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScaleKey {
    diff_gain: i32,
    width: u32,
    height: u32,
    generation: u64,
}

#[derive(Debug, Clone)]
struct ScaledWaveform {
    key: ScaleKey,
    handle: Handle,
}

/// A mark range ready to paint
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRender {
    pub layout: RangeLayout,
    pub color: Color,
    pub text_color: Color,
}

/// A mark ready to paint
#[derive(Debug, Clone, PartialEq)]
pub struct MarkRender {
    /// Pixel along the principal axis
    pub position: f32,
    pub fill_color: Color,
    pub border_color: Color,
    pub text_color: Color,
    pub text: String,
    pub text_origin: Point,
    pub font_size: f32,
}

/// Snapshot of everything one paint needs
#[derive(Debug, Clone)]
pub struct RenderState {
    pub width: f32,
    pub height: f32,
    pub orientation: Orientation,
    pub scale_factor: f32,
    pub background_color: Color,
    pub background_image: Option<Handle>,
    /// Everything past the background needs a track
    pub has_track: bool,
    pub end_of_track: bool,
    pub end_of_track_color: Color,
    pub signal_colors: SignalColors,
    /// Cropped and scaled waveform, `None` while there is nothing to show
    pub waveform: Option<Handle>,
    pub diff_gain: i32,
    pub analyzer_progress: AnalyzerProgress,
    pub progress_line: Option<(Point, Point)>,
    pub caption: Option<CaptionLayout>,
    pub ranges: Vec<RangeRender>,
    pub marks: Vec<MarkRender>,
    pub play_pixel: i32,
    /// Marks, ranges and playhead need a loaded track of known length
    pub show_overlays: bool,
}

/// Waveform overview of one deck
pub struct OverviewWidget {
    group: String,
    skin: OverviewSkin,
    settings: OverviewSettings,
    controls: OverviewControls,

    track: Option<TrackPointer>,
    track_events: Option<Receiver<TrackEvent>>,
    summary: Option<Arc<WaveformSummary>>,
    source: Option<WaveformImage>,
    /// Bumped whenever the source image content changes
    source_generation: u64,
    scaled: Option<ScaledWaveform>,
    diff_gain: i32,

    analyzer_progress: AnalyzerProgress,
    track_loaded: bool,
    end_of_track: bool,

    dragging: bool,
    play_value: f64,
    play_pixel: i32,
    mapping: PositionMapping,
    width: f32,
    height: f32,

    /// Number of load/unload transitions seen
    load_generation: u64,
}

impl OverviewWidget {
    pub fn new(
        group: impl Into<String>,
        skin: OverviewSkin,
        settings: OverviewSettings,
        registry: &mut ControlRegistry,
    ) -> Self {
        let group = group.into();
        let controls = OverviewControls::resolve(registry, &group);
        let end_of_track = controls.end_of_track.get() > 0.0;
        let play_value = controls.play_position.get();

        let mut widget = Self {
            group,
            skin,
            settings,
            controls,
            track: None,
            track_events: None,
            summary: None,
            source: None,
            source_generation: 0,
            scaled: None,
            diff_gain: 0,
            analyzer_progress: AnalyzerProgress::UNKNOWN,
            track_loaded: false,
            end_of_track,
            dragging: false,
            play_value,
            play_pixel: 0,
            mapping: PositionMapping::default(),
            width: 0.0,
            height: 0.0,
            load_generation: 0,
        };

        // Pick up values bound controls already hold
        let mut keys: Vec<ControlKey> = Vec::new();
        for range in &widget.skin.mark_ranges {
            keys.push(range.controls.start.clone());
            keys.push(range.controls.end.clone());
            keys.extend(range.controls.enabled.clone());
            keys.extend(range.controls.visible.clone());
        }
        for mark in widget.skin.marks.iter() {
            if let MarkSource::Control(key) = &mark.source {
                keys.push(key.clone());
            }
            keys.extend(mark.visible_control.clone());
        }
        for key in keys {
            if let Ok(handle) = registry.get(&key) {
                widget.apply_bound_control(&key, handle.get());
            }
        }

        log::debug!(
            "OverviewWidget {}: {} marks, {} mark ranges",
            widget.group,
            widget.skin.marks.len(),
            widget.skin.mark_ranges.len()
        );
        widget
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn skin(&self) -> &OverviewSkin {
        &self.skin
    }

    pub fn controls(&self) -> &OverviewControls {
        &self.controls
    }

    pub fn settings(&self) -> &OverviewSettings {
        &self.settings
    }

    /// Replace the rendering settings (gain and normalization may change the image)
    pub fn set_settings(&mut self, settings: OverviewSettings) {
        self.settings = settings;
        self.refresh_scaled();
    }

    pub fn track(&self) -> Option<&TrackPointer> {
        self.track.as_ref()
    }

    pub fn track_id(&self) -> Option<TrackId> {
        self.track.as_ref().map(|t| t.id())
    }

    pub fn analyzer_progress(&self) -> AnalyzerProgress {
        self.analyzer_progress
    }

    pub fn is_track_loaded(&self) -> bool {
        self.track_loaded
    }

    pub fn is_end_of_track(&self) -> bool {
        self.end_of_track
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn play_pixel(&self) -> i32 {
        self.play_pixel
    }

    pub fn mapping(&self) -> &PositionMapping {
        &self.mapping
    }

    pub fn diff_gain(&self) -> i32 {
        self.diff_gain
    }

    pub fn waveform_peak(&self) -> i32 {
        self.source.as_ref().map_or(-1, |s| s.peak())
    }

    /// Scaled display image, if one is cached
    pub fn scaled_waveform(&self) -> Option<&Handle> {
        self.scaled.as_ref().map(|s| &s.handle)
    }

    pub fn load_generation(&self) -> u64 {
        self.load_generation
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn status(&self) -> OverviewStatus {
        if self.track.is_none() {
            return OverviewStatus::Empty;
        }
        match &self.source {
            Some(source) if source.is_done() => OverviewStatus::Ready,
            Some(source) if source.has_content() => OverviewStatus::Rendering,
            _ => OverviewStatus::Loading,
        }
    }

    // ---------------------------------------------------------------------
    // Track lifecycle
    // ---------------------------------------------------------------------

    /// The deck started loading `track` (or was emptied with `None`)
    pub fn load_track(&mut self, track: Option<TrackPointer>) {
        self.summary = None;
        self.reset_waveform();
        self.track_loaded = false;
        self.end_of_track = false;
        self.skin.marks.clear_cue_positions();
        self.load_generation += 1;

        match track {
            Some(track) => {
                log::info!("OverviewWidget {}: Loading track {}", self.group, track.id());
                self.track_events = Some(track.subscribe());
                self.track = Some(track);
                self.on_waveform_updated();
            }
            None => {
                log::debug!("OverviewWidget {}: Track unloaded", self.group);
                self.track = None;
                self.track_events = None;
            }
        }
        self.refresh_scaled();
    }

    pub fn unload_track(&mut self) {
        self.load_track(None);
    }

    /// The deck finished loading samples for the current track
    pub fn on_track_loaded(&mut self) {
        self.track_loaded = true;
        self.on_cues_updated();
    }

    /// The track published a new (or cleared) waveform summary
    pub fn on_waveform_updated(&mut self) {
        let Some(track) = &self.track else {
            return;
        };

        match track.waveform_summary() {
            Some(summary) => {
                let replaced = self
                    .summary
                    .as_ref()
                    .map_or(true, |current| !Arc::ptr_eq(current, &summary));
                if replaced {
                    self.source = WaveformImage::new(&summary);
                    self.bump_source();
                }
                self.summary = Some(summary);

                let complete = self.summary.as_ref().is_some_and(|s| s.is_complete());
                if complete {
                    if let Some(source) = &mut self.source {
                        source.restart();
                    }
                    self.draw_next_part();
                }
            }
            None => {
                // Waveform was cleared
                self.summary = None;
                self.reset_waveform();
            }
        }
        self.refresh_scaled();
    }

    /// Analyzer progress for `track_id`; stale ids are ignored
    pub fn on_analyzer_progress(&mut self, track_id: TrackId, progress: AnalyzerProgress) -> bool {
        if self.track_id() != Some(track_id) {
            return false;
        }
        let drawn = self.draw_next_part();
        let changed = self.analyzer_progress != progress;
        self.analyzer_progress = progress;
        if drawn {
            self.refresh_scaled();
        }
        drawn || changed
    }

    /// Re-apply the track's cue list to the marks
    pub fn on_cues_updated(&mut self) {
        if let Some(track) = &self.track {
            let cues = track.cue_points();
            self.skin.marks.update_from_cues(&cues, &self.skin.cue_colors);
        }
    }

    /// Drain notifications the current track queued since the last call
    pub fn poll_track_events(&mut self) -> bool {
        let events: Vec<TrackEvent> = match &self.track_events {
            Some(receiver) => receiver.try_iter().collect(),
            None => return false,
        };
        let mut waveform = false;
        let mut cues = false;
        for event in &events {
            match event {
                TrackEvent::WaveformSummaryUpdated => waveform = true,
                TrackEvent::CuesUpdated => cues = true,
            }
        }
        if waveform {
            self.on_waveform_updated();
        }
        if cues {
            self.on_cues_updated();
        }
        waveform || cues
    }

    // ---------------------------------------------------------------------
    // Controls
    // ---------------------------------------------------------------------

    /// A control changed value. Returns whether the overview needs a repaint.
    pub fn on_control_changed(&mut self, key: &ControlKey, value: f64) -> bool {
        if key == self.controls.play_position.key() {
            return self.on_play_position_changed(value);
        }
        if key == self.controls.end_of_track.key() {
            let end_of_track = value > 0.0;
            let changed = end_of_track != self.end_of_track;
            self.end_of_track = end_of_track;
            return changed;
        }

        // Rate family and track length are read while painting
        let read_at_paint = [
            &self.controls.rate,
            &self.controls.rate_range,
            &self.controls.rate_dir,
            &self.controls.track_samplerate,
            &self.controls.track_samples,
        ]
        .iter()
        .any(|handle| handle.key() == key);

        self.apply_bound_control(key, value) || read_at_paint
    }

    fn apply_bound_control(&mut self, key: &ControlKey, value: f64) -> bool {
        let mut changed = self.skin.marks.on_control_changed(key, value);
        for range in &mut self.skin.mark_ranges {
            changed |= range.on_control_changed(key, value);
        }
        changed
    }

    /// Externally driven play position (ignored while the user drags)
    pub fn on_play_position_changed(&mut self, value: f64) -> bool {
        if self.dragging {
            return false;
        }
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        self.play_value = value;
        let pixel = self.mapping.value_to_position(value);
        let changed = pixel != self.play_pixel;
        self.play_pixel = pixel;
        changed
    }

    // ---------------------------------------------------------------------
    // Geometry and input
    // ---------------------------------------------------------------------

    pub fn resize(&mut self, width: f32, height: f32) {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;

        let length = self.skin.orientation.length(width, height);
        self.mapping.resize(length.round() as i32);
        self.play_pixel = if self.dragging {
            self.mapping.clamp_pixel(self.play_pixel)
        } else {
            self.mapping.value_to_position(self.play_value)
        };

        // Postponed parts may be visible at the new size
        self.draw_next_part();
        self.refresh_scaled();
    }

    fn pointer_pixel(&self, point: Point) -> i32 {
        let along = match self.skin.orientation {
            Orientation::Horizontal => point.x,
            Orientation::Vertical => point.y,
        };
        let along = if along.is_finite() { along } else { 0.0 };
        self.mapping.clamp_pixel(along.floor() as i32)
    }

    /// Start a seek drag at `point`
    pub fn mouse_press(&mut self, point: Point) {
        self.play_pixel = self.pointer_pixel(point);
        self.dragging = true;
    }

    /// Move the drag preview; no effect without a prior press
    pub fn mouse_move(&mut self, point: Point) {
        if self.dragging {
            self.play_pixel = self.pointer_pixel(point);
        }
    }

    /// Finish the drag and return the seek value to commit
    pub fn mouse_release(&mut self, point: Point) -> Option<f64> {
        if !self.dragging {
            return None;
        }
        self.play_pixel = self.pointer_pixel(point);
        self.dragging = false;
        let value = self.mapping.position_to_value(self.play_pixel);
        self.play_value = value;
        log::debug!("OverviewWidget {}: Seek to {:.4}", self.group, value);
        Some(value)
    }

    /// Apply a pointer or geometry message from the canvas
    ///
    /// The widget takes the message's canvas size first, so a press or
    /// release that arrives together with a resize maps against the new
    /// geometry. Returns the seek value when a drag is released. File
    /// messages are left to the host.
    pub fn handle_message(&mut self, message: &OverviewMessage) -> Option<f64> {
        if let Some(size) = message.size() {
            self.resize(size.width, size.height);
        }
        match message {
            OverviewMessage::Pressed { position, .. } => {
                self.mouse_press(*position);
                None
            }
            OverviewMessage::Dragged { position, .. } => {
                self.mouse_move(*position);
                None
            }
            OverviewMessage::Released { position, .. } => self.mouse_release(*position),
            OverviewMessage::Resized(_)
            | OverviewMessage::FileHovered(_)
            | OverviewMessage::FileDropped(_)
            | OverviewMessage::HoverLeft => None,
        }
    }

    /// Whether a file dragged over the widget may be dropped here
    pub fn accepts_drop(&self, path: &std::path::Path, deck_playing: bool) -> bool {
        accept_track_drop(path, deck_playing, &self.settings)
    }

    // ---------------------------------------------------------------------
    // Waveform image
    // ---------------------------------------------------------------------

    fn reset_waveform(&mut self) {
        self.source = None;
        self.analyzer_progress = AnalyzerProgress::UNKNOWN;
        self.diff_gain = 0;
        self.scaled = None;
        self.bump_source();
    }

    fn bump_source(&mut self) {
        self.source_generation = self.source_generation.wrapping_add(1);
    }

    fn draw_next_part(&mut self) -> bool {
        let Some(summary) = &self.summary else {
            return false;
        };
        if self.source.is_none() {
            self.source = WaveformImage::new(summary);
        }
        let Some(source) = &mut self.source else {
            return false;
        };

        let length = self.mapping.length().max(0) as u32;
        let drawn = source.draw_next_part(summary, &self.skin.signal_colors, length);
        if drawn {
            self.bump_source();
        }
        drawn
    }

    fn refresh_scaled(&mut self) {
        let Some(source) = self.source.as_ref().filter(|s| s.has_content()) else {
            self.scaled = None;
            self.diff_gain = 0;
            return;
        };

        let diff_gain = diff_gain(
            self.settings.normalize,
            source.is_done(),
            source.peak(),
            self.settings.visual_gain,
        );
        self.diff_gain = diff_gain;

        let key = ScaleKey {
            diff_gain,
            width: self.width.round() as u32,
            height: self.height.round() as u32,
            generation: self.source_generation,
        };
        if self.scaled.as_ref().is_some_and(|s| s.key == key) {
            return;
        }

        self.scaled = scale_waveform(
            source.image(),
            diff_gain,
            self.skin.orientation,
            key.width,
            key.height,
        )
        .map(|image| {
            let (width, height) = image.dimensions();
            ScaledWaveform {
                key,
                handle: Handle::from_rgba(width, height, image.into_raw()),
            }
        });
    }

    // ---------------------------------------------------------------------
    // Paint snapshot
    // ---------------------------------------------------------------------

    /// Everything the canvas needs for one paint
    pub fn render_state(&self) -> RenderState {
        let orientation = self.skin.orientation;
        let scale_factor = self.settings.scale_factor;
        let length = orientation.length(self.width, self.height);

        let caption = caption_for(self.analyzer_progress, self.track_loaded)
            .filter(|_| self.track.is_some())
            .map(|caption| caption_layout(caption, orientation, self.width, self.height, scale_factor));

        let track_samples = self.controls.track_samples.get();
        let scale = if self.track_loaded {
            SampleScale::new(length, track_samples)
        } else {
            None
        };

        let mut ranges = Vec::new();
        let mut marks = Vec::new();
        if let Some(scale) = scale {
            let duration = DurationContext {
                sample_rate: self.controls.track_samplerate.get(),
                rate_ratio: self.controls.rate_ratio(),
                font_size: MARKER_FONT_SIZE * scale_factor,
            };
            for range in &self.skin.mark_ranges {
                if let Some(layout) = layout_mark_range(range, scale, length, duration) {
                    let color = if layout.enabled {
                        range.active_color
                    } else {
                        range.disabled_color
                    };
                    ranges.push(RangeRender {
                        layout,
                        color,
                        text_color: range.duration_text_color,
                    });
                }
            }

            let font_size = MARKER_FONT_SIZE * scale_factor;
            for mark in self.skin.marks.iter().filter(|m| m.is_drawable()) {
                let position = scale.to_pixel(mark.sample_position);
                if position < 0.0 || position > length {
                    continue;
                }
                let properties = &mark.properties;
                let metrics = TextMetrics::measure(&properties.text, font_size);
                marks.push(MarkRender {
                    position,
                    fill_color: properties.fill_color,
                    border_color: properties.border_color,
                    text_color: properties.text_color,
                    text: properties.text.clone(),
                    text_origin: mark_text_position(
                        orientation,
                        properties.align.horizontal,
                        properties.align.vertical,
                        position,
                        metrics,
                        self.width,
                        self.height,
                    ),
                    font_size,
                });
            }
        }

        RenderState {
            width: self.width,
            height: self.height,
            orientation,
            scale_factor,
            background_color: self.skin.background_color,
            background_image: self.skin.background_image.clone(),
            has_track: self.track.is_some(),
            end_of_track: self.end_of_track,
            end_of_track_color: self.skin.end_of_track_color,
            signal_colors: self.skin.signal_colors,
            waveform: self.scaled_waveform().cloned(),
            diff_gain: self.diff_gain,
            analyzer_progress: self.analyzer_progress,
            progress_line: progress_line(self.analyzer_progress, orientation, self.width, self.height),
            caption,
            ranges,
            marks,
            play_pixel: self.play_pixel,
            show_overlays: scale.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckview_core::{Cue, Track, WaveformData};

    fn widget() -> (OverviewWidget, ControlRegistry) {
        let mut registry = ControlRegistry::new();
        let widget = OverviewWidget::new(
            "[Channel1]",
            OverviewSkin::default(),
            OverviewSettings::default(),
            &mut registry,
        );
        (widget, registry)
    }

    fn track_with_summary(id: u64, columns: usize, complete: bool) -> TrackPointer {
        let track = Arc::new(Track::new(TrackId(id), format!("/music/{}.flac", id)));
        let summary = WaveformSummary::new(columns);
        for i in 0..columns * 2 {
            summary.write(i, WaveformData::new(80, 40, 20, 100));
        }
        summary.set_completion(if complete { columns * 2 } else { 0 });
        track.set_waveform_summary(Some(Arc::new(summary)));
        track
    }

    #[test]
    fn test_new_widget_is_empty() {
        let (widget, registry) = widget();
        assert_eq!(widget.status(), OverviewStatus::Empty);
        assert_eq!(widget.analyzer_progress(), AnalyzerProgress::UNKNOWN);
        assert!(registry.get(&ControlKey::new("[Channel1]", "track_samples")).is_ok());
    }

    #[test]
    fn test_complete_summary_is_ready_on_load() {
        let (mut widget, _registry) = widget();
        widget.resize(200.0, 40.0);
        widget.load_track(Some(track_with_summary(1, 100, true)));
        assert_eq!(widget.status(), OverviewStatus::Ready);
        assert_eq!(widget.waveform_peak(), 100);
        assert!(widget.scaled_waveform().is_some());
        // Normalized to the peak
        assert_eq!(widget.diff_gain(), 154);
    }

    #[test]
    fn test_incomplete_summary_renders_with_progress() {
        let (mut widget, _registry) = widget();
        widget.resize(200.0, 40.0);
        let track = track_with_summary(1, 100, false);
        widget.load_track(Some(track.clone()));
        assert_eq!(widget.status(), OverviewStatus::Loading);

        if let Some(summary) = track.waveform_summary() {
            summary.set_completion(100);
        }
        assert!(widget.on_analyzer_progress(TrackId(1), AnalyzerProgress::HALF));
        assert_eq!(widget.status(), OverviewStatus::Rendering);
        assert_eq!(widget.diff_gain(), 0, "Unfinished image uses visual gain");

        if let Some(summary) = track.waveform_summary() {
            summary.set_completion(200);
        }
        widget.on_analyzer_progress(TrackId(1), AnalyzerProgress::DONE);
        assert_eq!(widget.status(), OverviewStatus::Ready);
    }

    #[test]
    fn test_cleared_waveform_resets() {
        let (mut widget, _registry) = widget();
        widget.resize(200.0, 40.0);
        let track = track_with_summary(1, 100, true);
        widget.load_track(Some(track.clone()));
        widget.on_analyzer_progress(TrackId(1), AnalyzerProgress::HALF);

        track.set_waveform_summary(None);
        assert!(widget.poll_track_events());
        assert_eq!(widget.status(), OverviewStatus::Loading);
        assert_eq!(widget.analyzer_progress(), AnalyzerProgress::UNKNOWN);
        assert_eq!(widget.waveform_peak(), -1);
        assert!(widget.scaled_waveform().is_none());
    }

    #[test]
    fn test_end_of_track_control() {
        let (mut widget, _registry) = widget();
        let key = ControlKey::new("[Channel1]", "end_of_track");
        assert!(widget.on_control_changed(&key, 1.0));
        assert!(widget.is_end_of_track());
        assert!(!widget.on_control_changed(&key, 1.0), "Unchanged flag");
        widget.load_track(None);
        assert!(!widget.is_end_of_track(), "Loading resets the flag");
    }

    #[test]
    fn test_loop_range_follows_controls() {
        let (mut widget, _registry) = widget();
        let start = ControlKey::new("[Channel1]", "loop_start_position");
        let end = ControlKey::new("[Channel1]", "loop_end_position");
        assert!(widget.on_control_changed(&start, 1000.0));
        assert!(widget.on_control_changed(&end, 5000.0));
        let range = &widget.skin().mark_ranges[0];
        assert!(range.active());
        assert_eq!((range.start, range.end), (1000.0, 5000.0));
    }

    #[test]
    fn test_rate_change_requests_repaint() {
        let (mut widget, _registry) = widget();
        assert!(widget.on_control_changed(&ControlKey::new("[Channel1]", "rate"), 0.5));
        assert!(!widget.on_control_changed(&ControlKey::new("[Channel2]", "rate"), 0.5));
    }

    #[test]
    fn test_track_loaded_applies_cue_colors() {
        let (mut widget, _registry) = widget();
        let track = track_with_summary(1, 10, true);
        let color = deckview_core::RgbColor::new(0, 0, 255);
        track.set_cue_points(vec![Cue::hotcue(2, 4410.0).with_color(color), Cue::main_cue(100.0)]);
        widget.load_track(Some(track));
        widget.on_track_loaded();

        let mark = widget.skin().marks.hotcue_mark(2).unwrap();
        assert_eq!(mark.sample_position, 4410.0);
        assert_eq!(mark.properties.fill_color, Color::from_rgb8(0, 0, 255));
    }

    #[test]
    fn test_overlays_need_track_length() {
        let (mut widget, mut registry) = widget();
        widget.resize(300.0, 40.0);
        widget.load_track(Some(track_with_summary(1, 10, true)));
        widget.on_track_loaded();
        assert!(!widget.render_state().show_overlays);

        let samples = registry.register(ControlKey::new("[Channel1]", "track_samples"), 0.0);
        samples.set(441_000.0);
        assert!(widget.render_state().show_overlays);
    }

    #[test]
    fn test_end_of_track_border_needs_track() {
        let (mut widget, _registry) = widget();
        widget.resize(300.0, 40.0);
        widget.on_control_changed(&ControlKey::new("[Channel1]", "end_of_track"), 1.0);
        let state = widget.render_state();
        assert!(state.end_of_track);
        assert!(!state.has_track, "Empty deck paints the background only");

        widget.load_track(Some(track_with_summary(1, 10, true)));
        assert!(widget.render_state().has_track);
    }

    #[test]
    fn test_caption_while_loading() {
        let (mut widget, _registry) = widget();
        widget.resize(400.0, 40.0);
        assert!(widget.render_state().caption.is_none(), "No caption without track");
        widget.load_track(Some(track_with_summary(1, 10, false)));
        let caption = widget.render_state().caption.unwrap();
        assert_eq!(caption.text, "Loading track ..");
        widget.on_track_loaded();
        widget.on_analyzer_progress(TrackId(1), AnalyzerProgress(0.2));
        let caption = widget.render_state().caption.unwrap();
        assert_eq!(caption.text, "Ready to play, analyzing ..");
    }
}
