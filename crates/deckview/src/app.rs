//! Demo application state and iced implementation
//!
//! One deck: a control registry standing in for the playback engine, the
//! overview widget, a synthetic analyzer and a few transport buttons.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use deckview_core::config::save_config;
use deckview_core::{
    AnalyzerEvent, ControlKey, ControlRegistry, Cue, Track, TrackId, DEFAULT_SAMPLE_RATE,
    ENGINE_CHANNEL_COUNT, INVALID_SAMPLE_POSITION,
};
use deckview_widgets::{
    channel_subscription, waveform_overview, OverviewMessage, OverviewSettings, OverviewSkin,
    OverviewWidget,
};
use iced::widget::{button, column, container, row, slider, text, Space};
use iced::{time, Alignment, Element, Length, Subscription, Task, Theme};

use crate::analyzer::DemoAnalyzer;

/// Control group of the demo deck
pub const DECK_GROUP: &str = "[Channel1]";

/// UI refresh while a track is loaded
const TICK: Duration = Duration::from_millis(33);

/// Ticks between starting a load and the deck reporting it loaded
const LOAD_TICKS: u32 = 20;

/// Remaining play time that raises the end-of-track warning
const END_OF_TRACK_WARNING_SECS: f64 = 30.0;

/// Length of generated demo tracks
const DEMO_TRACK_SECS: f64 = 210.0;

/// Summary columns per demo track
const DEMO_SUMMARY_COLUMNS: usize = 1600;

/// Loop length set by the loop button
const LOOP_SECS: f64 = 8.0;

const ANALYZER_STEP_DELAY: Duration = Duration::from_millis(60);

#[derive(Debug, Clone)]
pub enum Message {
    Overview(OverviewMessage),
    Analyzer(AnalyzerEvent),
    Tick,
    LoadDemoTrack,
    TogglePlay,
    ToggleLoop,
    Eject,
    ToggleNormalize,
    GainChanged(f64),
}

pub struct DeckViewApp {
    registry: ControlRegistry,
    overview: OverviewWidget,
    settings: OverviewSettings,
    settings_path: PathBuf,
    analyzer: DemoAnalyzer,
    next_track_id: u64,
    playing: bool,
    loop_enabled: bool,
    /// Countdown until the deck reports the pending load as finished
    pending_load: Option<u32>,
    /// Feedback for a file dragged over the overview
    drop_hint: Option<String>,
}

impl DeckViewApp {
    pub fn new(skin: OverviewSkin, settings: OverviewSettings, settings_path: PathBuf) -> Self {
        let mut registry = ControlRegistry::new();
        // Engine-side controls the skin's loop range binds to
        for item in ["loop_start_position", "loop_end_position"] {
            registry.register(ControlKey::new(DECK_GROUP, item), INVALID_SAMPLE_POSITION);
        }
        registry.register(ControlKey::new(DECK_GROUP, "loop_enabled"), 0.0);

        let overview = OverviewWidget::new(DECK_GROUP, skin, settings.clone(), &mut registry);

        Self {
            registry,
            overview,
            settings,
            settings_path,
            analyzer: DemoAnalyzer::new(ANALYZER_STEP_DELAY),
            next_track_id: 1,
            playing: false,
            loop_enabled: false,
            pending_load: None,
            drop_hint: None,
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let analyzer = channel_subscription(self.analyzer.events()).map(Message::Analyzer);
        if self.overview.track().is_some() {
            Subscription::batch([analyzer, time::every(TICK).map(|_| Message::Tick)])
        } else {
            analyzer
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Overview(message) => self.handle_overview(message),
            Message::Analyzer(event) => {
                // The summary may have been published right before this event
                self.overview.poll_track_events();
                self.overview
                    .on_analyzer_progress(event.track_id, event.progress);
            }
            Message::Tick => self.tick(),
            Message::LoadDemoTrack => {
                let location = PathBuf::from(format!("demo-{}.wav", self.next_track_id));
                self.load_track(location);
            }
            Message::TogglePlay => {
                if self.overview.track().is_some() {
                    self.playing = !self.playing;
                    log::debug!("Deck {}: playing = {}", DECK_GROUP, self.playing);
                }
            }
            Message::ToggleLoop => self.toggle_loop(),
            Message::Eject => self.eject(),
            Message::ToggleNormalize => {
                self.settings.normalize = !self.settings.normalize;
                self.apply_settings();
            }
            Message::GainChanged(gain) => {
                self.settings.visual_gain = gain;
                self.apply_settings();
            }
        }
        Task::none()
    }

    fn handle_overview(&mut self, message: OverviewMessage) {
        match message {
            OverviewMessage::Resized(_)
            | OverviewMessage::Pressed { .. }
            | OverviewMessage::Dragged { .. }
            | OverviewMessage::Released { .. } => {
                if let Some(value) = self.overview.handle_message(&message) {
                    self.overview.controls().play_position.set(value);
                }
            }
            OverviewMessage::FileHovered(path) => {
                // Only the first of several hovered files counts
                if self.drop_hint.is_none() {
                    let name = file_name(&path);
                    self.drop_hint = Some(if self.overview.accepts_drop(&path, self.playing) {
                        format!("Drop to load {}", name)
                    } else {
                        format!("Cannot load {} on this deck", name)
                    });
                }
            }
            OverviewMessage::FileDropped(path) => {
                self.drop_hint = None;
                if self.overview.accepts_drop(&path, self.playing) {
                    self.load_track(path);
                } else {
                    log::warn!("Deck {}: Refusing dropped file {:?}", DECK_GROUP, path);
                }
            }
            OverviewMessage::HoverLeft => self.drop_hint = None,
        }
    }

    /// Write a control the way the engine would and notify the overview
    fn set_control(&mut self, item: &str, value: f64) {
        let key = ControlKey::new(DECK_GROUP, item);
        self.registry.register(key.clone(), value).set(value);
        self.overview.on_control_changed(&key, value);
    }

    fn load_track(&mut self, location: PathBuf) {
        let id = TrackId(self.next_track_id);
        self.next_track_id += 1;

        let track_samples = DEMO_TRACK_SECS * DEFAULT_SAMPLE_RATE as f64 * ENGINE_CHANNEL_COUNT as f64;
        let track = Arc::new(Track::new(id, location));
        track.set_cue_points(demo_cues(track_samples));
        log::info!("Deck {}: Loading {} as track {}", DECK_GROUP, track.title(), id);

        self.playing = false;
        self.loop_enabled = false;
        self.overview.load_track(Some(Arc::clone(&track)));
        self.set_control("playposition", 0.0);
        self.set_control("end_of_track", 0.0);
        self.set_control("track_samplerate", DEFAULT_SAMPLE_RATE as f64);
        self.set_control("track_samples", track_samples);
        self.set_control("loop_start_position", INVALID_SAMPLE_POSITION);
        self.set_control("loop_end_position", INVALID_SAMPLE_POSITION);
        self.set_control("loop_enabled", 0.0);

        self.pending_load = Some(LOAD_TICKS);
        self.analyzer.analyze(track, DEMO_SUMMARY_COLUMNS);
    }

    fn eject(&mut self) {
        self.analyzer.cancel();
        self.playing = false;
        self.loop_enabled = false;
        self.pending_load = None;
        self.overview.unload_track();
        self.set_control("track_samples", 0.0);
        self.set_control("playposition", 0.0);
        self.set_control("loop_start_position", INVALID_SAMPLE_POSITION);
        self.set_control("loop_end_position", INVALID_SAMPLE_POSITION);
    }

    fn toggle_loop(&mut self) {
        let controls = self.overview.controls();
        let track_samples = controls.track_samples.get();
        if track_samples <= 0.0 {
            return;
        }

        if self.loop_enabled {
            self.loop_enabled = false;
            self.set_control("loop_enabled", 0.0);
            return;
        }

        let sample_rate = controls.track_samplerate.get();
        let start = (controls.play_position.get() * track_samples).floor();
        let length = LOOP_SECS * sample_rate * ENGINE_CHANNEL_COUNT as f64;
        let end = (start + length).min(track_samples);
        self.loop_enabled = true;
        self.set_control("loop_start_position", start);
        self.set_control("loop_end_position", end);
        self.set_control("loop_enabled", 1.0);
    }

    fn tick(&mut self) {
        self.overview.poll_track_events();

        if let Some(remaining) = self.pending_load {
            if remaining == 0 {
                self.pending_load = None;
                self.overview.on_track_loaded();
            } else {
                self.pending_load = Some(remaining - 1);
            }
        }

        if !self.playing {
            return;
        }

        let controls = self.overview.controls();
        let track_samples = controls.track_samples.get();
        let sample_rate = controls.track_samplerate.get();
        if track_samples <= 0.0 || sample_rate <= 0.0 {
            return;
        }
        let track_secs = track_samples / sample_rate / ENGINE_CHANNEL_COUNT as f64;
        let mut position =
            controls.play_position.get() + TICK.as_secs_f64() * controls.rate_ratio() / track_secs;

        if self.loop_enabled {
            let loop_start = self.registry_value("loop_start_position");
            let loop_end = self.registry_value("loop_end_position");
            if loop_end > loop_start && position * track_samples >= loop_end {
                position = loop_start / track_samples;
            }
        }
        if position >= 1.0 {
            position = 1.0;
            self.playing = false;
        }

        self.set_control("playposition", position);
        let remaining_secs = (1.0 - position) * track_secs;
        let warning = self.playing && remaining_secs < END_OF_TRACK_WARNING_SECS;
        self.set_control("end_of_track", if warning { 1.0 } else { 0.0 });
    }

    fn registry_value(&self, item: &str) -> f64 {
        self.registry
            .get(&ControlKey::new(DECK_GROUP, item))
            .map(|handle| handle.get())
            .unwrap_or(INVALID_SAMPLE_POSITION)
    }

    fn apply_settings(&mut self) {
        self.overview.set_settings(self.settings.clone());
        if let Err(e) = save_config(&self.settings, &self.settings_path) {
            log::warn!("Failed to save overview settings: {:#}", e);
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let title = self
            .overview
            .track()
            .map(|track| track.title())
            .unwrap_or_else(|| "No track loaded".to_string());
        let status = format!("{:?}", self.overview.status());

        let header = row![
            text(title).size(16),
            Space::new().width(Length::Fill),
            text(status).size(12),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let has_track = self.overview.track().is_some();
        let transport = row![
            button(text("Load demo track")).on_press(Message::LoadDemoTrack),
            button(text(if self.playing { "Pause" } else { "Play" }))
                .on_press_maybe(has_track.then_some(Message::TogglePlay)),
            button(text(if self.loop_enabled { "Exit loop" } else { "Loop" }))
                .on_press_maybe(has_track.then_some(Message::ToggleLoop)),
            button(text("Eject")).on_press_maybe(has_track.then_some(Message::Eject)),
        ]
        .spacing(8);

        let display = row![
            text(format!("Gain {:.1}", self.settings.visual_gain)).size(12),
            slider(1.0..=4.0, self.settings.visual_gain, Message::GainChanged)
                .step(0.1)
                .width(Length::Fixed(160.0)),
            button(text(if self.settings.normalize {
                "Normalize: on"
            } else {
                "Normalize: off"
            }))
            .on_press(Message::ToggleNormalize),
        ]
        .spacing(8)
        .align_y(Alignment::Center);

        let hint = text(self.drop_hint.clone().unwrap_or_default()).size(12);

        container(
            column![
                header,
                waveform_overview(&self.overview, Message::Overview),
                transport,
                display,
                hint,
            ]
            .spacing(10),
        )
        .padding(16)
        .into()
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Cue list of a generated track: main cue plus four colored hotcues
fn demo_cues(track_samples: f64) -> Vec<Cue> {
    let at = |fraction: f64| (track_samples * fraction).floor();
    vec![
        Cue::main_cue(at(0.05)),
        Cue::hotcue(0, at(0.125)).with_label("Intro"),
        Cue::hotcue(1, at(0.375)).with_label("Drop"),
        Cue::hotcue(2, at(0.625)),
        Cue::hotcue(3, at(0.875)).with_label("Outro"),
    ]
}
