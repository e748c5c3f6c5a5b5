//! Track: the loaded audio file as seen by the overview
//!
//! A track is shared between the UI and the analyzer worker, so its mutable
//! parts sit behind locks. Observers call [`Track::subscribe`] and receive a
//! [`TrackEvent`] whenever the waveform summary or the cue list changes;
//! dropping the receiver unsubscribes.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, RwLock};

use crate::cue::Cue;
use crate::types::TrackId;
use crate::waveform::WaveformSummary;

/// Shared handle to a track
pub type TrackPointer = Arc<Track>;

/// Change notifications emitted by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEvent {
    /// The waveform summary was replaced, grew or was cleared
    WaveformSummaryUpdated,
    /// The cue list changed
    CuesUpdated,
}

#[derive(Debug)]
pub struct Track {
    id: TrackId,
    location: PathBuf,
    waveform_summary: RwLock<Option<Arc<WaveformSummary>>>,
    cue_points: RwLock<Vec<Cue>>,
    listeners: Mutex<Vec<Sender<TrackEvent>>>,
}

impl Track {
    pub fn new(id: TrackId, location: impl Into<PathBuf>) -> Self {
        Self {
            id,
            location: location.into(),
            waveform_summary: RwLock::new(None),
            cue_points: RwLock::new(Vec::new()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Display title (file stem of the location)
    pub fn title(&self) -> String {
        self.location
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> Receiver<TrackEvent> {
        let (tx, rx) = mpsc::channel();
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }

    pub fn waveform_summary(&self) -> Option<Arc<WaveformSummary>> {
        self.waveform_summary
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace (or clear, with `None`) the waveform summary
    pub fn set_waveform_summary(&self, summary: Option<Arc<WaveformSummary>>) {
        *self
            .waveform_summary
            .write()
            .unwrap_or_else(|e| e.into_inner()) = summary;
        self.emit(TrackEvent::WaveformSummaryUpdated);
    }

    /// Announce that the existing summary received more analyzed data
    pub fn notify_waveform_summary_updated(&self) {
        self.emit(TrackEvent::WaveformSummaryUpdated);
    }

    pub fn cue_points(&self) -> Vec<Cue> {
        self.cue_points
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn set_cue_points(&self, cues: Vec<Cue>) {
        *self.cue_points.write().unwrap_or_else(|e| e.into_inner()) = cues;
        self.emit(TrackEvent::CuesUpdated);
    }

    fn emit(&self, event: TrackEvent) {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        // Receivers that were dropped have unsubscribed
        listeners.retain(|tx| tx.send(event).is_ok());
    }
}
