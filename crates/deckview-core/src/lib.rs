//! deckview core - collaborators of the waveform overview widget
//!
//! Everything here is toolkit-free: tracks and their waveform summaries,
//! cue points, analyzer progress, typed playback controls and the YAML
//! configuration helpers shared by the widget crate and the demo app.

pub mod analyzer;
pub mod config;
pub mod control;
pub mod cue;
pub mod duration;
pub mod track;
pub mod types;
pub mod waveform;

pub use analyzer::{AnalyzerEvent, AnalyzerProgress};
pub use control::{ControlError, ControlHandle, ControlKey, ControlRegistry};
pub use cue::{Cue, CueType};
pub use track::{Track, TrackPointer};
pub use types::*;
pub use waveform::{WaveformData, WaveformSummary};
