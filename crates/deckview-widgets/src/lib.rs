//! Waveform overview widget for DJ decks
//!
//! This crate provides the overview widget (a whole-track waveform with
//! playhead, cue marks, loop ranges and analyzer progress) for iced
//! applications, together with its skin parsing and the helpers a host
//! needs to drive it.
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State struct**: [`OverviewWidget`], fed by the host through explicit
//!   handler methods
//! - **View function**: [`waveform_overview`] takes the widget plus a message
//!   wrapper and returns an `Element`
//! - **Canvas program**: event-to-message translation and painting
//!
//! Toolkit-free collaborators (tracks, waveform summaries, controls) live in
//! `deckview-core`.

pub mod overview;
pub mod subscription;
pub mod theme;

pub use overview::{
    accept_track_drop, load_skin, waveform_overview, CueColorRepresentation, Orientation,
    OverviewControls, OverviewMessage, OverviewSettings, OverviewSkin, OverviewStatus,
    OverviewWidget, PositionMapping, RenderState, SkinConfig, SkinError, OVERVIEW_HEIGHT,
};
pub use subscription::{channel_subscription, SharedReceiver};
