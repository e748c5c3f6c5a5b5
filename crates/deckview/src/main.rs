//! deckview - a single demo deck showing the waveform overview
//!
//! ## Command line flags
//!
//! - `--skin <file>`: overview skin (YAML); the built-in skin is used otherwise
//!
//! Overview settings are read from `~/.config/deckview/overview.yaml` and
//! written back when changed in the UI.

mod analyzer;
mod app;

use std::path::{Path, PathBuf};

use anyhow::Context;
use deckview_core::config::{default_config_path, load_config};
use deckview_widgets::overview::SETTINGS_FILE;
use deckview_widgets::{load_skin, OverviewSettings, OverviewSkin};
use iced::{Size, Task};

use app::{DeckViewApp, DECK_GROUP};

fn load_deck_skin(path: &Path) -> anyhow::Result<OverviewSkin> {
    let config = load_skin(path).with_context(|| format!("Failed to load skin {:?}", path))?;
    Ok(config.setup(DECK_GROUP, path.parent()))
}

fn main() -> iced::Result {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("deckview starting up");

    let args: Vec<String> = std::env::args().collect();
    let skin_path = args
        .iter()
        .position(|arg| arg == "--skin")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    let skin = match skin_path.as_deref().map(load_deck_skin).transpose() {
        Ok(Some(skin)) => skin,
        Ok(None) => OverviewSkin::default(),
        Err(e) => {
            log::warn!("{:#}, using the built-in skin", e);
            OverviewSkin::default()
        }
    };

    let settings_path = default_config_path(SETTINGS_FILE);
    let settings: OverviewSettings = load_config(&settings_path);

    iced::application(
        move || {
            let app = DeckViewApp::new(skin.clone(), settings.clone(), settings_path.clone());
            (app, Task::none())
        },
        DeckViewApp::update,
        DeckViewApp::view,
    )
    .subscription(DeckViewApp::subscription)
    .theme(DeckViewApp::theme)
    .title("deckview")
    .window_size(Size::new(960.0, 320.0))
    .run()
}
