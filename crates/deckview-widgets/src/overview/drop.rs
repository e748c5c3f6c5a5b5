//! Drag-and-drop acceptance for loading tracks onto a deck

use std::path::Path;

use super::settings::OverviewSettings;

/// File extensions the deck can load
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "ogg", "opus", "m4a", "aiff", "aif"];

/// Whether `path` has a loadable audio extension (case-insensitive)
pub fn is_supported_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

/// Whether a dragged file may be dropped on a deck
///
/// A playing deck only accepts drops when the settings allow it.
pub fn accept_track_drop(path: &Path, deck_playing: bool, settings: &OverviewSettings) -> bool {
    if !is_supported_audio_file(path) {
        log::debug!("accept_track_drop: Unsupported file {:?}", path);
        return false;
    }
    if deck_playing && !settings.allow_load_to_playing_deck {
        log::debug!("accept_track_drop: Deck is playing, refusing {:?}", path);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_audio_file(Path::new("/music/a.flac")));
        assert!(is_supported_audio_file(Path::new("/music/B.MP3")));
        assert!(is_supported_audio_file(Path::new("song.aif")));
        assert!(!is_supported_audio_file(Path::new("cover.jpg")));
        assert!(!is_supported_audio_file(Path::new("/music/noextension")));
    }

    #[test]
    fn test_playing_deck_refuses_by_default() {
        let settings = OverviewSettings::default();
        let path = Path::new("/music/a.wav");
        assert!(accept_track_drop(path, false, &settings));
        assert!(!accept_track_drop(path, true, &settings));

        let permissive = OverviewSettings {
            allow_load_to_playing_deck: true,
            ..OverviewSettings::default()
        };
        assert!(accept_track_drop(path, true, &permissive));
    }
}
