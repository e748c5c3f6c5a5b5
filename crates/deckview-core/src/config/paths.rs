//! Path utilities for deckview configuration files

use std::path::PathBuf;

/// Get the deckview config directory
///
/// Returns: `~/.config/deckview` (platform config dir), falling back to the
/// home directory and finally the working directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("deckview")
}

/// Get the path of a config file inside the deckview config directory
///
/// # Arguments
/// * `filename` - Config file name (e.g., "overview.yaml", "skin.yaml")
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_deckview() {
        assert!(default_config_dir().ends_with("deckview"));
    }

    #[test]
    fn test_config_path_includes_filename() {
        let path = default_config_path("overview.yaml");
        assert!(path.ends_with("deckview/overview.yaml"));
    }
}
