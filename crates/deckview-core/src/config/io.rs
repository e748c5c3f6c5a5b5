//! YAML configuration I/O
//!
//! Settings files are optional: a missing or broken file never stops the
//! application, it just yields the type's defaults (and a log line).

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Load a YAML config file, falling back to `T::default()`
///
/// Missing file: defaults, logged at info. Unreadable or unparsable file:
/// defaults, logged as a warning.
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        log::info!("load_config: {:?} doesn't exist, using defaults", path);
        return T::default();
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::warn!("load_config: Failed to read {:?}: {}, using defaults", path, e);
            return T::default();
        }
    };

    match serde_yaml::from_str::<T>(&contents) {
        Ok(config) => {
            log::info!("load_config: Loaded {:?}", path);
            config
        }
        Err(e) => {
            log::warn!("load_config: Failed to parse {:?}: {}, using defaults", path, e);
            T::default()
        }
    }
}

/// Save a config as YAML, creating parent directories as needed
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("save_config: Saved {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct GainConfig {
        visual_gain: f64,
        normalize: bool,
    }

    impl Default for GainConfig {
        fn default() -> Self {
            Self {
                visual_gain: 1.0,
                normalize: false,
            }
        }
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config: GainConfig = load_config(Path::new("/nonexistent/deckview/overview.yaml"));
        assert_eq!(config, GainConfig::default());
    }

    #[test]
    fn test_invalid_yaml_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "visual_gain: [not, a, number").unwrap();

        let config: GainConfig = load_config(&path);
        assert_eq!(config, GainConfig::default());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.yaml");
        std::fs::write(&path, "normalize: true\n").unwrap();

        let config: GainConfig = load_config(&path);
        assert!(config.normalize);
        assert_eq!(config.visual_gain, 1.0);
    }

    #[test]
    fn test_save_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("overview.yaml");
        let config = GainConfig {
            visual_gain: 2.5,
            normalize: true,
        };

        save_config(&config, &path).unwrap();
        let loaded: GainConfig = load_config(&path);
        assert_eq!(loaded, config);
    }
}
