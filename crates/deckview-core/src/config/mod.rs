//! Configuration utilities shared by deckview crates
//!
//! - Generic YAML config loading/saving
//! - Standard config directory paths
//!
//! # Usage
//!
//! ```ignore
//! use deckview_core::config::{load_config, save_config, default_config_path};
//!
//! let path = default_config_path("overview.yaml");
//! let settings: OverviewSettings = load_config(&path);
//! save_config(&settings, &path)?;
//! ```

mod io;
mod paths;

pub use io::{load_config, save_config};
pub use paths::{default_config_dir, default_config_path};
