//! Process-initialization defaults.
//!
//! Two file-backed values are read once at startup and passed explicitly to
//! the layers that need them; nothing in this crate reads ambient global
//! state afterwards. Both loads degrade instead of failing — a missing or
//! corrupt config file must not block an interactive session, so failures
//! are logged at `warn` level and an empty value is returned.

use std::fs;
use std::path::Path;

use log::warn;
use serde::Deserialize;
use thiserror::Error;

/// Startup configuration load failure. Only surfaced by the strict loaders;
/// the `_or_default` entry points log and degrade instead.
#[derive(Debug, Error)]
pub enum StartupError {
    /// File could not be read.
    #[error("config read failed: {0}")]
    Io(#[from] std::io::Error),

    /// File contents did not parse as the expected JSON shape.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Application configuration file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Slide identifiers loaded into a fresh visualization session.
    #[serde(default)]
    pub default_slide_list: Vec<String>,
}

impl AppConfig {
    /// Load and parse the configuration file, surfacing failures.
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Read-only defaults produced once during process initialization.
#[derive(Debug, Clone, Default)]
pub struct StartupDefaults {
    /// Slide identifiers for a fresh session; empty when the config file is
    /// missing or malformed.
    pub slide_list: Vec<String>,
    /// Analytics tag snippet injected by the hosting layer; `None` when the
    /// snippet file is unavailable.
    pub tag_snippet: Option<String>,
}

impl StartupDefaults {
    /// Load all startup defaults, degrading on every failure.
    pub fn load(config_path: &Path, tag_snippet_path: &Path) -> Self {
        Self {
            slide_list: load_default_slide_list(config_path),
            tag_snippet: load_tag_snippet(tag_snippet_path),
        }
    }
}

/// Default slide list from the application config, or empty on any failure.
pub fn load_default_slide_list(path: &Path) -> Vec<String> {
    match AppConfig::load(path) {
        Ok(config) => config.default_slide_list,
        Err(err) => {
            warn!("default slide list unavailable ({}): {err}", path.display());
            Vec::new()
        }
    }
}

/// Analytics tag snippet file contents, or `None` on any failure.
pub fn load_tag_snippet(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(snippet) => Some(snippet),
        Err(err) => {
            warn!("tag snippet unavailable ({}): {err}", path.display());
            None
        }
    }
}
