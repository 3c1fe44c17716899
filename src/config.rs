//! User configuration persistence
//!
//! Stores preferences in `~/.config/vellum/config.yaml`

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::autosave::DEFAULT_AUTOSAVE_DELAY_MS;
use crate::markdown::PreviewThemeName;

/// What happens to unsaved edits when the active document is replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SwitchPolicy {
    /// Write the dirty buffer before the next document is loaded
    #[default]
    Flush,
    /// Drop the dirty buffer with a warning
    Discard,
}

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VellumConfig {
    /// Quiet period after the last edit before an autosave
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    #[serde(default)]
    pub switch_policy: SwitchPolicy,

    /// Rescan the vault when files change on disk
    #[serde(default)]
    pub watch: bool,

    /// Palette for `vellum render --standalone`
    #[serde(default)]
    pub preview_theme: PreviewThemeName,
}

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY_MS
}

impl Default for VellumConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: default_autosave_delay_ms(),
            switch_policy: SwitchPolicy::default(),
            watch: false,
            preview_theme: PreviewThemeName::default(),
        }
    }
}

impl VellumConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}
