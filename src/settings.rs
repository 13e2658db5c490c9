//! Persistent settings for the query frontend.

use crate::api::DEFAULT_API_BASE;
use crate::poll::DEFAULT_POLL_INTERVAL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the saved API base URL.
pub const API_ENV_VAR: &str = "RATATOSKR_API";

/// All persistable form defaults and client tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // Backend
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    // Form
    #[serde(default)]
    pub user: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default)]
    pub use_rag_database: bool,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_mode() -> String {
    "dialog".to_string()
}

fn default_max_results() -> u32 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            poll_interval_secs: default_poll_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user: String::new(),
            model: default_model(),
            mode: default_mode(),
            max_results: default_max_results(),
            use_rag_database: false,
        }
    }
}

impl Settings {
    /// Get the path to the settings file
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("ratatoskr-native");
            p.push("settings.json");
            p
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Load settings from disk, returning defaults if the file doesn't exist or is
    /// invalid. `RATATOSKR_API` overrides the stored base URL.
    pub fn load() -> Self {
        let mut settings = match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::warn!("Could not determine config directory, using defaults");
                Self::default()
            }
        };
        settings.apply_api_override(std::env::var(API_ENV_VAR).ok());
        settings
    }

    /// Replace the API base with `value` unless it is missing or blank.
    pub fn apply_api_override(&mut self, value: Option<String>) {
        let Some(api) = value.filter(|v| !v.trim().is_empty()) else {
            return;
        };
        tracing::info!("Using API base from {}: {}", API_ENV_VAR, api);
        self.api_base = api;
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    tracing::info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings file: {}, using defaults", e);
                    Self::default()
                }
            },
            // File doesn't exist yet, that's fine
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            tracing::warn!("Could not determine config directory, settings not saved");
            return;
        };
        if let Err(e) = self.save_to(&path) {
            tracing::warn!("{}", e);
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write settings file: {}", e))?;
        tracing::debug!("Saved settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.poll_interval(), Duration::from_secs(10));
        assert_eq!(settings.mode, "dialog");
        assert_eq!(settings.max_results, 10);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            user: "ana".into(),
            mode: "vector".into(),
            use_rag_database: true,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"user":"bo"}"#).unwrap();
        let settings = Settings::load_from(&path);
        assert_eq!(settings.user, "bo");
        assert_eq!(settings.poll_interval_secs, 10);
    }

    #[test]
    fn test_api_override() {
        let mut settings = Settings::default();
        settings.apply_api_override(None);
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        settings.apply_api_override(Some("  ".into()));
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        settings.apply_api_override(Some("http://10.0.0.5:8080".into()));
        assert_eq!(settings.api_base, "http://10.0.0.5:8080");
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }
}
