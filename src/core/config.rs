//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::submit::DEFAULT_SUBMIT_DELAY;

/// Name of the per-directory config file
pub const LOCAL_CONFIG_FILE: &str = ".regwiz.yaml";

/// Prompt styling for the interactive wizard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Colorful,
    Simple,
}

/// regwiz configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Delay of the simulated submission, in milliseconds
    pub submit_delay_ms: Option<u64>,

    /// Prompt theme
    pub theme: Option<Theme>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/regwiz/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Local config (./.regwiz.yaml)
        if let Some(local) = Self::read_file(Path::new(LOCAL_CONFIG_FILE)) {
            config.merge(local);
        }

        // 4. Environment variables
        if let Ok(delay) = std::env::var("REGWIZ_SUBMIT_DELAY_MS") {
            match delay.trim().parse() {
                Ok(ms) => config.submit_delay_ms = Some(ms),
                Err(_) => warn!(value = %delay, "ignoring invalid REGWIZ_SUBMIT_DELAY_MS"),
            }
        }

        config
    }

    /// Parse a config file; missing or malformed files are skipped
    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "regwiz")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.submit_delay_ms.is_some() {
            self.submit_delay_ms = other.submit_delay_ms;
        }
        if other.theme.is_some() {
            self.theme = other.theme;
        }
    }

    /// Submission delay, with an optional command-line override
    pub fn submit_delay(&self, override_ms: Option<u64>) -> Duration {
        override_ms
            .or(self.submit_delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SUBMIT_DELAY)
    }

    pub fn theme(&self) -> Theme {
        self.theme.unwrap_or_default()
    }
}
