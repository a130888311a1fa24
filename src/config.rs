//! Application configuration — loaded from ~/.digisonic/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pitch::KeyRange;
use crate::report::Locale;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Playback and instrument settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Quarter-note beats per minute.
    #[serde(default = "AppConfig::default_bpm")]
    pub bpm: f64,
    /// Keys on the piano; `toca` notes must fall inside.
    #[serde(default)]
    pub piano: KeyRange,
    #[serde(default)]
    pub looping: bool,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub locale: Locale,
}

/// The config file path.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".digisonic").join("config.yaml"))
}

impl AppConfig {
    /// Load from the standard path. A missing or unreadable file falls back
    /// to defaults.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    fn default_bpm() -> f64 {
        60.0
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bpm: Self::default_bpm(),
            piano: KeyRange::default(),
            looping: false,
            muted: false,
            locale: Locale::default(),
        }
    }
}
