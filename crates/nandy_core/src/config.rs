//! Explicit runtime configuration.
//!
//! # Responsibility
//! - Describe collaborator endpoints and logging setup in one struct that
//!   callers pass into constructors.
//!
//! # Invariants
//! - Core code never reads configuration from the process environment.
//! - Missing keys fall back to `Default` values.

use crate::model::chore::DEFAULT_LANGUAGE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Speech channel naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub prefix: String,
    pub channel: String,
}

impl SpeechConfig {
    /// Full topic name, e.g. `nandy/speech`.
    pub fn topic(&self) -> String {
        format!("{}/{}", self.prefix, self.channel)
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            prefix: "nandy".to_string(),
            channel: "speech".to_string(),
        }
    }
}

/// Metrics naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prepended to every metric path; empty disables the prefix.
    pub prefix: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            prefix: "nandy".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NandyConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub default_language: String,
    pub speech: SpeechConfig,
    pub metrics: MetricsConfig,
}

impl Default for NandyConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            default_language: DEFAULT_LANGUAGE.to_string(),
            speech: SpeechConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl NandyConfig {
    /// Parses configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Database file for a run: an explicit path wins over `db_path`.
    pub fn resolve_db_path(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.db_path.clone())
    }
}
