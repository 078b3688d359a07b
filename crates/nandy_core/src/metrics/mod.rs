//! Metrics collaborator.
//!
//! # Responsibility
//! - Define the sink contract used for duration and score metrics.
//! - Own metric path formatting: sanitize segments and join with `.`.
//!
//! # Invariants
//! - Every non-word run in a segment becomes a single `_`.
//! - Workflow code passes raw segments; only sinks format names.

use crate::model::chore::Timestamp;
use crate::notify::NotifyError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::{Mutex, PoisonError};

mod graphite;

pub use graphite::PlaintextMetrics;

static NON_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\W+").expect("valid non-word regex"));

/// Time-series sink.
pub trait MetricsSink: Send + Sync {
    fn send(&self, path: &[&str], value: i64, timestamp: Timestamp) -> Result<(), NotifyError>;
}

/// Builds a dotted metric name from raw segments.
///
/// `prefix` is prepended as-is when non-empty.
pub fn metric_name(prefix: &str, path: &[&str]) -> String {
    let sanitized = path
        .iter()
        .map(|segment| NON_WORD_RE.replace_all(segment, "_").into_owned())
        .collect::<Vec<_>>()
        .join(".");
    if prefix.is_empty() {
        sanitized
    } else {
        format!("{prefix}.{sanitized}")
    }
}

/// One recorded metric point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSample {
    pub name: String,
    pub value: i64,
    pub timestamp: Timestamp,
}

/// Records samples in memory.
#[derive(Debug, Default)]
pub struct MemoryMetrics {
    prefix: String,
    samples: Mutex<Vec<MetricSample>>,
}

impl MemoryMetrics {
    /// Sink without a name prefix.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            samples: Mutex::new(Vec::new()),
        }
    }

    pub fn samples(&self) -> Vec<MetricSample> {
        self.samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MetricsSink for MemoryMetrics {
    fn send(&self, path: &[&str], value: i64, timestamp: Timestamp) -> Result<(), NotifyError> {
        self.samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MetricSample {
                name: metric_name(&self.prefix, path),
                value,
                timestamp,
            });
        Ok(())
    }
}
