//! Graphite plaintext protocol adapter.

use super::{metric_name, MetricsSink};
use crate::config::MetricsConfig;
use crate::model::chore::Timestamp;
use crate::notify::NotifyError;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Writes `"{name} {value} {timestamp}\n"` lines, e.g. to a carbon socket.
pub struct PlaintextMetrics<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PlaintextMetrics<W> {
    pub fn new(config: &MetricsConfig, writer: W) -> Self {
        Self {
            prefix: config.prefix.clone(),
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> MetricsSink for PlaintextMetrics<W> {
    fn send(&self, path: &[&str], value: i64, timestamp: Timestamp) -> Result<(), NotifyError> {
        let line = format!("{} {value} {timestamp}\n", metric_name(&self.prefix, path));
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
