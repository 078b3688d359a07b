//! Speech channel adapters.

use super::{NotifyError, SpeechChannel, SpeechMessage};
use crate::config::SpeechConfig;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Keeps published messages in memory, in publish order.
#[derive(Debug)]
pub struct MemoryChannel {
    topic: String,
    messages: Mutex<Vec<SpeechMessage>>,
}

impl MemoryChannel {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            topic: config.topic(),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of every message published so far.
    pub fn messages(&self) -> Vec<SpeechMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns every message published so far.
    pub fn drain(&self) -> Vec<SpeechMessage> {
        std::mem::take(&mut *self.messages.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new(&SpeechConfig::default())
    }
}

impl SpeechChannel for MemoryChannel {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn publish(&self, message: &SpeechMessage) -> Result<(), NotifyError> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }
}

/// Writes each message as one JSON line to a writer (stdout, a pipe, a
/// socket), flushing after every message.
pub struct JsonLinesChannel<W: Write + Send> {
    topic: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesChannel<W> {
    pub fn new(config: &SpeechConfig, writer: W) -> Self {
        Self {
            topic: config.topic(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> SpeechChannel for JsonLinesChannel<W> {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn publish(&self, message: &SpeechMessage) -> Result<(), NotifyError> {
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }
}
