//! Speech notification collaborator.
//!
//! # Responsibility
//! - Define the message shape delivered to speakers.
//! - Define the channel contract the workflow publishes through.
//!
//! # Invariants
//! - Workflow code builds every message; channels only deliver them.
//! - A failed delivery never rolls back workflow state.

use crate::model::chore::Timestamp;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod speech;

pub use speech::{JsonLinesChannel, MemoryChannel};

/// One spoken message. Field names are the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechMessage {
    pub timestamp: Timestamp,
    pub text: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
}

/// Delivery failure reported by a collaborator.
#[derive(Debug)]
pub enum NotifyError {
    Io(std::io::Error),
    Encode(serde_json::Error),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "notification delivery failed: {err}"),
            Self::Encode(err) => write!(f, "notification encoding failed: {err}"),
        }
    }
}

impl Error for NotifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for NotifyError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Named publish channel for speech messages.
pub trait SpeechChannel: Send + Sync {
    /// Topic name used for diagnostics, e.g. `nandy/speech`.
    fn topic(&self) -> &str;

    fn publish(&self, message: &SpeechMessage) -> Result<(), NotifyError>;
}
