//! Template model.
//!
//! A template is a named blueprint map consumed at creation time to seed a
//! chore's or act's `data`. It has no runtime lifecycle of its own.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub type TemplateId = Uuid;

/// What a template instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Chore,
    Act,
}

impl TemplateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chore => "chore",
            Self::Act => "act",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "chore" => Some(Self::Chore),
            "act" => Some(Self::Act),
            _ => None,
        }
    }
}

/// Named, kind-tagged blueprint. `(name, kind)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub kind: TemplateKind,
    pub data: Map<String, Value>,
}

impl Template {
    pub fn new(name: impl Into<String>, kind: TemplateKind, data: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            data,
        }
    }
}
