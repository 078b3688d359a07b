//! Act model.
//!
//! An act records one positive or negative behavior of a person. A negative
//! act may spawn a corrective chore from its template.

use crate::model::chore::Timestamp;
use crate::model::person::PersonId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub type ActId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActValue {
    Positive,
    Negative,
}

impl ActValue {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }

    /// Metric value emitted for this act.
    pub fn score(self) -> i64 {
        match self {
            Self::Positive => 1,
            Self::Negative => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Act {
    pub id: ActId,
    pub person_id: PersonId,
    pub name: String,
    pub value: ActValue,
    pub created: Timestamp,
    pub data: Map<String, Value>,
}
