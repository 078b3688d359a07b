//! Area model.
//!
//! An area is a place (room, yard) with a named status. Changing the status
//! can trigger a chore configured for the new value.

use crate::model::chore::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub type AreaId = Uuid;

/// One selectable status value, optionally carrying a chore blueprint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaStatusRule {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chore: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<AreaStatusRule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub status: String,
    pub updated: Option<Timestamp>,
    pub data: AreaData,
}

impl Area {
    pub fn new(name: impl Into<String>, status: impl Into<String>, data: AreaData) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: status.into(),
            updated: None,
            data,
        }
    }
}
