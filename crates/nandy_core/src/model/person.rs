//! Person model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PersonId = Uuid;

/// Someone chores and acts are assigned to. `name` prefixes every
/// spoken message and is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub email: String,
}

impl Person {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
        }
    }
}
