//! Chore and task domain model.
//!
//! # Responsibility
//! - Define the chore record and its ordered task list.
//! - Keep the JSON `data` map schema stable while giving known keys types.
//!
//! # Invariants
//! - `status == Ended` if and only if `data.end` is present.
//! - At most one task is active (`start` set, `end` unset). Enforced by the
//!   workflow sequencer, never by this module.
//! - Template-injected keys survive a round-trip through `extra`.

use crate::model::person::PersonId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unix epoch seconds.
pub type Timestamp = i64;

/// Stable chore identifier.
pub type ChoreId = Uuid;

/// Position-derived task identifier, unique within one chore.
pub type TaskId = u32;

/// Speech language used when neither the caller nor a template sets one.
pub const DEFAULT_LANGUAGE: &str = "en-us";

/// Coarse chore lifecycle state. Pause/skip are orthogonal flags in data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoreStatus {
    Started,
    Ended,
}

impl ChoreStatus {
    /// Stable storage value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Ended => "ended",
        }
    }

    /// Parses a storage value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "started" => Some(Self::Started),
            "ended" => Some(Self::Ended),
            _ => None,
        }
    }
}

/// One step within a chore.
///
/// Absence of `start` means the task has not begun; `start` without `end`
/// means it is the active task.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    /// Reminder interval in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    /// Seconds after `start` before reminders may fire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Creates an unstarted task with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.unwrap_or(false)
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.unwrap_or(false)
    }

    /// Started and not yet finished.
    pub fn is_active(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }
}

/// Mutable attribute map of a chore.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChoreData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Physical device hint for speech delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
    /// `None` means the chore has no task list at all, which differs from
    /// an empty list: only the latter lets the sequencer complete the chore.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChoreData {
    /// Creates data with descriptive text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Decodes a template blueprint map into typed chore data.
    pub fn from_blueprint(blueprint: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(blueprint.clone()))
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.unwrap_or(false)
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.unwrap_or(false)
    }

    /// Reads a string value injected by a template (e.g. `person`, `name`).
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.as_deref().unwrap_or_default()
    }

    /// Resolves a task id to its list position.
    ///
    /// Tasks without an explicit `id` answer to their position.
    pub fn task_index(&self, task_id: TaskId) -> Option<usize> {
        self.tasks().iter().enumerate().position(|(index, task)| {
            task.id
                .unwrap_or_else(|| TaskId::try_from(index).unwrap_or(TaskId::MAX))
                == task_id
        })
    }

    /// Assigns the list position as `id` to every task lacking one.
    pub fn assign_task_ids(&mut self) {
        if let Some(tasks) = self.tasks.as_mut() {
            for (index, task) in tasks.iter_mut().enumerate() {
                if task.id.is_none() {
                    task.id = TaskId::try_from(index).ok();
                }
            }
        }
    }
}

/// One instance of a recurring duty assigned to a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: ChoreId,
    pub person_id: PersonId,
    /// Joined from the person record; used to address speech.
    pub person_name: String,
    pub name: String,
    pub status: ChoreStatus,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub data: ChoreData,
}

impl Chore {
    /// Creates a started chore stamped with `now`.
    pub fn new(
        person_id: PersonId,
        person_name: impl Into<String>,
        name: impl Into<String>,
        data: ChoreData,
        now: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            person_id,
            person_name: person_name.into(),
            name: name.into(),
            status: ChoreStatus::Started,
            created: now,
            updated: now,
            data,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.status == ChoreStatus::Ended
    }

    /// Returns the task with the given effective id.
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        let index = self.data.task_index(task_id)?;
        self.data.tasks().get(index)
    }
}
