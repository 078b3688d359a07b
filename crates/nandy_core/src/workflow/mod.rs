//! Chore/task workflow engine.
//!
//! # Responsibility
//! - Decide the active task, due reminders and legal status transitions.
//! - Invoke speech and metrics collaborators for every state change.
//!
//! # Invariants
//! - Operations only mutate the in-memory chore; callers persist.
//! - An operation that finds its target condition already met changes
//!   nothing and reports `Transition::unchanged()`.
//! - Collaborator failures are logged and never undo a mutation.
//! - The sequencer is the only code path that sets task `start`/`end`
//!   outside of explicit task operations.

use crate::clock::Clock;
use crate::logging::field;
use crate::metrics::MetricsSink;
use crate::model::chore::{Chore, ChoreId, TaskId, Timestamp, DEFAULT_LANGUAGE};
use crate::notify::{SpeechChannel, SpeechMessage};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod chore_ops;
pub mod reminder;
pub mod sequencer;
mod task_ops;

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors from workflow operations. Invalid transitions are not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// The chore has no task with this id.
    TaskNotFound { chore_id: ChoreId, task_id: TaskId },
}

impl Display for WorkflowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound { chore_id, task_id } => {
                write!(f, "task {task_id} not found in chore {chore_id}")
            }
        }
    }
}

impl Error for WorkflowError {}

/// Outcome of one workflow operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    /// Something changed and the chore must be persisted.
    pub changed: bool,
    /// The chore flipped between `Started` and `Ended`, either directly or
    /// as a cascade of a task operation.
    pub chore_status_changed: bool,
}

impl Transition {
    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn changed() -> Self {
        Self {
            changed: true,
            chore_status_changed: false,
        }
    }

    pub fn status_changed() -> Self {
        Self {
            changed: true,
            chore_status_changed: true,
        }
    }

    /// Folds a cascaded transition into this one.
    pub fn merge(self, other: Transition) -> Self {
        Self {
            changed: self.changed || other.changed,
            chore_status_changed: self.chore_status_changed || other.chore_status_changed,
        }
    }
}

/// Workflow engine bound to its collaborators.
#[derive(Clone)]
pub struct Workflow {
    speech: Arc<dyn SpeechChannel>,
    metrics: Arc<dyn MetricsSink>,
    clock: Arc<dyn Clock>,
    default_language: String,
}

impl Workflow {
    pub fn new(
        speech: Arc<dyn SpeechChannel>,
        metrics: Arc<dyn MetricsSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            speech,
            metrics,
            clock,
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Overrides the language assigned to new chores without one.
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Speaks chore-scoped text addressed to the chore's person.
    ///
    /// Stamps `notified`/`updated` on the chore and returns the timestamp
    /// used.
    pub(crate) fn speak_chore(&self, chore: &mut Chore, text: &str) -> Timestamp {
        let now = self.clock.now();
        let message = SpeechMessage {
            timestamp: now,
            text: format!("{}, {text}", chore.person_name),
            language: chore.data.language().to_string(),
            node: chore.data.node.clone(),
        };

        if let Err(err) = self.speech.publish(&message) {
            warn!(
                "event=speak module=workflow status=error topic={} chore_id={} error={}",
                self.speech.topic(),
                chore.id,
                field(err)
            );
        }

        chore.data.notified = Some(now);
        chore.data.updated = Some(now);
        chore.updated = now;
        now
    }

    /// Speaks task-scoped text and also stamps the task's `notified`.
    pub(crate) fn speak_task(&self, chore: &mut Chore, index: usize, text: &str) {
        let now = self.speak_chore(chore, text);
        if let Some(task) = chore
            .data
            .tasks
            .as_mut()
            .and_then(|tasks| tasks.get_mut(index))
        {
            task.notified = Some(now);
        }
    }

    pub(crate) fn emit(&self, path: &[&str], value: i64, timestamp: Timestamp) {
        if let Err(err) = self.metrics.send(path, value, timestamp) {
            warn!(
                "event=metric_send module=workflow status=error path={} error={}",
                field(path.join("/")),
                field(err)
            );
        }
    }

    pub(crate) fn task_position(&self, chore: &Chore, task_id: TaskId) -> WorkflowResult<usize> {
        chore
            .data
            .task_index(task_id)
            .ok_or(WorkflowError::TaskNotFound {
                chore_id: chore.id,
                task_id,
            })
    }
}

/// One exposed state machine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    PauseChore,
    UnpauseChore,
    SkipChore,
    UnskipChore,
    CompleteChore,
    IncompleteChore,
    /// Completes the active task (button press).
    Next,
    PauseTask(TaskId),
    UnpauseTask(TaskId),
    SkipTask(TaskId),
    UnskipTask(TaskId),
    CompleteTask(TaskId),
    IncompleteTask(TaskId),
}

impl Workflow {
    /// Runs one operation against the chore.
    pub fn apply(&self, chore: &mut Chore, operation: Operation) -> WorkflowResult<Transition> {
        match operation {
            Operation::PauseChore => Ok(self.pause_chore(chore)),
            Operation::UnpauseChore => Ok(self.unpause_chore(chore)),
            Operation::SkipChore => Ok(self.skip_chore(chore)),
            Operation::UnskipChore => Ok(self.unskip_chore(chore)),
            Operation::CompleteChore => Ok(self.complete_chore(chore)),
            Operation::IncompleteChore => Ok(self.incomplete_chore(chore)),
            Operation::Next => Ok(self.next_task(chore)),
            Operation::PauseTask(task_id) => self.pause_task(chore, task_id),
            Operation::UnpauseTask(task_id) => self.unpause_task(chore, task_id),
            Operation::SkipTask(task_id) => self.skip_task(chore, task_id),
            Operation::UnskipTask(task_id) => self.unskip_task(chore, task_id),
            Operation::CompleteTask(task_id) => self.complete_task(chore, task_id),
            Operation::IncompleteTask(task_id) => self.incomplete_task(chore, task_id),
        }
    }
}
