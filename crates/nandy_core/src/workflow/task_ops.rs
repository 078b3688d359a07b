//! Task-level transitions.
//!
//! Finishing a task (complete/skip) advances the sequencer and may end the
//! chore. Re-opening a task (incomplete/unskip) may re-open an ended chore,
//! never the reverse.

use super::chore_ops::{applied, noop};
use super::sequencer;
use super::{Transition, Workflow, WorkflowResult};
use crate::model::chore::{Chore, Task, TaskId};
use log::debug;

impl Workflow {
    pub fn pause_task(&self, chore: &mut Chore, task_id: TaskId) -> WorkflowResult<Transition> {
        let index = self.task_position(chore, task_id)?;
        let Some(task) = task_mut(chore, index) else {
            return Ok(Transition::unchanged());
        };
        if task.is_paused() {
            return Ok(noop("task_pause", chore));
        }

        task.paused = Some(true);
        let text = format!("you do not have to {} yet", task.text());
        self.speak_task(chore, index, &text);
        applied("task_pause", chore);
        Ok(Transition::changed())
    }

    pub fn unpause_task(&self, chore: &mut Chore, task_id: TaskId) -> WorkflowResult<Transition> {
        let index = self.task_position(chore, task_id)?;
        let Some(task) = task_mut(chore, index) else {
            return Ok(Transition::unchanged());
        };
        if !task.is_paused() {
            return Ok(noop("task_unpause", chore));
        }

        task.paused = Some(false);
        let text = format!("you do have to {} now", task.text());
        self.speak_task(chore, index, &text);
        applied("task_unpause", chore);
        Ok(Transition::changed())
    }

    /// Skips a task and moves the sequencer on.
    pub fn skip_task(&self, chore: &mut Chore, task_id: TaskId) -> WorkflowResult<Transition> {
        let index = self.task_position(chore, task_id)?;
        let now = self.now();
        let Some(task) = task_mut(chore, index) else {
            return Ok(Transition::unchanged());
        };
        if task.is_skipped() {
            return Ok(noop("task_skip", chore));
        }

        task.skipped = Some(true);
        task.end = Some(now);
        if task.start.is_none() {
            task.start = Some(now);
        }
        let text = format!("you do not have to {}", task.text());
        self.speak_task(chore, index, &text);
        applied("task_skip", chore);

        Ok(Transition::changed().merge(self.advance(chore)))
    }

    /// Un-skips a task. Re-opens the chore if it had ended.
    pub fn unskip_task(&self, chore: &mut Chore, task_id: TaskId) -> WorkflowResult<Transition> {
        let index = self.task_position(chore, task_id)?;
        let Some(task) = task_mut(chore, index) else {
            return Ok(Transition::unchanged());
        };
        if !task.is_skipped() {
            return Ok(noop("task_unskip", chore));
        }

        task.skipped = Some(false);
        task.end = None;
        let text = format!("you do have to {}", task.text());
        self.speak_task(chore, index, &text);
        applied("task_unskip", chore);

        Ok(self.after_reopen(chore))
    }

    /// Completes a task, emits its duration metric and moves the
    /// sequencer on.
    pub fn complete_task(&self, chore: &mut Chore, task_id: TaskId) -> WorkflowResult<Transition> {
        let index = self.task_position(chore, task_id)?;
        Ok(self.complete_task_at(chore, index))
    }

    /// Re-opens a finished task, leaving it started. Re-opens the chore if
    /// it had ended.
    pub fn incomplete_task(
        &self,
        chore: &mut Chore,
        task_id: TaskId,
    ) -> WorkflowResult<Transition> {
        let index = self.task_position(chore, task_id)?;
        let Some(task) = task_mut(chore, index) else {
            return Ok(Transition::unchanged());
        };
        if task.end.is_none() {
            return Ok(noop("task_incomplete", chore));
        }

        task.end = None;
        let text = format!("I'm sorry but you did not {} yet", task.text());
        self.speak_task(chore, index, &text);
        applied("task_incomplete", chore);

        Ok(self.after_reopen(chore))
    }

    pub(super) fn complete_task_at(&self, chore: &mut Chore, index: usize) -> Transition {
        let now = self.now();
        let Some(task) = task_mut(chore, index) else {
            return Transition::unchanged();
        };
        if task.end.is_some() {
            return noop("task_complete", chore);
        }

        task.end = Some(now);
        let start = *task.start.get_or_insert(now);
        let task_text = task.text().to_string();
        self.speak_task(chore, index, &format!("you did {task_text}"));
        self.emit(
            &[
                "person",
                chore.person_name.as_str(),
                "chore",
                chore.data.text(),
                "task",
                task_text.as_str(),
                "duration",
            ],
            now.saturating_sub(start),
            start,
        );
        applied("task_complete", chore);

        Transition::changed().merge(self.advance(chore))
    }

    /// Restores the single-active-task invariant after a task was re-opened
    /// and cascades the re-open to an ended chore.
    fn after_reopen(&self, chore: &mut Chore) -> Transition {
        if let Some(tasks) = chore.data.tasks.as_mut() {
            let rewound = sequencer::rewind(tasks);
            if !rewound.is_empty() {
                debug!(
                    "event=task_rewind module=workflow status=ok chore_id={} positions={:?}",
                    chore.id, rewound
                );
            }
        }

        Transition::changed().merge(self.reopen_parent(chore))
    }
}

fn task_mut(chore: &mut Chore, index: usize) -> Option<&mut Task> {
    chore
        .data
        .tasks
        .as_mut()
        .and_then(|tasks| tasks.get_mut(index))
}
