//! Chore-level transitions, sequencing and reminders.

use super::reminder::should_remind;
use super::sequencer::{self, Step};
use super::{Transition, Workflow};
use crate::model::chore::{Chore, ChoreStatus};
use log::{debug, info, warn};

impl Workflow {
    /// Pauses the chore. Reminders stay quiet while paused.
    pub fn pause_chore(&self, chore: &mut Chore) -> Transition {
        if chore.data.is_paused() {
            return noop("chore_pause", chore);
        }

        chore.data.paused = Some(true);
        let text = format!("you do not have to {} yet", chore.data.text());
        self.speak_chore(chore, &text);
        applied("chore_pause", chore);
        Transition::changed()
    }

    pub fn unpause_chore(&self, chore: &mut Chore) -> Transition {
        if !chore.data.is_paused() {
            return noop("chore_unpause", chore);
        }

        chore.data.paused = Some(false);
        let text = format!("you do have to {} now", chore.data.text());
        self.speak_chore(chore, &text);
        applied("chore_unpause", chore);
        Transition::changed()
    }

    /// Skips the chore, ending it without a duration metric.
    pub fn skip_chore(&self, chore: &mut Chore) -> Transition {
        if chore.data.is_skipped() {
            return noop("chore_skip", chore);
        }

        let was_ended = chore.is_ended();
        chore.data.skipped = Some(true);
        chore.data.end = Some(self.now());
        chore.status = ChoreStatus::Ended;
        let text = format!("you do not have to {}", chore.data.text());
        self.speak_chore(chore, &text);
        applied("chore_skip", chore);
        status_flip(was_ended)
    }

    pub fn unskip_chore(&self, chore: &mut Chore) -> Transition {
        if !chore.data.is_skipped() {
            return noop("chore_unskip", chore);
        }

        let was_ended = chore.is_ended();
        chore.data.skipped = Some(false);
        chore.data.end = None;
        chore.status = ChoreStatus::Started;
        let text = format!("you do have to {}", chore.data.text());
        self.speak_chore(chore, &text);
        applied("chore_unskip", chore);
        status_flip(!was_ended)
    }

    /// Ends the chore and emits its duration metric.
    ///
    /// Legal unless the chore is already ended with an end time.
    pub fn complete_chore(&self, chore: &mut Chore) -> Transition {
        if chore.data.end.is_some() && chore.is_ended() {
            return noop("chore_complete", chore);
        }

        let was_ended = chore.is_ended();
        let end = self.now();
        chore.data.end = Some(end);
        chore.status = ChoreStatus::Ended;
        let text = format!("thank you. You did {}", chore.data.text());
        self.speak_chore(chore, &text);

        match chore.data.start {
            Some(start) => self.emit(
                &[
                    "person",
                    chore.person_name.as_str(),
                    "chore",
                    chore.data.text(),
                    "duration",
                ],
                end.saturating_sub(start),
                start,
            ),
            None => debug!(
                "event=chore_complete module=workflow status=skip_metric chore_id={} reason=no_start",
                chore.id
            ),
        }

        applied("chore_complete", chore);
        status_flip(was_ended)
    }

    /// Re-opens an ended chore.
    pub fn incomplete_chore(&self, chore: &mut Chore) -> Transition {
        if chore.data.end.is_none() && !chore.is_ended() {
            return noop("chore_incomplete", chore);
        }

        let was_ended = chore.is_ended();
        chore.data.end = None;
        chore.status = ChoreStatus::Started;
        let text = format!("I'm sorry but you did not {} yet", chore.data.text());
        self.speak_chore(chore, &text);
        applied("chore_incomplete", chore);
        status_flip(!was_ended)
    }

    /// Completes the active task, typically from a button press.
    pub fn next_task(&self, chore: &mut Chore) -> Transition {
        let Some(index) = sequencer::find_active(chore.data.tasks()) else {
            return noop("chore_next", chore);
        };
        self.complete_task_at(chore, index)
    }

    /// Starts the next task if none is active, or completes the chore once
    /// every task has finished. Chores without a task list are left alone.
    pub fn advance(&self, chore: &mut Chore) -> Transition {
        let Some(tasks) = chore.data.tasks.as_ref() else {
            return Transition::unchanged();
        };

        if !sequencer::is_well_formed(tasks) {
            warn!(
                "event=sequencer_check module=workflow status=invalid chore_id={} active_tasks={}",
                chore.id,
                sequencer::active_count(tasks)
            );
        }

        match sequencer::next_step(tasks) {
            Step::InProgress(_) => Transition::unchanged(),
            Step::Start(index) => {
                let now = self.now();
                let Some(task) = chore
                    .data
                    .tasks
                    .as_mut()
                    .and_then(|tasks| tasks.get_mut(index))
                else {
                    return Transition::unchanged();
                };
                task.start = Some(now);
                let text = if task.is_paused() {
                    format!("you do not have to {} yet", task.text())
                } else {
                    format!("please {}", task.text())
                };
                self.speak_task(chore, index, &text);
                debug!(
                    "event=task_start module=workflow status=ok chore_id={} position={}",
                    chore.id, index
                );
                Transition::changed()
            }
            Step::Exhausted => self.complete_chore(chore),
        }
    }

    /// Sends due reminders for the chore and its active task.
    ///
    /// Returns true when at least one reminder was spoken.
    pub fn remind(&self, chore: &mut Chore) -> bool {
        let now = self.now();
        let mut spoke = false;

        if should_remind(&chore.data, now) {
            let text = format!("you still have to {}", chore.data.text());
            self.speak_chore(chore, &text);
            spoke = true;
        }

        if let Some(index) = sequencer::find_active(chore.data.tasks()) {
            let task = &chore.data.tasks()[index];
            if should_remind(task, now) {
                let text = format!("please {}", task.text());
                self.speak_task(chore, index, &text);
                spoke = true;
            }
        }

        if spoke {
            debug!(
                "event=remind module=workflow status=ok chore_id={}",
                chore.id
            );
        }
        spoke
    }

    /// Re-opens an ended parent chore after one of its tasks was re-opened.
    pub(crate) fn reopen_parent(&self, chore: &mut Chore) -> Transition {
        if !chore.is_ended() {
            return Transition::unchanged();
        }

        chore.status = ChoreStatus::Started;
        chore.data.end = None;
        let text = format!("I'm sorry but you did not {} yet", chore.data.text());
        self.speak_chore(chore, &text);
        applied("chore_reopen", chore);
        Transition::status_changed()
    }
}

fn status_flip(unchanged_status: bool) -> Transition {
    if unchanged_status {
        Transition::changed()
    } else {
        Transition::status_changed()
    }
}

pub(super) fn noop(event: &str, chore: &Chore) -> Transition {
    debug!(
        "event={} module=workflow status=noop chore_id={}",
        event, chore.id
    );
    Transition::unchanged()
}

pub(super) fn applied(event: &str, chore: &Chore) {
    info!(
        "event={} module=workflow status=ok chore_id={} chore_status={}",
        event,
        chore.id,
        chore.status.as_str()
    );
}
