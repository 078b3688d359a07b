//! Task sequencer.
//!
//! Decides which task in a chore's ordered list is active. Sequencing is
//! strictly list order; there is no priority or reordering.
//!
//! # Invariants
//! - The first active task in list order wins when data is malformed.
//! - After `rewind`, at most one task is active.

use crate::model::chore::Task;

/// What the sequencer should do next for a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A task is already in progress at this position.
    InProgress(usize),
    /// The task at this position should be started.
    Start(usize),
    /// Every task has started and finished.
    Exhausted,
}

/// Position of the first task with `start` set and `end` unset.
pub fn find_active(tasks: &[Task]) -> Option<usize> {
    tasks.iter().position(Task::is_active)
}

/// Position of the first task that has not started.
pub fn first_unstarted(tasks: &[Task]) -> Option<usize> {
    tasks.iter().position(|task| task.start.is_none())
}

pub fn active_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|task| task.is_active()).count()
}

/// Whether the single-active-task invariant holds.
pub fn is_well_formed(tasks: &[Task]) -> bool {
    active_count(tasks) <= 1
}

/// Decides the next sequencing step.
pub fn next_step(tasks: &[Task]) -> Step {
    if let Some(index) = find_active(tasks) {
        return Step::InProgress(index);
    }
    match first_unstarted(tasks) {
        Some(index) => Step::Start(index),
        None => Step::Exhausted,
    }
}

/// Returns every active task after the first one to "not started".
///
/// Used after a finished task is re-opened while the sequencer had already
/// moved on. Returns the positions that were rewound.
pub fn rewind(tasks: &mut [Task]) -> Vec<usize> {
    let Some(keep) = find_active(tasks) else {
        return Vec::new();
    };

    let mut rewound = Vec::new();
    for (index, task) in tasks.iter_mut().enumerate().skip(keep + 1) {
        if task.is_active() {
            task.start = None;
            rewound.push(index);
        }
    }
    rewound
}
