use nandy_core::workflow::sequencer;
use nandy_core::{
    Chore, ChoreData, ChoreStatus, FixedClock, MemoryChannel, MemoryMetrics, Operation, Task,
    Transition, Workflow, WorkflowError,
};
use std::sync::Arc;
use uuid::Uuid;

struct Harness {
    speech: Arc<MemoryChannel>,
    metrics: Arc<MemoryMetrics>,
    clock: Arc<FixedClock>,
    workflow: Workflow,
}

impl Harness {
    fn at(now: i64) -> Self {
        let speech = Arc::new(MemoryChannel::default());
        let metrics = Arc::new(MemoryMetrics::new());
        let clock = Arc::new(FixedClock::new(now));
        let workflow = Workflow::new(speech.clone(), metrics.clone(), clock.clone());
        Self {
            speech,
            metrics,
            clock,
            workflow,
        }
    }

    fn texts(&self) -> Vec<String> {
        self.speech
            .drain()
            .into_iter()
            .map(|message| message.text)
            .collect()
    }
}

fn chore_with_tasks(texts: &[&str]) -> Chore {
    let mut data = ChoreData::new("chore it");
    data.start = Some(1);
    data.tasks = Some(texts.iter().map(|text| Task::new(*text)).collect());
    data.assign_task_ids();
    Chore::new(Uuid::new_v4(), "kid", "Chore It", data, 0)
}

#[test]
fn pause_and_unpause_chore_speak_once_and_are_idempotent() {
    let harness = Harness::at(5);
    let mut chore = chore_with_tasks(&[]);

    assert_eq!(harness.workflow.pause_chore(&mut chore), Transition::changed());
    assert_eq!(harness.workflow.pause_chore(&mut chore), Transition::unchanged());
    assert!(chore.data.is_paused());
    assert_eq!(chore.data.notified, Some(5));
    assert_eq!(chore.data.updated, Some(5));

    assert!(harness.workflow.unpause_chore(&mut chore).changed);
    assert!(!harness.workflow.unpause_chore(&mut chore).changed);
    assert_eq!(chore.data.paused, Some(false));

    assert_eq!(
        harness.texts(),
        vec![
            "kid, you do not have to chore it yet",
            "kid, you do have to chore it now",
        ]
    );
}

#[test]
fn skip_and_unskip_chore_flip_status() {
    let harness = Harness::at(9);
    let mut chore = chore_with_tasks(&["do it"]);

    let skipped = harness.workflow.skip_chore(&mut chore);
    assert_eq!(skipped, Transition::status_changed());
    assert_eq!(chore.status, ChoreStatus::Ended);
    assert_eq!(chore.data.end, Some(9));
    assert!(harness.metrics.samples().is_empty());

    assert!(!harness.workflow.skip_chore(&mut chore).changed);

    let unskipped = harness.workflow.unskip_chore(&mut chore);
    assert_eq!(unskipped, Transition::status_changed());
    assert_eq!(chore.status, ChoreStatus::Started);
    assert_eq!(chore.data.end, None);
    assert_eq!(chore.data.skipped, Some(false));

    assert_eq!(
        harness.texts(),
        vec!["kid, you do not have to chore it", "kid, you do have to chore it"]
    );
}

#[test]
fn complete_chore_emits_duration_and_incomplete_reopens() {
    let harness = Harness::at(7);
    let mut chore = chore_with_tasks(&[]);

    assert!(harness.workflow.complete_chore(&mut chore).chore_status_changed);
    assert_eq!(chore.data.end, Some(7));
    assert!(!harness.workflow.complete_chore(&mut chore).changed);

    let samples = harness.metrics.samples();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].name, "person.kid.chore.chore_it.duration");
    assert_eq!(samples[0].value, 6);
    assert_eq!(samples[0].timestamp, 1);

    assert!(harness.workflow.incomplete_chore(&mut chore).chore_status_changed);
    assert!(!chore.is_ended());
    assert_eq!(chore.data.end, None);
    assert!(!harness.workflow.incomplete_chore(&mut chore).changed);

    assert_eq!(
        harness.texts(),
        vec![
            "kid, thank you. You did chore it",
            "kid, I'm sorry but you did not chore it yet",
        ]
    );
}

#[test]
fn corrupt_start_saturates_duration_metrics() {
    let harness = Harness::at(7);
    let mut chore = chore_with_tasks(&["do it"]);
    chore.data.start = Some(i64::MIN);
    chore.data.tasks.as_mut().unwrap()[0].start = Some(i64::MIN);

    let transition = harness.workflow.complete_task(&mut chore, 0).unwrap();
    assert_eq!(transition, Transition::status_changed());

    let values: Vec<_> = harness
        .metrics
        .samples()
        .into_iter()
        .map(|sample| sample.value)
        .collect();
    assert_eq!(values, vec![i64::MAX, i64::MAX]);
}

#[test]
fn complete_chore_without_start_skips_metric() {
    let harness = Harness::at(7);
    let mut chore = Chore::new(Uuid::new_v4(), "kid", "Chore It", ChoreData::new("chore it"), 0);

    assert!(harness.workflow.complete_chore(&mut chore).changed);
    assert!(chore.is_ended());
    assert!(harness.metrics.samples().is_empty());
}

#[test]
fn completing_last_task_ends_chore_with_duration_metric() {
    let harness = Harness::at(7);
    let mut chore = chore_with_tasks(&["do it"]);
    chore.data.tasks.as_mut().unwrap()[0].start = Some(1);

    let transition = harness.workflow.complete_task(&mut chore, 0).unwrap();
    assert_eq!(transition, Transition::status_changed());
    assert_eq!(chore.status, ChoreStatus::Ended);
    assert_eq!(chore.data.end, Some(7));
    assert_eq!(chore.task(0).unwrap().end, Some(7));

    let samples = harness.metrics.samples();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].name, "person.kid.chore.chore_it.task.do_it.duration");
    assert_eq!(samples[0].value, 6);
    assert_eq!(samples[1].name, "person.kid.chore.chore_it.duration");
    assert_eq!(samples[1].value, 6);
    assert_eq!(samples[1].timestamp, 1);

    assert_eq!(
        harness.texts(),
        vec!["kid, you did do it", "kid, thank you. You did chore it"]
    );
}

#[test]
fn complete_then_incomplete_task_restores_started_chore() {
    let harness = Harness::at(7);
    let mut chore = chore_with_tasks(&["do it"]);
    chore.data.tasks.as_mut().unwrap()[0].start = Some(1);

    harness.workflow.complete_task(&mut chore, 0).unwrap();
    assert!(chore.is_ended());
    harness.speech.drain();

    let transition = harness.workflow.incomplete_task(&mut chore, 0).unwrap();
    assert_eq!(transition, Transition::status_changed());
    assert_eq!(chore.status, ChoreStatus::Started);
    assert_eq!(chore.data.end, None);
    assert_eq!(chore.task(0).unwrap().end, None);
    assert_eq!(chore.task(0).unwrap().start, Some(1));

    assert_eq!(
        harness.texts(),
        vec![
            "kid, I'm sorry but you did not do it yet",
            "kid, I'm sorry but you did not chore it yet",
        ]
    );
}

#[test]
fn skipping_unstarted_task_starts_next_eligible_in_order() {
    let harness = Harness::at(4);
    let mut chore = chore_with_tasks(&["wake up", "get dressed", "brush teeth"]);

    let transition = harness.workflow.skip_task(&mut chore, 0).unwrap();
    assert_eq!(transition, Transition::changed());

    let first = chore.task(0).unwrap();
    assert_eq!(first.start, Some(4));
    assert_eq!(first.end, Some(4));
    assert_eq!(first.skipped, Some(true));
    assert_eq!(chore.task(1).unwrap().start, Some(4));
    assert_eq!(chore.task(2).unwrap().start, None);

    assert_eq!(
        harness.texts(),
        vec!["kid, you do not have to wake up", "kid, please get dressed"]
    );
}

#[test]
fn skipping_passes_over_pre_skipped_tasks() {
    let harness = Harness::at(4);
    let mut chore = chore_with_tasks(&["wake up", "get dressed", "brush teeth"]);
    {
        let tasks = chore.data.tasks.as_mut().unwrap();
        tasks[1].skipped = Some(true);
        tasks[1].start = Some(2);
        tasks[1].end = Some(2);
    }

    harness.workflow.skip_task(&mut chore, 0).unwrap();
    assert_eq!(chore.task(2).unwrap().start, Some(4));
}

#[test]
fn unskipping_task_on_ended_chore_speaks_task_then_chore() {
    let harness = Harness::at(10);
    let mut chore = chore_with_tasks(&["do it"]);

    harness.workflow.skip_task(&mut chore, 0).unwrap();
    assert!(chore.is_ended());
    harness.speech.drain();

    let transition = harness.workflow.unskip_task(&mut chore, 0).unwrap();
    assert_eq!(transition, Transition::status_changed());
    assert_eq!(chore.status, ChoreStatus::Started);
    assert_eq!(chore.data.end, None);
    assert_eq!(chore.task(0).unwrap().skipped, Some(false));
    assert_eq!(chore.task(0).unwrap().end, None);

    assert_eq!(
        harness.texts(),
        vec![
            "kid, you do have to do it",
            "kid, I'm sorry but you did not chore it yet",
        ]
    );
}

#[test]
fn reopening_earlier_task_rewinds_later_active_task() {
    let harness = Harness::at(3);
    let mut chore = chore_with_tasks(&["wake up", "get dressed"]);
    harness.workflow.advance(&mut chore);
    harness.workflow.next_task(&mut chore);
    assert_eq!(sequencer::find_active(chore.data.tasks()), Some(1));

    harness.workflow.incomplete_task(&mut chore, 0).unwrap();

    assert_eq!(sequencer::active_count(chore.data.tasks()), 1);
    assert_eq!(sequencer::find_active(chore.data.tasks()), Some(0));
    assert_eq!(chore.task(1).unwrap().start, None);
}

#[test]
fn pause_task_speaks_with_task_notified() {
    let harness = Harness::at(6);
    let mut chore = chore_with_tasks(&["do it"]);

    assert!(harness.workflow.pause_task(&mut chore, 0).unwrap().changed);
    assert!(!harness.workflow.pause_task(&mut chore, 0).unwrap().changed);
    assert_eq!(chore.task(0).unwrap().notified, Some(6));
    assert_eq!(chore.data.notified, Some(6));

    harness.clock.set(8);
    assert!(harness.workflow.unpause_task(&mut chore, 0).unwrap().changed);
    assert_eq!(chore.task(0).unwrap().notified, Some(8));

    assert_eq!(
        harness.texts(),
        vec!["kid, you do not have to do it yet", "kid, you do have to do it now"]
    );
}

#[test]
fn advance_announces_paused_task_differently() {
    let harness = Harness::at(2);
    let mut chore = chore_with_tasks(&["do it"]);
    chore.data.tasks.as_mut().unwrap()[0].paused = Some(true);

    assert!(harness.workflow.advance(&mut chore).changed);
    assert_eq!(chore.task(0).unwrap().start, Some(2));
    assert_eq!(harness.texts(), vec!["kid, you do not have to do it yet"]);

    assert!(!harness.workflow.advance(&mut chore).changed);
}

#[test]
fn advance_leaves_chore_without_task_list_alone() {
    let harness = Harness::at(2);
    let mut chore = Chore::new(Uuid::new_v4(), "kid", "Chore It", ChoreData::new("chore it"), 0);

    assert_eq!(harness.workflow.advance(&mut chore), Transition::unchanged());
    assert!(!chore.is_ended());
}

#[test]
fn next_without_active_task_is_noop() {
    let harness = Harness::at(2);
    let mut chore = chore_with_tasks(&["do it"]);

    assert_eq!(harness.workflow.next_task(&mut chore), Transition::unchanged());
    assert!(harness.texts().is_empty());
}

#[test]
fn unknown_task_id_is_an_error() {
    let harness = Harness::at(2);
    let mut chore = chore_with_tasks(&["do it"]);

    let err = harness
        .workflow
        .apply(&mut chore, Operation::CompleteTask(7))
        .unwrap_err();
    assert_eq!(
        err,
        WorkflowError::TaskNotFound {
            chore_id: chore.id,
            task_id: 7
        }
    );
}

#[test]
fn speech_carries_language_and_node() {
    let harness = Harness::at(2);
    let mut chore = chore_with_tasks(&[]);
    chore.data.language = Some("de-de".to_string());
    chore.data.node = Some("bump".to_string());

    harness.workflow.pause_chore(&mut chore);

    let messages = harness.speech.messages();
    assert_eq!(messages[0].timestamp, 2);
    assert_eq!(messages[0].language, "de-de");
    assert_eq!(messages[0].node.as_deref(), Some("bump"));
}

#[test]
fn remind_speaks_due_chore_and_active_task() {
    let harness = Harness::at(10);
    let mut chore = chore_with_tasks(&["do it", "do that"]);
    chore.data.interval = Some(5);
    chore.data.notified = Some(0);
    {
        let tasks = chore.data.tasks.as_mut().unwrap();
        tasks[0].start = Some(0);
        tasks[0].interval = Some(5);
        tasks[0].notified = Some(0);
        tasks[1].interval = Some(1);
    }

    assert!(harness.workflow.remind(&mut chore));
    assert_eq!(
        harness.texts(),
        vec!["kid, you still have to chore it", "kid, please do it"]
    );
    assert_eq!(chore.data.notified, Some(10));
    assert_eq!(chore.task(0).unwrap().notified, Some(10));

    harness.clock.advance(3);
    assert!(!harness.workflow.remind(&mut chore));
    assert!(harness.texts().is_empty());
}

#[test]
fn remind_stays_quiet_for_paused_chore() {
    let harness = Harness::at(10);
    let mut chore = chore_with_tasks(&[]);
    chore.data.interval = Some(1);
    chore.data.notified = Some(0);
    chore.data.paused = Some(true);

    assert!(!harness.workflow.remind(&mut chore));
}
