//! Reminder policy.
//!
//! Pure decision over a time-stamped, intervallic record. Chore data and
//! tasks share the relevant fields and are treated the same way.

use crate::model::chore::{ChoreData, Task, Timestamp};

/// Fields the reminder policy reads.
pub trait Remindable {
    fn delay(&self) -> Option<i64>;
    fn start(&self) -> Option<Timestamp>;
    fn paused(&self) -> bool;
    fn interval(&self) -> Option<i64>;
    fn notified(&self) -> Option<Timestamp>;
}

impl Remindable for ChoreData {
    fn delay(&self) -> Option<i64> {
        self.delay
    }

    fn start(&self) -> Option<Timestamp> {
        self.start
    }

    fn paused(&self) -> bool {
        self.is_paused()
    }

    fn interval(&self) -> Option<i64> {
        self.interval
    }

    fn notified(&self) -> Option<Timestamp> {
        self.notified
    }
}

impl Remindable for Task {
    fn delay(&self) -> Option<i64> {
        self.delay
    }

    fn start(&self) -> Option<Timestamp> {
        self.start
    }

    fn paused(&self) -> bool {
        self.is_paused()
    }

    fn interval(&self) -> Option<i64> {
        self.interval
    }

    fn notified(&self) -> Option<Timestamp> {
        self.notified
    }
}

/// Decides whether a reminder is due at `now`.
///
/// Rules, first match wins:
/// 1. A `delay` keeps reminders quiet while `start + delay > now`. A
///    delayed record that never started stays quiet.
/// 2. Paused records stay quiet.
/// 3. With an `interval`, remind once `now > notified + interval`. A record
///    never notified is due immediately.
/// 4. Otherwise stay quiet.
pub fn should_remind(record: &impl Remindable, now: Timestamp) -> bool {
    if let Some(delay) = record.delay() {
        match record.start() {
            Some(start) if start.saturating_add(delay) > now => return false,
            None => return false,
            Some(_) => {}
        }
    }

    if record.paused() {
        return false;
    }

    match record.interval() {
        Some(interval) => record
            .notified()
            .map_or(true, |notified| now > notified.saturating_add(interval)),
        None => false,
    }
}
