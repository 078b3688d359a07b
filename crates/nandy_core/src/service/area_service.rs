//! Area status service.
//!
//! # Responsibility
//! - Change an area's status and emit one status metric per configured
//!   value.
//! - Start the chore configured for the new status.

use super::chore_service::{spawn_chore, ChoreDraft, ServiceResult};
use crate::logging::field;
use crate::model::area::Area;
use crate::repo::area_repo::AreaRepository;
use crate::repo::chore_repo::ChoreRepository;
use crate::repo::person_repo::PersonRepository;
use crate::workflow::Workflow;
use log::{debug, info};

pub struct AreaService<Ar: AreaRepository, C: ChoreRepository, P: PersonRepository> {
    areas: Ar,
    chores: C,
    persons: P,
    workflow: Workflow,
}

impl<Ar: AreaRepository, C: ChoreRepository, P: PersonRepository> AreaService<Ar, C, P> {
    pub fn new(areas: Ar, chores: C, persons: P, workflow: Workflow) -> Self {
        Self {
            areas,
            chores,
            persons,
            workflow,
        }
    }

    /// Moves the area to `current`.
    ///
    /// Returns false and does nothing when the area is already there.
    /// Otherwise persists, emits `area.{name}.status.{value}` as 1 for the
    /// new value and 0 for every other configured value, and starts the new
    /// value's chore blueprint if it has one.
    pub fn set_status(&self, area: &mut Area, current: &str) -> ServiceResult<bool> {
        if area.status == current {
            debug!(
                "event=area_status module=service status=noop area_id={}",
                area.id
            );
            return Ok(false);
        }

        let updated = self.workflow.now();
        area.status = current.to_string();
        area.updated = Some(updated);
        self.areas.update_area(area)?;

        for rule in &area.data.statuses {
            let matched = rule.value == current;
            self.workflow.emit(
                &["area", area.name.as_str(), "status", rule.value.as_str()],
                i64::from(matched),
                updated,
            );

            if let (true, Some(blueprint)) = (matched, rule.chore.as_ref()) {
                spawn_chore(
                    &self.chores,
                    &self.persons,
                    &self.workflow,
                    ChoreDraft::default(),
                    Some(blueprint),
                )?;
            }
        }

        info!(
            "event=area_status module=service status=ok area_id={} current={}",
            area.id,
            field(&area.status)
        );
        Ok(true)
    }
}
