//! Act use-case service.
//!
//! # Responsibility
//! - Record positive/negative acts and emit their score metric.
//! - Spawn the corrective chore attached to a negative act's template.
//!
//! # Invariants
//! - Only negative acts spawn chores.
//! - The act is persisted before any chore is spawned for it.

use super::chore_service::{
    blueprint_str, spawn_chore, ChoreDraft, ChoreServiceError, ServiceResult,
};
use crate::model::act::{Act, ActValue};
use crate::model::chore::Chore;
use crate::model::person::PersonId;
use crate::repo::act_repo::ActRepository;
use crate::repo::chore_repo::ChoreRepository;
use crate::repo::person_repo::PersonRepository;
use crate::workflow::Workflow;
use log::info;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Caller-supplied act fields. Anything left `None` is taken from the
/// template.
#[derive(Debug, Clone, Default)]
pub struct ActDraft {
    pub person_id: Option<PersonId>,
    pub name: Option<String>,
    pub value: Option<ActValue>,
    pub data: Option<Map<String, Value>>,
}

/// Result of recording one act.
#[derive(Debug, Clone)]
pub struct ActOutcome {
    pub act: Act,
    /// Corrective chore spawned by a negative act.
    pub chore: Option<Chore>,
}

pub struct ActService<A: ActRepository, C: ChoreRepository, P: PersonRepository> {
    acts: A,
    chores: C,
    persons: P,
    workflow: Workflow,
}

impl<A: ActRepository, C: ChoreRepository, P: PersonRepository> ActService<A, C, P> {
    pub fn new(acts: A, chores: C, persons: P, workflow: Workflow) -> Self {
        Self {
            acts,
            chores,
            persons,
            workflow,
        }
    }

    /// Records an act, emits `person.{name}.act.{act}` and, for a negative
    /// act whose template carries a `chore` blueprint, starts that chore.
    pub fn create_act(
        &self,
        draft: ActDraft,
        template: Option<&Map<String, Value>>,
    ) -> ServiceResult<ActOutcome> {
        let template = template.filter(|map| !map.is_empty());

        let name = match draft.name {
            Some(name) => name,
            None => blueprint_str(template, "name")
                .map(str::to_string)
                .ok_or(ChoreServiceError::MissingField("name"))?,
        };

        let value = match draft.value {
            Some(value) => value,
            None => blueprint_str(template, "value")
                .and_then(ActValue::parse)
                .ok_or(ChoreServiceError::MissingField("value"))?,
        };

        let person_id = match draft.person_id {
            Some(id) => id,
            None => {
                let person_name = blueprint_str(template, "person")
                    .ok_or(ChoreServiceError::MissingField("person"))?;
                self.persons
                    .find_person_id_by_name(person_name)?
                    .ok_or_else(|| ChoreServiceError::PersonLookupFailed(person_name.to_string()))?
            }
        };
        let person = self
            .persons
            .get_person(person_id)?
            .ok_or(ChoreServiceError::PersonNotFound(person_id))?;

        let act = Act {
            id: Uuid::new_v4(),
            person_id,
            name,
            value,
            created: self.workflow.now(),
            data: draft
                .data
                .or_else(|| template.cloned())
                .unwrap_or_default(),
        };
        self.acts.create_act(&act)?;

        self.workflow.emit(
            &["person", person.name.as_str(), "act", act.name.as_str()],
            act.value.score(),
            act.created,
        );
        info!(
            "event=act_create module=service status=ok act_id={} value={}",
            act.id,
            act.value.as_str()
        );

        let blueprint = template
            .and_then(|map| map.get("chore"))
            .and_then(Value::as_object);
        let chore = match (act.value, blueprint) {
            (ActValue::Negative, Some(blueprint)) => Some(spawn_chore(
                &self.chores,
                &self.persons,
                &self.workflow,
                ChoreDraft::for_person(person_id),
                Some(blueprint),
            )?),
            _ => None,
        };

        Ok(ActOutcome { act, chore })
    }
}
