//! Chore use-case service.
//!
//! # Responsibility
//! - Instantiate chores from drafts and templates and start them.
//! - Load, transition and persist chores by id.
//! - Run one reminder sweep over every started chore.
//!
//! # Invariants
//! - Draft fields override template values.
//! - A chore is persisted before its start notification, so a failed
//!   insert never speaks.
//! - An unresolvable template person aborts creation with
//!   `PersonLookupFailed`; it is never defaulted.

use crate::model::chore::{Chore, ChoreData, ChoreId};
use crate::model::person::PersonId;
use crate::model::template::TemplateKind;
use crate::repo::chore_repo::{ChoreListQuery, ChoreRepository};
use crate::repo::person_repo::PersonRepository;
use crate::repo::template_repo::TemplateRepository;
use crate::repo::RepoError;
use crate::workflow::{Operation, Transition, Workflow, WorkflowError};
use log::info;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ChoreServiceError>;

/// Errors from chore use-cases.
#[derive(Debug)]
pub enum ChoreServiceError {
    /// A template named a person that does not exist.
    PersonLookupFailed(String),
    /// A draft referenced a person id that does not exist.
    PersonNotFound(PersonId),
    ChoreNotFound(ChoreId),
    TemplateNotFound(String),
    /// Neither the draft nor the template supplied a required field.
    MissingField(&'static str),
    /// Template blueprint does not decode into chore data.
    InvalidTemplate(String),
    Workflow(WorkflowError),
    Repo(RepoError),
}

impl Display for ChoreServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PersonLookupFailed(name) => write!(f, "person lookup failed: `{name}`"),
            Self::PersonNotFound(id) => write!(f, "person not found: {id}"),
            Self::ChoreNotFound(id) => write!(f, "chore not found: {id}"),
            Self::TemplateNotFound(name) => write!(f, "template not found: `{name}`"),
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::InvalidTemplate(message) => write!(f, "invalid template: {message}"),
            Self::Workflow(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ChoreServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Workflow(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ChoreServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ChoreNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<WorkflowError> for ChoreServiceError {
    fn from(value: WorkflowError) -> Self {
        Self::Workflow(value)
    }
}

/// Caller-supplied chore fields. Anything left `None` is taken from the
/// template.
#[derive(Debug, Clone, Default)]
pub struct ChoreDraft {
    pub person_id: Option<PersonId>,
    pub name: Option<String>,
    pub data: Option<ChoreData>,
}

impl ChoreDraft {
    pub fn for_person(person_id: PersonId) -> Self {
        Self {
            person_id: Some(person_id),
            ..Self::default()
        }
    }
}

/// Chore service facade.
pub struct ChoreService<C: ChoreRepository, P: PersonRepository> {
    chores: C,
    persons: P,
    workflow: Workflow,
}

impl<C: ChoreRepository, P: PersonRepository> ChoreService<C, P> {
    pub fn new(chores: C, persons: P, workflow: Workflow) -> Self {
        Self {
            chores,
            persons,
            workflow,
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Creates and starts a chore.
    ///
    /// `blueprint` is a template `data` map; an empty map counts as none.
    pub fn create_chore(
        &self,
        draft: ChoreDraft,
        blueprint: Option<&Map<String, Value>>,
    ) -> ServiceResult<Chore> {
        spawn_chore(&self.chores, &self.persons, &self.workflow, draft, blueprint)
    }

    /// Creates a chore from the chore-kind template with this name.
    pub fn create_chore_from_template<T: TemplateRepository>(
        &self,
        templates: &T,
        template_name: &str,
        draft: ChoreDraft,
    ) -> ServiceResult<Chore> {
        let template = templates
            .find_template(template_name, TemplateKind::Chore)?
            .ok_or_else(|| ChoreServiceError::TemplateNotFound(template_name.to_string()))?;
        self.create_chore(draft, Some(&template.data))
    }

    pub fn get_chore(&self, id: ChoreId) -> ServiceResult<Chore> {
        self.chores
            .get_chore(id)?
            .ok_or(ChoreServiceError::ChoreNotFound(id))
    }

    pub fn list_chores(&self, query: &ChoreListQuery) -> ServiceResult<Vec<Chore>> {
        Ok(self.chores.list_chores(query)?)
    }

    /// Loads a chore, runs one operation and persists it when changed.
    pub fn apply(&self, id: ChoreId, operation: Operation) -> ServiceResult<(Transition, Chore)> {
        let mut chore = self.get_chore(id)?;
        let transition = self.workflow.apply(&mut chore, operation)?;
        if transition.changed {
            self.chores.update_chore(&chore)?;
        }
        Ok((transition, chore))
    }

    /// Sends due reminders for every started chore and its active task.
    ///
    /// Returns how many chores spoke at least one reminder.
    pub fn remind_all(&self) -> ServiceResult<usize> {
        let mut reminded = 0;
        for mut chore in self.chores.list_chores(&ChoreListQuery::started())? {
            if self.workflow.remind(&mut chore) {
                self.chores.update_chore(&chore)?;
                reminded += 1;
            }
        }

        info!(
            "event=remind_sweep module=service status=ok reminded={}",
            reminded
        );
        Ok(reminded)
    }
}

/// Chore factory shared by every service that spawns chores.
pub(crate) fn spawn_chore<C: ChoreRepository, P: PersonRepository>(
    chores: &C,
    persons: &P,
    workflow: &Workflow,
    draft: ChoreDraft,
    blueprint: Option<&Map<String, Value>>,
) -> ServiceResult<Chore> {
    let blueprint = blueprint.filter(|map| !map.is_empty());

    let mut data = match (draft.data, blueprint) {
        (Some(data), _) => data,
        (None, Some(map)) => ChoreData::from_blueprint(map)
            .map_err(|err| ChoreServiceError::InvalidTemplate(err.to_string()))?,
        (None, None) => ChoreData::default(),
    };

    let name = match draft.name {
        Some(name) => name,
        None => blueprint_str(blueprint, "name")
            .map(str::to_string)
            .ok_or(ChoreServiceError::MissingField("name"))?,
    };

    let person_id = match draft.person_id {
        Some(id) => id,
        None => {
            let person_name = blueprint_str(blueprint, "person")
                .ok_or(ChoreServiceError::MissingField("person"))?;
            persons
                .find_person_id_by_name(person_name)?
                .ok_or_else(|| ChoreServiceError::PersonLookupFailed(person_name.to_string()))?
        }
    };
    let person = persons
        .get_person(person_id)?
        .ok_or(ChoreServiceError::PersonNotFound(person_id))?;

    if data.language.is_none() {
        data.language = Some(workflow.default_language().to_string());
    }
    data.assign_task_ids();

    let mut chore = Chore::new(person.id, person.name, name, data, workflow.now());
    chores.create_chore(&chore)?;

    chore.data.start = Some(workflow.now());
    let text = format!("time to {}", chore.data.text());
    workflow.speak_chore(&mut chore, &text);
    workflow.advance(&mut chore);
    chores.update_chore(&chore)?;

    info!(
        "event=chore_create module=service status=ok chore_id={} person_id={} tasks={}",
        chore.id,
        chore.person_id,
        chore.data.tasks().len()
    );
    Ok(chore)
}

pub(super) fn blueprint_str<'a>(
    blueprint: Option<&'a Map<String, Value>>,
    key: &str,
) -> Option<&'a str> {
    blueprint.and_then(|map| map.get(key)).and_then(Value::as_str)
}
