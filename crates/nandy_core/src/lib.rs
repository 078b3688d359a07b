//! Core domain logic for Nandy, a household chore tracker.
//! This crate is the single source of truth for chore and task invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod workflow;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{MetricsConfig, NandyConfig, SpeechConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, LogSettings, LoggingError};
pub use metrics::{metric_name, MemoryMetrics, MetricSample, MetricsSink, PlaintextMetrics};
pub use model::act::{Act, ActId, ActValue};
pub use model::area::{Area, AreaData, AreaId, AreaStatusRule};
pub use model::chore::{Chore, ChoreData, ChoreId, ChoreStatus, Task, TaskId, Timestamp};
pub use model::person::{Person, PersonId};
pub use model::template::{Template, TemplateId, TemplateKind};
pub use notify::{JsonLinesChannel, MemoryChannel, NotifyError, SpeechChannel, SpeechMessage};
pub use repo::act_repo::{ActRepository, SqliteActRepository};
pub use repo::area_repo::{AreaRepository, SqliteAreaRepository};
pub use repo::chore_repo::{ChoreListQuery, ChoreRepository, SqliteChoreRepository};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::template_repo::{SqliteTemplateRepository, TemplateRepository};
pub use repo::{RepoError, RepoResult};
pub use service::act_service::{ActDraft, ActOutcome, ActService};
pub use service::area_service::AreaService;
pub use service::chore_service::{ChoreDraft, ChoreService, ChoreServiceError, ServiceResult};
pub use workflow::{Operation, Transition, Workflow, WorkflowError, WorkflowResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
