use nandy_core::db::open_db_in_memory;
use nandy_core::{
    ChoreDraft, ChoreListQuery, ChoreRepository, ChoreService, ChoreServiceError, ChoreStatus,
    FixedClock, MemoryChannel, MemoryMetrics, Operation, Person, PersonRepository,
    SqliteChoreRepository, SqlitePersonRepository, SqliteTemplateRepository, Template,
    TemplateKind, TemplateRepository, Workflow,
};
use rusqlite::Connection;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use uuid::Uuid;

struct Fakes {
    speech: Arc<MemoryChannel>,
    metrics: Arc<MemoryMetrics>,
    clock: Arc<FixedClock>,
}

impl Fakes {
    fn at(now: i64) -> Self {
        Self {
            speech: Arc::new(MemoryChannel::default()),
            metrics: Arc::new(MemoryMetrics::new()),
            clock: Arc::new(FixedClock::new(now)),
        }
    }

    fn workflow(&self) -> Workflow {
        Workflow::new(
            self.speech.clone(),
            self.metrics.clone(),
            self.clock.clone(),
        )
    }

    fn texts(&self) -> Vec<String> {
        self.speech
            .drain()
            .into_iter()
            .map(|message| message.text)
            .collect()
    }
}

fn service<'conn>(
    conn: &'conn Connection,
    fakes: &Fakes,
) -> ChoreService<SqliteChoreRepository<'conn>, SqlitePersonRepository<'conn>> {
    ChoreService::new(
        SqliteChoreRepository::new(conn),
        SqlitePersonRepository::new(conn),
        fakes.workflow(),
    )
}

fn add_person(conn: &Connection, name: &str) -> Person {
    let person = Person::new(name, format!("{name}@example.com"));
    SqlitePersonRepository::new(conn)
        .create_person(&person)
        .unwrap();
    person
}

fn blueprint(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("blueprint must be an object, got {other}"),
    }
}

#[test]
fn create_chore_from_template_starts_first_task() {
    let conn = open_db_in_memory().unwrap();
    add_person(&conn, "kid");
    let fakes = Fakes::at(1);
    let service = service(&conn, &fakes);

    let template = blueprint(json!({
        "text": "chore it",
        "name": "Chore It",
        "person": "kid",
        "tasks": [{"text": "do it"}]
    }));
    let chore = service
        .create_chore(ChoreDraft::default(), Some(&template))
        .unwrap();

    assert_eq!(chore.name, "Chore It");
    assert_eq!(chore.person_name, "kid");
    assert_eq!(chore.status, ChoreStatus::Started);
    assert_eq!(chore.created, 1);
    assert_eq!(chore.data.language.as_deref(), Some("en-us"));
    assert_eq!(chore.data.start, Some(1));
    assert_eq!(chore.data.extra_str("person"), Some("kid"));

    let task = chore.task(0).unwrap();
    assert_eq!(task.id, Some(0));
    assert_eq!(task.start, Some(1));
    assert_eq!(task.notified, Some(1));

    let texts = fakes.texts();
    assert_eq!(texts, vec!["kid, time to chore it", "kid, please do it"]);
    assert_eq!(
        texts.iter().filter(|text| text.contains("time to")).count(),
        1
    );

    let stored = service.get_chore(chore.id).unwrap();
    assert_eq!(stored, chore);
}

#[test]
fn draft_fields_override_template() {
    let conn = open_db_in_memory().unwrap();
    add_person(&conn, "kid");
    let sibling = add_person(&conn, "sibling");
    let fakes = Fakes::at(3);
    let service = service(&conn, &fakes);

    let template = blueprint(json!({
        "text": "chore it",
        "name": "Chore It",
        "person": "kid",
        "language": "fr-fr"
    }));
    let draft = ChoreDraft {
        person_id: Some(sibling.id),
        name: Some("Override".to_string()),
        data: None,
    };
    let chore = service.create_chore(draft, Some(&template)).unwrap();

    assert_eq!(chore.person_id, sibling.id);
    assert_eq!(chore.person_name, "sibling");
    assert_eq!(chore.name, "Override");
    assert_eq!(chore.data.language.as_deref(), Some("fr-fr"));
    assert_eq!(fakes.texts(), vec!["sibling, time to chore it"]);
}

#[test]
fn unknown_template_person_fails_lookup() {
    let conn = open_db_in_memory().unwrap();
    let fakes = Fakes::at(1);
    let service = service(&conn, &fakes);

    let template = blueprint(json!({
        "text": "chore it",
        "name": "Chore It",
        "person": "nobody"
    }));
    let err = service
        .create_chore(ChoreDraft::default(), Some(&template))
        .unwrap_err();

    match err {
        ChoreServiceError::PersonLookupFailed(name) => assert_eq!(name, "nobody"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(fakes.texts().is_empty());
    assert!(service
        .list_chores(&ChoreListQuery::default())
        .unwrap()
        .is_empty());
}

#[test]
fn missing_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let kid = add_person(&conn, "kid");
    let fakes = Fakes::at(1);
    let service = service(&conn, &fakes);

    let err = service
        .create_chore(ChoreDraft::for_person(kid.id), None)
        .unwrap_err();
    assert!(matches!(err, ChoreServiceError::MissingField("name")));
}

#[test]
fn create_chore_from_named_template() {
    let conn = open_db_in_memory().unwrap();
    add_person(&conn, "kid");
    let templates = SqliteTemplateRepository::new(&conn);
    templates
        .create_template(&Template::new(
            "morning",
            TemplateKind::Chore,
            blueprint(json!({
                "text": "get ready",
                "name": "Morning",
                "person": "kid",
                "tasks": [{"text": "wake up"}, {"text": "get dressed"}]
            })),
        ))
        .unwrap();
    let fakes = Fakes::at(5);
    let service = service(&conn, &fakes);

    let chore = service
        .create_chore_from_template(&templates, "morning", ChoreDraft::default())
        .unwrap();
    assert_eq!(chore.name, "Morning");
    assert_eq!(chore.data.tasks().len(), 2);
    assert_eq!(chore.task(1).unwrap().id, Some(1));

    let err = service
        .create_chore_from_template(&templates, "evening", ChoreDraft::default())
        .unwrap_err();
    assert!(matches!(err, ChoreServiceError::TemplateNotFound(name) if name == "evening"));
}

#[test]
fn apply_persists_only_changes() {
    let conn = open_db_in_memory().unwrap();
    add_person(&conn, "kid");
    let fakes = Fakes::at(1);
    let service = service(&conn, &fakes);

    let template = blueprint(json!({
        "text": "chore it",
        "name": "Chore It",
        "person": "kid",
        "tasks": [{"text": "do it"}]
    }));
    let chore = service
        .create_chore(ChoreDraft::default(), Some(&template))
        .unwrap();
    fakes.clock.set(7);

    let (transition, done) = service.apply(chore.id, Operation::Next).unwrap();
    assert!(transition.changed);
    assert!(transition.chore_status_changed);
    assert_eq!(done.status, ChoreStatus::Ended);

    let stored = service.get_chore(chore.id).unwrap();
    assert_eq!(stored.status, ChoreStatus::Ended);
    assert_eq!(stored.data.end, Some(7));

    let (transition, _) = service.apply(chore.id, Operation::Next).unwrap();
    assert!(!transition.changed);

    let samples = fakes.metrics.samples();
    assert_eq!(samples.last().unwrap().name, "person.kid.chore.chore_it.duration");
    assert_eq!(samples.last().unwrap().value, 6);
}

#[test]
fn apply_to_missing_chore_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let fakes = Fakes::at(1);
    let service = service(&conn, &fakes);
    let missing = Uuid::new_v4();

    let err = service.apply(missing, Operation::PauseChore).unwrap_err();
    assert!(matches!(err, ChoreServiceError::ChoreNotFound(id) if id == missing));
}

#[test]
fn apply_with_unknown_task_surfaces_workflow_error() {
    let conn = open_db_in_memory().unwrap();
    add_person(&conn, "kid");
    let fakes = Fakes::at(1);
    let service = service(&conn, &fakes);
    let template = blueprint(json!({"text": "chore it", "name": "Chore It", "person": "kid"}));
    let chore = service
        .create_chore(ChoreDraft::default(), Some(&template))
        .unwrap();

    let err = service
        .apply(chore.id, Operation::SkipTask(3))
        .unwrap_err();
    assert!(matches!(err, ChoreServiceError::Workflow(_)));
}

#[test]
fn remind_all_sweeps_started_chores() {
    let conn = open_db_in_memory().unwrap();
    add_person(&conn, "kid");
    let fakes = Fakes::at(1);
    let service = service(&conn, &fakes);

    let template = blueprint(json!({
        "text": "chore it",
        "name": "Chore It",
        "person": "kid",
        "interval": 5,
        "tasks": [{"text": "do it", "interval": 5}]
    }));
    let chore = service
        .create_chore(ChoreDraft::default(), Some(&template))
        .unwrap();
    fakes.speech.drain();

    fakes.clock.set(4);
    assert_eq!(service.remind_all().unwrap(), 0);
    assert!(fakes.texts().is_empty());

    fakes.clock.set(7);
    assert_eq!(service.remind_all().unwrap(), 1);
    assert_eq!(
        fakes.texts(),
        vec!["kid, you still have to chore it", "kid, please do it"]
    );

    let stored = service.get_chore(chore.id).unwrap();
    assert_eq!(stored.data.notified, Some(7));
    assert_eq!(stored.task(0).unwrap().notified, Some(7));

    service.apply(chore.id, Operation::SkipChore).unwrap();
    fakes.speech.drain();
    fakes.clock.set(100);
    assert_eq!(service.remind_all().unwrap(), 0);
    assert!(fakes.texts().is_empty());
}

#[test]
fn list_chores_filters_by_status_and_person() {
    let conn = open_db_in_memory().unwrap();
    let kid = add_person(&conn, "kid");
    let sibling = add_person(&conn, "sibling");
    let fakes = Fakes::at(1);
    let service = service(&conn, &fakes);

    let first = service
        .create_chore(
            ChoreDraft {
                person_id: Some(kid.id),
                name: Some("First".to_string()),
                data: None,
            },
            None,
        )
        .unwrap();
    fakes.clock.set(2);
    service
        .create_chore(
            ChoreDraft {
                person_id: Some(sibling.id),
                name: Some("Second".to_string()),
                data: None,
            },
            None,
        )
        .unwrap();
    service.apply(first.id, Operation::CompleteChore).unwrap();

    let all = service.list_chores(&ChoreListQuery::default()).unwrap();
    let names: Vec<_> = all.iter().map(|chore| chore.name.as_str()).collect();
    assert_eq!(names, vec!["Second", "First"]);

    let started = service.list_chores(&ChoreListQuery::started()).unwrap();
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].name, "Second");

    let for_kid = service
        .list_chores(&ChoreListQuery {
            person_id: Some(kid.id),
            ..ChoreListQuery::default()
        })
        .unwrap();
    assert_eq!(for_kid.len(), 1);
    assert_eq!(for_kid[0].id, first.id);

    SqliteChoreRepository::new(&conn)
        .delete_chore(first.id)
        .unwrap();
    assert!(matches!(
        service.get_chore(first.id),
        Err(ChoreServiceError::ChoreNotFound(_))
    ));
}
