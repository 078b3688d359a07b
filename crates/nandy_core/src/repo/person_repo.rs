//! Person repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Person names are unique; name lookups return at most one id.

use super::{parse_uuid, RepoResult};
use crate::model::person::{Person, PersonId};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for people.
pub trait PersonRepository {
    fn create_person(&self, person: &Person) -> RepoResult<PersonId>;
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    /// Resolves a unique person name to its id.
    fn find_person_id_by_name(&self, name: &str) -> RepoResult<Option<PersonId>>;
    /// Lists people ordered by name.
    fn list_persons(&self) -> RepoResult<Vec<Person>>;
}

/// SQLite-backed person repository.
#[derive(Clone, Copy)]
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, person: &Person) -> RepoResult<PersonId> {
        self.conn.execute(
            "INSERT INTO persons (person_uuid, name, email) VALUES (?1, ?2, ?3);",
            params![
                person.id.to_string(),
                person.name.as_str(),
                person.email.as_str()
            ],
        )?;
        Ok(person.id)
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare("SELECT person_uuid, name, email FROM persons WHERE person_uuid = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }
        Ok(None)
    }

    fn find_person_id_by_name(&self, name: &str) -> RepoResult<Option<PersonId>> {
        let id_text: Option<String> = self
            .conn
            .query_row(
                "SELECT person_uuid FROM persons WHERE name = ?1;",
                [name],
                |row| row.get(0),
            )
            .optional()?;

        id_text
            .map(|text| parse_uuid(&text, "persons.person_uuid"))
            .transpose()
    }

    fn list_persons(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare("SELECT person_uuid, name, email FROM persons ORDER BY name ASC;")?;
        let mut rows = stmt.query([])?;
        let mut persons = Vec::new();
        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }
        Ok(persons)
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let id_text: String = row.get("person_uuid")?;
    Ok(Person {
        id: parse_uuid(&id_text, "persons.person_uuid")?,
        name: row.get("name")?,
        email: row.get("email")?,
    })
}
