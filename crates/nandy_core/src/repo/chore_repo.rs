//! Chore repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist chores with their JSON `data` map.
//! - Join the owning person's name on read so speech can address them.
//!
//! # Invariants
//! - `person_name` is never stored on the chore row; reads always join it.
//! - Lists are ordered newest first (`created DESC`).

use super::{decode_data, encode_data, parse_uuid, RepoError, RepoResult};
use crate::model::chore::{Chore, ChoreId, ChoreStatus};
use crate::model::person::PersonId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const CHORE_SELECT_SQL: &str = "SELECT
    c.chore_uuid,
    c.person_uuid,
    p.name AS person_name,
    c.name,
    c.status,
    c.created,
    c.updated,
    c.data
FROM chores c
JOIN persons p ON p.person_uuid = c.person_uuid";

/// Filter options for listing chores.
#[derive(Debug, Clone, Default)]
pub struct ChoreListQuery {
    pub status: Option<ChoreStatus>,
    pub person_id: Option<PersonId>,
    pub limit: Option<u32>,
}

impl ChoreListQuery {
    /// Every chore still in progress, the reminder sweep's working set.
    pub fn started() -> Self {
        Self {
            status: Some(ChoreStatus::Started),
            ..Self::default()
        }
    }
}

/// Repository interface for chores.
pub trait ChoreRepository {
    fn create_chore(&self, chore: &Chore) -> RepoResult<ChoreId>;
    /// Saves every mutable column of an existing chore.
    fn update_chore(&self, chore: &Chore) -> RepoResult<()>;
    fn get_chore(&self, id: ChoreId) -> RepoResult<Option<Chore>>;
    fn list_chores(&self, query: &ChoreListQuery) -> RepoResult<Vec<Chore>>;
    fn delete_chore(&self, id: ChoreId) -> RepoResult<()>;
}

/// SQLite-backed chore repository.
#[derive(Clone, Copy)]
pub struct SqliteChoreRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteChoreRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ChoreRepository for SqliteChoreRepository<'_> {
    fn create_chore(&self, chore: &Chore) -> RepoResult<ChoreId> {
        self.conn.execute(
            "INSERT INTO chores (
                chore_uuid,
                person_uuid,
                name,
                status,
                created,
                updated,
                data
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                chore.id.to_string(),
                chore.person_id.to_string(),
                chore.name.as_str(),
                chore.status.as_str(),
                chore.created,
                chore.updated,
                encode_data(&chore.data)?,
            ],
        )?;

        Ok(chore.id)
    }

    fn update_chore(&self, chore: &Chore) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE chores
             SET
                person_uuid = ?1,
                name = ?2,
                status = ?3,
                updated = ?4,
                data = ?5
             WHERE chore_uuid = ?6;",
            params![
                chore.person_id.to_string(),
                chore.name.as_str(),
                chore.status.as_str(),
                chore.updated,
                encode_data(&chore.data)?,
                chore.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(chore.id));
        }

        Ok(())
    }

    fn get_chore(&self, id: ChoreId) -> RepoResult<Option<Chore>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CHORE_SELECT_SQL} WHERE c.chore_uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_chore_row(row)?));
        }

        Ok(None)
    }

    fn list_chores(&self, query: &ChoreListQuery) -> RepoResult<Vec<Chore>> {
        let mut sql = format!("{CHORE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(" AND c.status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }

        if let Some(person_id) = query.person_id {
            sql.push_str(" AND c.person_uuid = ?");
            bind_values.push(Value::Text(person_id.to_string()));
        }

        sql.push_str(" ORDER BY c.created DESC, c.chore_uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut chores = Vec::new();

        while let Some(row) = rows.next()? {
            chores.push(parse_chore_row(row)?);
        }

        Ok(chores)
    }

    fn delete_chore(&self, id: ChoreId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM chores WHERE chore_uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_chore_row(row: &Row<'_>) -> RepoResult<Chore> {
    let id_text: String = row.get("chore_uuid")?;
    let person_text: String = row.get("person_uuid")?;

    let status_text: String = row.get("status")?;
    let status = ChoreStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid chore status `{status_text}` in chores.status"))
    })?;

    let data_text: String = row.get("data")?;

    Ok(Chore {
        id: parse_uuid(&id_text, "chores.chore_uuid")?,
        person_id: parse_uuid(&person_text, "chores.person_uuid")?,
        person_name: row.get("person_name")?,
        name: row.get("name")?,
        status,
        created: row.get("created")?,
        updated: row.get("updated")?,
        data: decode_data(&data_text, "chores.data")?,
    })
}
