//! Act repository contracts and SQLite implementation.

use super::{decode_data, encode_data, parse_uuid, RepoError, RepoResult};
use crate::model::act::{Act, ActId, ActValue};
use crate::model::person::PersonId;
use rusqlite::{params, Connection, Row};

const ACT_SELECT_SQL: &str =
    "SELECT act_uuid, person_uuid, name, value, created, data FROM acts";

pub trait ActRepository {
    fn create_act(&self, act: &Act) -> RepoResult<ActId>;
    fn get_act(&self, id: ActId) -> RepoResult<Option<Act>>;
    /// Lists acts newest first, optionally for one person.
    fn list_acts(&self, person_id: Option<PersonId>) -> RepoResult<Vec<Act>>;
}

#[derive(Clone, Copy)]
pub struct SqliteActRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ActRepository for SqliteActRepository<'_> {
    fn create_act(&self, act: &Act) -> RepoResult<ActId> {
        self.conn.execute(
            "INSERT INTO acts (act_uuid, person_uuid, name, value, created, data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                act.id.to_string(),
                act.person_id.to_string(),
                act.name.as_str(),
                act.value.as_str(),
                act.created,
                encode_data(&act.data)?,
            ],
        )?;
        Ok(act.id)
    }

    fn get_act(&self, id: ActId) -> RepoResult<Option<Act>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACT_SELECT_SQL} WHERE act_uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_act_row(row)?));
        }
        Ok(None)
    }

    fn list_acts(&self, person_id: Option<PersonId>) -> RepoResult<Vec<Act>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ACT_SELECT_SQL}
             WHERE (?1 IS NULL OR person_uuid = ?1)
             ORDER BY created DESC, act_uuid ASC;"
        ))?;
        let mut rows = stmt.query(params![person_id.map(|id| id.to_string())])?;
        let mut acts = Vec::new();
        while let Some(row) = rows.next()? {
            acts.push(parse_act_row(row)?);
        }
        Ok(acts)
    }
}

fn parse_act_row(row: &Row<'_>) -> RepoResult<Act> {
    let id_text: String = row.get("act_uuid")?;
    let person_text: String = row.get("person_uuid")?;
    let value_text: String = row.get("value")?;
    let value = ActValue::parse(&value_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid act value `{value_text}` in acts.value"))
    })?;
    let data_text: String = row.get("data")?;

    Ok(Act {
        id: parse_uuid(&id_text, "acts.act_uuid")?,
        person_id: parse_uuid(&person_text, "acts.person_uuid")?,
        name: row.get("name")?,
        value,
        created: row.get("created")?,
        data: decode_data(&data_text, "acts.data")?,
    })
}
