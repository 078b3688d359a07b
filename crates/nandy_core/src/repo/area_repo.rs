//! Area repository contracts and SQLite implementation.

use super::{decode_data, encode_data, parse_uuid, RepoError, RepoResult};
use crate::model::area::{Area, AreaId};
use rusqlite::{params, Connection, Row};

const AREA_SELECT_SQL: &str = "SELECT area_uuid, name, status, updated, data FROM areas";

pub trait AreaRepository {
    fn create_area(&self, area: &Area) -> RepoResult<AreaId>;
    fn update_area(&self, area: &Area) -> RepoResult<()>;
    fn get_area(&self, id: AreaId) -> RepoResult<Option<Area>>;
    /// Lists areas ordered by name.
    fn list_areas(&self) -> RepoResult<Vec<Area>>;
}

#[derive(Clone, Copy)]
pub struct SqliteAreaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAreaRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AreaRepository for SqliteAreaRepository<'_> {
    fn create_area(&self, area: &Area) -> RepoResult<AreaId> {
        self.conn.execute(
            "INSERT INTO areas (area_uuid, name, status, updated, data)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                area.id.to_string(),
                area.name.as_str(),
                area.status.as_str(),
                area.updated,
                encode_data(&area.data)?,
            ],
        )?;
        Ok(area.id)
    }

    fn update_area(&self, area: &Area) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE areas SET name = ?1, status = ?2, updated = ?3, data = ?4
             WHERE area_uuid = ?5;",
            params![
                area.name.as_str(),
                area.status.as_str(),
                area.updated,
                encode_data(&area.data)?,
                area.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(area.id));
        }
        Ok(())
    }

    fn get_area(&self, id: AreaId) -> RepoResult<Option<Area>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AREA_SELECT_SQL} WHERE area_uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_area_row(row)?));
        }
        Ok(None)
    }

    fn list_areas(&self) -> RepoResult<Vec<Area>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AREA_SELECT_SQL} ORDER BY name ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut areas = Vec::new();
        while let Some(row) = rows.next()? {
            areas.push(parse_area_row(row)?);
        }
        Ok(areas)
    }
}

fn parse_area_row(row: &Row<'_>) -> RepoResult<Area> {
    let id_text: String = row.get("area_uuid")?;
    let data_text: String = row.get("data")?;

    Ok(Area {
        id: parse_uuid(&id_text, "areas.area_uuid")?,
        name: row.get("name")?,
        status: row.get("status")?,
        updated: row.get("updated")?,
        data: decode_data(&data_text, "areas.data")?,
    })
}
