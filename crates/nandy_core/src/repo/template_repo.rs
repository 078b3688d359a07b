//! Template repository contracts and SQLite implementation.

use super::{decode_data, encode_data, parse_uuid, RepoError, RepoResult};
use crate::model::template::{Template, TemplateId, TemplateKind};
use rusqlite::{params, Connection, Row};

const TEMPLATE_SELECT_SQL: &str = "SELECT template_uuid, name, kind, data FROM templates";

pub trait TemplateRepository {
    fn create_template(&self, template: &Template) -> RepoResult<TemplateId>;
    fn get_template(&self, id: TemplateId) -> RepoResult<Option<Template>>;
    fn find_template(&self, name: &str, kind: TemplateKind) -> RepoResult<Option<Template>>;
    /// Lists templates ordered by name, then kind.
    fn list_templates(&self, kind: Option<TemplateKind>) -> RepoResult<Vec<Template>>;
}

#[derive(Clone, Copy)]
pub struct SqliteTemplateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTemplateRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_one(
        &self,
        sql: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> RepoResult<Option<Template>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(args)?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_template_row(row)?));
        }
        Ok(None)
    }
}

impl TemplateRepository for SqliteTemplateRepository<'_> {
    fn create_template(&self, template: &Template) -> RepoResult<TemplateId> {
        self.conn.execute(
            "INSERT INTO templates (template_uuid, name, kind, data) VALUES (?1, ?2, ?3, ?4);",
            params![
                template.id.to_string(),
                template.name.as_str(),
                template.kind.as_str(),
                encode_data(&template.data)?,
            ],
        )?;
        Ok(template.id)
    }

    fn get_template(&self, id: TemplateId) -> RepoResult<Option<Template>> {
        self.query_one(
            &format!("{TEMPLATE_SELECT_SQL} WHERE template_uuid = ?1;"),
            params![id.to_string()],
        )
    }

    fn find_template(&self, name: &str, kind: TemplateKind) -> RepoResult<Option<Template>> {
        self.query_one(
            &format!("{TEMPLATE_SELECT_SQL} WHERE name = ?1 AND kind = ?2;"),
            params![name, kind.as_str()],
        )
    }

    fn list_templates(&self, kind: Option<TemplateKind>) -> RepoResult<Vec<Template>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TEMPLATE_SELECT_SQL}
             WHERE (?1 IS NULL OR kind = ?1)
             ORDER BY name ASC, kind ASC;"
        ))?;
        let mut rows = stmt.query(params![kind.map(TemplateKind::as_str)])?;
        let mut templates = Vec::new();
        while let Some(row) = rows.next()? {
            templates.push(parse_template_row(row)?);
        }
        Ok(templates)
    }
}

fn parse_template_row(row: &Row<'_>) -> RepoResult<Template> {
    let id_text: String = row.get("template_uuid")?;
    let kind_text: String = row.get("kind")?;
    let kind = TemplateKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid template kind `{kind_text}` in templates.kind"))
    })?;
    let data_text: String = row.get("data")?;

    Ok(Template {
        id: parse_uuid(&id_text, "templates.template_uuid")?,
        name: row.get("name")?,
        kind,
        data: decode_data(&data_text, "templates.data")?,
    })
}
