//! Chore store bootstrap.
//!
//! # Responsibility
//! - Hand out SQLite connections that hold the persons, templates, chores,
//!   acts and areas tables.
//! - Refuse stores written by a newer build or missing one of those tables.
//!
//! # Invariants
//! - The store layout version lives in `PRAGMA user_version`.
//! - Repositories only ever see connections that passed `schema::ensure_store`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{STORE_TABLES, STORE_VERSION};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a build with a newer store layout.
    NewerStore { found: u32, supported: u32 },
    /// A store table is gone even though the layout version says otherwise.
    MissingTable { table: &'static str, version: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::NewerStore { found, supported } => write!(
                f,
                "chore store version {found} is newer than supported {supported}"
            ),
            Self::MissingTable { table, version } => {
                write!(f, "chore store version {version} has no `{table}` table")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::NewerStore { .. } | Self::MissingTable { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
