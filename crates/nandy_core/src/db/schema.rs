//! Chore store layout: creation, upgrade and table checks.

use super::{DbError, DbResult};
use log::{info, warn};
use rusqlite::Connection;

/// Upgrade steps; step `n` moves the store from version `n` to `n + 1`.
const UPGRADES: &[&str] = &[include_str!("store_v1.sql")];

/// Layout version written by this build.
pub const STORE_VERSION: u32 = UPGRADES.len() as u32;

/// Tables every usable store must hold, in creation order.
pub const STORE_TABLES: &[&str] = &["persons", "areas", "templates", "chores", "acts"];

/// Brings the store on `conn` up to [`STORE_VERSION`] and checks its tables.
///
/// An empty database gets the full layout. Upgrades run in one transaction,
/// so a failed step leaves the previous version in place.
pub fn ensure_store(conn: &mut Connection) -> DbResult<()> {
    let found = store_version(conn)?;
    if found > STORE_VERSION {
        return Err(DbError::NewerStore {
            found,
            supported: STORE_VERSION,
        });
    }

    if found < STORE_VERSION {
        let tx = conn.transaction()?;
        for step in &UPGRADES[found as usize..] {
            tx.execute_batch(step)?;
        }
        tx.pragma_update(None, "user_version", STORE_VERSION)?;
        tx.commit()?;
        info!(
            "event=db_store_upgrade module=db status=ok from_version={found} to_version={STORE_VERSION}"
        );
    }

    check_tables(conn)
}

/// Reads the layout version; `0` means the store was never created.
pub fn store_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn check_tables(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
    )?;
    for &table in STORE_TABLES {
        let present: bool = stmt.query_row([table], |row| row.get(0))?;
        if !present {
            warn!("event=db_store_check module=db status=error table={table}");
            return Err(DbError::MissingTable {
                table,
                version: STORE_VERSION,
            });
        }
    }
    Ok(())
}
