use crate::db::migrate::{applied_versions, run_pending_migrations};
use crate::errors::AppResult;
use rusqlite::Connection;
use tracing::debug;

/// Bring the schema up to date. Safe to call on every start; returns the
/// number of migrations applied now (0 for an up-to-date database).
pub fn init_db(conn: &Connection) -> AppResult<usize> {
    let applied = run_pending_migrations(conn)?;

    if applied == 0 {
        let current = applied_versions(conn)?;
        debug!(version = current.last().map(String::as_str), "schema up to date");
    }
    Ok(applied)
}
