//! Audit trail kept in the `log` table, next to the migration records.

use crate::errors::AppResult;
use chrono::Utc;
use rusqlite::{Connection, Row, params};

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: i64,
    /// RFC 3339, UTC.
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            operation: row.get("operation")?,
            target: row.get::<_, Option<String>>("target")?.unwrap_or_default(),
            message: row.get("message")?,
        })
    }
}

/// Append one audit line.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message) VALUES (?1, ?2, ?3, ?4)",
    )?
    .execute(params![Utc::now().to_rfc3339(), operation, target, message])?;
    Ok(())
}

/// Every audit line, oldest first.
pub fn load_log(conn: &Connection) -> AppResult<Vec<LogEntry>> {
    let mut stmt =
        conn.prepare_cached("SELECT id, date, operation, target, message FROM log ORDER BY id")?;
    let entries = stmt
        .query_map([], LogEntry::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}
