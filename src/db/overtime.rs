//! Overtime-grant store, keyed by (subject, date).

use crate::db::conversion_err;
use crate::errors::{AppError, AppResult};
use crate::models::overtime::OvertimeGrant;
use crate::utils::time::{from_epoch_ms, to_epoch_ms};
use chrono::{FixedOffset, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_grant(row: &Row, tz: FixedOffset) -> rusqlite::Result<OvertimeGrant> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_err(1, AppError::InvalidDate(date_str.clone())))?;

    let start = from_epoch_ms(row.get("start_at")?, tz).map_err(|e| conversion_err(2, e))?;
    let end = from_epoch_ms(row.get("end_at")?, tz).map_err(|e| conversion_err(3, e))?;

    Ok(OvertimeGrant {
        subject_id: row.get("subject_id")?,
        date,
        start,
        end,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_grant(conn: &Connection, tz: FixedOffset, g: &OvertimeGrant) -> AppResult<()> {
    conn.execute(
        "INSERT INTO overtime_grants (subject_id, date, start_at, end_at, created_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            g.subject_id,
            g.date.format("%Y-%m-%d").to_string(),
            to_epoch_ms(g.start, tz)?,
            to_epoch_ms(g.end, tz)?,
            g.created_by,
            g.created_at,
        ],
    )?;
    Ok(())
}

/// Replace start/end of an existing grant. Returns rows changed.
pub fn update_grant(conn: &Connection, tz: FixedOffset, g: &OvertimeGrant) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE overtime_grants SET start_at = ?1, end_at = ?2
         WHERE subject_id = ?3 AND date = ?4",
        params![
            to_epoch_ms(g.start, tz)?,
            to_epoch_ms(g.end, tz)?,
            g.subject_id,
            g.date.format("%Y-%m-%d").to_string(),
        ],
    )?;
    Ok(n)
}

pub fn delete_grant(conn: &Connection, subject_id: &str, date: NaiveDate) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM overtime_grants WHERE subject_id = ?1 AND date = ?2",
        params![subject_id, date.format("%Y-%m-%d").to_string()],
    )?;
    Ok(n)
}

pub fn get_grant(
    conn: &Connection,
    tz: FixedOffset,
    subject_id: &str,
    date: NaiveDate,
) -> AppResult<Option<OvertimeGrant>> {
    let mut stmt = conn.prepare_cached(
        "SELECT subject_id, date, start_at, end_at, created_by, created_at
         FROM overtime_grants WHERE subject_id = ?1 AND date = ?2",
    )?;
    let g = stmt
        .query_row(
            params![subject_id, date.format("%Y-%m-%d").to_string()],
            |row| map_grant(row, tz),
        )
        .optional()?;
    Ok(g)
}

/// Grants between two dates (inclusive), optionally for one subject.
pub fn load_grants(
    conn: &Connection,
    tz: FixedOffset,
    subject_id: Option<&str>,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<OvertimeGrant>> {
    let mut stmt = conn.prepare_cached(
        "SELECT subject_id, date, start_at, end_at, created_by, created_at
         FROM overtime_grants
         WHERE date >= ?1 AND date <= ?2 AND (?3 IS NULL OR subject_id = ?3)
         ORDER BY subject_id ASC, date ASC",
    )?;
    let rows = stmt.query_map(
        params![
            from.format("%Y-%m-%d").to_string(),
            to.format("%Y-%m-%d").to_string(),
            subject_id
        ],
        |row| map_grant(row, tz),
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
