//! Schedule store: per-scope shift schedules and per-date overrides.

use crate::db::conversion_err;
use crate::errors::{AppError, AppResult};
use crate::models::schedule::{DateOverride, ScheduleScope, ShiftSchedule, TimeWindow};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn window_col(row: &Row, idx: usize) -> rusqlite::Result<Option<TimeWindow>> {
    let raw: Option<String> = row.get(idx)?;
    TimeWindow::parse_optional(raw.as_deref()).map_err(|e| conversion_err(idx, e))
}

fn window_str(w: Option<TimeWindow>) -> Option<String> {
    w.map(|w| w.to_string())
}

fn map_schedule(row: &Row) -> rusqlite::Result<(ScheduleScope, ShiftSchedule)> {
    let scope: String = row.get(0)?;
    Ok((
        ScheduleScope::from_db_str(&scope),
        ShiftSchedule {
            morning: window_col(row, 1)?,
            afternoon: window_col(row, 2)?,
            overtime: window_col(row, 3)?,
        },
    ))
}

pub fn get_schedule(conn: &Connection, scope: &ScheduleScope) -> AppResult<Option<ShiftSchedule>> {
    let mut stmt = conn.prepare_cached(
        "SELECT scope, morning, afternoon, overtime FROM schedules WHERE scope = ?1",
    )?;
    let found = stmt
        .query_row([scope.to_db_str()], map_schedule)
        .optional()?;
    Ok(found.map(|(_, s)| s))
}

pub fn load_schedules(conn: &Connection) -> AppResult<Vec<(ScheduleScope, ShiftSchedule)>> {
    let mut stmt = conn.prepare_cached(
        "SELECT scope, morning, afternoon, overtime FROM schedules ORDER BY scope ASC",
    )?;
    let rows = stmt.query_map([], map_schedule)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn upsert_schedule(conn: &Connection, scope: &ScheduleScope, s: &ShiftSchedule) -> AppResult<()> {
    conn.execute(
        "INSERT INTO schedules (scope, morning, afternoon, overtime, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(scope) DO UPDATE SET
            morning = excluded.morning,
            afternoon = excluded.afternoon,
            overtime = excluded.overtime,
            updated_at = excluded.updated_at",
        params![
            scope.to_db_str(),
            window_str(s.morning),
            window_str(s.afternoon),
            window_str(s.overtime),
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn delete_schedule(conn: &Connection, scope: &ScheduleScope) -> AppResult<bool> {
    let n = conn.execute("DELETE FROM schedules WHERE scope = ?1", [scope.to_db_str()])?;
    Ok(n > 0)
}

fn map_override(row: &Row) -> rusqlite::Result<DateOverride> {
    let scope: String = row.get(0)?;
    let date_str: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_err(1, AppError::InvalidDate(date_str.clone())))?;

    Ok(DateOverride {
        scope: ScheduleScope::from_db_str(&scope),
        date,
        morning: window_col(row, 2)?,
        afternoon: window_col(row, 3)?,
    })
}

pub fn upsert_override(conn: &Connection, o: &DateOverride) -> AppResult<()> {
    conn.execute(
        "INSERT INTO date_overrides (scope, date, morning, afternoon, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(scope, date) DO UPDATE SET
            morning = excluded.morning,
            afternoon = excluded.afternoon,
            updated_at = excluded.updated_at",
        params![
            o.scope.to_db_str(),
            o.date.format("%Y-%m-%d").to_string(),
            window_str(o.morning),
            window_str(o.afternoon),
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn delete_override(conn: &Connection, scope: &ScheduleScope, date: NaiveDate) -> AppResult<bool> {
    let n = conn.execute(
        "DELETE FROM date_overrides WHERE scope = ?1 AND date = ?2",
        params![scope.to_db_str(), date.format("%Y-%m-%d").to_string()],
    )?;
    Ok(n > 0)
}

/// Overrides of any scope between two dates (inclusive).
pub fn load_overrides(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<DateOverride>> {
    let mut stmt = conn.prepare_cached(
        "SELECT scope, date, morning, afternoon FROM date_overrides
         WHERE date >= ?1 AND date <= ?2
         ORDER BY date ASC, scope ASC",
    )?;
    let rows = stmt.query_map(
        params![
            from.format("%Y-%m-%d").to_string(),
            to.format("%Y-%m-%d").to_string()
        ],
        map_override,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
