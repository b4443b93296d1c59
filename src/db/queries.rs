//! Punch-event store.

use crate::db::conversion_err;
use crate::errors::{AppError, AppResult};
use crate::models::punch::{EventRef, PunchEvent, WindowSnapshot};
use crate::models::punch_kind::PunchKind;
use crate::models::review_status::ReviewStatus;
use crate::utils::time::{from_epoch_ms, to_epoch_ms};
use chrono::{Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

const PUNCH_COLUMNS: &str = "id, subject_id, occurred_at, kind, evidence, status, reviewer_id, \
     reviewed_at, validated_ms, official_start, official_end, synthetic";

pub fn map_row(row: &Row, tz: FixedOffset) -> rusqlite::Result<PunchEvent> {
    let occurred_ms: i64 = row.get("occurred_at")?;
    let occurred_at = from_epoch_ms(occurred_ms, tz).map_err(|e| conversion_err(2, e))?;

    let kind_str: String = row.get("kind")?;
    let kind = PunchKind::from_db_str(&kind_str)
        .ok_or_else(|| conversion_err(3, AppError::InvalidKind(kind_str.clone())))?;

    let status_str: String = row.get("status")?;
    let status = ReviewStatus::from_db_str(&status_str).map_err(|e| conversion_err(5, e))?;

    let reviewed_at = row
        .get::<_, Option<i64>>("reviewed_at")?
        .map(|ms| from_epoch_ms(ms, tz))
        .transpose()
        .map_err(|e| conversion_err(7, e))?;

    let official_start: Option<String> = row.get("official_start")?;
    let official_end: Option<String> = row.get("official_end")?;
    let window_snapshot = match (official_start, official_end) {
        (Some(start), Some(end)) => Some(WindowSnapshot { start, end }),
        _ => None,
    };

    Ok(PunchEvent {
        id: EventRef::Persisted(row.get("id")?),
        subject_id: row.get("subject_id")?,
        kind,
        occurred_at,
        evidence: row.get("evidence")?,
        status,
        reviewer_id: row.get("reviewer_id")?,
        reviewed_at,
        validated: row
            .get::<_, Option<i64>>("validated_ms")?
            .map(Duration::milliseconds),
        window_snapshot,
        synthetic: row.get::<_, i64>("synthetic")? == 1,
    })
}

/// Persist a punch and return its new id. The stored calendar date is the
/// wall-clock date of `occurred_at`.
pub fn insert_punch(conn: &Connection, tz: FixedOffset, ev: &PunchEvent) -> AppResult<i64> {
    let occurred_ms = to_epoch_ms(ev.occurred_at, tz)?;
    let reviewed_ms = ev.reviewed_at.map(|t| to_epoch_ms(t, tz)).transpose()?;

    conn.execute(
        "INSERT INTO punches (subject_id, date, occurred_at, kind, evidence, status, reviewer_id,
                              reviewed_at, validated_ms, official_start, official_end, synthetic, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            ev.subject_id,
            ev.date().format("%Y-%m-%d").to_string(),
            occurred_ms,
            ev.kind.to_db_str(),
            ev.evidence,
            ev.status.to_db_str(),
            ev.reviewer_id,
            reviewed_ms,
            ev.validated.map(|d| d.num_milliseconds()),
            ev.window_snapshot.as_ref().map(|s| s.start.clone()),
            ev.window_snapshot.as_ref().map(|s| s.end.clone()),
            if ev.synthetic { 1 } else { 0 },
            Utc::now().to_rfc3339(),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn load_punch(conn: &Connection, tz: FixedOffset, id: i64) -> AppResult<Option<PunchEvent>> {
    let sql = format!("SELECT {} FROM punches WHERE id = ?1", PUNCH_COLUMNS);
    let mut stmt = conn.prepare_cached(&sql)?;
    let ev = stmt.query_row([id], |row| map_row(row, tz)).optional()?;
    Ok(ev)
}

/// Punches of the given subjects between two dates (inclusive), ordered by
/// subject then time. An empty subject list means every subject.
pub fn load_punches(
    conn: &Connection,
    tz: FixedOffset,
    subjects: &[String],
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<PunchEvent>> {
    let mut sql = format!(
        "SELECT {} FROM punches WHERE date >= ?1 AND date <= ?2",
        PUNCH_COLUMNS
    );

    let mut owned: Vec<String> = vec![
        from.format("%Y-%m-%d").to_string(),
        to.format("%Y-%m-%d").to_string(),
    ];

    if !subjects.is_empty() {
        let placeholders: Vec<String> = (0..subjects.len())
            .map(|i| format!("?{}", i + 3))
            .collect();
        sql.push_str(&format!(" AND subject_id IN ({})", placeholders.join(",")));
        owned.extend(subjects.iter().cloned());
    }

    sql.push_str(" ORDER BY subject_id ASC, occurred_at ASC, id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(owned.iter()), |row| {
        map_row(row, tz)
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Ledger fields written together with an approval.
#[derive(Debug, Clone)]
pub struct Freeze {
    pub validated: Duration,
    pub snapshot: Option<WindowSnapshot>,
}

/// Move a pending punch to a terminal status. Rows that are no longer
/// pending are left untouched; returns the number of rows changed (0 or 1).
pub fn transition_punch(
    conn: &Connection,
    tz: FixedOffset,
    id: i64,
    status: ReviewStatus,
    reviewer_id: &str,
    reviewed_at: NaiveDateTime,
    freeze: Option<&Freeze>,
) -> AppResult<usize> {
    let reviewed_ms = to_epoch_ms(reviewed_at, tz)?;

    let changed = match freeze {
        Some(f) => conn.execute(
            "UPDATE punches
             SET status = ?1, reviewer_id = ?2, reviewed_at = ?3,
                 validated_ms = ?4,
                 official_start = COALESCE(official_start, ?5),
                 official_end = COALESCE(official_end, ?6)
             WHERE id = ?7 AND status IN ('pending', '')",
            params![
                status.to_db_str(),
                reviewer_id,
                reviewed_ms,
                f.validated.num_milliseconds(),
                f.snapshot.as_ref().map(|s| s.start.clone()),
                f.snapshot.as_ref().map(|s| s.end.clone()),
                id,
            ],
        )?,
        None => conn.execute(
            "UPDATE punches
             SET status = ?1, reviewer_id = ?2, reviewed_at = ?3
             WHERE id = ?4 AND status IN ('pending', '')",
            params![status.to_db_str(), reviewer_id, reviewed_ms, id],
        )?,
    };

    Ok(changed)
}

/// Write the ledger of a punch that is already approved but has none, as
/// happens when an out was approved before its in existed. A frozen value is
/// never replaced.
pub fn freeze_approved(conn: &Connection, id: i64, freeze: &Freeze) -> AppResult<usize> {
    let changed = conn.execute(
        "UPDATE punches
         SET validated_ms = ?1,
             official_start = COALESCE(official_start, ?2),
             official_end = COALESCE(official_end, ?3)
         WHERE id = ?4 AND status = ?5 AND validated_ms IS NULL",
        params![
            freeze.validated.num_milliseconds(),
            freeze.snapshot.as_ref().map(|s| s.start.clone()),
            freeze.snapshot.as_ref().map(|s| s.end.clone()),
            id,
            ReviewStatus::Approved.to_db_str(),
        ],
    )?;
    Ok(changed)
}

/// Record the official window seen the first time a pair was evaluated.
/// Never overwrites an existing snapshot or a frozen ledger row.
pub fn capture_snapshot(conn: &Connection, id: i64, snapshot: &WindowSnapshot) -> AppResult<usize> {
    let changed = conn.execute(
        "UPDATE punches
         SET official_start = ?1, official_end = ?2
         WHERE id = ?3 AND official_start IS NULL AND official_end IS NULL
           AND validated_ms IS NULL",
        params![snapshot.start, snapshot.end, id],
    )?;
    Ok(changed)
}
