//! Overtime grants: the only way an OT window exists for a subject/date.
//!
//! Revoking or editing a grant only affects later reconciliation passes.
//! Sessions approved earlier keep the duration frozen in their out-event.

use crate::core::snapshot::EngineSettings;
use crate::db::log::ttlog;
use crate::db::{overtime, schedules};
use crate::errors::{AppError, AppResult};
use crate::models::overtime::OvertimeGrant;
use crate::models::schedule::ScheduleScope;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rusqlite::Connection;
use tracing::info;

pub struct OvertimeLogic;

fn check_range(start: NaiveDateTime, end: NaiveDateTime) -> AppResult<()> {
    if start >= end {
        return Err(AppError::InvalidRange {
            start: start.format("%Y-%m-%d %H:%M").to_string(),
            end: end.format("%Y-%m-%d %H:%M").to_string(),
        });
    }
    Ok(())
}

fn check_subject(subject_id: &str) -> AppResult<()> {
    if subject_id.trim().is_empty() {
        return Err(AppError::InvalidSubject(subject_id.to_string()));
    }
    Ok(())
}

impl OvertimeLogic {
    /// Anchor time-of-day bounds on `date`; an end before the start rolls
    /// to the following day. Equal bounds stay equal and fail validation.
    pub fn anchor(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> (NaiveDateTime, NaiveDateTime) {
        let s = date.and_time(start);
        let mut e = date.and_time(end);
        if e < s {
            e += Duration::days(1);
        }
        (s, e)
    }

    /// Default bounds for a grant created without explicit times: the
    /// overtime window of the subject's schedule (or the global one). The
    /// window may run past midnight; equal bounds mean "off".
    pub fn default_bounds(
        conn: &Connection,
        settings: &EngineSettings,
        subject_id: &str,
        date: NaiveDate,
    ) -> AppResult<(NaiveDateTime, NaiveDateTime)> {
        let global = schedules::get_schedule(conn, &ScheduleScope::Global)?
            .map(|s| s.or(&settings.default_schedule))
            .unwrap_or(settings.default_schedule);
        let schedule = schedules::get_schedule(conn, &ScheduleScope::from_subject(Some(subject_id)))?
            .map(|s| s.or(&global))
            .unwrap_or(global);

        let window = schedule
            .overtime
            .filter(|w| w.start != w.end)
            .ok_or_else(|| AppError::Config("no default overtime window configured".into()))?;
        Ok(Self::anchor(date, window.start, window.end))
    }

    pub fn grant(
        conn: &Connection,
        settings: &EngineSettings,
        subject_id: &str,
        date: NaiveDate,
        start: NaiveDateTime,
        end: NaiveDateTime,
        created_by: &str,
    ) -> AppResult<OvertimeGrant> {
        check_subject(subject_id)?;
        check_range(start, end)?;

        let tx = conn.unchecked_transaction()?;

        if overtime::get_grant(&tx, settings.tz, subject_id, date)?.is_some() {
            return Err(AppError::GrantExists {
                subject: subject_id.to_string(),
                date: date.to_string(),
            });
        }

        let grant = OvertimeGrant {
            subject_id: subject_id.to_string(),
            date,
            start,
            end,
            created_by: created_by.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        overtime::insert_grant(&tx, settings.tz, &grant)?;
        ttlog(
            &tx,
            "ot_grant",
            &format!("{}@{}", subject_id, date),
            &format!("{} → {} by '{}'", start, end, created_by),
        )?;
        tx.commit()?;

        info!(subject_id, %date, %start, %end, "overtime granted");
        Ok(grant)
    }

    pub fn revise(
        conn: &Connection,
        settings: &EngineSettings,
        subject_id: &str,
        date: NaiveDate,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<OvertimeGrant> {
        check_range(start, end)?;

        let tx = conn.unchecked_transaction()?;

        let mut grant = overtime::get_grant(&tx, settings.tz, subject_id, date)?.ok_or_else(|| {
            AppError::GrantNotFound {
                subject: subject_id.to_string(),
                date: date.to_string(),
            }
        })?;

        grant.start = start;
        grant.end = end;
        overtime::update_grant(&tx, settings.tz, &grant)?;
        ttlog(
            &tx,
            "ot_revise",
            &format!("{}@{}", subject_id, date),
            &format!("{} → {}", start, end),
        )?;
        tx.commit()?;

        info!(subject_id, %date, %start, %end, "overtime revised");
        Ok(grant)
    }

    pub fn revoke(conn: &Connection, subject_id: &str, date: NaiveDate) -> AppResult<()> {
        let tx = conn.unchecked_transaction()?;

        if overtime::delete_grant(&tx, subject_id, date)? == 0 {
            return Err(AppError::GrantNotFound {
                subject: subject_id.to_string(),
                date: date.to_string(),
            });
        }

        ttlog(
            &tx,
            "ot_revoke",
            &format!("{}@{}", subject_id, date),
            "grant revoked",
        )?;
        tx.commit()?;

        info!(subject_id, %date, "overtime revoked");
        Ok(())
    }

    pub fn get(
        conn: &Connection,
        settings: &EngineSettings,
        subject_id: &str,
        date: NaiveDate,
    ) -> AppResult<Option<OvertimeGrant>> {
        overtime::get_grant(conn, settings.tz, subject_id, date)
    }

    pub fn list(
        conn: &Connection,
        settings: &EngineSettings,
        subject_id: Option<&str>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<OvertimeGrant>> {
        overtime::load_grants(conn, settings.tz, subject_id, from, to)
    }
}
