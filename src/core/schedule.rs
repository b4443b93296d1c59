use crate::db::log::ttlog;
use crate::db::schedules;
use crate::errors::AppResult;
use crate::models::schedule::{DateOverride, ScheduleScope, ShiftSchedule, TimeWindow};
use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::info;

/// Shift schedules and per-date overrides.
///
/// Edits here change live windows only. Pairs that already carry a captured
/// snapshot or a frozen ledger value keep reporting their stored figures.
pub struct ScheduleLogic;

fn describe(w: Option<TimeWindow>) -> String {
    w.map(|w| w.to_string()).unwrap_or_else(|| "--".to_string())
}

impl ScheduleLogic {
    pub fn set_schedule(conn: &Connection, scope: &ScheduleScope, schedule: &ShiftSchedule) -> AppResult<()> {
        let tx = conn.unchecked_transaction()?;
        schedules::upsert_schedule(&tx, scope, schedule)?;
        ttlog(
            &tx,
            "schedule_set",
            scope.to_db_str(),
            &format!(
                "AM {} | PM {} | OT {}",
                describe(schedule.morning),
                describe(schedule.afternoon),
                describe(schedule.overtime)
            ),
        )?;
        tx.commit()?;

        info!(%scope, "schedule updated");
        Ok(())
    }

    pub fn get_schedule(conn: &Connection, scope: &ScheduleScope) -> AppResult<Option<ShiftSchedule>> {
        schedules::get_schedule(conn, scope)
    }

    /// Returns false when the scope had no stored schedule.
    pub fn clear_schedule(conn: &Connection, scope: &ScheduleScope) -> AppResult<bool> {
        let removed = schedules::delete_schedule(conn, scope)?;
        if removed {
            ttlog(conn, "schedule_clear", scope.to_db_str(), "schedule removed")?;
            info!(%scope, "schedule cleared");
        }
        Ok(removed)
    }

    pub fn set_override(
        conn: &Connection,
        scope: &ScheduleScope,
        date: NaiveDate,
        morning: Option<TimeWindow>,
        afternoon: Option<TimeWindow>,
    ) -> AppResult<DateOverride> {
        let o = DateOverride {
            scope: scope.clone(),
            date,
            morning,
            afternoon,
        };

        let tx = conn.unchecked_transaction()?;
        schedules::upsert_override(&tx, &o)?;
        ttlog(
            &tx,
            "override_set",
            &format!("{}@{}", scope.to_db_str(), date),
            &format!("AM {} | PM {}", describe(morning), describe(afternoon)),
        )?;
        tx.commit()?;

        info!(%scope, %date, "date override stored");
        Ok(o)
    }

    /// Returns false when no override existed.
    pub fn delete_override(conn: &Connection, scope: &ScheduleScope, date: NaiveDate) -> AppResult<bool> {
        let removed = schedules::delete_override(conn, scope, date)?;
        if removed {
            ttlog(
                conn,
                "override_del",
                &format!("{}@{}", scope.to_db_str(), date),
                "override removed",
            )?;
            info!(%scope, %date, "date override removed");
        }
        Ok(removed)
    }

    pub fn overrides(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<DateOverride>> {
        schedules::load_overrides(conn, from, to)
    }
}
