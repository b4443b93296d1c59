pub mod config;
pub mod export;
pub mod init;
pub mod log;
pub mod overrides;
pub mod overtime;
pub mod punch;
pub mod report;
pub mod review;
pub mod schedule;

use crate::config::Config;
use crate::core::snapshot::EngineSettings;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::schedule::TimeWindow;
use crate::utils::date::{parse_date, resolve_period};
use chrono::{NaiveDate, NaiveTime};

/// Open the configured database (running any pending migration) together
/// with the engine settings derived from the configuration.
pub(crate) fn open(cfg: &Config) -> AppResult<(DbPool, EngineSettings)> {
    let settings = EngineSettings::from_config(cfg)?;
    let pool = DbPool::new(&cfg.database, settings.tz)?;
    init_db(&pool.conn)?;
    Ok((pool, settings))
}

pub(crate) fn date_arg(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

pub(crate) fn time_arg(s: &str) -> AppResult<NaiveTime> {
    crate::utils::time::parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))
}

/// `HH:MM-HH:MM`; `off` yields a disabled window.
pub(crate) fn window_arg(s: Option<&String>) -> AppResult<Option<TimeWindow>> {
    match s.map(|v| v.trim()) {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("off") => {
            Ok(Some(TimeWindow::new(NaiveTime::MIN, NaiveTime::MIN)))
        }
        Some(v) => TimeWindow::parse(v).map(Some),
    }
}

/// Dates of `period`, or today when no period is given.
pub(crate) fn period_arg(period: Option<&String>, settings: &EngineSettings) -> AppResult<Vec<NaiveDate>> {
    match period {
        Some(p) => resolve_period(p).map_err(AppError::InvalidDate),
        None => Ok(vec![settings.today]),
    }
}
