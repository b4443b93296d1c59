use crate::cli::commands::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::punch::PunchLogic;
use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use crate::models::punch::NewPunch;
use crate::ui::messages::success;
use crate::utils::time::to_epoch_ms;
use chrono::{FixedOffset, NaiveDateTime, Utc};

fn parse_at(s: &str, tz: FixedOffset) -> AppResult<i64> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    let dt = FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s.trim(), f).ok())
        .ok_or_else(|| AppError::InvalidTimestamp(s.to_string()))?;
    to_epoch_ms(dt, tz)
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Punch {
        subject,
        kind,
        at,
        ms,
        evidence,
    } = cmd
    {
        let (pool, settings) = open(cfg)?;

        let occurred_at_ms = match (at, ms) {
            (_, Some(ms)) => *ms,
            (Some(at), None) => parse_at(at, settings.tz)?,
            (None, None) => Utc::now().timestamp_millis(),
        };

        let input = NewPunch {
            subject_id: subject.clone(),
            kind: kind.clone(),
            occurred_at_ms,
            evidence: evidence.clone(),
        };

        let ev = PunchLogic::record(&pool.conn, &settings, &input)?;

        ttlog(
            &pool.conn,
            "punch",
            &ev.id.to_string(),
            &format!("{} {} at {}", ev.subject_id, ev.kind, ev.occurred_at),
        )?;

        success(format!(
            "Punch #{} recorded: {} {} at {}",
            ev.id,
            ev.subject_id,
            ev.kind,
            ev.occurred_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    Ok(())
}
