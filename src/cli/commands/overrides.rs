use crate::cli::commands::{date_arg, open, window_arg};
use crate::cli::parser::{Commands, OverrideCmd};
use crate::config::Config;
use crate::core::schedule::ScheduleLogic;
use crate::errors::{AppError, AppResult};
use crate::models::schedule::ScheduleScope;
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Override { action } = cmd else {
        return Ok(());
    };

    let (pool, _) = open(cfg)?;
    let conn = &pool.conn;

    match action {
        OverrideCmd::Set {
            date,
            subject,
            morning,
            afternoon,
        } => {
            if morning.is_none() && afternoon.is_none() {
                return Err(AppError::Config(
                    "an override needs --morning and/or --afternoon".into(),
                ));
            }
            let date = date_arg(date)?;
            let scope = ScheduleScope::from_subject(subject.as_deref());
            ScheduleLogic::set_override(
                conn,
                &scope,
                date,
                window_arg(morning.as_ref())?,
                window_arg(afternoon.as_ref())?,
            )?;
            success(format!("Override stored for {} on {}", scope, date));
        }
        OverrideCmd::Del { date, subject } => {
            let date = date_arg(date)?;
            let scope = ScheduleScope::from_subject(subject.as_deref());
            if ScheduleLogic::delete_override(conn, &scope, date)? {
                success(format!("Override of {} on {} removed", scope, date));
            } else {
                warning(format!("No override for {} on {}", scope, date));
            }
        }
    }

    Ok(())
}
