use crate::cli::commands::{date_arg, open, period_arg, time_arg};
use crate::cli::parser::{Commands, OvertimeCmd};
use crate::config::Config;
use crate::core::overtime::OvertimeLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Overtime { action } = cmd else {
        return Ok(());
    };

    let (pool, settings) = open(cfg)?;
    let conn = &pool.conn;

    match action {
        OvertimeCmd::Grant {
            subject,
            date,
            start,
            end,
            by,
        } => {
            let date = date_arg(date)?;
            let (s, e) = match (start, end) {
                (Some(s), Some(e)) => OvertimeLogic::anchor(date, time_arg(s)?, time_arg(e)?),
                _ => OvertimeLogic::default_bounds(conn, &settings, subject, date)?,
            };
            let g = OvertimeLogic::grant(conn, &settings, subject, date, s, e, by)?;
            success(format!(
                "Overtime granted to {} on {}: {} → {}",
                g.subject_id,
                g.date,
                g.start.format("%H:%M"),
                g.end.format("%H:%M")
            ));
        }
        OvertimeCmd::Revise {
            subject,
            date,
            start,
            end,
        } => {
            let date = date_arg(date)?;
            let (s, e) = OvertimeLogic::anchor(date, time_arg(start)?, time_arg(end)?);
            let g = OvertimeLogic::revise(conn, &settings, subject, date, s, e)?;
            success(format!(
                "Overtime of {} on {} is now {} → {}",
                g.subject_id,
                g.date,
                g.start.format("%H:%M"),
                g.end.format("%H:%M")
            ));
        }
        OvertimeCmd::Revoke { subject, date } => {
            let date = date_arg(date)?;
            OvertimeLogic::revoke(conn, subject, date)?;
            success(format!("Overtime of {} on {} revoked", subject, date));
        }
        OvertimeCmd::List { period, subject } => {
            let dates = period_arg(period.as_ref(), &settings)?;
            let (Some(from), Some(to)) = (dates.first(), dates.last()) else {
                return Ok(());
            };

            let grants = OvertimeLogic::list(conn, &settings, subject.as_deref(), *from, *to)?;
            if grants.is_empty() {
                info("No overtime grants in the selected period.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("SUBJECT", 12),
                Column::new("DATE", 10),
                Column::new("START", 16),
                Column::new("END", 16),
                Column::new("BY", 12),
            ]);
            for g in grants {
                table.add_row(vec![
                    g.subject_id,
                    g.date.to_string(),
                    g.start.format("%Y-%m-%d %H:%M").to_string(),
                    g.end.format("%Y-%m-%d %H:%M").to_string(),
                    g.created_by,
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
