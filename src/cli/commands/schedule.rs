use crate::cli::commands::{open, window_arg};
use crate::cli::parser::{Commands, ScheduleCmd};
use crate::config::Config;
use crate::core::schedule::ScheduleLogic;
use crate::errors::AppResult;
use crate::models::schedule::{ScheduleScope, ShiftSchedule, TimeWindow};
use crate::ui::messages::{header, info, success, warning};

fn show(w: Option<TimeWindow>) -> String {
    match w {
        Some(w) if w.start == w.end => "off".to_string(),
        Some(w) => w.to_string(),
        None => "--".to_string(),
    }
}

fn print_schedule(label: &str, s: &ShiftSchedule) {
    println!(
        "{:<10} AM {:<12} PM {:<12} OT {}",
        label,
        show(s.morning),
        show(s.afternoon),
        show(s.overtime)
    );
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Schedule { action } = cmd else {
        return Ok(());
    };

    let (pool, settings) = open(cfg)?;
    let conn = &pool.conn;

    match action {
        ScheduleCmd::Set {
            subject,
            morning,
            afternoon,
            overtime,
        } => {
            let scope = ScheduleScope::from_subject(subject.as_deref());
            let schedule = ShiftSchedule {
                morning: window_arg(morning.as_ref())?,
                afternoon: window_arg(afternoon.as_ref())?,
                overtime: window_arg(overtime.as_ref())?,
            };
            ScheduleLogic::set_schedule(conn, &scope, &schedule)?;
            success(format!("Schedule stored for {}", scope));
        }
        ScheduleCmd::Show { subject } => {
            let scope = ScheduleScope::from_subject(subject.as_deref());
            let global = ScheduleLogic::get_schedule(conn, &ScheduleScope::Global)?
                .map(|g| g.or(&settings.default_schedule))
                .unwrap_or(settings.default_schedule);

            header(format!("Schedule of {}", scope));
            print_schedule("config", &settings.default_schedule);

            let stored = ScheduleLogic::get_schedule(conn, &scope)?;
            match &stored {
                Some(s) => print_schedule("stored", s),
                None => info("No stored schedule for this scope."),
            }

            let effective = match (&scope, stored) {
                (ScheduleScope::Subject(_), Some(s)) => s.or(&global),
                _ => global,
            };
            print_schedule("effective", &effective);
        }
        ScheduleCmd::Clear { subject } => {
            let scope = ScheduleScope::from_subject(subject.as_deref());
            if ScheduleLogic::clear_schedule(conn, &scope)? {
                success(format!("Schedule of {} removed", scope));
            } else {
                warning(format!("No stored schedule for {}", scope));
            }
        }
    }

    Ok(())
}
