use crate::cli::commands::{open, period_arg};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::logic::Core;
use crate::errors::AppResult;
use crate::models::day_summary::{DaySummary, SessionSummary};
use crate::ui::messages::{header, info};
use crate::utils::colors::{colorize_in_out, colorize_late, colorize_optional};
use crate::utils::formatting::{bold, mins2readable, status_cell};
use crate::utils::table::{Column, Table};
use crate::utils::time::format_hours;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        period,
        subjects,
        json,
        totals,
    } = cmd
    {
        let (pool, settings) = open(cfg)?;
        let dates = period_arg(period.as_ref(), &settings)?;

        let summaries = Core::reconcile_range(&pool.conn, &settings, subjects, &dates)?;
        let active: Vec<&DaySummary> = summaries.iter().filter(|d| d.has_activity()).collect();

        if *json {
            println!("{}", serde_json::to_string_pretty(&active)?);
            return Ok(());
        }

        if active.is_empty() {
            info("No punches found for the selected period.");
            return Ok(());
        }

        if !*totals {
            for day in &active {
                print_day(day);
            }
        }

        print_totals(&summaries);
    }
    Ok(())
}

fn time_cell(s: &SessionSummary, is_in: bool) -> String {
    let (at, synthetic) = if is_in {
        (s.in_at, false)
    } else {
        (s.out_at, s.synthetic_out)
    };
    let v = at
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());
    colorize_in_out(&v, is_in, synthetic)
}

fn print_day(day: &DaySummary) {
    header(format!("{} | {}", day.subject_id, day.date));

    println!(
        "{:<4} {:<5} {:<9} {:<5} {:<9} {:<11} {:>7} {:>7} {:<17} {}",
        "SLOT", "IN", "STATUS", "OUT", "STATUS", "WINDOW", "TRACKED", "VALID", "SOURCE", ""
    );

    for s in day.sessions.iter().filter(|s| s.in_ref.is_some() || s.out_ref.is_some()) {
        let window = s
            .window
            .map(|w| format!("{}-{}", w.start.format("%H:%M"), w.end.format("%H:%M")))
            .unwrap_or_else(|| "-".to_string());
        let source = s.source.map(|src| src.as_str()).unwrap_or("-");

        println!(
            "{:<4} {} {} {} {} {} {:>7} {:>7} {} {}",
            s.slot,
            time_cell(s, true),
            status_cell(s.in_status, 9),
            time_cell(s, false),
            status_cell(s.out_status, 9),
            colorize_optional(&format!("{:<11}", window)),
            mins2readable(s.tracked.num_minutes(), false, true),
            mins2readable(s.validated.num_minutes(), false, true),
            colorize_optional(&format!("{:<17}", source)),
            colorize_late(s.late),
        );
    }

    if !day.stray.is_empty() {
        let ids: Vec<String> = day.stray.iter().map(|r| r.to_string()).collect();
        println!("unpaired: {}", ids.join(", "));
    }

    println!(
        "{} tracked {} | validated {}",
        bold("Day:"),
        mins2readable(day.tracked.num_minutes(), false, false),
        mins2readable(day.validated.num_minutes(), false, false)
    );
}

fn print_totals(summaries: &[DaySummary]) {
    let totals = Core::totals(summaries);

    let mut table = Table::new(vec![
        Column::new("SUBJECT", 12),
        Column::right("DAYS", 4),
        Column::right("TRACKED", 8),
        Column::right("VALIDATED", 9),
        Column::right("HOURS", 6),
        Column::right("LATE", 4),
    ]);
    for t in totals.into_iter().filter(|t| t.days > 0) {
        table.add_row(vec![
            t.subject_id,
            t.days.to_string(),
            mins2readable(t.tracked.num_minutes(), false, true),
            mins2readable(t.validated.num_minutes(), false, true),
            format_hours(t.validated),
            t.late_count.to_string(),
        ]);
    }
    if table.is_empty() {
        return;
    }

    header("Totals");
    print!("{}", table.render());
}
