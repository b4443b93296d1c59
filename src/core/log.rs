use crate::db::log::load_log;
use crate::errors::AppResult;
use ansi_term::Colour;
use rusqlite::Connection;

/// Visible width of the "operation (target)" column.
const OP_WIDTH: usize = 48;

fn color_for_operation(op: &str) -> Colour {
    match op {
        "punch" => Colour::Cyan,
        "approve" => Colour::Green,
        "reject" => Colour::Red,
        "ot_grant" | "ot_revise" => Colour::Yellow,
        "ot_revoke" => Colour::RGB(255, 153, 51),
        "schedule_set" | "schedule_clear" | "override_set" | "override_del" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(conn: &Connection) -> AppResult<()> {
        let entries = load_log(conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);

        let rows: Vec<_> = entries
            .into_iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or(e.date);
                (e.id, date, e.operation, e.target, e.message)
            })
            .collect();

        let date_w = rows.iter().map(|(_, d, ..)| d.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, op, target, message) in rows {
            // Width is computed on the plain text; only the operation is painted.
            let plain = if target.is_empty() {
                op.clone()
            } else {
                truncate(&format!("{op} ({target})"), OP_WIDTH)
            };
            let padding = " ".repeat(OP_WIDTH.saturating_sub(plain.chars().count()));

            let painted = match plain.strip_prefix(op.as_str()) {
                Some(rest) => format!("{}{}", color_for_operation(&op).paint(op.as_str()), rest),
                None => color_for_operation(&op).paint(plain.as_str()).to_string(),
            };

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                painted,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
