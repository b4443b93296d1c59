//! Formatting utilities used for CLI and export outputs.

use crate::models::review_status::ReviewStatus;
use crate::utils::colors::{GREEN, RED, RESET, YELLOW};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

pub fn mins2readable(mins: i64, want_sign: bool, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    let sign = if mins > 0 && want_sign {
        "+"
    } else if mins < 0 {
        "-"
    } else {
        ""
    };

    if short {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// Label and ANSI colour of a review status.
pub fn describe_status(status: Option<ReviewStatus>) -> (String, &'static str) {
    match status {
        Some(ReviewStatus::Approved) => ("approved".into(), GREEN),
        Some(ReviewStatus::Rejected) => ("rejected".into(), RED),
        Some(ReviewStatus::Pending) => ("pending".into(), YELLOW),
        None => ("-".into(), RESET),
    }
}

/// Status painted with its colour, padded to `width` visible columns.
pub fn status_cell(status: Option<ReviewStatus>, width: usize) -> String {
    let (label, color) = describe_status(status);
    format!("{color}{}{RESET}", pad_right(&label, width))
}
