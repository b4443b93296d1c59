/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// True for the placeholders used by the report for missing values.
fn is_blank(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == "--:--" || v == "00h 00m" || v == "-"
}

/// Grey for placeholders, unchanged otherwise.
///
/// `colorize_optional("--:--")` → "<grey>--:--<reset>"
pub fn colorize_optional(value: &str) -> String {
    if is_blank(value) {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

/// In-times green, out-times red; synthetic close-outs cyan.
pub fn colorize_in_out(value: &str, is_in: bool, synthetic: bool) -> String {
    if is_blank(value) {
        return format!("{GREY}{value}{RESET}");
    }

    let color = match (is_in, synthetic) {
        (true, _) => GREEN,
        (false, true) => CYAN,
        (false, false) => RED,
    };
    format!("{color}{value}{RESET}")
}

/// Late flag in yellow.
pub fn colorize_late(late: bool) -> String {
    if late {
        format!("{YELLOW}late{RESET}")
    } else {
        String::new()
    }
}
