use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveTime};
use std::fmt;

/// Official interval expressed as time of day. A window whose start is not
/// before its end is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parse `HH:MM-HH:MM`.
    pub fn parse(s: &str) -> AppResult<Self> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| AppError::InvalidWindow(s.to_string()))?;

        let parse = |t: &str| {
            NaiveTime::parse_from_str(t.trim(), "%H:%M")
                .map_err(|_| AppError::InvalidWindow(s.to_string()))
        };

        Ok(Self {
            start: parse(start)?,
            end: parse(end)?,
        })
    }

    /// Parse an optional window, where the empty string means "not set".
    pub fn parse_optional(s: Option<&str>) -> AppResult<Option<Self>> {
        match s.map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) => Self::parse(v).map(Some),
        }
    }

    pub fn start_str(&self) -> String {
        self.start.format("%H:%M").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%H:%M").to_string()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_str(), self.end_str())
    }
}

/// Morning / afternoon / overtime windows for one scope.
///
/// The overtime window never opens an OT slot by itself: only a grant does.
/// It provides the default times proposed when a grant is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShiftSchedule {
    pub morning: Option<TimeWindow>,
    pub afternoon: Option<TimeWindow>,
    pub overtime: Option<TimeWindow>,
}

impl ShiftSchedule {
    /// Per-window merge: windows set here win over `fallback`.
    pub fn or(&self, fallback: &ShiftSchedule) -> ShiftSchedule {
        ShiftSchedule {
            morning: self.morning.or(fallback.morning),
            afternoon: self.afternoon.or(fallback.afternoon),
            overtime: self.overtime.or(fallback.overtime),
        }
    }
}

/// Who a schedule or override applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScheduleScope {
    Global,
    Subject(String),
}

impl ScheduleScope {
    const GLOBAL_KEY: &'static str = "*";

    pub fn from_subject(subject: Option<&str>) -> Self {
        match subject {
            Some(s) if !s.trim().is_empty() && s != Self::GLOBAL_KEY => {
                ScheduleScope::Subject(s.trim().to_string())
            }
            _ => ScheduleScope::Global,
        }
    }

    pub fn to_db_str(&self) -> &str {
        match self {
            ScheduleScope::Global => Self::GLOBAL_KEY,
            ScheduleScope::Subject(s) => s,
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        Self::from_subject(Some(s))
    }
}

impl fmt::Display for ScheduleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleScope::Global => f.write_str("global"),
            ScheduleScope::Subject(s) => write!(f, "subject {}", s),
        }
    }
}

/// Replacement morning/afternoon windows for one date. `None` keeps the
/// schedule's window for that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateOverride {
    pub scope: ScheduleScope,
    pub date: NaiveDate,
    pub morning: Option<TimeWindow>,
    pub afternoon: Option<TimeWindow>,
}
