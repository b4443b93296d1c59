//! Resolution of the concrete official windows of one subject on one date.

use crate::models::overtime::OvertimeGrant;
use crate::models::punch::WindowSnapshot;
use crate::models::schedule::{DateOverride, ShiftSchedule, TimeWindow};
use crate::models::session::Slot;
use crate::utils::time::parse_time;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Official interval anchored to absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OfficialWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl OfficialWindow {
    /// Enabled window, or `None` when `start >= end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Rebuild a window from a captured snapshot on `date`. An end earlier
    /// than the start rolls to the next day. Equal bounds are kept as a
    /// degenerate window (zero overlap).
    pub fn from_snapshot(snapshot: &WindowSnapshot, date: NaiveDate) -> Option<Self> {
        let start = date.and_time(parse_time(&snapshot.start)?);
        let mut end = date.and_time(parse_time(&snapshot.end)?);
        if end < start {
            end += Duration::days(1);
        }
        Some(Self { start, end })
    }

    pub fn to_snapshot(&self) -> WindowSnapshot {
        WindowSnapshot {
            start: self.start.format("%H:%M").to_string(),
            end: self.end.format("%H:%M").to_string(),
        }
    }

    /// `grace` before the start through the end, both inclusive.
    pub fn contains_with_grace(&self, t: NaiveDateTime, grace: Duration) -> bool {
        t >= self.start - grace && t <= self.end
    }
}

/// State of one slot on one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlotWindow {
    Open(OfficialWindow),
    /// Configured but closed: an `off` window, `start >= end`, or overtime
    /// without a grant. Sessions in it count zero.
    Disabled,
    /// Nothing configured for the slot at all.
    #[default]
    Unconfigured,
}

impl SlotWindow {
    /// `Open` when `start < end`, `Disabled` otherwise.
    pub fn from_bounds(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        OfficialWindow::new(start, end).map_or(SlotWindow::Disabled, SlotWindow::Open)
    }

    fn from_config(window: Option<TimeWindow>, date: NaiveDate) -> Self {
        match window {
            Some(w) => Self::from_bounds(date.and_time(w.start), date.and_time(w.end)),
            None => SlotWindow::Unconfigured,
        }
    }

    pub fn open(&self) -> Option<&OfficialWindow> {
        match self {
            SlotWindow::Open(w) => Some(w),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayWindows {
    pub morning: SlotWindow,
    pub afternoon: SlotWindow,
    pub overtime: SlotWindow,
}

impl DayWindows {
    pub fn slot(&self, slot: Slot) -> SlotWindow {
        match slot {
            Slot::Morning => self.morning,
            Slot::Afternoon => self.afternoon,
            Slot::Overtime => self.overtime,
        }
    }

    /// The slot's window when it is open.
    pub fn get(&self, slot: Slot) -> Option<&OfficialWindow> {
        match slot {
            Slot::Morning => self.morning.open(),
            Slot::Afternoon => self.afternoon.open(),
            Slot::Overtime => self.overtime.open(),
        }
    }
}

/// Everything the builder may consult for one subject/date.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowSources<'a> {
    pub default_schedule: Option<&'a ShiftSchedule>,
    pub subject_schedule: Option<&'a ShiftSchedule>,
    pub subject_override: Option<&'a DateOverride>,
    pub global_override: Option<&'a DateOverride>,
    pub grant: Option<&'a OvertimeGrant>,
}

/// Resolve the windows of `date`.
///
/// Morning/afternoon: date override (subject, then global) > subject
/// schedule > global default. Overtime is open only through a grant for
/// that exact date and disabled otherwise.
pub fn build_windows(date: NaiveDate, src: &WindowSources<'_>) -> DayWindows {
    let base = match (src.subject_schedule, src.default_schedule) {
        (Some(s), Some(d)) => s.or(d),
        (Some(s), None) => *s,
        (None, Some(d)) => *d,
        (None, None) => ShiftSchedule::default(),
    };

    let pick = |side: fn(&DateOverride) -> Option<TimeWindow>, fallback: Option<TimeWindow>| {
        src.subject_override
            .and_then(side)
            .or_else(|| src.global_override.and_then(side))
            .or(fallback)
    };

    let morning = pick(|o| o.morning, base.morning);
    let afternoon = pick(|o| o.afternoon, base.afternoon);

    let overtime = src
        .grant
        .filter(|g| g.date == date)
        .map_or(SlotWindow::Disabled, |g| SlotWindow::from_bounds(g.start, g.end));

    DayWindows {
        morning: SlotWindow::from_config(morning, date),
        afternoon: SlotWindow::from_config(afternoon, date),
        overtime,
    }
}
