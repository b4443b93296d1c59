use super::punch::{EventRef, WindowSnapshot};
use super::review_status::ReviewStatus;
use super::session::Slot;
use crate::core::calculator::ledger::DurationSource;
use crate::core::calculator::windows::OfficialWindow;
use crate::utils::time::serialize_minutes;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Reconciled view of one slot.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub slot: Slot,
    pub in_ref: Option<EventRef>,
    pub out_ref: Option<EventRef>,
    pub in_at: Option<NaiveDateTime>,
    pub out_at: Option<NaiveDateTime>,
    pub in_status: Option<ReviewStatus>,
    pub out_status: Option<ReviewStatus>,
    pub synthetic_out: bool,
    pub window: Option<OfficialWindow>,
    #[serde(serialize_with = "serialize_minutes", rename = "tracked_minutes")]
    pub tracked: Duration,
    #[serde(serialize_with = "serialize_minutes", rename = "validated_minutes")]
    pub validated: Duration,
    pub source: Option<DurationSource>,
    pub late: bool,
}

/// Official-window snapshot the reconciliation pass wants written back to a
/// persisted out-event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotCapture {
    pub event_id: i64,
    pub snapshot: WindowSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub subject_id: String,
    pub date: NaiveDate,
    pub sessions: Vec<SessionSummary>,
    /// Punches no session consumed (extra ins, orphan outs).
    pub stray: Vec<EventRef>,
    #[serde(serialize_with = "serialize_minutes", rename = "tracked_minutes")]
    pub tracked: Duration,
    #[serde(serialize_with = "serialize_minutes", rename = "validated_minutes")]
    pub validated: Duration,
    #[serde(skip)]
    pub snapshot_captures: Vec<SnapshotCapture>,
}

impl DaySummary {
    pub fn session(&self, slot: Slot) -> Option<&SessionSummary> {
        self.sessions.iter().find(|s| s.slot == slot)
    }

    pub fn has_activity(&self) -> bool {
        self.sessions
            .iter()
            .any(|s| s.in_ref.is_some() || s.out_ref.is_some())
            || !self.stray.is_empty()
    }

    pub fn late_slots(&self) -> Vec<Slot> {
        self.sessions.iter().filter(|s| s.late).map(|s| s.slot).collect()
    }
}

/// Aggregate over a date range for one subject.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectTotals {
    pub subject_id: String,
    pub days: usize,
    #[serde(serialize_with = "serialize_minutes", rename = "tracked_minutes")]
    pub tracked: Duration,
    #[serde(serialize_with = "serialize_minutes", rename = "validated_minutes")]
    pub validated: Duration,
    pub late_count: usize,
}
