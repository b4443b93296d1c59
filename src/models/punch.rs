use super::{punch_kind::PunchKind, review_status::ReviewStatus, session::Slot};
use crate::errors::{AppError, AppResult};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Identity of a punch event.
///
/// Persisted rows carry their database id. Close-outs synthesized by the
/// pairing engine only exist as a projection of (subject, date, slot) until a
/// review transition materializes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum EventRef {
    Persisted(i64),
    Virtual(VirtualRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VirtualRef {
    pub subject_id: String,
    pub date: NaiveDate,
    pub slot: Slot,
}

impl EventRef {
    pub fn persisted(&self) -> Option<i64> {
        match self {
            EventRef::Persisted(id) => Some(*id),
            EventRef::Virtual(_) => None,
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, EventRef::Virtual(_))
    }
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventRef::Persisted(id) => write!(f, "{}", id),
            EventRef::Virtual(v) => write!(f, "{}/{}/{}", v.subject_id, v.date, v.slot),
        }
    }
}

impl FromStr for EventRef {
    type Err = AppError;

    /// `42` → persisted row, `SUBJECT/YYYY-MM-DD/SLOT` → virtual close-out.
    fn from_str(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            if id <= 0 {
                return Err(AppError::InvalidEventRef(s.to_string()));
            }
            return Ok(EventRef::Persisted(id));
        }

        let mut parts = s.rsplitn(3, '/');
        let (Some(slot), Some(date), Some(subject)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(AppError::InvalidEventRef(s.to_string()));
        };

        if subject.trim().is_empty() {
            return Err(AppError::InvalidEventRef(s.to_string()));
        }

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| AppError::InvalidEventRef(s.to_string()))?;

        Ok(EventRef::Virtual(VirtualRef {
            subject_id: subject.to_string(),
            date,
            slot: Slot::from_code(slot)?,
        }))
    }
}

/// Official window captured as time-of-day strings ("HH:MM") the first time
/// a pair is evaluated or approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSnapshot {
    pub start: String,
    pub end: String,
}

/// A single captured (or synthesized) attendance punch.
#[derive(Debug, Clone, PartialEq)]
pub struct PunchEvent {
    pub id: EventRef,
    pub subject_id: String,
    pub kind: PunchKind,
    pub occurred_at: NaiveDateTime,
    pub evidence: String,
    pub status: ReviewStatus,
    pub reviewer_id: Option<String>,
    pub reviewed_at: Option<NaiveDateTime>,
    /// Frozen ledger value, only ever set by an approval.
    pub validated: Option<Duration>,
    pub window_snapshot: Option<WindowSnapshot>,
    pub synthetic: bool,
}

impl PunchEvent {
    /// Build a pending punch that has not been reviewed yet.
    pub fn new(id: i64, subject_id: &str, kind: PunchKind, occurred_at: NaiveDateTime) -> Self {
        Self {
            id: EventRef::Persisted(id),
            subject_id: subject_id.to_string(),
            kind,
            occurred_at,
            evidence: String::new(),
            status: ReviewStatus::Pending,
            reviewer_id: None,
            reviewed_at: None,
            validated: None,
            window_snapshot: None,
            synthetic: false,
        }
    }

    /// Close-out produced by the pairing engine for a past, unclosed slot.
    pub fn virtual_out(subject_id: &str, slot: Slot, occurred_at: NaiveDateTime, date: NaiveDate) -> Self {
        Self {
            id: EventRef::Virtual(VirtualRef {
                subject_id: subject_id.to_string(),
                date,
                slot,
            }),
            subject_id: subject_id.to_string(),
            kind: PunchKind::Out,
            occurred_at,
            evidence: String::new(),
            status: ReviewStatus::Pending,
            reviewer_id: None,
            reviewed_at: None,
            validated: None,
            window_snapshot: None,
            synthetic: true,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.occurred_at.date()
    }
}

/// Input accepted at the capture boundary, before validation.
#[derive(Debug, Clone)]
pub struct NewPunch {
    pub subject_id: String,
    pub kind: String,
    pub occurred_at_ms: i64,
    pub evidence: String,
}
