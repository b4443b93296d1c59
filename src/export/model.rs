// src/export/model.rs

use crate::models::day_summary::{DaySummary, SessionSummary};
use serde::Serialize;

/// Flat row per reconciled session, used by the CSV writer.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SessionExport {
    pub subject_id: String,
    pub date: String,
    pub slot: String,
    pub in_ref: String,
    pub in_at: String,
    pub in_status: String,
    pub out_ref: String,
    pub out_at: String,
    pub out_status: String,
    pub synthetic_out: bool,
    pub window_start: String,
    pub window_end: String,
    pub tracked_minutes: i64,
    pub validated_minutes: i64,
    pub source: String,
    pub late: bool,
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl SessionExport {
    pub fn from_session(day: &DaySummary, s: &SessionSummary) -> Self {
        Self {
            subject_id: day.subject_id.clone(),
            date: day.date.format("%Y-%m-%d").to_string(),
            slot: s.slot.code().to_string(),
            in_ref: opt(s.in_ref.as_ref()),
            in_at: opt(s.in_at.map(|t| t.format("%Y-%m-%d %H:%M:%S"))),
            in_status: opt(s.in_status),
            out_ref: opt(s.out_ref.as_ref()),
            out_at: opt(s.out_at.map(|t| t.format("%Y-%m-%d %H:%M:%S"))),
            out_status: opt(s.out_status),
            synthetic_out: s.synthetic_out,
            window_start: opt(s.window.map(|w| w.start.format("%Y-%m-%d %H:%M"))),
            window_end: opt(s.window.map(|w| w.end.format("%Y-%m-%d %H:%M"))),
            tracked_minutes: s.tracked.num_minutes(),
            validated_minutes: s.validated.num_minutes(),
            source: s
                .source
                .map(|src| src.as_str().to_string())
                .unwrap_or_default(),
            late: s.late,
        }
    }
}

/// Only sessions holding at least one punch are exported.
pub(crate) fn summaries_to_rows(days: &[DaySummary]) -> Vec<SessionExport> {
    days.iter()
        .flat_map(|d| {
            d.sessions
                .iter()
                .filter(|s| s.in_ref.is_some() || s.out_ref.is_some())
                .map(move |s| SessionExport::from_session(d, s))
        })
        .collect()
}
