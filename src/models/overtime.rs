use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Authorization that unlocks the overtime slot for one subject on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OvertimeGrant {
    pub subject_id: String,
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub created_by: String,
    pub created_at: String,
}
