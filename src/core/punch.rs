use crate::core::snapshot::EngineSettings;
use crate::db::queries::insert_punch;
use crate::errors::{AppError, AppResult};
use crate::models::punch::{NewPunch, PunchEvent};
use crate::models::punch_kind::PunchKind;
use crate::utils::time::from_epoch_ms;
use rusqlite::Connection;
use tracing::debug;

/// Capture boundary: raw punches are validated here, before the engine ever
/// sees them.
pub struct PunchLogic;

impl PunchLogic {
    pub fn validate(input: &NewPunch, settings: &EngineSettings) -> AppResult<PunchEvent> {
        let subject = input.subject_id.trim();
        if subject.is_empty() || subject.contains('/') {
            return Err(AppError::InvalidSubject(input.subject_id.clone()));
        }

        let kind = PunchKind::parse(&input.kind)?;

        if input.occurred_at_ms <= 0 {
            return Err(AppError::InvalidTimestamp(input.occurred_at_ms.to_string()));
        }
        let occurred_at = from_epoch_ms(input.occurred_at_ms, settings.tz)?;

        let mut ev = PunchEvent::new(0, subject, kind, occurred_at);
        ev.evidence = input.evidence.trim().to_string();
        Ok(ev)
    }

    /// Validate and store a punch; returns the stored event with its id.
    pub fn record(conn: &Connection, settings: &EngineSettings, input: &NewPunch) -> AppResult<PunchEvent> {
        let mut ev = Self::validate(input, settings)?;
        let id = insert_punch(conn, settings.tz, &ev)?;
        ev.id = crate::models::punch::EventRef::Persisted(id);

        debug!(id, subject_id = %ev.subject_id, kind = %ev.kind, at = %ev.occurred_at, "punch recorded");
        Ok(ev)
    }
}
