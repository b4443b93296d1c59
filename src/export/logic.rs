// src/export/logic.rs

use crate::core::logic::Core;
use crate::core::snapshot::EngineSettings;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::ui::messages::warning;
use crate::utils::date::resolve_period;
use rusqlite::Connection;
use std::path::Path;
use tracing::debug;

/// High-level export of reconciled day summaries.
pub struct ExportLogic;

impl ExportLogic {
    /// Reconcile `period` (see [`resolve_period`]) and write the result to
    /// `file`, which must be an absolute path.
    ///
    /// Days without any punch are left out. An empty `subjects` list exports
    /// every subject with punches in the period.
    pub fn export(
        conn: &Connection,
        settings: &EngineSettings,
        format: ExportFormat,
        file: &str,
        period: &str,
        subjects: &[String],
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let dates = resolve_period(period).map_err(AppError::InvalidDate)?;

        ensure_writable(path, force)?;

        let days: Vec<_> = Core::reconcile_range(conn, settings, subjects, &dates)?
            .into_iter()
            .filter(|d| d.has_activity())
            .collect();

        if days.is_empty() {
            warning("No punches found for the selected period.");
            return Ok(0);
        }

        debug!(days = days.len(), format = format.as_str(), "exporting summaries");
        format.write(&days, path)?;

        Ok(days.len())
    }
}
