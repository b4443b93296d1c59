//! Export of reconciled day summaries: JSON keeps the full nested summary,
//! CSV flattens it to one row per session.

mod fs_utils;
mod json_csv;
pub mod logic;
mod model;

pub use logic::ExportLogic;
pub use model::SessionExport;

use crate::errors::AppResult;
use crate::models::day_summary::DaySummary;
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Write `days` to `path`; returns the number of records written.
    pub(crate) fn write(&self, days: &[DaySummary], path: &Path) -> AppResult<usize> {
        let written = match self {
            ExportFormat::Csv => json_csv::export_csv(days, path)?,
            ExportFormat::Json => json_csv::export_json(days, path)?,
        };

        success(format!(
            "{} export completed: {} records → {}",
            self.as_str().to_uppercase(),
            written,
            path.display()
        ));
        Ok(written)
    }
}
