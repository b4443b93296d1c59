// src/export/json_csv.rs

use crate::errors::AppResult;
use crate::export::model::summaries_to_rows;
use crate::models::day_summary::DaySummary;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Full day summaries, pretty-printed. One record per day.
pub(super) fn export_json(days: &[DaySummary], path: &Path) -> AppResult<usize> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, days)?;
    out.write_all(b"\n")?;
    out.flush()?;

    debug!(path = %path.display(), days = days.len(), "json written");
    Ok(days.len())
}

/// One row per session holding a punch; header taken from the serde names.
pub(super) fn export_csv(days: &[DaySummary], path: &Path) -> AppResult<usize> {
    let rows = summaries_to_rows(days);

    let mut wtr = csv::Writer::from_path(path)?;
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "csv written");
    Ok(rows.len())
}
