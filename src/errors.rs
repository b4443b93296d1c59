//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing / boundary validation
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid window '{0}' (expected HH:MM-HH:MM)")]
    InvalidWindow(String),

    #[error("Invalid punch kind: {0}")]
    InvalidKind(String),

    #[error("Invalid review status: {0}")]
    InvalidStatus(String),

    #[error("Invalid event reference: {0}")]
    InvalidEventRef(String),

    #[error("Invalid subject id: {0}")]
    InvalidSubject(String),

    #[error("Invalid UTC offset: {0}")]
    InvalidOffset(String),

    // ---------------------------
    // Review / overtime logic
    // ---------------------------
    #[error("Punch event {0} not found")]
    EventNotFound(i64),

    #[error("No open session matches virtual event {0}")]
    VirtualNotFound(String),

    #[error("A reviewer id is required to approve")]
    MissingReviewer,

    #[error("Invalid range: start {start} is not before end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Overtime already granted to {subject} on {date}")]
    GrantExists { subject: String, date: String },

    #[error("No overtime grant for {subject} on {date}")]
    GrantNotFound { subject: String, date: String },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
