use crate::core::review::ReviewDecision;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rAttendance
/// Attendance reconciliation for camera-verified time punches, on SQLite
#[derive(Parser)]
#[command(
    name = "rattendance",
    version = env!("CARGO_PKG_VERSION"),
    about = "Reconcile attendance punches into AM/PM/OT sessions with an approval ledger",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        /// Print the current configuration file to stdout
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        /// Add keys introduced by newer releases to the configuration file
        #[arg(
            long = "check",
            help = "Check the configuration file and add missing keys with defaults"
        )]
        check: bool,

        /// Edit the configuration file with your preferred editor
        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        /// Specify the editor to use (overrides $EDITOR/$VISUAL).
        #[arg(long = "editor", help = "Specify the editor to use")]
        editor: Option<String>,
    },

    /// Print or manage the internal log table
    Log {
        /// Print rows from the internal `log` table
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Record a raw punch
    Punch {
        /// Subject (trainee) id
        subject: String,

        /// Punch kind: in | out
        kind: String,

        /// Wall-clock time in the configured offset (YYYY-MM-DD HH:MM[:SS]); default now
        #[arg(long = "at", conflicts_with = "ms")]
        at: Option<String>,

        /// Capture instant as epoch milliseconds
        #[arg(long = "ms")]
        ms: Option<i64>,

        /// Opaque evidence reference (photo id, URL, ...)
        #[arg(long = "evidence", default_value = "")]
        evidence: String,
    },

    /// Reconcile and show day summaries
    Report {
        /// Period to report.
        ///
        /// Supported formats:
        /// - YYYY                  → entire year (e.g. "2025")
        /// - YYYY-MM              → entire month (e.g. "2025-06")
        /// - YYYY-MM-DD           → specific day (e.g. "2025-06-18")
        ///
        /// Ranges (start:end) in the same format, e.g. "2025-06-01:2025-06-10".
        /// If omitted, today is reported.
        #[arg(long, short = 'p')]
        period: Option<String>,

        /// Restrict to one or more subjects (repeatable)
        #[arg(long = "subject", short = 's')]
        subjects: Vec<String>,

        /// Print summaries as JSON
        #[arg(long)]
        json: bool,

        /// Print per-subject totals only
        #[arg(long, conflicts_with = "json")]
        totals: bool,
    },

    /// Approve or reject the session holding one or more events
    Review {
        /// approve | reject
        #[arg(value_enum)]
        decision: ReviewDecision,

        /// Event references: a punch id (42) or a virtual close-out (SUBJECT/YYYY-MM-DD/AM)
        #[arg(required = true)]
        targets: Vec<String>,

        /// Reviewer id (required to approve)
        #[arg(long = "by")]
        reviewer: Option<String>,
    },

    /// Manage overtime grants
    Overtime {
        #[command(subcommand)]
        action: OvertimeCmd,
    },

    /// Manage shift schedules (global or per subject)
    Schedule {
        #[command(subcommand)]
        action: ScheduleCmd,
    },

    /// Manage per-date window overrides
    Override {
        #[command(subcommand)]
        action: OverrideCmd,
    },

    /// Export reconciled sessions
    Export {
        /// Export format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (absolute path required)
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Period to export (same formats as `report --period`)
        #[arg(long, short = 'p', value_name = "PERIOD")]
        period: String,

        /// Restrict to one or more subjects (repeatable)
        #[arg(long = "subject", short = 's')]
        subjects: Vec<String>,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum OvertimeCmd {
    /// Open an OT window for a subject on a date
    Grant {
        subject: String,
        /// Date (YYYY-MM-DD)
        date: String,
        /// Start (HH:MM); defaults to the schedule's overtime window
        #[arg(long = "from", requires = "end")]
        start: Option<String>,
        /// End (HH:MM); an end before the start falls on the next day
        #[arg(long = "to", requires = "start")]
        end: Option<String>,
        /// Granting user
        #[arg(long = "by", default_value = "")]
        by: String,
    },
    /// Change the bounds of an existing grant
    Revise {
        subject: String,
        date: String,
        #[arg(long = "from")]
        start: String,
        #[arg(long = "to")]
        end: String,
    },
    /// Remove a grant
    Revoke { subject: String, date: String },
    /// List grants in a period
    List {
        #[arg(long, short = 'p')]
        period: Option<String>,
        #[arg(long = "subject", short = 's')]
        subject: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ScheduleCmd {
    /// Store windows for a scope; omitted windows fall back to the global ones
    Set {
        /// Subject id; omit for the global schedule
        #[arg(long = "subject", short = 's')]
        subject: Option<String>,
        /// Morning window (HH:MM-HH:MM, or "off")
        #[arg(long)]
        morning: Option<String>,
        /// Afternoon window (HH:MM-HH:MM, or "off")
        #[arg(long)]
        afternoon: Option<String>,
        /// Default overtime window for new grants (HH:MM-HH:MM, may end after midnight)
        #[arg(long)]
        overtime: Option<String>,
    },
    /// Show the stored and effective schedule
    Show {
        #[arg(long = "subject", short = 's')]
        subject: Option<String>,
    },
    /// Remove the stored schedule of a scope
    Clear {
        #[arg(long = "subject", short = 's')]
        subject: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum OverrideCmd {
    /// Replace the morning and/or afternoon window on one date
    Set {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Subject id; omit for a global override
        #[arg(long = "subject", short = 's')]
        subject: Option<String>,
        /// Morning window (HH:MM-HH:MM, or "off" to disable the slot)
        #[arg(long)]
        morning: Option<String>,
        /// Afternoon window (HH:MM-HH:MM, or "off" to disable the slot)
        #[arg(long)]
        afternoon: Option<String>,
    },
    /// Delete the override of a date
    Del {
        date: String,
        #[arg(long = "subject", short = 's')]
        subject: Option<String>,
    },
}
