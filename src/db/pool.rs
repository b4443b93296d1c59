//! SQLite connection wrapper (lightweight for CLI usage).

use chrono::FixedOffset;
use rusqlite::{Connection, Result};
use std::path::Path;
use std::time::Duration;

/// How long a writer waits for another connection's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DbPool {
    pub conn: Connection,
    /// Offset used to turn stored epoch milliseconds into wall-clock time.
    pub tz: FixedOffset,
}

impl DbPool {
    pub fn new(path: &str, tz: FixedOffset) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn, tz })
    }
}
