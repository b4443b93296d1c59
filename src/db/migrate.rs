//! Versioned schema migrations.
//!
//! Every migration runs once; applied versions are recorded in the `log`
//! table as `migration_applied` rows, so the runner is idempotent.

use rusqlite::{Connection, OptionalExtension, Result, params};
use tracing::{debug, info};

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250901_0001_create_punches",
        description: "Created punches table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS punches (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id     TEXT NOT NULL,
            date           TEXT NOT NULL,          -- YYYY-MM-DD, organisation offset
            occurred_at    INTEGER NOT NULL,       -- epoch milliseconds
            kind           TEXT NOT NULL CHECK (kind IN ('in','out')),
            evidence       TEXT NOT NULL DEFAULT '',
            status         TEXT NOT NULL DEFAULT 'pending',
            reviewer_id    TEXT,
            reviewed_at    INTEGER,
            validated_ms   INTEGER,                -- frozen ledger, set on approval
            official_start TEXT,                   -- HH:MM snapshot
            official_end   TEXT,                   -- HH:MM snapshot
            synthetic      INTEGER NOT NULL DEFAULT 0,
            created_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_punches_subject_date ON punches(subject_id, date);
        CREATE INDEX IF NOT EXISTS idx_punches_date ON punches(date);
        "#,
    },
    Migration {
        version: "20250901_0002_create_schedules",
        description: "Created schedules and date_overrides tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS schedules (
            scope      TEXT PRIMARY KEY,           -- '*' = global default
            morning    TEXT,                       -- HH:MM-HH:MM
            afternoon  TEXT,
            overtime   TEXT,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS date_overrides (
            scope      TEXT NOT NULL,
            date       TEXT NOT NULL,
            morning    TEXT,
            afternoon  TEXT,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (scope, date)
        );
        "#,
    },
    Migration {
        version: "20250915_0003_create_overtime_grants",
        description: "Created overtime_grants table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS overtime_grants (
            subject_id TEXT NOT NULL,
            date       TEXT NOT NULL,
            start_at   INTEGER NOT NULL,           -- epoch milliseconds
            end_at     INTEGER NOT NULL,
            created_by TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            PRIMARY KEY (subject_id, date)
        );
        "#,
    },
];

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        params![m.version, m.description],
    )?;
    tx.commit()
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
/// Returns how many migrations were applied by this call.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            debug!(version = m.version, "migration already applied");
            continue;
        }

        apply(conn, m)?;
        info!(version = m.version, "{}", m.description);
        applied += 1;
    }

    Ok(applied)
}

/// Versions recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}
