use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let tz = cfg.tz()?;

    println!("⚙️  Initializing rAttendance…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &cfg.database);

    let pool = DbPool::new(&cfg.database, tz)?;
    let applied = init_db(&pool.conn)?;
    if applied > 0 {
        info(format!("{applied} migration(s) applied"));
    }

    // The audit line is best effort.
    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {}", &cfg.database),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    success(format!("Database initialized at {}", &cfg.database));
    Ok(())
}
