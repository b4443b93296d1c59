use crate::cli::commands::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::errors::AppResult;
use crate::ui::messages::info;

/// `log --print` dumps the audit trail; without the flag only a hint is shown.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log { print } = cmd else {
        return Ok(());
    };

    if !*print {
        info("Use `rattendance log --print` to show the audit log.");
        return Ok(());
    }

    let (pool, _) = open(cfg)?;
    LogLogic::print_log(&pool.conn)
}
