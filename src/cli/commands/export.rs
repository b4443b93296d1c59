use crate::cli::commands::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Export {
        format,
        file,
        period,
        subjects,
        force,
    } = cmd
    else {
        return Ok(());
    };

    let (pool, settings) = open(cfg)?;
    let days = ExportLogic::export(&pool.conn, &settings, *format, file, period, subjects, *force)?;

    if days > 0 {
        info(format!("{days} subject-day(s) reconciled for period {period}"));
    }
    Ok(())
}
