//! rAttendance library root.
//! Exposes the CLI parser, the high-level run() function and the engine modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Env var holding a tracing filter; overrides `log_level` from the config.
pub const LOG_ENV: &str = "RATTENDANCE_LOG";

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Punch { .. } => cli::commands::punch::handle(&cli.command, cfg),
        Commands::Report { .. } => cli::commands::report::handle(&cli.command, cfg),
        Commands::Review { .. } => cli::commands::review::handle(&cli.command, cfg),
        Commands::Overtime { .. } => cli::commands::overtime::handle(&cli.command, cfg),
        Commands::Schedule { .. } => cli::commands::schedule::handle(&cli.command, cfg),
        Commands::Override { .. } => cli::commands::overrides::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Diagnostics go to stderr so report and export output stay clean.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // A broken config file must not prevent `init` from rewriting it.
    let mut cfg = match (&cli.command, Config::load()) {
        (_, Ok(cfg)) => cfg,
        (Commands::Init, Err(_)) => Config::default(),
        (_, Err(e)) => return Err(e),
    };

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    init_tracing(&cfg.log_level);

    dispatch(&cli, &cfg)
}
