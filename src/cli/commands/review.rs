use crate::cli::commands::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::review::{ReviewLogic, ReviewOutcome};
use crate::errors::{AppError, AppResult};
use crate::models::punch::EventRef;
use crate::ui::messages::{error, info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Review {
        decision,
        targets,
        reviewer,
    } = cmd
    {
        let refs = targets
            .iter()
            .map(|t| t.parse::<EventRef>())
            .collect::<AppResult<Vec<_>>>()?;

        let (mut pool, settings) = open(cfg)?;
        let reviewer = reviewer.as_deref().unwrap_or("");

        let results =
            ReviewLogic::apply_bulk(&mut pool.conn, &settings, &refs, *decision, reviewer);

        let mut failed = 0;
        for (target, result) in &results {
            match result {
                Ok(ReviewOutcome::Applied {
                    event_ids,
                    status,
                    materialized,
                }) => {
                    success(format!("{} → {} (events {:?})", target, status, event_ids));
                    if let Some(id) = materialized {
                        info(format!("Synthetic close-out stored as punch #{}", id));
                    }
                }
                Ok(ReviewOutcome::Unchanged { event_ids, status }) => {
                    info(format!(
                        "{} already {} (events {:?}), nothing to do",
                        target, status, event_ids
                    ));
                }
                Err(e) => {
                    failed += 1;
                    error(format!("{}: {}", target, e));
                }
            }
        }

        if failed > 0 {
            return Err(AppError::Other(format!(
                "{} of {} review targets failed",
                failed,
                results.len()
            )));
        }
    }
    Ok(())
}
