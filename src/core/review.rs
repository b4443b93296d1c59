//! Review state machine: Pending → Approved | Rejected.
//!
//! A decision applies to the whole session holding the target event. Each
//! target is handled in its own `BEGIN IMMEDIATE` transaction and every row
//! update is conditional on the row still being pending, so concurrent or
//! repeated requests for the same event collapse into a no-op.

use crate::core::calculator::ledger::{PairContext, freeze_value};
use crate::core::calculator::pairing::pair_day;
use crate::core::snapshot::{EngineSettings, ReconcileSnapshot};
use crate::db::log::ttlog;
use crate::db::queries::{Freeze, freeze_approved, insert_punch, load_punch, transition_punch};
use crate::errors::{AppError, AppResult};
use crate::models::punch::EventRef;
use crate::models::review_status::ReviewStatus;
use chrono::Utc;
use clap::ValueEnum;
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn target_status(&self) -> ReviewStatus {
        match self {
            ReviewDecision::Approve => ReviewStatus::Approved,
            ReviewDecision::Reject => ReviewStatus::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDecision::Approve => "approve",
            ReviewDecision::Reject => "reject",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ReviewOutcome {
    /// At least one pending row moved to `status`.
    Applied {
        event_ids: Vec<i64>,
        status: ReviewStatus,
        /// Id given to a synthetic close-out persisted by this transition.
        materialized: Option<i64>,
    },
    /// Every row was already terminal.
    Unchanged {
        event_ids: Vec<i64>,
        status: ReviewStatus,
    },
}

impl ReviewOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReviewOutcome::Applied { .. })
    }

    pub fn event_ids(&self) -> &[i64] {
        match self {
            ReviewOutcome::Applied { event_ids, .. } | ReviewOutcome::Unchanged { event_ids, .. } => {
                event_ids
            }
        }
    }
}

pub struct ReviewLogic;

impl ReviewLogic {
    /// Apply `decision` to the session containing `target`.
    pub fn apply(
        conn: &mut Connection,
        settings: &EngineSettings,
        target: &EventRef,
        decision: ReviewDecision,
        reviewer_id: &str,
    ) -> AppResult<ReviewOutcome> {
        let reviewer_id = reviewer_id.trim();
        if decision == ReviewDecision::Approve && reviewer_id.is_empty() {
            return Err(AppError::MissingReviewer);
        }

        let tz = settings.tz;
        let status = decision.target_status();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let (subject_id, date) = match target {
            EventRef::Persisted(id) => {
                let ev = load_punch(&tx, tz, *id)?.ok_or(AppError::EventNotFound(*id))?;
                (ev.subject_id.clone(), ev.date())
            }
            EventRef::Virtual(v) => (v.subject_id.clone(), v.date),
        };

        let snapshot =
            ReconcileSnapshot::load(&tx, settings, std::slice::from_ref(&subject_id), date, date)?;
        let windows = snapshot.windows_for(&subject_id, date);
        let pairing = pair_day(
            &subject_id,
            date,
            snapshot.punches_for(&subject_id, date),
            &windows,
            date < snapshot.today,
            &snapshot.rules,
        );

        let session = match target {
            EventRef::Persisted(id) => pairing
                .sessions
                .iter()
                .find(|s| s.persisted_ids().contains(id)),
            EventRef::Virtual(v) => Some(pairing.session(v.slot)).filter(|s| s.is_complete()),
        };

        let now = Utc::now().with_timezone(&tz).naive_local();
        let mut event_ids = Vec::new();
        let mut materialized = None;
        let mut changed = 0;

        match (session, target) {
            (None, EventRef::Persisted(id)) => {
                debug!(event_id = id, "event belongs to no session, transitioning alone");
                changed += transition_punch(&tx, tz, *id, status, reviewer_id, now, None)?;
                event_ids.push(*id);
            }
            (None, EventRef::Virtual(_)) => {
                return Err(AppError::VirtualNotFound(target.to_string()));
            }
            (Some(session), _) => {
                let mut session = session.clone();

                if let Some(out) = session.out_event.as_mut()
                    && out.id.is_virtual()
                {
                    let id = insert_punch(&tx, tz, out)?;
                    info!(event_id = id, slot = %session.slot, %subject_id, %date, "materialized synthetic close-out");
                    out.id = EventRef::Persisted(id);
                    materialized = Some(id);
                }

                let freeze = match (&session.in_event, &session.out_event) {
                    (Some(in_event), Some(out_event)) if decision == ReviewDecision::Approve => {
                        let ctx = PairContext {
                            in_event,
                            out_event,
                            live: windows.slot(session.slot),
                        };
                        Some(Freeze {
                            validated: freeze_value(&ctx),
                            snapshot: ctx.effective_window().map(|w| w.to_snapshot()),
                        })
                    }
                    _ => None,
                };

                if let Some(id) = session.in_event.as_ref().and_then(|e| e.id.persisted()) {
                    changed += transition_punch(&tx, tz, id, status, reviewer_id, now, None)?;
                    event_ids.push(id);
                }
                if let Some(id) = session.out_event.as_ref().and_then(|e| e.id.persisted()) {
                    changed +=
                        transition_punch(&tx, tz, id, status, reviewer_id, now, freeze.as_ref())?;
                    event_ids.push(id);

                    // The out may have been approved on its own earlier.
                    let in_ok = session
                        .in_event
                        .as_ref()
                        .is_some_and(|e| !e.status.is_rejected());
                    if in_ok && let Some(f) = &freeze {
                        let frozen = freeze_approved(&tx, id, f)?;
                        if frozen > 0 {
                            debug!(event_id = id, "froze ledger of an already approved out");
                        }
                        changed += frozen;
                    }
                }
            }
        }

        let outcome = if changed > 0 {
            ttlog(
                &tx,
                decision.as_str(),
                &target.to_string(),
                &format!(
                    "{} events {:?} of {} on {} by '{}'",
                    status, event_ids, subject_id, date, reviewer_id
                ),
            )?;
            ReviewOutcome::Applied {
                event_ids,
                status,
                materialized,
            }
        } else {
            let current = match event_ids.first() {
                Some(id) => load_punch(&tx, tz, *id)?.map(|e| e.status).unwrap_or(status),
                None => status,
            };
            ReviewOutcome::Unchanged {
                event_ids,
                status: current,
            }
        };

        tx.commit()?;

        match &outcome {
            ReviewOutcome::Applied { event_ids, .. } => {
                info!(event_ref = %target, ?event_ids, decision = decision.as_str(), "review applied")
            }
            ReviewOutcome::Unchanged { .. } => {
                debug!(event_ref = %target, "review was a no-op, events already terminal")
            }
        }

        Ok(outcome)
    }

    /// Apply the same decision to many targets. Failures are reported per
    /// target and never stop the batch.
    pub fn apply_bulk(
        conn: &mut Connection,
        settings: &EngineSettings,
        targets: &[EventRef],
        decision: ReviewDecision,
        reviewer_id: &str,
    ) -> Vec<(EventRef, AppResult<ReviewOutcome>)> {
        targets
            .iter()
            .map(|target| {
                let result = Self::apply(conn, settings, target, decision, reviewer_id);
                if let Err(e) = &result {
                    warn!(event_ref = %target, error = %e, "review failed");
                }
                (target.clone(), result)
            })
            .collect()
    }
}
