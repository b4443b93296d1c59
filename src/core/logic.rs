use crate::core::calculator::lateness::is_late;
use crate::core::calculator::ledger::{PairContext, resolve_session};
use crate::core::calculator::pairing::pair_day;
use crate::core::snapshot::{EngineSettings, ReconcileSnapshot};
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::day_summary::{DaySummary, SessionSummary, SnapshotCapture, SubjectTotals};
use crate::models::punch::WindowSnapshot;
use crate::models::session::Session;
use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::thread;
use tracing::{debug, info};

pub struct Core;

impl Core {
    /// Reconcile one subject's day against the snapshot. Pure.
    pub fn summarize_day(snapshot: &ReconcileSnapshot, subject_id: &str, date: NaiveDate) -> DaySummary {
        let windows = snapshot.windows_for(subject_id, date);
        let is_past = date < snapshot.today;
        let pairing = pair_day(
            subject_id,
            date,
            snapshot.punches_for(subject_id, date),
            &windows,
            is_past,
            &snapshot.rules,
        );

        let mut sessions = Vec::with_capacity(pairing.sessions.len());
        let mut captures = Vec::new();
        let mut tracked = Duration::zero();
        let mut validated = Duration::zero();

        for session in &pairing.sessions {
            let slot_window = windows.slot(session.slot);
            let live = slot_window.open();
            let resolved = resolve_session(session, slot_window);

            let effective = match (&session.in_event, &session.out_event) {
                (Some(in_event), Some(out_event)) => PairContext {
                    in_event,
                    out_event,
                    live: slot_window,
                }
                .effective_window(),
                _ => live.copied(),
            };

            if let Some(capture) = pending_capture(session, live.map(|w| w.to_snapshot())) {
                captures.push(capture);
            }

            tracked += resolved.tracked;
            validated += resolved.validated;

            sessions.push(SessionSummary {
                slot: session.slot,
                in_ref: session.in_event.as_ref().map(|e| e.id.clone()),
                out_ref: session.out_event.as_ref().map(|e| e.id.clone()),
                in_at: session.in_event.as_ref().map(|e| e.occurred_at),
                out_at: session.out_event.as_ref().map(|e| e.occurred_at),
                in_status: session.in_event.as_ref().map(|e| e.status),
                out_status: session.out_event.as_ref().map(|e| e.status),
                synthetic_out: session.out_event.as_ref().is_some_and(|e| e.synthetic),
                window: effective,
                tracked: resolved.tracked,
                validated: resolved.validated,
                source: resolved.source,
                late: session
                    .in_event
                    .as_ref()
                    .is_some_and(|e| is_late(e, effective.as_ref())),
            });
        }

        DaySummary {
            subject_id: subject_id.to_string(),
            date,
            sessions,
            stray: pairing.stray.into_iter().map(|e| e.id).collect(),
            tracked,
            validated,
            snapshot_captures: captures,
        }
    }

    /// One summary per subject per date, ordered by subject then date.
    /// Subjects are reconciled concurrently on up to `workers` threads.
    pub fn reconcile(
        snapshot: &ReconcileSnapshot,
        subjects: &[String],
        dates: &[NaiveDate],
        workers: usize,
    ) -> Vec<DaySummary> {
        if subjects.is_empty() || dates.is_empty() {
            return Vec::new();
        }

        let workers = workers.clamp(1, subjects.len());
        let chunk = subjects.len().div_ceil(workers);

        let summarize = |batch: &[String]| -> Vec<DaySummary> {
            batch
                .iter()
                .flat_map(|s| dates.iter().map(move |d| Self::summarize_day(snapshot, s, *d)))
                .collect()
        };

        if workers == 1 {
            return summarize(subjects);
        }

        thread::scope(|scope| {
            let handles: Vec<_> = subjects
                .chunks(chunk)
                .map(|batch| scope.spawn(move || summarize(batch)))
                .collect();

            handles
                .into_iter()
                .flat_map(|h| match h.join() {
                    Ok(v) => v,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }

    /// Load, reconcile and (when enabled) write back first-seen window
    /// snapshots.
    pub fn reconcile_range(
        conn: &Connection,
        settings: &EngineSettings,
        subjects: &[String],
        dates: &[NaiveDate],
    ) -> AppResult<Vec<DaySummary>> {
        let (Some(from), Some(to)) = (dates.iter().min().copied(), dates.iter().max().copied())
        else {
            return Ok(Vec::new());
        };

        let snapshot = ReconcileSnapshot::load(conn, settings, subjects, from, to)?;
        let subjects = if subjects.is_empty() {
            snapshot.subjects()
        } else {
            subjects.to_vec()
        };

        let summaries = Self::reconcile(&snapshot, &subjects, dates, settings.workers);

        if settings.capture_snapshots {
            let written = Self::persist_captures(conn, &summaries)?;
            if written > 0 {
                info!(written, "captured official-window snapshots");
            }
        }

        Ok(summaries)
    }

    /// Persist the snapshot captures requested by a reconciliation pass.
    pub fn persist_captures(conn: &Connection, summaries: &[DaySummary]) -> AppResult<usize> {
        let tx = conn.unchecked_transaction()?;
        let mut written = 0;
        for capture in summaries.iter().flat_map(|s| &s.snapshot_captures) {
            written += queries::capture_snapshot(&tx, capture.event_id, &capture.snapshot)?;
        }
        tx.commit()?;
        Ok(written)
    }

    /// Per-subject aggregate over a set of day summaries.
    pub fn totals(summaries: &[DaySummary]) -> Vec<SubjectTotals> {
        let mut by_subject: BTreeMap<&str, SubjectTotals> = BTreeMap::new();

        for s in summaries {
            let entry = by_subject
                .entry(s.subject_id.as_str())
                .or_insert_with(|| SubjectTotals {
                    subject_id: s.subject_id.clone(),
                    days: 0,
                    tracked: Duration::zero(),
                    validated: Duration::zero(),
                    late_count: 0,
                });

            if s.has_activity() {
                entry.days += 1;
            }
            entry.tracked += s.tracked;
            entry.validated += s.validated;
            entry.late_count += s.late_slots().len();
        }

        debug!(subjects = by_subject.len(), "aggregated totals");
        by_subject.into_values().collect()
    }
}

/// Snapshot to record for a complete, non-rejected pair whose persisted
/// out-event carries neither a snapshot nor a frozen ledger value.
fn pending_capture(
    session: &Session,
    live: Option<WindowSnapshot>,
) -> Option<SnapshotCapture> {
    let (in_event, out_event) = (session.in_event.as_ref()?, session.out_event.as_ref()?);

    if in_event.status.is_rejected() || out_event.status.is_rejected() {
        return None;
    }
    if out_event.window_snapshot.is_some() || out_event.validated.is_some() {
        return None;
    }

    Some(SnapshotCapture {
        event_id: out_event.id.persisted()?,
        snapshot: live?,
    })
}
