//! Assignment of a day's raw punches to AM / PM / OT slots and pairing of
//! in/out events into sessions.

use crate::core::calculator::windows::DayWindows;
use crate::models::punch::PunchEvent;
use crate::models::session::{Session, Slot};
use chrono::{Duration, NaiveDate};
use tracing::trace;

/// Tunables of the pairing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingRules {
    /// How early before a window's start an `in` still belongs to it.
    pub grace: Duration,
}

impl PairingRules {
    pub fn with_grace_minutes(minutes: i64) -> Self {
        Self {
            grace: Duration::minutes(minutes.max(0)),
        }
    }
}

impl Default for PairingRules {
    fn default() -> Self {
        Self::with_grace_minutes(30)
    }
}

/// Result of pairing one subject's day.
#[derive(Debug, Clone)]
pub struct Pairing {
    /// Always three entries, in AM, PM, OT order.
    pub sessions: Vec<Session>,
    /// Events no session consumed, chronological.
    pub stray: Vec<PunchEvent>,
}

impl Pairing {
    pub fn session(&self, slot: Slot) -> &Session {
        &self.sessions[slot.index()]
    }
}

/// Pair the punches of `date`.
///
/// `is_past` must be true only when `date` is strictly before today; it
/// enables synthetic close-outs for sessions left open.
pub fn pair_day(
    subject_id: &str,
    date: NaiveDate,
    events: &[PunchEvent],
    windows: &DayWindows,
    is_past: bool,
    rules: &PairingRules,
) -> Pairing {
    let mut sorted: Vec<&PunchEvent> = events.iter().collect();
    sorted.sort_by(|a, b| {
        a.occurred_at
            .cmp(&b.occurred_at)
            .then_with(|| sort_key(a).cmp(&sort_key(b)))
    });

    let n = sorted.len();
    let mut used = vec![false; n];
    let mut slot_in: [Option<usize>; 3] = [None; 3];

    let ins: Vec<usize> = (0..n).filter(|&i| sorted[i].kind.is_in()).collect();

    // Primary assignment: first unfilled slot whose window (with grace)
    // contains the punch.
    for &i in &ins {
        let t = sorted[i].occurred_at;
        let target = Slot::ALL.into_iter().find(|slot| {
            slot_in[slot.index()].is_none()
                && windows
                    .get(*slot)
                    .is_some_and(|w| w.contains_with_grace(t, rules.grace))
        });

        if let Some(slot) = target {
            slot_in[slot.index()] = Some(i);
            used[i] = true;
        }
    }

    // Fallback: every remaining `in` lands in the first slot still empty.
    for &i in &ins {
        if used[i] {
            continue;
        }
        if let Some(slot) = Slot::ALL
            .into_iter()
            .find(|slot| slot_in[slot.index()].is_none())
        {
            trace!(subject_id, %date, slot = %slot, "in punch placed by fallback");
            slot_in[slot.index()] = Some(i);
            used[i] = true;
        }
    }

    // Out matching, walking filled slots in chronological order of their in.
    let mut filled: Vec<(Slot, usize)> = Slot::ALL
        .into_iter()
        .filter_map(|slot| slot_in[slot.index()].map(|i| (slot, i)))
        .collect();
    filled.sort_by_key(|(_, i)| *i);

    let mut slot_out: [Option<usize>; 3] = [None; 3];

    for (k, (slot, in_idx)) in filled.iter().enumerate() {
        let lower = sorted[*in_idx].occurred_at;
        let upper = filled.get(k + 1).map(|(_, j)| sorted[*j].occurred_at);

        let candidate = (0..n)
            .filter(|&j| !used[j] && sorted[j].kind.is_out())
            .filter(|&j| {
                let t = sorted[j].occurred_at;
                t > lower && upper.is_none_or(|u| t < u)
            })
            .max_by_key(|&j| (sorted[j].occurred_at, j));

        if let Some(j) = candidate {
            used[j] = true;
            slot_out[slot.index()] = Some(j);
        }
    }

    let sessions = Slot::ALL
        .into_iter()
        .map(|slot| {
            let in_event = slot_in[slot.index()].map(|i| sorted[i].clone());
            let mut out_event = slot_out[slot.index()].map(|j| sorted[j].clone());

            if is_past
                && out_event.is_none()
                && let Some(ev_in) = &in_event
            {
                let floor = ev_in.occurred_at + Duration::minutes(1);
                let close_at = windows
                    .get(slot)
                    .map(|w| w.end.max(floor))
                    .unwrap_or(floor);

                trace!(subject_id, %date, slot = %slot, %close_at, "synthesizing close-out");
                out_event = Some(PunchEvent::virtual_out(subject_id, slot, close_at, date));
            }

            Session {
                slot,
                in_event,
                out_event,
            }
        })
        .collect();

    let stray = (0..n)
        .filter(|&i| !used[i])
        .map(|i| sorted[i].clone())
        .collect();

    Pairing { sessions, stray }
}

fn sort_key(ev: &PunchEvent) -> i64 {
    ev.id.persisted().unwrap_or(i64::MAX)
}
