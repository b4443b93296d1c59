//! Duration resolution for paired sessions.
//!
//! A session's duration comes from the first strategy of an ordered chain
//! that produces a value: the frozen ledger written at approval, then the
//! captured window snapshot, then the live window. A disabled slot resolves
//! to zero at the live-window step. The tracked chain adds a raw elapsed-time
//! fallback for slots that have no window configured at all.

use crate::core::calculator::overlap::{floor_to_minute, overlap};
use crate::core::calculator::windows::{OfficialWindow, SlotWindow};
use crate::models::punch::PunchEvent;
use crate::models::session::Session;
use chrono::Duration;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationSource {
    FrozenLedger,
    CapturedSnapshot,
    LiveWindow,
    RawElapsed,
}

/// Chain used for the tracked total.
pub const TRACKED_CHAIN: [DurationSource; 4] = [
    DurationSource::FrozenLedger,
    DurationSource::CapturedSnapshot,
    DurationSource::LiveWindow,
    DurationSource::RawElapsed,
];

/// Chain used for the validated total and for freezing at approval.
pub const VALIDATED_CHAIN: [DurationSource; 3] = [
    DurationSource::FrozenLedger,
    DurationSource::CapturedSnapshot,
    DurationSource::LiveWindow,
];

/// A complete pair plus the live state of its slot.
#[derive(Debug, Clone, Copy)]
pub struct PairContext<'a> {
    pub in_event: &'a PunchEvent,
    pub out_event: &'a PunchEvent,
    pub live: SlotWindow,
}

impl PairContext<'_> {
    /// Snapshot window rebuilt on the in-event's date, if one was captured.
    pub fn snapshot_window(&self) -> Option<OfficialWindow> {
        self.out_event
            .window_snapshot
            .as_ref()
            .and_then(|s| OfficialWindow::from_snapshot(s, self.in_event.date()))
    }

    /// Window the pair is measured against: snapshot first, then live.
    pub fn effective_window(&self) -> Option<OfficialWindow> {
        self.snapshot_window().or_else(|| self.live.open().copied())
    }
}

impl DurationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationSource::FrozenLedger => "frozen_ledger",
            DurationSource::CapturedSnapshot => "captured_snapshot",
            DurationSource::LiveWindow => "live_window",
            DurationSource::RawElapsed => "raw_elapsed",
        }
    }

    pub fn evaluate(&self, ctx: &PairContext<'_>) -> Option<Duration> {
        let (s_in, s_out) = (ctx.in_event.occurred_at, ctx.out_event.occurred_at);
        match self {
            DurationSource::FrozenLedger => ctx.out_event.validated,
            DurationSource::CapturedSnapshot => ctx
                .snapshot_window()
                .map(|w| overlap(s_in, s_out, w.start, w.end)),
            DurationSource::LiveWindow => match ctx.live {
                SlotWindow::Open(w) => Some(overlap(s_in, s_out, w.start, w.end)),
                SlotWindow::Disabled => Some(Duration::zero()),
                SlotWindow::Unconfigured => None,
            },
            DurationSource::RawElapsed => match ctx.live {
                SlotWindow::Unconfigured => {
                    Some((floor_to_minute(s_out) - floor_to_minute(s_in)).max(Duration::zero()))
                }
                _ => None,
            },
        }
    }
}

/// First strategy of `chain` that yields a value.
pub fn resolve(chain: &[DurationSource], ctx: &PairContext<'_>) -> Option<(Duration, DurationSource)> {
    chain
        .iter()
        .find_map(|strategy| strategy.evaluate(ctx).map(|d| (d, *strategy)))
}

/// Value written into the ledger when a pair is approved.
pub fn freeze_value(ctx: &PairContext<'_>) -> Duration {
    resolve(&VALIDATED_CHAIN, ctx)
        .map(|(d, _)| d)
        .unwrap_or_else(Duration::zero)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDuration {
    pub tracked: Duration,
    pub validated: Duration,
    pub source: Option<DurationSource>,
}

impl Default for ResolvedDuration {
    fn default() -> Self {
        Self {
            tracked: Duration::zero(),
            validated: Duration::zero(),
            source: None,
        }
    }
}

/// Tracked and validated contribution of one session.
pub fn resolve_session(session: &Session, live: SlotWindow) -> ResolvedDuration {
    let (Some(in_event), Some(out_event)) = (&session.in_event, &session.out_event) else {
        return ResolvedDuration::default();
    };

    if in_event.status.is_rejected() || out_event.status.is_rejected() {
        return ResolvedDuration::default();
    }

    let ctx = PairContext {
        in_event,
        out_event,
        live,
    };

    let (tracked, source) = match resolve(&TRACKED_CHAIN, &ctx) {
        Some((d, s)) => (d, Some(s)),
        None => (Duration::zero(), None),
    };

    let validated = if in_event.status.is_approved() && out_event.status.is_approved() {
        freeze_value(&ctx)
    } else {
        Duration::zero()
    };

    ResolvedDuration {
        tracked,
        validated,
        source,
    }
}
