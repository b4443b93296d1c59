//! Clamped overlap between a punch interval and an official interval.
//!
//! Every duration the engine reports goes through [`overlap`], for live
//! windows and reconstructed snapshot windows alike.

use chrono::{Duration, NaiveDateTime, Timelike};

/// Floor an instant to the whole minute (seconds and sub-seconds dropped).
pub fn floor_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// Overlap of `[s_in, s_out)` with `[o_in, o_out)`.
///
/// The four instants are floored to the minute independently before
/// clamping, so `04:13:59–04:15:01` counts as `04:13–04:15`.
pub fn overlap(
    s_in: NaiveDateTime,
    s_out: NaiveDateTime,
    o_in: NaiveDateTime,
    o_out: NaiveDateTime,
) -> Duration {
    let (s_in, s_out) = (floor_to_minute(s_in), floor_to_minute(s_out));
    let (o_in, o_out) = (floor_to_minute(o_in), floor_to_minute(o_out));

    if o_in >= o_out {
        return Duration::zero();
    }

    let start = s_in.max(o_in);
    let end = s_out.min(o_out);

    if start >= end {
        Duration::zero()
    } else {
        end - start
    }
}
