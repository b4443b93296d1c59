use crate::core::calculator::overlap::floor_to_minute;
use crate::core::calculator::windows::OfficialWindow;
use crate::models::punch::PunchEvent;

/// Advisory flag: the in-punch is strictly after the window start, both
/// compared at minute precision. Without a window nobody is late.
pub fn is_late(in_event: &PunchEvent, window: Option<&OfficialWindow>) -> bool {
    window.is_some_and(|w| floor_to_minute(in_event.occurred_at) > floor_to_minute(w.start))
}
