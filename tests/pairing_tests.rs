use rattendance::core::calculator::pairing::{PairingRules, pair_day};
use rattendance::core::calculator::windows::{DayWindows, SlotWindow};
use rattendance::models::punch::{EventRef, PunchEvent};
use rattendance::models::punch_kind::PunchKind::{In, Out};
use rattendance::models::session::Slot;

mod common;
use common::{date, dt, ev};

fn ow(start: &str, end: &str) -> SlotWindow {
    SlotWindow::from_bounds(dt(start), dt(end))
}

fn standard_day() -> DayWindows {
    DayWindows {
        morning: ow("2025-06-02 09:00", "2025-06-02 12:00"),
        afternoon: ow("2025-06-02 13:00", "2025-06-02 17:00"),
        overtime: SlotWindow::Disabled,
    }
}

fn ids(ev: &Option<PunchEvent>) -> Option<EventRef> {
    ev.as_ref().map(|e| e.id.clone())
}

#[test]
fn test_morning_and_afternoon_pairs() {
    let events = vec![
        ev(1, In, "2025-06-02 08:55"),
        ev(2, Out, "2025-06-02 12:01"),
        ev(3, In, "2025-06-02 12:58"),
        ev(4, Out, "2025-06-02 17:05"),
    ];

    let p = pair_day("S1", date("2025-06-02"), &events, &standard_day(), false, &PairingRules::default());

    let am = p.session(Slot::Morning);
    assert_eq!(ids(&am.in_event), Some(EventRef::Persisted(1)));
    assert_eq!(ids(&am.out_event), Some(EventRef::Persisted(2)));

    let pm = p.session(Slot::Afternoon);
    assert_eq!(ids(&pm.in_event), Some(EventRef::Persisted(3)));
    assert_eq!(ids(&pm.out_event), Some(EventRef::Persisted(4)));

    assert!(p.session(Slot::Overtime).is_empty());
    assert!(p.stray.is_empty());
}

#[test]
fn test_input_order_does_not_matter() {
    let ordered = vec![
        ev(1, In, "2025-06-02 08:55"),
        ev(2, Out, "2025-06-02 12:01"),
        ev(3, In, "2025-06-02 12:58"),
        ev(4, Out, "2025-06-02 17:05"),
    ];
    let shuffled = vec![
        ordered[3].clone(),
        ordered[1].clone(),
        ordered[2].clone(),
        ordered[0].clone(),
    ];

    let rules = PairingRules::default();
    let a = pair_day("S1", date("2025-06-02"), &ordered, &standard_day(), false, &rules);
    let b = pair_day("S1", date("2025-06-02"), &shuffled, &standard_day(), false, &rules);

    for slot in Slot::ALL {
        assert_eq!(ids(&a.session(slot).in_event), ids(&b.session(slot).in_event));
        assert_eq!(ids(&a.session(slot).out_event), ids(&b.session(slot).out_event));
    }
}

#[test]
fn test_latest_out_before_next_in_wins() {
    let events = vec![
        ev(1, In, "2025-06-02 09:00"),
        ev(2, Out, "2025-06-02 11:00"),
        ev(3, Out, "2025-06-02 12:00"),
    ];

    let p = pair_day("S1", date("2025-06-02"), &events, &standard_day(), false, &PairingRules::default());

    assert_eq!(ids(&p.session(Slot::Morning).out_event), Some(EventRef::Persisted(3)));
    assert_eq!(p.stray.len(), 1);
    assert_eq!(p.stray[0].id, EventRef::Persisted(2));
}

#[test]
fn test_early_in_falls_back_to_first_empty_slot() {
    let events = vec![ev(1, In, "2025-06-02 06:00"), ev(2, Out, "2025-06-02 10:00")];

    let p = pair_day("S1", date("2025-06-02"), &events, &standard_day(), false, &PairingRules::default());

    assert_eq!(ids(&p.session(Slot::Morning).in_event), Some(EventRef::Persisted(1)));
    assert_eq!(ids(&p.session(Slot::Morning).out_event), Some(EventRef::Persisted(2)));
}

#[test]
fn test_second_morning_in_moves_to_afternoon() {
    let events = vec![ev(1, In, "2025-06-02 08:55"), ev(2, In, "2025-06-02 09:05")];

    let p = pair_day("S1", date("2025-06-02"), &events, &standard_day(), false, &PairingRules::default());

    assert_eq!(ids(&p.session(Slot::Morning).in_event), Some(EventRef::Persisted(1)));
    assert_eq!(ids(&p.session(Slot::Afternoon).in_event), Some(EventRef::Persisted(2)));
    assert!(p.stray.is_empty());
}

#[test]
fn test_no_event_is_used_twice() {
    let events = vec![
        ev(1, In, "2025-06-02 08:50"),
        ev(2, In, "2025-06-02 08:59"),
        ev(3, Out, "2025-06-02 11:00"),
        ev(4, In, "2025-06-02 13:00"),
        ev(5, Out, "2025-06-02 15:00"),
        ev(6, In, "2025-06-02 16:00"),
        ev(7, Out, "2025-06-02 18:00"),
    ];

    let p = pair_day("S1", date("2025-06-02"), &events, &standard_day(), false, &PairingRules::default());

    let mut seen: Vec<EventRef> = p
        .sessions
        .iter()
        .flat_map(|s| [ids(&s.in_event), ids(&s.out_event)])
        .flatten()
        .chain(p.stray.iter().map(|e| e.id.clone()))
        .collect();
    let total = seen.len();
    seen.sort_by_key(|r| r.persisted());
    seen.dedup();

    assert_eq!(total, events.len());
    assert_eq!(seen.len(), events.len());
}

#[test]
fn test_out_before_any_in_is_stray() {
    let events = vec![ev(1, Out, "2025-06-02 08:00"), ev(2, In, "2025-06-02 09:00")];

    let p = pair_day("S1", date("2025-06-02"), &events, &standard_day(), false, &PairingRules::default());

    assert_eq!(ids(&p.session(Slot::Morning).in_event), Some(EventRef::Persisted(2)));
    assert!(p.session(Slot::Morning).out_event.is_none());
    assert_eq!(p.stray[0].id, EventRef::Persisted(1));
}

#[test]
fn test_open_session_on_past_day_gets_virtual_close_out() {
    let events = vec![ev(1, In, "2025-06-02 09:00")];

    let p = pair_day("S1", date("2025-06-02"), &events, &standard_day(), true, &PairingRules::default());

    let out = p.session(Slot::Morning).out_event.as_ref().expect("close-out");
    assert!(out.synthetic);
    assert!(out.id.is_virtual());
    assert_eq!(out.occurred_at, dt("2025-06-02 12:00"));
    assert_eq!(out.id.to_string(), "S1/2025-06-02/AM");
}

#[test]
fn test_open_session_today_stays_open() {
    let events = vec![ev(1, In, "2025-06-02 09:00")];

    let p = pair_day("S1", date("2025-06-02"), &events, &standard_day(), false, &PairingRules::default());

    assert!(p.session(Slot::Morning).out_event.is_none());
}

#[test]
fn test_close_out_never_precedes_the_in() {
    // Afternoon in recorded after the morning window closed, no PM window.
    let windows = DayWindows {
        morning: ow("2025-06-02 09:00", "2025-06-02 12:00"),
        afternoon: SlotWindow::Unconfigured,
        overtime: SlotWindow::Disabled,
    };
    let events = vec![ev(1, In, "2025-06-02 12:20")];

    let p = pair_day("S1", date("2025-06-02"), &events, &windows, true, &PairingRules::default());

    let out = p.session(Slot::Morning).out_event.as_ref().expect("close-out");
    assert_eq!(out.occurred_at, dt("2025-06-02 12:21"));
}

#[test]
fn test_close_out_without_window_is_one_minute_after_in() {
    let windows = DayWindows::default();
    let events = vec![ev(1, In, "2025-06-02 10:00")];

    let p = pair_day("S1", date("2025-06-02"), &events, &windows, true, &PairingRules::default());

    let out = p.session(Slot::Morning).out_event.as_ref().expect("close-out");
    assert_eq!(out.occurred_at, dt("2025-06-02 10:01"));
}

#[test]
fn test_grace_controls_early_assignment() {
    let events = vec![ev(1, In, "2025-06-02 12:45"), ev(2, Out, "2025-06-02 17:00")];
    let windows = DayWindows {
        morning: SlotWindow::Unconfigured,
        afternoon: ow("2025-06-02 13:00", "2025-06-02 17:00"),
        overtime: SlotWindow::Disabled,
    };

    // 15 minutes early is inside a 30 minute grace.
    let p = pair_day("S1", date("2025-06-02"), &events, &windows, false, &PairingRules::default());
    assert_eq!(ids(&p.session(Slot::Afternoon).in_event), Some(EventRef::Persisted(1)));

    // Without grace the in falls back to the first empty slot.
    let strict = PairingRules::with_grace_minutes(0);
    let p = pair_day("S1", date("2025-06-02"), &events, &windows, false, &strict);
    assert_eq!(ids(&p.session(Slot::Morning).in_event), Some(EventRef::Persisted(1)));
}
