use chrono::Duration;
use rattendance::core::calculator::overlap::overlap;
use rattendance::utils::time::format_hours;

mod common;
use common::dt;

fn hours(s_in: &str, s_out: &str, o_in: &str, o_out: &str) -> String {
    let d = "2025-06-02";
    format_hours(overlap(
        dt(&format!("{d} {s_in}")),
        dt(&format!("{d} {s_out}")),
        dt(&format!("{d} {o_in}")),
        dt(&format!("{d} {o_out}")),
    ))
}

#[test]
fn test_reference_scenarios() {
    assert_eq!(hours("08:35", "12:15", "09:00", "12:00"), "3.00");
    assert_eq!(hours("12:45", "17:30", "13:00", "17:00"), "4.00");
    assert_eq!(hours("07:00", "08:00", "09:00", "12:00"), "0.00");
    assert_eq!(hours("13:00", "14:00", "09:00", "12:00"), "0.00");
    assert_eq!(hours("08:30", "09:30", "09:00", "12:00"), "0.50");
    assert_eq!(hours("11:30", "12:30", "09:00", "12:00"), "0.50");
}

#[test]
fn test_boundary_seconds_are_floored_before_clamping() {
    let d = overlap(
        dt("2025-06-02 04:13:59"),
        dt("2025-06-02 04:15:01"),
        dt("2025-06-02 04:00:00"),
        dt("2025-06-02 05:00:00"),
    );
    assert_eq!(d, Duration::minutes(2));
}

#[test]
fn test_degenerate_window_is_zero() {
    let s_in = dt("2025-06-02 08:00");
    let s_out = dt("2025-06-02 18:00");

    assert_eq!(
        overlap(s_in, s_out, dt("2025-06-02 12:00"), dt("2025-06-02 12:00")),
        Duration::zero()
    );
    assert_eq!(
        overlap(s_in, s_out, dt("2025-06-02 12:00"), dt("2025-06-02 09:00")),
        Duration::zero()
    );
    // Same minute after flooring.
    assert_eq!(
        overlap(s_in, s_out, dt("2025-06-02 12:00:05"), dt("2025-06-02 12:00:55")),
        Duration::zero()
    );
}

#[test]
fn test_overlap_is_bounded_by_both_intervals() {
    let base = dt("2025-06-02 06:00");
    let steps: Vec<i64> = (0..12).map(|k| k * 37).collect();

    for &a in &steps {
        for &b in &steps {
            for &c in &steps {
                for &e in &steps {
                    let (s_in, s_out) = (base + Duration::minutes(a), base + Duration::minutes(b));
                    let (o_in, o_out) = (base + Duration::minutes(c), base + Duration::minutes(e));
                    let d = overlap(s_in, s_out, o_in, o_out);

                    assert!(d >= Duration::zero());
                    let punch = (s_out - s_in).max(Duration::zero());
                    let official = (o_out - o_in).max(Duration::zero());
                    assert!(d <= punch.min(official), "{a} {b} {c} {e}");
                }
            }
        }
    }
}

#[test]
fn test_seconds_never_change_the_result() {
    let cases = [
        ("08:35", "12:15", "09:00", "12:00"),
        ("04:13", "04:15", "04:00", "05:00"),
        ("11:30", "12:30", "09:00", "12:00"),
        ("07:00", "08:00", "09:00", "12:00"),
    ];
    let seconds = [0u32, 1, 29, 59];

    for (s_in, s_out, o_in, o_out) in cases {
        let at = |hm: &str, sec: u32| dt(&format!("2025-06-02 {hm}:{sec:02}"));
        let expected = overlap(at(s_in, 0), at(s_out, 0), at(o_in, 0), at(o_out, 0));

        for a in seconds {
            for b in seconds {
                for c in seconds {
                    for d in seconds {
                        let got = overlap(at(s_in, a), at(s_out, b), at(o_in, c), at(o_out, d));
                        assert_eq!(got, expected, "{s_in}:{a} {s_out}:{b} {o_in}:{c} {o_out}:{d}");
                    }
                }
            }
        }
    }
}

#[test]
fn test_widening_the_window_never_decreases_overlap() {
    let s_in = dt("2025-06-02 08:20");
    let s_out = dt("2025-06-02 12:40");

    let mut previous = Duration::zero();
    for widen in 0..180 {
        let o_in = dt("2025-06-02 10:00") - Duration::minutes(widen);
        let o_out = dt("2025-06-02 10:30") + Duration::minutes(widen);
        let d = overlap(s_in, s_out, o_in, o_out);
        assert!(d >= previous);
        previous = d;
    }

    assert_eq!(previous, Duration::minutes(260));
}
