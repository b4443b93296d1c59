use chrono::NaiveDate;
use rattendance::core::overtime::OvertimeLogic;
use rattendance::core::punch::PunchLogic;
use rattendance::core::schedule::ScheduleLogic;
use rattendance::db::initialize::init_db;
use rattendance::db::migrate::applied_versions;
use rattendance::errors::AppError;
use rattendance::models::punch::{EventRef, NewPunch, VirtualRef};
use rattendance::models::review_status::ReviewStatus;
use rattendance::models::schedule::ScheduleScope;
use rattendance::models::session::Slot;

mod common;
use common::{date, dt, open_db, settings, window};

fn new_punch(subject: &str, kind: &str, ms: i64) -> NewPunch {
    NewPunch {
        subject_id: subject.to_string(),
        kind: kind.to_string(),
        occurred_at_ms: ms,
        evidence: "  cam-7/img-001.jpg ".to_string(),
    }
}

#[test]
fn test_migrations_run_once() {
    let (pool, _) = open_db("db_migrations");

    let first = applied_versions(&pool.conn).expect("versions");
    assert_eq!(first.len(), 3);

    init_db(&pool.conn).expect("second init");
    assert_eq!(applied_versions(&pool.conn).expect("versions"), first);
}

#[test]
fn test_capture_boundary_validation() {
    let st = settings("2025-06-10");
    // 2025-06-02 09:00:00 UTC
    let ms = 1_748_854_800_000;

    let ev = PunchLogic::validate(&new_punch(" S1 ", "Time-In", ms), &st).expect("valid");
    assert_eq!(ev.subject_id, "S1");
    assert_eq!(ev.occurred_at, dt("2025-06-02 09:00"));
    assert_eq!(ev.evidence, "cam-7/img-001.jpg");
    assert_eq!(ev.status, ReviewStatus::Pending);

    let err = PunchLogic::validate(&new_punch("", "in", ms), &st).expect_err("empty subject");
    assert!(matches!(err, AppError::InvalidSubject(_)));

    let err = PunchLogic::validate(&new_punch("A/B", "in", ms), &st).expect_err("slash");
    assert!(matches!(err, AppError::InvalidSubject(_)));

    let err = PunchLogic::validate(&new_punch("S1", "lunch", ms), &st).expect_err("kind");
    assert!(matches!(err, AppError::InvalidKind(_)));

    let err = PunchLogic::validate(&new_punch("S1", "in", 0), &st).expect_err("timestamp");
    assert!(matches!(err, AppError::InvalidTimestamp(_)));

    let err = PunchLogic::validate(&new_punch("S1", "in", i64::MAX), &st).expect_err("out of range");
    assert!(matches!(err, AppError::InvalidTimestamp(_)));
}

#[test]
fn test_recorded_punch_uses_local_date() {
    let (pool, _) = open_db("db_local_date");
    let mut st = settings("2025-06-10");
    st.tz = chrono::FixedOffset::east_opt(8 * 3600).expect("offset");

    // 2025-06-01 23:30 UTC is 2025-06-02 07:30 at +08:00.
    let ev = PunchLogic::record(&pool.conn, &st, &new_punch("S1", "in", 1_748_820_600_000)).expect("record");

    assert_eq!(ev.date(), date("2025-06-02"));
    assert!(ev.id.persisted().is_some());
}

#[test]
fn test_override_and_schedule_removal_report_existence() {
    let (pool, _) = open_db("db_overrides");
    let scope = ScheduleScope::Subject("S1".into());
    let d = date("2025-06-02");

    assert!(!ScheduleLogic::delete_override(&pool.conn, &scope, d).expect("delete"));

    ScheduleLogic::set_override(&pool.conn, &scope, d, Some(window("10:00-12:00")), None).expect("set");
    ScheduleLogic::set_override(&pool.conn, &ScheduleScope::Global, d, None, Some(window("14:00-16:00")))
        .expect("set");

    let stored = ScheduleLogic::overrides(&pool.conn, d, d).expect("load");
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().any(|o| o.scope == scope && o.afternoon.is_none()));

    assert!(ScheduleLogic::delete_override(&pool.conn, &scope, d).expect("delete"));
    assert_eq!(ScheduleLogic::overrides(&pool.conn, d, d).expect("load").len(), 1);

    assert!(!ScheduleLogic::clear_schedule(&pool.conn, &ScheduleScope::Global).expect("clear"));
}

#[test]
fn test_revoked_grant_is_gone() {
    let (pool, _) = open_db("db_grant_get");
    let st = settings("2025-06-10");
    let d = date("2025-06-02");

    OvertimeLogic::grant(&pool.conn, &st, "S1", d, dt("2025-06-02 18:00"), dt("2025-06-02 20:00"), "boss")
        .expect("grant");
    let g = OvertimeLogic::get(&pool.conn, &st, "S1", d).expect("get").expect("grant");
    assert_eq!(g.created_by, "boss");

    OvertimeLogic::revoke(&pool.conn, "S1", d).expect("revoke");
    assert!(OvertimeLogic::get(&pool.conn, &st, "S1", d).expect("get").is_none());
}

#[test]
fn test_event_ref_text_forms() {
    assert_eq!("42".parse::<EventRef>().expect("id"), EventRef::Persisted(42));

    let v: EventRef = "S-01/2025-06-02/pm".parse().expect("virtual");
    assert_eq!(
        v,
        EventRef::Virtual(VirtualRef {
            subject_id: "S-01".into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).expect("date"),
            slot: Slot::Afternoon,
        })
    );
    assert_eq!(v.to_string(), "S-01/2025-06-02/PM");

    for bad in ["-3", "0", "S1/2025-13-01/AM", "S1/2025-06-02/XX", "/2025-06-02/AM"] {
        assert!(bad.parse::<EventRef>().is_err(), "{bad}");
    }
}

#[test]
fn test_legacy_status_spellings() {
    for s in ["approved", "Validated", "verified", "approve"] {
        assert_eq!(ReviewStatus::from_db_str(s).expect(s), ReviewStatus::Approved);
    }
    for s in ["rejected", "declined", "reject"] {
        assert_eq!(ReviewStatus::from_db_str(s).expect(s), ReviewStatus::Rejected);
    }
    assert_eq!(ReviewStatus::from_db_str("").expect("empty"), ReviewStatus::Pending);
    assert!(matches!(
        ReviewStatus::from_db_str("maybe"),
        Err(AppError::InvalidStatus(_))
    ));
}
