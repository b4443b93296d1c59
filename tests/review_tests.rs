use chrono::Duration;
use rattendance::core::calculator::ledger::DurationSource;
use rattendance::core::logic::Core;
use rattendance::core::review::{ReviewDecision, ReviewLogic, ReviewOutcome};
use rattendance::core::schedule::ScheduleLogic;
use rattendance::db::pool::DbPool;
use rattendance::db::queries::load_punch;
use rattendance::errors::AppError;
use rattendance::models::punch::EventRef;
use rattendance::models::review_status::ReviewStatus;
use rattendance::models::schedule::{ScheduleScope, ShiftSchedule};
use rattendance::models::session::Slot;
use std::thread;

mod common;
use common::{date, dt, open_db, punch, settings, utc, window};

const TODAY: &str = "2025-06-10";

#[test]
fn test_approve_freezes_ledger_and_is_idempotent() {
    let (mut pool, _) = open_db("review_freeze");
    let st = settings(TODAY);
    let in_id = punch(&pool, &st, "S1", "in", "2025-06-02 08:40");
    let out_id = punch(&pool, &st, "S1", "out", "2025-06-02 12:10");

    let first = ReviewLogic::apply(&mut pool.conn, &st, &EventRef::Persisted(in_id), ReviewDecision::Approve, "alice")
        .expect("approve");
    assert!(first.is_applied());
    assert_eq!(first.event_ids(), &[in_id, out_id]);

    let out = load_punch(&pool.conn, utc(), out_id).expect("load").expect("row");
    assert_eq!(out.status, ReviewStatus::Approved);
    assert_eq!(out.reviewer_id.as_deref(), Some("alice"));
    assert_eq!(out.validated, Some(Duration::minutes(180)));
    let snap = out.window_snapshot.clone().expect("snapshot");
    assert_eq!((snap.start.as_str(), snap.end.as_str()), ("09:00", "12:00"));

    let second = ReviewLogic::apply(&mut pool.conn, &st, &EventRef::Persisted(out_id), ReviewDecision::Approve, "bob")
        .expect("approve again");
    assert!(matches!(
        second,
        ReviewOutcome::Unchanged {
            status: ReviewStatus::Approved,
            ..
        }
    ));

    let again = load_punch(&pool.conn, utc(), out_id).expect("load").expect("row");
    assert_eq!(again, out);
}

#[test]
fn test_frozen_value_survives_schedule_and_override_changes() {
    let (mut pool, _) = open_db("review_survives");
    let st = settings(TODAY);
    let in_id = punch(&pool, &st, "S1", "in", "2025-06-02 09:00");
    punch(&pool, &st, "S1", "out", "2025-06-02 12:00");

    ReviewLogic::apply(&mut pool.conn, &st, &EventRef::Persisted(in_id), ReviewDecision::Approve, "alice")
        .expect("approve");

    ScheduleLogic::set_schedule(
        &pool.conn,
        &ScheduleScope::Global,
        &ShiftSchedule {
            morning: Some(window("10:00-11:00")),
            ..Default::default()
        },
    )
    .expect("schedule");
    ScheduleLogic::set_override(
        &pool.conn,
        &ScheduleScope::Subject("S1".into()),
        date("2025-06-02"),
        Some(window("11:30-12:00")),
        None,
    )
    .expect("override");

    let days = Core::reconcile_range(&pool.conn, &st, &["S1".to_string()], &[date("2025-06-02")])
        .expect("reconcile");
    let am = days[0].session(Slot::Morning).expect("AM");

    assert_eq!(am.validated, Duration::minutes(180));
    assert_eq!(am.tracked, Duration::minutes(180));
    assert_eq!(am.source, Some(DurationSource::FrozenLedger));
}

#[test]
fn test_reject_zeroes_the_session() {
    let (mut pool, _) = open_db("review_reject");
    let st = settings(TODAY);
    let in_id = punch(&pool, &st, "S1", "in", "2025-06-02 09:00");
    punch(&pool, &st, "S1", "out", "2025-06-02 12:00");

    let outcome = ReviewLogic::apply(&mut pool.conn, &st, &EventRef::Persisted(in_id), ReviewDecision::Reject, "")
        .expect("reject");
    assert!(outcome.is_applied());

    let days = Core::reconcile_range(&pool.conn, &st, &[], &[date("2025-06-02")]).expect("reconcile");
    assert_eq!(days[0].tracked, Duration::zero());
    assert_eq!(days[0].validated, Duration::zero());

    // Terminal: a later approval changes nothing.
    let later = ReviewLogic::apply(&mut pool.conn, &st, &EventRef::Persisted(in_id), ReviewDecision::Approve, "alice")
        .expect("approve");
    assert!(matches!(
        later,
        ReviewOutcome::Unchanged {
            status: ReviewStatus::Rejected,
            ..
        }
    ));
}

#[test]
fn test_approve_requires_reviewer() {
    let (mut pool, _) = open_db("review_no_reviewer");
    let st = settings(TODAY);
    let in_id = punch(&pool, &st, "S1", "in", "2025-06-02 09:00");

    let err = ReviewLogic::apply(&mut pool.conn, &st, &EventRef::Persisted(in_id), ReviewDecision::Approve, "  ")
        .expect_err("reviewer required");
    assert!(matches!(err, AppError::MissingReviewer));

    let ev = load_punch(&pool.conn, utc(), in_id).expect("load").expect("row");
    assert_eq!(ev.status, ReviewStatus::Pending);
}

#[test]
fn test_virtual_close_out_is_materialized_on_approval() {
    let (mut pool, _) = open_db("review_virtual");
    let st = settings(TODAY);
    let in_id = punch(&pool, &st, "S1", "in", "2025-06-02 09:00");

    let target: EventRef = "S1/2025-06-02/AM".parse().expect("ref");
    let outcome = ReviewLogic::apply(&mut pool.conn, &st, &target, ReviewDecision::Approve, "alice")
        .expect("approve");

    let ReviewOutcome::Applied {
        event_ids,
        materialized: Some(out_id),
        ..
    } = outcome
    else {
        panic!("expected a materialized close-out, got {:?}", outcome);
    };
    assert_eq!(event_ids, vec![in_id, out_id]);

    let out = load_punch(&pool.conn, utc(), out_id).expect("load").expect("row");
    assert!(out.synthetic);
    assert_eq!(out.occurred_at, dt("2025-06-02 12:00"));
    assert_eq!(out.status, ReviewStatus::Approved);
    assert_eq!(out.validated, Some(Duration::minutes(180)));

    // The synthetic row is now a plain member of the session.
    let days = Core::reconcile_range(&pool.conn, &st, &[], &[date("2025-06-02")]).expect("reconcile");
    let am = days[0].session(Slot::Morning).expect("AM");
    assert_eq!(am.out_ref, Some(EventRef::Persisted(out_id)));
    assert_eq!(am.validated, Duration::minutes(180));
}

#[test]
fn test_targeting_the_in_also_materializes_the_close_out() {
    let (mut pool, _) = open_db("review_virtual_via_in");
    let st = settings(TODAY);
    let in_id = punch(&pool, &st, "S1", "in", "2025-06-02 13:00");

    let outcome = ReviewLogic::apply(&mut pool.conn, &st, &EventRef::Persisted(in_id), ReviewDecision::Reject, "")
        .expect("reject");

    let ReviewOutcome::Applied {
        materialized: Some(out_id),
        status,
        ..
    } = outcome
    else {
        panic!("expected a materialized close-out, got {:?}", outcome);
    };
    assert_eq!(status, ReviewStatus::Rejected);

    let out = load_punch(&pool.conn, utc(), out_id).expect("load").expect("row");
    assert_eq!(out.occurred_at, dt("2025-06-02 17:00"));
    assert_eq!(out.status, ReviewStatus::Rejected);
    assert_eq!(out.validated, None);
}

#[test]
fn test_unknown_virtual_slot_is_reported() {
    let (mut pool, _) = open_db("review_virtual_missing");
    let st = settings(TODAY);
    punch(&pool, &st, "S1", "in", "2025-06-02 09:00");

    let target: EventRef = "S1/2025-06-02/PM".parse().expect("ref");
    let err = ReviewLogic::apply(&mut pool.conn, &st, &target, ReviewDecision::Approve, "alice")
        .expect_err("no PM session");
    assert!(matches!(err, AppError::VirtualNotFound(_)));
}

#[test]
fn test_lone_event_transitions_by_itself() {
    let (mut pool, _) = open_db("review_lone");
    let st = settings(TODAY);
    let out_id = punch(&pool, &st, "S1", "out", "2025-06-02 08:00");

    let outcome = ReviewLogic::apply(&mut pool.conn, &st, &EventRef::Persisted(out_id), ReviewDecision::Reject, "")
        .expect("reject");
    assert_eq!(outcome.event_ids(), &[out_id]);
    assert!(outcome.is_applied());
}

#[test]
fn test_out_approved_before_its_in_is_frozen_with_the_session() {
    let (mut pool, _) = open_db("review_late_in");
    let st = settings(TODAY);
    let out_id = punch(&pool, &st, "S1", "out", "2025-06-02 12:00");

    ReviewLogic::apply(&mut pool.conn, &st, &EventRef::Persisted(out_id), ReviewDecision::Approve, "alice")
        .expect("approve lone out");
    let out = load_punch(&pool.conn, utc(), out_id).expect("load").expect("row");
    assert_eq!(out.validated, None);

    let in_id = punch(&pool, &st, "S1", "in", "2025-06-02 09:00");
    let outcome = ReviewLogic::apply(&mut pool.conn, &st, &EventRef::Persisted(in_id), ReviewDecision::Approve, "alice")
        .expect("approve session");
    assert!(outcome.is_applied());
    assert_eq!(outcome.event_ids(), &[in_id, out_id]);

    let out = load_punch(&pool.conn, utc(), out_id).expect("load").expect("row");
    assert_eq!(out.validated, Some(Duration::minutes(180)));
    let snap = out.window_snapshot.expect("snapshot");
    assert_eq!((snap.start.as_str(), snap.end.as_str()), ("09:00", "12:00"));

    ScheduleLogic::set_schedule(
        &pool.conn,
        &ScheduleScope::Global,
        &ShiftSchedule {
            morning: Some(window("10:00-11:00")),
            ..Default::default()
        },
    )
    .expect("schedule");

    let days = Core::reconcile_range(&pool.conn, &st, &["S1".to_string()], &[date("2025-06-02")])
        .expect("reconcile");
    let am = days[0].session(Slot::Morning).expect("AM");
    assert_eq!(am.validated, Duration::minutes(180));
    assert_eq!(am.source, Some(DurationSource::FrozenLedger));

    // Approving again finds nothing left to write.
    let again = ReviewLogic::apply(&mut pool.conn, &st, &EventRef::Persisted(in_id), ReviewDecision::Approve, "bob")
        .expect("approve again");
    assert!(!again.is_applied());
}

#[test]
fn test_bulk_reports_failures_per_target() {
    let (mut pool, _) = open_db("review_bulk");
    let st = settings(TODAY);
    let a = punch(&pool, &st, "S1", "in", "2025-06-02 09:00");
    punch(&pool, &st, "S1", "out", "2025-06-02 12:00");
    let b = punch(&pool, &st, "S2", "in", "2025-06-02 09:00");
    punch(&pool, &st, "S2", "out", "2025-06-02 12:00");

    let targets = vec![
        EventRef::Persisted(a),
        EventRef::Persisted(9999),
        EventRef::Persisted(b),
    ];
    let results = ReviewLogic::apply_bulk(&mut pool.conn, &st, &targets, ReviewDecision::Approve, "alice");

    assert_eq!(results.len(), 3);
    assert!(results[0].1.as_ref().is_ok_and(|o| o.is_applied()));
    assert!(matches!(results[1].1, Err(AppError::EventNotFound(9999))));
    assert!(results[2].1.as_ref().is_ok_and(|o| o.is_applied()));
}

#[test]
fn test_concurrent_approvals_apply_once() {
    let (pool, path) = open_db("review_concurrent");
    let st = settings(TODAY);
    let in_id = punch(&pool, &st, "S1", "in", "2025-06-02 09:00");
    punch(&pool, &st, "S1", "out", "2025-06-02 12:00");
    drop(pool);

    let outcomes: Vec<ReviewOutcome> = thread::scope(|scope| {
        let handles: Vec<_> = ["alice", "bob"]
            .into_iter()
            .map(|reviewer| {
                let path = path.clone();
                let st = st.clone();
                scope.spawn(move || {
                    let mut pool = DbPool::new(&path, utc()).expect("open");
                    ReviewLogic::apply(&mut pool.conn, &st, &EventRef::Persisted(in_id), ReviewDecision::Approve, reviewer)
                        .expect("approve")
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("thread")).collect()
    });

    assert_eq!(outcomes.iter().filter(|o| o.is_applied()).count(), 1);

    let pool = DbPool::new(&path, utc()).expect("open");
    let days = Core::reconcile_range(&pool.conn, &st, &[], &[date("2025-06-02")]).expect("reconcile");
    assert_eq!(days[0].validated, Duration::minutes(180));
}
