#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime};
use rattendance::core::calculator::pairing::PairingRules;
use rattendance::core::punch::PunchLogic;
use rattendance::core::snapshot::EngineSettings;
use rattendance::db::initialize::init_db;
use rattendance::db::pool::DbPool;
use rattendance::models::punch::{NewPunch, PunchEvent};
use rattendance::models::punch_kind::PunchKind;
use rattendance::models::schedule::{ShiftSchedule, TimeWindow};
use rattendance::utils::time::to_epoch_ms;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test, isolated from the user's real configuration.
pub fn rat(home: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("rattendance");
    cmd.env("RATTENDANCE_HOME", home);
    cmd.env_remove("RATTENDANCE_LOG");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rattendance.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Fresh configuration directory for one CLI test
pub fn setup_home(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rattendance_home", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create home dir");
    path.to_string_lossy().to_string()
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).expect("utc offset")
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

/// `YYYY-MM-DD HH:MM` or `YYYY-MM-DD HH:MM:SS`
pub fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .expect("valid datetime")
}

pub fn window(s: &str) -> TimeWindow {
    TimeWindow::parse(s).expect("valid window")
}

/// 09:00-12:00 / 13:00-17:00, default OT 17:00-20:00.
pub fn default_schedule() -> ShiftSchedule {
    ShiftSchedule {
        morning: Some(window("09:00-12:00")),
        afternoon: Some(window("13:00-17:00")),
        overtime: Some(window("17:00-20:00")),
    }
}

/// Engine settings in UTC with a fixed "today".
pub fn settings(today: &str) -> EngineSettings {
    EngineSettings {
        tz: utc(),
        today: date(today),
        rules: PairingRules::default(),
        default_schedule: default_schedule(),
        workers: 2,
        capture_snapshots: true,
    }
}

/// Open (and migrate) a fresh file database.
pub fn open_db(name: &str) -> (DbPool, String) {
    let path = setup_test_db(name);
    let pool = DbPool::new(&path, utc()).expect("open db");
    init_db(&pool.conn).expect("init db");
    (pool, path)
}

/// Record a punch through the capture boundary and return its id.
pub fn punch(pool: &DbPool, settings: &EngineSettings, subject: &str, kind: &str, at: &str) -> i64 {
    let input = NewPunch {
        subject_id: subject.to_string(),
        kind: kind.to_string(),
        occurred_at_ms: to_epoch_ms(dt(at), utc()).expect("epoch"),
        evidence: format!("photo-{}-{}", subject, at),
    };
    PunchLogic::record(&pool.conn, settings, &input)
        .expect("record punch")
        .id
        .persisted()
        .expect("persisted id")
}

/// In-memory punch for pure engine tests.
pub fn ev(id: i64, kind: PunchKind, at: &str) -> PunchEvent {
    PunchEvent::new(id, "S1", kind, dt(at))
}
