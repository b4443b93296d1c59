//! Read-only input of one reconciliation call.
//!
//! Everything the engine looks at (punches, schedules, overrides, grants and
//! the current date) is fetched once into a [`ReconcileSnapshot`]; the
//! calculators never reach back into the store.

use crate::config::Config;
use crate::core::calculator::pairing::PairingRules;
use crate::core::calculator::windows::{DayWindows, WindowSources, build_windows};
use crate::db::{overtime, queries, schedules};
use crate::errors::AppResult;
use crate::models::overtime::OvertimeGrant;
use crate::models::punch::PunchEvent;
use crate::models::schedule::{DateOverride, ScheduleScope, ShiftSchedule};
use crate::utils::date;
use chrono::{Days, FixedOffset, NaiveDate};
use rusqlite::Connection;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Settings shared by every reconciliation in one process.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub tz: FixedOffset,
    pub today: NaiveDate,
    pub rules: PairingRules,
    /// Global default from the configuration file.
    pub default_schedule: ShiftSchedule,
    pub workers: usize,
    pub capture_snapshots: bool,
}

impl EngineSettings {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let tz = cfg.tz()?;
        Ok(Self {
            tz,
            today: date::today(tz),
            rules: cfg.pairing_rules(),
            default_schedule: cfg.default_schedule()?,
            workers: cfg.workers.max(1),
            capture_snapshots: cfg.capture_snapshots,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReconcileSnapshot {
    pub today: NaiveDate,
    pub rules: PairingRules,
    pub default_schedule: ShiftSchedule,
    pub subject_schedules: HashMap<String, ShiftSchedule>,
    pub overrides: HashMap<(ScheduleScope, NaiveDate), DateOverride>,
    pub grants: HashMap<(String, NaiveDate), OvertimeGrant>,
    pub punches: HashMap<(String, NaiveDate), Vec<PunchEvent>>,
}

impl ReconcileSnapshot {
    pub fn new(today: NaiveDate, rules: PairingRules, default_schedule: ShiftSchedule) -> Self {
        Self {
            today,
            rules,
            default_schedule,
            subject_schedules: HashMap::new(),
            overrides: HashMap::new(),
            grants: HashMap::new(),
            punches: HashMap::new(),
        }
    }

    /// Fetch everything needed to reconcile `subjects` over `[from, to]`.
    /// An empty subject list loads every subject with punches in the range.
    pub fn load(
        conn: &Connection,
        settings: &EngineSettings,
        subjects: &[String],
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Self> {
        let mut global = settings.default_schedule;
        let mut snap = Self::new(settings.today, settings.rules, global);

        for (scope, schedule) in schedules::load_schedules(conn)? {
            match scope {
                ScheduleScope::Global => global = schedule.or(&settings.default_schedule),
                ScheduleScope::Subject(id) => {
                    snap.subject_schedules.insert(id, schedule);
                }
            }
        }
        snap.default_schedule = global;

        for o in schedules::load_overrides(conn, from, to)? {
            snap.add_override(o);
        }

        let subject_filter = (subjects.len() == 1).then(|| subjects[0].as_str());
        for g in overtime::load_grants(conn, settings.tz, subject_filter, from, to)? {
            snap.add_grant(g);
        }

        // Stored dates follow the offset at capture time; pad the query by a
        // day so a changed offset still finds every punch.
        let q_from = from.checked_sub_days(Days::new(1)).unwrap_or(from);
        let q_to = to.checked_add_days(Days::new(1)).unwrap_or(to);
        for ev in queries::load_punches(conn, settings.tz, subjects, q_from, q_to)? {
            if ev.date() >= from && ev.date() <= to {
                snap.add_punch(ev);
            }
        }

        debug!(
            subjects = subjects.len(),
            %from,
            %to,
            punch_days = snap.punches.len(),
            grants = snap.grants.len(),
            "reconcile snapshot loaded"
        );

        Ok(snap)
    }

    pub fn add_punch(&mut self, ev: PunchEvent) {
        self.punches
            .entry((ev.subject_id.clone(), ev.date()))
            .or_default()
            .push(ev);
    }

    pub fn add_override(&mut self, o: DateOverride) {
        self.overrides.insert((o.scope.clone(), o.date), o);
    }

    pub fn add_grant(&mut self, g: OvertimeGrant) {
        self.grants.insert((g.subject_id.clone(), g.date), g);
    }

    pub fn set_subject_schedule(&mut self, subject_id: &str, schedule: ShiftSchedule) {
        self.subject_schedules.insert(subject_id.to_string(), schedule);
    }

    pub fn windows_for(&self, subject_id: &str, date: NaiveDate) -> DayWindows {
        let sources = WindowSources {
            default_schedule: Some(&self.default_schedule),
            subject_schedule: self.subject_schedules.get(subject_id),
            subject_override: self
                .overrides
                .get(&(ScheduleScope::Subject(subject_id.to_string()), date)),
            global_override: self.overrides.get(&(ScheduleScope::Global, date)),
            grant: self.grants.get(&(subject_id.to_string(), date)),
        };
        build_windows(date, &sources)
    }

    pub fn punches_for(&self, subject_id: &str, date: NaiveDate) -> &[PunchEvent] {
        self.punches
            .get(&(subject_id.to_string(), date))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Subjects with punches or grants in the snapshot, sorted.
    pub fn subjects(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self
            .punches
            .keys()
            .map(|(s, _)| s)
            .chain(self.grants.keys().map(|(s, _)| s))
            .collect();
        set.into_iter().cloned().collect()
    }
}
