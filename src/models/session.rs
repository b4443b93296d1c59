use super::punch::PunchEvent;
use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// One of the three attendance slots of a day.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    #[serde(rename = "AM")]
    Morning,
    #[serde(rename = "PM")]
    Afternoon,
    #[serde(rename = "OT")]
    Overtime,
}

impl Slot {
    /// Assignment priority order.
    pub const ALL: [Slot; 3] = [Slot::Morning, Slot::Afternoon, Slot::Overtime];

    pub fn code(&self) -> &'static str {
        match self {
            Slot::Morning => "AM",
            Slot::Afternoon => "PM",
            Slot::Overtime => "OT",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Slot::Morning => 0,
            Slot::Afternoon => 1,
            Slot::Overtime => 2,
        }
    }

    pub fn from_code(code: &str) -> AppResult<Self> {
        match code.trim().to_uppercase().as_str() {
            "AM" | "MORNING" => Ok(Slot::Morning),
            "PM" | "AFTERNOON" => Ok(Slot::Afternoon),
            "OT" | "OVERTIME" => Ok(Slot::Overtime),
            other => Err(AppError::InvalidEventRef(format!("unknown slot '{}'", other))),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A slot with the punches paired into it. Rebuilt on every pass.
#[derive(Debug, Clone)]
pub struct Session {
    pub slot: Slot,
    pub in_event: Option<PunchEvent>,
    pub out_event: Option<PunchEvent>,
}

impl Session {
    pub fn is_complete(&self) -> bool {
        self.in_event.is_some() && self.out_event.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.in_event.is_none() && self.out_event.is_none()
    }

    /// Ids of the persisted events held by this session.
    pub fn persisted_ids(&self) -> Vec<i64> {
        [&self.in_event, &self.out_event]
            .into_iter()
            .flatten()
            .filter_map(|e| e.id.persisted())
            .collect()
    }
}
