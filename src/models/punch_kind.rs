use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// Direction of a punch: clocking in or clocking out.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PunchKind {
    In,
    Out,
}

impl PunchKind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PunchKind::In => "in",
            PunchKind::Out => "out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(PunchKind::In),
            "out" => Some(PunchKind::Out),
            _ => None,
        }
    }

    /// Lenient parser for user input ("IN", "time-in", "out", ...).
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "in" | "time-in" | "time_in" | "timein" => Ok(Self::In),
            "out" | "time-out" | "time_out" | "timeout" => Ok(Self::Out),
            other => Err(AppError::InvalidKind(other.to_string())),
        }
    }

    pub fn is_in(&self) -> bool {
        matches!(self, PunchKind::In)
    }

    pub fn is_out(&self) -> bool {
        matches!(self, PunchKind::Out)
    }
}

impl fmt::Display for PunchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
