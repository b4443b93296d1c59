use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fmt;

/// Review state of a punch. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    /// Parse a stored status. Rows imported from older deployments used
    /// several spellings for the approved/rejected states.
    pub fn from_db_str(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "" => Ok(Self::Pending),
            "approved" | "approve" | "validated" | "verified" => Ok(Self::Approved),
            "rejected" | "reject" | "declined" => Ok(Self::Rejected),
            other => Err(AppError::InvalidStatus(other.to_string())),
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, ReviewStatus::Approved)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ReviewStatus::Rejected)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
