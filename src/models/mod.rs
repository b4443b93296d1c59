pub mod day_summary;
pub mod overtime;
pub mod punch;
pub mod punch_kind;
pub mod review_status;
pub mod schedule;
pub mod session;
