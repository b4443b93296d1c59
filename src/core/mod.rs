pub mod calculator;
pub mod log;
pub mod logic;
pub mod overtime;
pub mod punch;
pub mod review;
pub mod schedule;
pub mod snapshot;
