pub mod lateness;
pub mod ledger;
pub mod overlap;
pub mod pairing;
pub mod windows;
