pub mod initialize;
pub mod log;
pub mod migrate;
pub mod overtime;
pub mod pool;
pub mod queries;
pub mod schedules;

use crate::errors::AppError;

/// Wrap a domain parsing error so it can travel through rusqlite row mappers.
pub(crate) fn conversion_err(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}
