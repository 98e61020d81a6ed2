use thiserror::Error;

use crate::lifecycle::ItemState;

pub type Result<T> = std::result::Result<T, Error>;

/// Core error type. Callers can match on variants to tell a missing
/// reference apart from a rejected state transition; `InvalidTransition`
/// carries the item's current state so a caller can decide whether the
/// rejection is a benign race or a real bug.
#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("cannot {operation} an item that is {current}")]
    InvalidTransition {
        operation: &'static str,
        current: ItemState,
    },

    #[error("invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),
}

impl Error {
    pub fn not_found(what: &str, id: &str) -> Self {
        Error::NotFound(format!("{what} with id {id} not found"))
    }
}
