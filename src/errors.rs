//! Unified error types for the quotation engine.
//!
//! Malformed input, missing rows and uniqueness races are distinct variants
//! so callers can decide between rejecting, returning a 404-equivalent and
//! retrying. Storage failures stay opaque.

use thiserror::Error;

/// All failure modes surfaced by the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file or environment is unusable.
    #[error("configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// Malformed input, never silently coerced.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The input field at fault
        field: &'static str,
        /// Why the value was rejected
        message: String,
    },

    /// A referenced row does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// The entity kind that was looked up
        entity: &'static str,
        /// The key that failed to resolve
        key: String,
    },

    /// A uniqueness race lost to a concurrent writer. Retryable by the caller.
    #[error("conflict on {resource}")]
    Conflict {
        /// The unique resource that collided
        resource: &'static str,
    },

    /// Opaque storage failure; nothing was committed.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Opaque filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A send was refused by the mail transport.
    #[error("notification to {recipient} failed: {message}")]
    Notify {
        /// The address the message was bound for
        recipient: String,
        /// Transport-level failure description
        message: String,
    },
}

impl Error {
    /// Maps a unique-constraint violation to [`Error::Conflict`], leaving any
    /// other database failure opaque.
    pub(crate) fn on_unique_violation(err: sea_orm::DbErr, resource: &'static str) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => Self::Conflict { resource },
            _ => Self::Database(err),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
