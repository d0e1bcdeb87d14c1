//! Store error taxonomy.
//!
//! `sqlx` failures are classified once, at this boundary, into the kinds
//! callers react to differently: constraint conflicts are surfaced unchanged
//! for the caller to judge (legitimate conflict vs. programming error),
//! transient pool/network failures are retryable by the caller, and
//! everything else is a plain database error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No usable connection target could be resolved. Fatal at initialize
    /// time.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// An accessor was called before `initialize`. Caller bug.
    #[error("store not initialized; call initialize() first")]
    NotInitialized,
    /// Unique/foreign-key/check/enum-domain violation reported by Postgres.
    #[error("constraint violation ({}): {detail}", constraint.as_deref().unwrap_or("unnamed"))]
    Constraint {
        /// Constraint name when Postgres reports one.
        constraint: Option<String>,
        detail: String,
    },
    /// Pool exhaustion, acquisition timeout, or a network blip. Retryable by
    /// the caller; the store itself does not retry.
    #[error("transient connection error: {0}")]
    Transient(sqlx::Error),
    /// Input rejected by application-side validation before reaching the
    /// store (owner exclusivity, cross-field references).
    #[error("invalid input: {0}")]
    Invalid(#[from] noverna_core::Error),
    /// Any other database failure.
    #[error("database error: {0}")]
    Db(sqlx::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        classify_sqlx(err)
    }
}

/// SQLSTATE codes treated as constraint violations: integrity-constraint
/// class 23 plus invalid text representation (bad enum label in raw SQL).
fn is_constraint_code(code: &str) -> bool {
    code.starts_with("23") || code == "22P02"
}

pub(crate) fn classify_sqlx(err: sqlx::Error) -> Error {
    match err {
        sqlx::Error::Database(db) => {
            let code = db.code().map(|c| c.into_owned());
            if code.as_deref().is_some_and(is_constraint_code) {
                Error::Constraint {
                    constraint: db.constraint().map(str::to_string),
                    detail: db.message().to_string(),
                }
            } else {
                Error::Db(sqlx::Error::Database(db))
            }
        }
        err @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)) => {
            Error::Transient(err)
        }
        err => Error::Db(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_class_codes_are_constraints() {
        assert!(is_constraint_code("23505")); // unique_violation
        assert!(is_constraint_code("23503")); // foreign_key_violation
        assert!(is_constraint_code("23514")); // check_violation
        assert!(is_constraint_code("22P02")); // invalid_text_representation
        assert!(!is_constraint_code("40001")); // serialization_failure
        assert!(!is_constraint_code("08006")); // connection_failure
    }

    #[test]
    fn pool_timeout_is_transient() {
        assert!(matches!(
            classify_sqlx(sqlx::Error::PoolTimedOut),
            Error::Transient(_)
        ));
        assert!(matches!(
            classify_sqlx(sqlx::Error::PoolClosed),
            Error::Transient(_)
        ));
    }

    #[test]
    fn row_not_found_is_a_plain_db_error() {
        assert!(matches!(
            classify_sqlx(sqlx::Error::RowNotFound),
            Error::Db(_)
        ));
    }
}
