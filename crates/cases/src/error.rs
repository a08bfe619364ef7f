//! Domain-level error types.

use thiserror::Error;

use db::DbError;

use crate::form::Field;

/// Why a submitted form cannot become a [`crate::BusinessCaseRecord`].
///
/// The `Display` text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// One or more required fields were left blank.
    #[error("Please fill in all required fields before saving. Missing: {}.", labels(.0))]
    MissingFields(Vec<Field>),

    /// A select field carried a value outside its vocabulary.
    #[error("'{value}' is not a valid {field}.")]
    InvalidChoice { field: Field, value: String },

    #[error("{field} must be a date in YYYY-MM-DD format.")]
    InvalidDate { field: Field, value: String },

    #[error("The end date cannot be earlier than the start date.")]
    EndBeforeStart,

    #[error("Expected benefit must be a positive number.")]
    NonPositiveBenefit,
}

fn labels(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A failed save. Never retried; the user re-submits by hand.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The database was unreachable, refused the login, or dropped the
    /// connection mid-statement. In the last case the row may or may not
    /// have been committed.
    #[error("database connection failed: {0}")]
    Connection(#[source] DbError),

    /// The database refused the row.
    #[error("database rejected the business case: {0}")]
    Constraint(#[source] DbError),
}

impl PersistenceError {
    /// Text for the error banner. Carries no driver detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Connection(_) => {
                "The business case could not be saved because the database is unavailable. \
                 Please try again later."
            }
            Self::Constraint(_) => {
                "The database rejected the business case. \
                 Please review the entries and try again."
            }
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Connect(_) | DbError::Sqlx(_) | DbError::Tds(_) => Self::Connection(err),
            DbError::Rejected { .. } | DbError::MissingId => Self::Constraint(err),
        }
    }
}
