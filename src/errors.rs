//! Unified error type for the library ledger.
//!
//! The aggregation engine never returns these; they come from the data-store
//! layer, form-level validation, configuration loading and record ingestion.

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A required form field was missing or malformed
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable explanation
        message: String,
    },

    /// A monetary amount was rejected before reaching the database
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// No student with this id exists for the owner
    #[error("Student not found: {id}")]
    StudentNotFound {
        /// Student id that was looked up
        id: i64,
    },

    /// No payment with this id exists for the owner
    #[error("Payment not found: {id}")]
    PaymentNotFound {
        /// Payment id that was looked up
        id: i64,
    },

    /// No expense with this id exists for the owner
    #[error("Expense not found: {id}")]
    ExpenseNotFound {
        /// Expense id that was looked up
        id: i64,
    },

    /// A raw record document could not be read at all
    #[error("Ingest error: {message}")]
    Ingest {
        /// What went wrong
        message: String,
    },

    /// A file exists but could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a [`Error::Validation`] with a static field name.
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
