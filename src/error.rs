//! Error types for the PayEase engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure an engine operation can report. The `Display` output of
//! each variant is the human-readable message shown to the user.

use thiserror::Error;

use crate::models::PayrollStatus;
use crate::store::StoreError;

/// The main error type for the PayEase engine.
///
/// All engine operations return this error type. Store failures are
/// translated into [`EngineError::Persistence`] at the engine boundary, so
/// callers never see a store-specific error.
///
/// # Example
///
/// ```
/// use payease_engine::error::EngineError;
///
/// let error = EngineError::validation("month", "Invalid month");
/// assert_eq!(error.to_string(), "Invalid month");
/// assert_eq!(EngineError::InvalidCredentials.to_string(), "Invalid credentials");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input failed a shape or range check.
    #[error("{message}")]
    Validation {
        /// The offending input field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Required login fields were missing.
    #[error("{message}")]
    InvalidInput {
        /// A description of the missing input.
        message: String,
    },

    /// The account is locked after too many failed login attempts.
    ///
    /// Renders as `InvalidCredentials` does, so a locked account cannot be
    /// told apart from an unknown one.
    #[error("Invalid credentials")]
    AccountLocked,

    /// Login failed. Covers unknown users, wrong passwords and archived
    /// employees without telling them apart.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An employee, account or payroll record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: String,
        /// The identifier that was not found.
        id: String,
    },

    /// A unique value (username, email) is already taken.
    #[error("{message}")]
    Conflict {
        /// A description of the conflicting value.
        message: String,
    },

    /// The payroll state machine does not allow this status change.
    #[error("Cannot change payroll status from {from} to {to}")]
    InvalidTransition {
        /// The current status of the record.
        from: PayrollStatus,
        /// The requested status.
        to: PayrollStatus,
    },

    /// The store was unreachable or the operation did not complete.
    #[error("Database error: {message}")]
    Persistence {
        /// The store's failure message.
        message: String,
    },

    /// A plaintext password was rejected before hashing.
    #[error("{message}")]
    PasswordPolicy {
        /// A description of the policy that was violated.
        message: String,
    },

    /// The password hasher itself failed.
    #[error("Password hashing failed: {message}")]
    Hashing {
        /// The hasher's failure message.
        message: String,
    },

    /// A monetary calculation could not be completed.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or holds unusable values.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Creates a [`EngineError::Validation`] for the given field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a [`EngineError::NotFound`] for the given entity and id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Returns true for failures of the login path.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::AccountLocked | Self::InvalidInput { .. }
        )
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        Self::Persistence {
            message: err.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
