//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Local failure raised by the pure stockroom crates.
///
/// Transport, backend and access failures are reported by the client and
/// auth crates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input: a negative quantity, a blank name, a duplicate line.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier string that is not a positive integer.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The record's current state forbids the action, such as receiving an
    /// order that is already received.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
