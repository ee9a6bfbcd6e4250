//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, storage, mail).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// One or more declarative rules rejected a field; every message is kept
    #[error("{field} is invalid: {}", messages.join("; "))]
    Violation {
        field: &'static str,
        messages: Vec<String>,
    },

    /// The hashing primitive refused to produce a hash (bad parameters)
    #[error("Failed to hash password: {0}")]
    Hashing(String),

    /// A stored hash could not be parsed during comparison
    #[error("Failed to verify password: {0}")]
    Verification(String),
}

impl DomainError {
    /// Create a rule violation error from rule messages
    pub fn violation<I, M>(field: &'static str, messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: ToString,
    {
        DomainError::Violation {
            field,
            messages: messages.into_iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
