//! Password value object - Domain layer password handling.
//!
//! Hashing is bcrypt with a per-call random salt. The raw password only ever
//! lives on the stack of the caller; `Password` holds the stored hash.

use crate::error::{DomainError, DomainResult};

/// Hash a plain text password with bcrypt at the given cost factor.
///
/// # Errors
/// Returns [`DomainError::Hashing`] if bcrypt rejects the parameters
/// (for example a cost outside `4..=31`).
pub fn hash_password(plain_text: &str, cost: u32) -> DomainResult<String> {
    bcrypt::hash(plain_text, cost).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        DomainError::Hashing(e.to_string())
    })
}

/// Check a plain text password against a stored bcrypt hash.
///
/// Returns `Ok(false)` for a wrong password.
///
/// # Errors
/// Returns [`DomainError::Verification`] if the stored hash is malformed.
pub fn verify_password(plain_text: &str, hash: &str) -> DomainResult<bool> {
    bcrypt::verify(plain_text, hash).map_err(|e| {
        tracing::error!("Error verifying password: {}", e);
        DomainError::Verification(e.to_string())
    })
}

/// Password value object that handles hashing and verification.
///
/// Immutable, compared by value. Only the hash is ever held.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash the plain text with an explicit cost factor.
    pub fn with_cost(plain_text: &str, cost: u32) -> DomainResult<Self> {
        let hash = hash_password(plain_text, cost)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from storage).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// A malformed hash is an error, not a mismatch.
    pub fn verify(&self, plain_text: &str) -> DomainResult<bool> {
        verify_password(plain_text, &self.hash)
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}
