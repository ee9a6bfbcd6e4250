//! Shared configuration structures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use domain::{
    DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES, DEFAULT_BCRYPT_COST, DEFAULT_MAX_LOGIN_ATTEMPTS,
    MAX_BCRYPT_COST, MIN_BCRYPT_COST, MIN_JWT_SECRET_LENGTH,
};

/// Fatal configuration problems detected at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("JWT secret must be at least {min} characters long")]
    SecretTooShort { min: usize },

    #[error("bcrypt cost must be between {min} and {max}, got {got}")]
    CostOutOfRange { min: u32, max: u32, got: u32 },
}

/// JWT configuration for access tokens.
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    #[serde(skip_serializing)]
    pub secret: String,
    pub access_token_expire_minutes: i64,
}

// Never print the signing secret
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .finish()
    }
}

impl JwtConfig {
    /// Create a config with the default token lifetime.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expire_minutes: DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
        }
    }

    /// Check the secret meets the minimum length.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort {
                min: MIN_JWT_SECRET_LENGTH,
            });
        }
        Ok(())
    }

    /// Get JWT secret as bytes.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

/// Password hashing and login policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
    /// Failed logins before the account is locked
    pub max_login_attempts: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
        }
    }
}

impl SecurityConfig {
    /// Check the cost factor is one bcrypt accepts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::CostOutOfRange {
                min: MIN_BCRYPT_COST,
                max: MAX_BCRYPT_COST,
                got: self.bcrypt_cost,
            });
        }
        if self.max_login_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_LOGIN_ATTEMPTS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}
