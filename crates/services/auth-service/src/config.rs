//! Auth service configuration.

use std::env;
use std::str::FromStr;

use common::{ConfigError, JwtConfig, SecurityConfig};
use domain::{
    DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES, DEFAULT_BCRYPT_COST, DEFAULT_MAX_LOGIN_ATTEMPTS,
    MAX_ACCESS_TOKEN_EXPIRE_MINUTES,
};
use tracing::warn;

/// Secret used by debug builds when `JWT_SECRET_KEY` is unset.
#[cfg(debug_assertions)]
const DEVELOPMENT_JWT_SECRET: &str = "your-secret-key-for-development-only";

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Token signing and lifetime
    pub jwt: JwtConfig,
    /// Password hashing and lockout policy
    pub security: SecurityConfig,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            jwt: JwtConfig {
                secret: jwt_secret_from_env()?,
                access_token_expire_minutes: parse_var(
                    "ACCESS_TOKEN_EXPIRE_MINUTES",
                    DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
                )?,
            },
            security: SecurityConfig {
                bcrypt_cost: parse_var("BCRYPT_COST", DEFAULT_BCRYPT_COST)?,
                max_login_attempts: parse_var("MAX_LOGIN_ATTEMPTS", DEFAULT_MAX_LOGIN_ATTEMPTS)?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from explicit parts.
    pub fn new(jwt: JwtConfig, security: SecurityConfig) -> Self {
        Self { jwt, security }
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        let minutes = self.jwt.access_token_expire_minutes;
        if !(1..=MAX_ACCESS_TOKEN_EXPIRE_MINUTES).contains(&minutes) {
            return Err(ConfigError::Invalid {
                name: "ACCESS_TOKEN_EXPIRE_MINUTES",
                value: minutes.to_string(),
            });
        }
        self.security.validate()
    }
}

fn jwt_secret_from_env() -> Result<String, ConfigError> {
    match env::var("JWT_SECRET_KEY") {
        Ok(secret) if !secret.is_empty() => Ok(secret),
        _ => missing_secret(),
    }
}

#[cfg(debug_assertions)]
fn missing_secret() -> Result<String, ConfigError> {
    warn!("JWT_SECRET_KEY is not set, using the development secret");
    Ok(DEVELOPMENT_JWT_SECRET.to_string())
}

#[cfg(not(debug_assertions))]
fn missing_secret() -> Result<String, ConfigError> {
    Err(ConfigError::Missing("JWT_SECRET_KEY"))
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
