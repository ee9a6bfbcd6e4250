//! Access token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying `sub`, `iat` and `exp`. The service is
//! stateless: the signing secret is fixed at construction and there is no
//! revocation list. A token is valid only while `now < exp`.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use common::{AppError, JwtConfig};

/// Signing algorithm for every token this service issues or accepts.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Why a token was not accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to create access token: {0}")]
    Encoding(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired | TokenError::Invalid(_) => AppError::Unauthorized,
            TokenError::Encoding(msg) => AppError::Internal(msg),
        }
    }
}

/// Issues and verifies access tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &ALGORITHM)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service from immutable JWT configuration.
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is exact; `now < exp` is re-checked after decoding
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_bytes()),
            validation,
            // Out-of-range lifetimes saturate; issuing then fails instead of panicking
            default_ttl: Duration::try_minutes(config.access_token_expire_minutes)
                .unwrap_or(Duration::MAX),
        }
    }

    /// Lifetime given to tokens issued without an explicit TTL.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject` with the default lifetime.
    pub fn issue(&self, subject: impl ToString) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, self.default_ttl)
    }

    /// Issue a token for `subject` that expires after `ttl`.
    ///
    /// A negative `ttl` produces a token that is already expired.
    pub fn issue_with_ttl(&self, subject: impl ToString, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            error!("Token lifetime {} is out of range", ttl);
            TokenError::Encoding(format!("token lifetime {} is out of range", ttl))
        })?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            error!("Failed to create access token: {}", e);
            TokenError::Encoding(e.to_string())
        })
    }

    /// Decode a token, telling expiry apart from every other failure.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        if data.claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }

    /// Verify a token and return its subject.
    ///
    /// Expired and invalid tokens both yield `None`; they are only told
    /// apart in the logs.
    pub fn verify(&self, token: &str) -> Option<String> {
        match self.decode(token) {
            Ok(claims) => Some(claims.sub),
            Err(TokenError::Expired) => {
                warn!("Token has expired");
                None
            }
            Err(e) => {
                error!("Rejected token: {}", e);
                None
            }
        }
    }
}
