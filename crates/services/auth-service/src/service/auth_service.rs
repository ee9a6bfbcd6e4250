//! Authentication service - registration, login and bearer authentication.
//!
//! Password hashing and verification run on the blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::Mailer;
use crate::repository::UserRepository;
use crate::service::token_service::TokenService;
use common::{AppError, AppResult, SecurityConfig};
use domain::{
    ensure_nickname, ensure_password, generate_nickname, generate_verification_token,
    CreateUser, DomainResult, Password, User, TOKEN_TYPE_BEARER,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Generated nicknames tried before registration gives up.
const NICKNAME_ATTEMPTS: usize = 10;

/// Plain text hashed once to produce the dummy hash for unknown emails.
const DUMMY_PASSWORD: &str = "Dummy*Password1";

/// Token response returned after successful authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "bearer")
    #[cfg_attr(feature = "openapi", schema(example = "bearer"))]
    pub token_type: String,
    /// Token lifetime in seconds
    #[cfg_attr(feature = "openapi", schema(example = 1800))]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new, unverified user and send the verification email
    async fn register(&self, payload: CreateUser) -> AppResult<User>;

    /// Check credentials and issue an access token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Resolve a bearer token to an active, verified user
    async fn authenticate(&self, token: String) -> AppResult<User>;

    /// Confirm an email address with the token sent at registration
    async fn verify_email(&self, user_id: Uuid, token: String) -> AppResult<User>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
    tokens: TokenService,
    security: SecurityConfig,
    dummy_hash: Arc<OnceCell<Password>>,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        tokens: TokenService,
        security: SecurityConfig,
    ) -> Self {
        Self {
            users,
            mailer,
            tokens,
            security,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Token service used for issuing and verifying tokens
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    fn token_response(&self, user: &User) -> AppResult<TokenResponse> {
        let access_token = self.tokens.issue(user.id)?;
        Ok(TokenResponse {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.tokens.default_ttl().num_seconds(),
        })
    }

    async fn unique_nickname(&self) -> AppResult<String> {
        for _ in 0..NICKNAME_ATTEMPTS {
            let candidate = generate_nickname();
            if self.users.find_by_nickname(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(AppError::internal("Could not generate a unique nickname"))
    }

    // Unknown emails cost the same bcrypt work as known ones
    async fn verify_against_dummy(&self, password: String) {
        let cell = Arc::clone(&self.dummy_hash);
        let cost = self.security.bcrypt_cost;
        let outcome = run_blocking(move || -> DomainResult<bool> {
            let dummy = cell.get_or_try_init(|| Password::with_cost(DUMMY_PASSWORD, cost))?;
            dummy.verify(&password)
        })
        .await;

        if let Err(e) = outcome {
            warn!("Dummy password verification failed: {}", e);
        }
    }
}

async fn run_blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> DomainResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::internal(format!("Blocking task failed: {}", e)))?
        .map_err(AppError::from)
}

/// Hash a password on the blocking pool.
async fn hash_blocking(password: String, cost: u32) -> AppResult<String> {
    run_blocking(move || Password::with_cost(&password, cost).map(Password::into_string)).await
}

/// Verify a password on the blocking pool.
async fn verify_blocking(password: String, hash: String) -> AppResult<bool> {
    run_blocking(move || Password::from_hash(hash).verify(&password)).await
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, payload: CreateUser) -> AppResult<User> {
        ensure_password(&payload.password)?;
        if let Some(nickname) = &payload.nickname {
            ensure_nickname(nickname)?;
        }

        if self.users.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let nickname = match payload.nickname {
            Some(nickname) => {
                if self.users.find_by_nickname(&nickname).await?.is_some() {
                    return Err(AppError::conflict("Nickname"));
                }
                nickname
            }
            None => self.unique_nickname().await?,
        };

        let password_hash = hash_blocking(payload.password, self.security.bcrypt_cost).await?;
        let verification_token = generate_verification_token();

        let mut user = User::new(
            payload.email,
            nickname,
            password_hash,
            verification_token.clone(),
        );
        user.bio = payload.bio;
        user.profile_picture_url = payload.profile_picture_url;

        let user = self.users.insert(user).await?;
        info!(user_id = %user.id, nickname = %user.nickname, "User registered");

        // Registration stands even if the email cannot be sent
        if let Err(e) = self
            .mailer
            .send_verification_email(&user, &verification_token)
            .await
        {
            warn!(user_id = %user.id, "Failed to send verification email: {}", e);
        }

        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let Some(user) = self.users.find_by_email(&email).await? else {
            self.verify_against_dummy(password).await;
            return Err(AppError::InvalidCredentials);
        };

        if user.is_locked {
            warn!(user_id = %user.id, "Login attempt on locked account");
            return Err(AppError::AccountLocked);
        }

        if !verify_blocking(password, user.password_hash.clone()).await? {
            let (user, locked) = self
                .users
                .record_failed_login(user.id, self.security.max_login_attempts)
                .await?;
            if locked {
                warn!(
                    user_id = %user.id,
                    attempts = user.failed_login_attempts,
                    "Account locked after repeated failed logins"
                );
            }
            return Err(AppError::InvalidCredentials);
        }

        if !user.email_verified {
            return Err(AppError::EmailNotVerified);
        }

        // Another request may have locked the account during verification
        let user = self.users.record_login(user.id).await?;
        if user.is_locked {
            warn!(user_id = %user.id, "Login attempt on locked account");
            return Err(AppError::AccountLocked);
        }
        info!(user_id = %user.id, "User logged in");

        self.token_response(&user)
    }

    async fn authenticate(&self, token: String) -> AppResult<User> {
        let subject = self.tokens.verify(&token).ok_or(AppError::Unauthorized)?;
        let user_id = Uuid::parse_str(&subject).map_err(|_| AppError::InvalidTokenPayload)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UnknownUser)?;

        if !user.email_verified {
            return Err(AppError::EmailNotVerified);
        }
        if user.is_locked {
            return Err(AppError::AccountLocked);
        }

        Ok(user)
    }

    async fn verify_email(&self, user_id: Uuid, token: String) -> AppResult<User> {
        let invalid = || AppError::bad_request("Invalid or expired verification link");

        let user = self
            .users
            .verify_email(user_id, &token)
            .await?
            .ok_or_else(invalid)?;
        info!(user_id = %user.id, "Email verified");
        Ok(user)
    }
}
