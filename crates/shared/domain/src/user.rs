//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub email_verified: bool,
    /// Outstanding email verification token (None once verified)
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    pub failed_login_attempts: u32,
    pub is_locked: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, unverified user
    pub fn new(
        email: String,
        nickname: String,
        password_hash: String,
        verification_token: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            nickname,
            password_hash,
            bio: None,
            profile_picture_url: None,
            email_verified: false,
            verification_token: Some(verification_token),
            failed_login_attempts: 0,
            is_locked: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a failed login, locking the account once `max_attempts` is reached.
    ///
    /// Returns true if this attempt locked the account.
    pub fn record_failed_login(&mut self, max_attempts: u32) -> bool {
        self.failed_login_attempts = self.failed_login_attempts.saturating_add(1);
        self.updated_at = Utc::now();
        if !self.is_locked && self.failed_login_attempts >= max_attempts {
            self.is_locked = true;
            return true;
        }
        false
    }

    /// Record a successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.failed_login_attempts = 0;
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Mark the email verified if `token` matches the outstanding one.
    pub fn verify_email(&mut self, token: &str) -> bool {
        match self.verification_token.as_deref() {
            Some(expected) if expected == token => {
                self.email_verified = true;
                self.verification_token = None;
                self.updated_at = Utc::now();
                true
            }
            _ => false,
        }
    }

    /// Apply a partial profile update; absent fields stay unchanged.
    pub fn apply_profile(&mut self, update: UpdateProfile) {
        if let Some(nickname) = update.nickname {
            self.nickname = nickname;
        }
        if let Some(bio) = update.bio {
            self.bio = Some(bio);
        }
        if let Some(url) = update.profile_picture_url {
            self.profile_picture_url = Some(url);
        }
        self.updated_at = Utc::now();
    }
}

/// User registration data transfer object
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateUser {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[cfg_attr(feature = "openapi", schema(example = "john.doe@example.com"))]
    pub email: String,
    /// Password (8+ chars, upper, lower, digit, special character)
    #[validate(custom(function = "crate::validation::password_rules"))]
    #[cfg_attr(feature = "openapi", schema(example = "Secure*1234", min_length = 8))]
    pub password: String,
    /// Public nickname; generated when absent
    #[validate(custom(function = "crate::validation::nickname_rules"))]
    #[cfg_attr(feature = "openapi", schema(example = "john_doe123"))]
    pub nickname: Option<String>,
    /// Short biography
    #[validate(length(max = 500, message = "Bio must have at most 500 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Experienced software developer."))]
    pub bio: Option<String>,
    /// Profile picture URL
    #[validate(url(message = "Invalid URL format"))]
    #[cfg_attr(feature = "openapi", schema(example = "https://example.com/profiles/john.jpg"))]
    pub profile_picture_url: Option<String>,
}

/// Profile update data transfer object
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateProfile {
    /// New nickname
    #[validate(custom(function = "crate::validation::nickname_rules"))]
    #[cfg_attr(feature = "openapi", schema(example = "john_doe123"))]
    pub nickname: Option<String>,
    /// New biography
    #[validate(length(max = 500, message = "Bio must have at most 500 characters"))]
    #[cfg_attr(feature = "openapi", schema(example = "Now writing Rust."))]
    pub bio: Option<String>,
    /// New profile picture URL
    #[validate(url(message = "Invalid URL format"))]
    #[cfg_attr(feature = "openapi", schema(example = "https://example.com/profiles/new.jpg"))]
    pub profile_picture_url: Option<String>,
}

impl UpdateProfile {
    /// True when the update would change nothing
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.bio.is_none() && self.profile_picture_url.is_none()
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address
    pub email: String,
    /// Public nickname
    pub nickname: String,
    /// Short biography
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Profile picture URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    /// Whether the email address has been confirmed
    pub email_verified: bool,
    /// Last successful login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
            bio: user.bio,
            profile_picture_url: user.profile_picture_url,
            email_verified: user.email_verified,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self::from(user.clone())
    }
}
