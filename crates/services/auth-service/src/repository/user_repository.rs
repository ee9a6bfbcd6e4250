//! User persistence seam and its in-memory implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{UpdateProfile, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Emails compare case-insensitively; nicknames compare exactly.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by nickname
    async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<User>>;

    /// Persist a new user, rejecting duplicate emails and nicknames
    async fn insert(&self, user: User) -> AppResult<User>;

    /// Count a failed login, locking the account at `max_attempts`.
    ///
    /// Returns the stored user and whether this attempt locked it.
    async fn record_failed_login(&self, id: Uuid, max_attempts: u32) -> AppResult<(User, bool)>;

    /// Reset the failure counter and stamp the login time.
    ///
    /// A user locked in the meantime is returned unchanged.
    async fn record_login(&self, id: Uuid) -> AppResult<User>;

    /// Consume a verification token; None when the user or token does not match
    async fn verify_email(&self, id: Uuid, token: &str) -> AppResult<Option<User>>;

    /// Apply a partial profile update, rejecting nicknames taken by others
    async fn update_profile(&self, id: Uuid, update: UpdateProfile) -> AppResult<User>;
}

/// Process-local user store.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no users
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

fn conflict_with(users: &HashMap<Uuid, User>, candidate: &User) -> Option<AppError> {
    let others = users.values().filter(|u| u.id != candidate.id);
    for other in others {
        if other.email.eq_ignore_ascii_case(&candidate.email) {
            return Some(AppError::conflict("Email"));
        }
        if other.nickname == candidate.nickname {
            return Some(AppError::conflict("Nickname"));
        }
    }
    None
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.nickname == nickname).cloned())
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(AppError::conflict("User"));
        }
        if let Some(err) = conflict_with(&users, &user) {
            return Err(err);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn record_failed_login(&self, id: Uuid, max_attempts: u32) -> AppResult<(User, bool)> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(AppError::NotFound)?;
        let locked = user.record_failed_login(max_attempts);
        Ok((user.clone(), locked))
    }

    async fn record_login(&self, id: Uuid) -> AppResult<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(AppError::NotFound)?;
        if !user.is_locked {
            user.record_login();
        }
        Ok(user.clone())
    }

    async fn verify_email(&self, id: Uuid, token: &str) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if !user.verify_email(token) {
            return Ok(None);
        }
        Ok(Some(user.clone()))
    }

    async fn update_profile(&self, id: Uuid, update: UpdateProfile) -> AppResult<User> {
        let mut users = self.users.write().await;
        let mut updated = users.get(&id).cloned().ok_or(AppError::NotFound)?;
        updated.apply_profile(update);
        if let Some(err) = conflict_with(&users, &updated) {
            return Err(err);
        }
        users.insert(id, updated.clone());
        Ok(updated)
    }
}
