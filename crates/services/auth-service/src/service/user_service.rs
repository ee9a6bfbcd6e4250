//! Profile reads and updates for authenticated users.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::repository::UserRepository;
use common::{AppError, AppResult, OptionExt};
use domain::{ensure_nickname, UpdateProfile, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User profile service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Apply a partial profile update
    async fn update_profile(&self, id: Uuid, update: UpdateProfile) -> AppResult<User>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found()
    }

    async fn update_profile(&self, id: Uuid, update: UpdateProfile) -> AppResult<User> {
        update.validate()?;

        let user = self.get_user(id).await?;
        if update.is_empty() {
            return Ok(user);
        }

        if let Some(nickname) = update.nickname.as_deref() {
            ensure_nickname(nickname)?;
            if nickname != user.nickname {
                let taken = self.users.find_by_nickname(nickname).await?;
                if taken.is_some_and(|other| other.id != user.id) {
                    return Err(AppError::conflict("Nickname"));
                }
            }
        }

        let user = self.users.update_profile(id, update).await?;
        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}
