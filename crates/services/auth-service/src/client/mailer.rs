//! Outbound mail for account verification.

use async_trait::async_trait;
use tracing::info;

use common::AppResult;
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Delivery of account emails.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the link that confirms `user` owns their email address
    async fn send_verification_email(&self, user: &User, token: &str) -> AppResult<()>;
}

/// Mailer that writes verification links to the log instead of sending them.
#[derive(Debug, Clone)]
pub struct LogMailer {
    base_url: String,
}

impl LogMailer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Link the user follows to verify their email.
    pub fn verification_link(&self, user: &User, token: &str) -> String {
        format!("{}/auth/verify-email/{}/{}", self.base_url, user.id, token)
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification_email(&self, user: &User, token: &str) -> AppResult<()> {
        info!(
            user_id = %user.id,
            email = %user.email,
            link = %self.verification_link(user, token),
            "Verification email queued"
        );
        Ok(())
    }
}
