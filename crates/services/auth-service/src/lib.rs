//! Auth Service Library
//!
//! Account registration, login, email verification and bearer-token
//! authentication. The HTTP gateway embeds these services; the
//! `auth-service` binary exposes the hashing and token primitives to
//! operators.

pub mod client;
pub mod config;
pub mod repository;
pub mod service;

use std::sync::Arc;

use crate::client::Mailer;
use crate::config::AuthServiceConfig;
use crate::repository::UserRepository;
use crate::service::{AuthService, Authenticator, TokenService, UserManager, UserService};

/// Service handles wired to one user repository.
#[derive(Clone)]
pub struct AccountServices {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
}

impl AccountServices {
    /// Wire the account services over the given collaborators.
    pub fn new(
        config: &AuthServiceConfig,
        repository: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt);
        let auth = Authenticator::new(
            Arc::clone(&repository),
            mailer,
            tokens,
            config.security.clone(),
        );

        Self {
            auth: Arc::new(auth),
            users: Arc::new(UserManager::new(repository)),
        }
    }
}
