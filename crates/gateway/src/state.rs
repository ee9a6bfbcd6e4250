//! Application state for dependency injection.

use std::sync::Arc;

use auth_service_lib::service::{AuthService, UserService};
use auth_service_lib::AccountServices;

use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            config,
        }
    }

    /// Create app state from wired account services.
    pub fn from_services(services: AccountServices, config: GatewayConfig) -> Self {
        Self::new(services.auth, services.users, config)
    }
}
