//! Authentication service business logic.

mod auth_service;
mod token_service;
mod user_service;

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
pub use auth_service::{AuthService, Authenticator, TokenResponse};
pub use token_service::{Claims, TokenError, TokenService};
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
pub use user_service::{UserManager, UserService};
