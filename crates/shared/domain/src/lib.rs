//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! password hashing, credential validation rules, identifier generation and
//! the user entity shared by the services.

pub mod constants;
pub mod error;
pub mod identifiers;
pub mod password;
pub mod user;
pub mod validation;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use identifiers::{generate_nickname, generate_verification_token};
pub use password::{hash_password, verify_password, Password};
pub use user::{CreateUser, UpdateProfile, User, UserResponse};
pub use validation::{
    ensure_nickname, ensure_password, validate_nickname, validate_password, NicknameRule,
    PasswordRule,
};
