//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Password
// =============================================================================

/// Minimum password length requirement (in characters)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters accepted as "special" by the password rules
pub const PASSWORD_SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Default bcrypt cost factor
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Lowest cost factor bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest cost factor bcrypt accepts
pub const MAX_BCRYPT_COST: u32 = 31;

// =============================================================================
// Profile
// =============================================================================

/// Minimum nickname length (in characters)
pub const MIN_NICKNAME_LENGTH: usize = 3;

/// Maximum nickname length (in characters)
pub const MAX_NICKNAME_LENGTH: usize = 50;

/// Nicknames may only contain ASCII letters, digits and underscores
pub const NICKNAME_PATTERN: &str = r"^[A-Za-z0-9_]+$";

/// Random bytes behind an email verification token
pub const VERIFICATION_TOKEN_BYTES: usize = 16;

// =============================================================================
// Authentication
// =============================================================================

/// Default access token lifetime in minutes
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

/// Longest configurable access token lifetime in minutes (one year)
pub const MAX_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24 * 365;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Failed logins tolerated before an account is locked
pub const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 5;

/// JWT token type identifier, as returned by the OAuth2 password flow
pub const TOKEN_TYPE_BEARER: &str = "bearer";
