//! Credential validation rules.
//!
//! Rules are declared in static tables and evaluated uniformly, so every
//! violated rule is reported instead of failing on the first one. Adding a
//! rule means adding a variant and a table row.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::constants::{
    MAX_NICKNAME_LENGTH, MIN_NICKNAME_LENGTH, MIN_PASSWORD_LENGTH, NICKNAME_PATTERN,
    PASSWORD_SPECIAL_CHARACTERS,
};
use crate::error::DomainError;

static NICKNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(NICKNAME_PATTERN).expect("nickname pattern is a valid regex"));

// =============================================================================
// Password
// =============================================================================

/// A single password requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    SpecialCharacter,
}

impl PasswordRule {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            PasswordRule::MinLength => "password_too_short",
            PasswordRule::Uppercase => "password_missing_uppercase",
            PasswordRule::Lowercase => "password_missing_lowercase",
            PasswordRule::Digit => "password_missing_digit",
            PasswordRule::SpecialCharacter => "password_missing_special",
        }
    }
}

impl std::fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordRule::MinLength => write!(
                f,
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ),
            PasswordRule::Uppercase => {
                write!(f, "Password must contain at least one uppercase letter")
            }
            PasswordRule::Lowercase => {
                write!(f, "Password must contain at least one lowercase letter")
            }
            PasswordRule::Digit => write!(f, "Password must contain at least one digit"),
            PasswordRule::SpecialCharacter => write!(
                f,
                "Password must contain at least one special character ({})",
                PASSWORD_SPECIAL_CHARACTERS
            ),
        }
    }
}

fn long_enough(s: &str) -> bool {
    s.chars().count() >= MIN_PASSWORD_LENGTH
}

fn has_uppercase(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_uppercase())
}

fn has_lowercase(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_lowercase())
}

fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

fn has_special(s: &str) -> bool {
    s.chars().any(|c| PASSWORD_SPECIAL_CHARACTERS.contains(c))
}

/// Password rule table: each row passes when its predicate holds.
static PASSWORD_RULES: &[(PasswordRule, fn(&str) -> bool)] = &[
    (PasswordRule::MinLength, long_enough),
    (PasswordRule::Uppercase, has_uppercase),
    (PasswordRule::Lowercase, has_lowercase),
    (PasswordRule::Digit, has_digit),
    (PasswordRule::SpecialCharacter, has_special),
];

/// Check a password against every password rule.
///
/// Returns all violated rules, in table order.
pub fn validate_password(password: &str) -> Result<(), Vec<PasswordRule>> {
    collect_violations(PASSWORD_RULES, password)
}

// =============================================================================
// Nickname
// =============================================================================

/// A single nickname requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NicknameRule {
    MinLength,
    MaxLength,
    Pattern,
}

impl NicknameRule {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            NicknameRule::MinLength => "nickname_too_short",
            NicknameRule::MaxLength => "nickname_too_long",
            NicknameRule::Pattern => "nickname_pattern",
        }
    }
}

impl std::fmt::Display for NicknameRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NicknameRule::MinLength => write!(
                f,
                "Nickname must be at least {} characters",
                MIN_NICKNAME_LENGTH
            ),
            NicknameRule::MaxLength => write!(
                f,
                "Nickname must have at most {} characters",
                MAX_NICKNAME_LENGTH
            ),
            NicknameRule::Pattern => write!(
                f,
                "Nickname may only contain letters, digits and underscores"
            ),
        }
    }
}

fn nickname_long_enough(s: &str) -> bool {
    s.chars().count() >= MIN_NICKNAME_LENGTH
}

fn nickname_short_enough(s: &str) -> bool {
    s.chars().count() <= MAX_NICKNAME_LENGTH
}

fn nickname_matches_pattern(s: &str) -> bool {
    NICKNAME_RE.is_match(s)
}

static NICKNAME_RULES: &[(NicknameRule, fn(&str) -> bool)] = &[
    (NicknameRule::MinLength, nickname_long_enough),
    (NicknameRule::MaxLength, nickname_short_enough),
    (NicknameRule::Pattern, nickname_matches_pattern),
];

/// Check a nickname against every nickname rule.
pub fn validate_nickname(nickname: &str) -> Result<(), Vec<NicknameRule>> {
    collect_violations(NICKNAME_RULES, nickname)
}

fn collect_violations<R: Copy>(rules: &[(R, fn(&str) -> bool)], value: &str) -> Result<(), Vec<R>> {
    let violations: Vec<R> = rules
        .iter()
        .filter(|(_, passes)| !passes(value))
        .map(|(rule, _)| *rule)
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

// =============================================================================
// Adapters
// =============================================================================

/// Password check as a domain error carrying every message.
pub fn ensure_password(password: &str) -> Result<(), DomainError> {
    validate_password(password).map_err(|rules| DomainError::violation("password", rules))
}

/// Nickname check as a domain error carrying every message.
pub fn ensure_nickname(nickname: &str) -> Result<(), DomainError> {
    validate_nickname(nickname).map_err(|rules| DomainError::violation("nickname", rules))
}

/// `validator` hook for password fields.
pub fn password_rules(password: &str) -> Result<(), ValidationError> {
    validate_password(password).map_err(|rules| to_validation_error("password_rules", &rules))
}

/// `validator` hook for nickname fields.
pub fn nickname_rules(nickname: &str) -> Result<(), ValidationError> {
    validate_nickname(nickname).map_err(|rules| to_validation_error("nickname_rules", &rules))
}

fn to_validation_error<R: std::fmt::Display>(code: &'static str, rules: &[R]) -> ValidationError {
    let message = rules
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}
