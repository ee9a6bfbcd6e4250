//! Unified error handling for the HTTP surface.
//!
//! Provides a single error type that services return and that converts to
//! Axum HTTP responses.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Invalid authentication credentials")]
    Unauthorized,

    #[error("Invalid token payload")]
    InvalidTokenPayload,

    #[error("User not found")]
    UnknownUser,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("User account is locked")]
    AccountLocked,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidTokenPayload => "INVALID_TOKEN_PAYLOAD",
            AppError::UnknownUser => "UNKNOWN_USER",
            AppError::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            AppError::AccountLocked => "ACCOUNT_LOCKED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized
            | AppError::InvalidTokenPayload
            | AppError::UnknownUser
            | AppError::EmailNotVerified
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::AccountLocked => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Conflict(msg) => {
                if msg.ends_with("already exists") {
                    msg.clone()
                } else {
                    format!("{} already exists", msg)
                }
            }

            // Hide details for internal errors
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An unexpected error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Violation { messages, .. } => AppError::Validation(messages.join("; ")),
            DomainError::Hashing(msg) => AppError::Internal(format!("Password hashing: {}", msg)),
            DomainError::Verification(msg) => {
                AppError::Internal(format!("Password verification: {}", msg))
            }
        }
    }
}

// =============================================================================
// Validation Error Conversion
// =============================================================================

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(validation_message(&errors))
    }
}

/// Every field message, ordered by field name and joined with "; ".
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for {}", field),
            })
        })
        .collect();

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.join("; ")
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unauthorized_carries_bearer_challenge() {
        let response = AppError::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert_eq!(body["error"]["message"], "Invalid authentication credentials");
    }

    #[tokio::test]
    async fn test_locked_account_is_forbidden_without_challenge() {
        let response = AppError::AccountLocked.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response = AppError::internal("db exploded at row 7").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "An unexpected error occurred");
    }

    #[test]
    fn test_violation_keeps_every_message() {
        let err = AppError::from(DomainError::violation(
            "password",
            ["missing uppercase", "missing digit"],
        ));

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "missing uppercase; missing digit");
    }

    #[test]
    fn test_validation_errors_joined_in_field_order() {
        let mut errors = ValidationErrors::new();
        let mut bio = validator::ValidationError::new("length");
        bio.message = Some("Bio must have at most 500 characters".into());
        errors.add("bio", bio);
        let mut email = validator::ValidationError::new("email");
        email.message = Some("Invalid email format".into());
        errors.add("email", email);
        errors.add("nickname", validator::ValidationError::new("nickname_rules"));

        let err = AppError::from(errors);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.user_message(),
            "Bio must have at most 500 characters; Invalid email format; Invalid value for nickname"
        );
    }

    #[test]
    fn test_hashing_failure_is_internal() {
        let err = AppError::from(DomainError::Hashing("cost 99".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_conflict_message_not_duplicated() {
        assert_eq!(
            AppError::conflict("Email").user_message(),
            "Email already exists"
        );
        assert_eq!(
            AppError::conflict("Nickname already exists").user_message(),
            "Nickname already exists"
        );
    }
}
