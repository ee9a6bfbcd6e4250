//! Authentication handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use auth_service_lib::service::TokenResponse;
use common::AppResult;
use domain::{CreateUser, UserResponse};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    /// User password
    #[schema(example = "Secure*1234")]
    pub password: String,
}

/// OAuth2 password-flow token request
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    /// Email address of the account
    #[schema(example = "john.doe@example.com")]
    pub username: String,
    /// Account password
    #[schema(example = "Secure*1234")]
    pub password: String,
    /// Always "password" when present
    #[serde(default)]
    pub grant_type: Option<String>,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/token", post(token))
        .route("/verify-email/:user_id/:token", get(verify_email))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User registered; verification email sent", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email or nickname already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.auth_service.register(payload).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials or email not verified"),
        (status = 403, description = "User account is locked")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}

/// Exchange form credentials for a JWT token
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "Authentication",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials or email not verified"),
        (status = 403, description = "User account is locked")
    )
)]
pub async fn token(
    State(state): State<AppState>,
    Form(payload): Form<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(token))
}

/// Confirm an email address
#[utoipa::path(
    get,
    path = "/auth/verify-email/{user_id}/{token}",
    tag = "Authentication",
    params(
        ("user_id" = Uuid, Path, description = "User ID"),
        ("token" = String, Path, description = "Verification token from the email")
    ),
    responses(
        (status = 200, description = "Email verified", body = UserResponse),
        (status = 400, description = "Invalid or expired verification link")
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Path((user_id, token)): Path<(Uuid, String)>,
) -> AppResult<Json<UserResponse>> {
    let user = state.auth_service.verify_email(user_id, token).await?;

    Ok(Json(UserResponse::from(user)))
}
