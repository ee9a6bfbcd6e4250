//! User handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};

use common::AppResult;
use domain::{UpdateProfile, UserResponse};

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user).put(update_current_user))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("Bearer" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "User account is locked")
    )
)]
pub async fn get_current_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(current_user.id).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/users/me",
    tag = "Users",
    security(("Bearer" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Nickname already exists")
    )
)]
pub async fn update_current_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateProfile>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_profile(current_user.id, payload)
        .await?;

    Ok(Json(UserResponse::from(user)))
}
