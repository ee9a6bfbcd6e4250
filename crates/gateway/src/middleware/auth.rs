//! Authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use common::AppError;
use domain::User;

use crate::state::AppState;

/// Current authenticated user resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: user.nickname,
        }
    }
}

/// Authentication middleware that validates bearer tokens.
///
/// A missing or malformed `Authorization` header is treated the same as an
/// invalid token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let user = state
        .auth_service
        .authenticate(bearer.token().to_string())
        .await?;

    request.extensions_mut().insert(CurrentUser::from(user));

    Ok(next.run(request).await)
}
