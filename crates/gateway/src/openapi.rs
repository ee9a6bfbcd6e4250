//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::auth_handler::{LoginRequest, TokenRequest};
use crate::handlers::health_handler::HealthResponse;
use auth_service_lib::service::TokenResponse;
use domain::{CreateUser, UpdateProfile, UserResponse};

/// Name of the bearer security scheme referenced by protected paths.
pub const BEARER_SCHEME: &str = "Bearer";

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    info(title = "User Management", version = "0.0.1", license(name = "MIT")),
    paths(
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::token,
        crate::handlers::auth_handler::verify_email,
        crate::handlers::user_handler::get_current_user,
        crate::handlers::user_handler::update_current_user,
        crate::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            CreateUser,
            LoginRequest,
            TokenRequest,
            TokenResponse,
            UserResponse,
            UpdateProfile,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and email verification"),
        (name = "Users", description = "Profile of the authenticated user"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                BEARER_SCHEME,
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Enter the token you received from the /auth/login endpoint. \
                             Format: Bearer YOUR_TOKEN",
                        ))
                        .build(),
                ),
            );
        }
    }
}
