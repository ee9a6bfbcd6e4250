//! Integration tests for API endpoints.
//!
//! The real account services run over an in-memory store with a cheap
//! bcrypt cost; only the mailer (and, where noted, the auth service) is
//! mocked.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use auth_service_lib::client::MockMailer;
use auth_service_lib::config::AuthServiceConfig;
use auth_service_lib::repository::{MemoryUserStore, UserRepository};
use auth_service_lib::service::{MockAuthService, MockUserService, TokenService};
use auth_service_lib::AccountServices;
use common::{AppError, JwtConfig, SecurityConfig};
use domain::User;
use gateway_lib::config::GatewayConfig;
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;

const SECRET: &str = "test-secret-key-for-testing-only-32chars";
const PASSWORD: &str = "SecurePass123!";

// =============================================================================
// Test Harness
// =============================================================================

struct TestApp {
    router: Router,
    store: Arc<MemoryUserStore>,
    tokens: TokenService,
}

fn test_app() -> TestApp {
    let auth_config = AuthServiceConfig::new(
        JwtConfig::new(SECRET),
        SecurityConfig {
            bcrypt_cost: 4,
            max_login_attempts: 5,
        },
    );

    let mut mailer = MockMailer::new();
    mailer
        .expect_send_verification_email()
        .returning(|_, _| Ok(()));

    let store = Arc::new(MemoryUserStore::new());
    let services = AccountServices::new(&auth_config, store.clone(), Arc::new(mailer));
    let state = AppState::from_services(services, GatewayConfig::default());

    TestApp {
        router: create_router(state),
        store,
        tokens: TokenService::new(&auth_config.jwt),
    }
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(json_request(Method::POST, uri, body, None)).await
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn register(&self, email: &str, nickname: &str) -> Value {
        let response = self
            .post_json(
                "/auth/register",
                json!({ "email": email, "password": PASSWORD, "nickname": nickname }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }

    async fn stored_user(&self, id: &str) -> User {
        let id = Uuid::parse_str(id).unwrap();
        self.store.find_by_id(id).await.unwrap().unwrap()
    }

    /// Register, verify and log in; returns (user id, access token).
    async fn verified_login(&self, email: &str, nickname: &str) -> (String, String) {
        let registered = self.register(email, nickname).await;
        let id = registered["id"].as_str().unwrap().to_string();
        let token = self.stored_user(&id).await.verification_token.unwrap();

        let verified = self
            .get(&format!("/auth/verify-email/{}/{}", id, token), None)
            .await;
        assert_eq!(verified.status, StatusCode::OK);

        let login = self
            .post_json("/auth/login", json!({ "email": email, "password": PASSWORD }))
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);

        (id, login.body["access_token"].as_str().unwrap().to_string())
    }
}

fn json_request(method: Method, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn error_message(response: &TestResponse) -> &str {
    response.body["error"]["message"].as_str().unwrap_or_default()
}

// =============================================================================
// Health & Docs
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = test_app();
    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_schema_includes_bearer_scheme() {
    let app = test_app();
    let response = app.get("/api-docs/openapi.json", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let scheme = &response.body["components"]["securitySchemes"]["Bearer"];
    assert_eq!(scheme["type"], "http");
    assert_eq!(scheme["scheme"], "bearer");
    assert_eq!(scheme["bearerFormat"], "JWT");

    let me = &response.body["paths"]["/users/me"]["get"]["security"];
    assert!(me[0].get("Bearer").is_some());
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_returns_created_user() {
    let app = test_app();
    let body = app.register("john.doe@example.com", "john_doe123").await;

    assert_eq!(body["email"], "john.doe@example.com");
    assert_eq!(body["nickname"], "john_doe123");
    assert_eq!(body["email_verified"], false);
    assert!(body.get("password_hash").is_none());
    assert!(body.get("verification_token").is_none());
}

#[tokio::test]
async fn test_register_generates_nickname_when_absent() {
    let app = test_app();
    let response = app
        .post_json(
            "/auth/register",
            json!({ "email": "auto@example.com", "password": PASSWORD }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let nickname = response.body["nickname"].as_str().unwrap();
    assert!(domain::validate_nickname(nickname).is_ok());
}

#[tokio::test]
async fn test_register_weak_password_reports_every_rule() {
    let app = test_app();
    let response = app
        .post_json(
            "/auth/register",
            json!({ "email": "weak@example.com", "password": "weak" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let message = error_message(&response);
    assert!(message.contains("Password must be at least 8 characters long"));
    assert!(message.contains("Password must contain at least one uppercase letter"));
    assert!(message.contains("Password must contain at least one digit"));
    assert!(message.contains("Password must contain at least one special character"));
    assert!(!message.contains("lowercase"));
}

#[tokio::test]
async fn test_register_rejects_invalid_fields() {
    let app = test_app();

    let response = app
        .post_json(
            "/auth/register",
            json!({ "email": "not-an-email", "password": PASSWORD }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(error_message(&response).contains("Invalid email format"));

    let response = app
        .post_json(
            "/auth/register",
            json!({ "email": "nick@example.com", "password": PASSWORD, "nickname": "test@user" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(error_message(&response).contains("letters, digits and underscores"));

    let response = app
        .post_json(
            "/auth/register",
            json!({
                "email": "bio@example.com",
                "password": PASSWORD,
                "bio": "x".repeat(501),
                "profile_picture_url": "invalid-url",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let message = error_message(&response);
    assert!(message.contains("Bio must have at most 500 characters"));
    assert!(message.contains("Invalid URL format"));

    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_register_duplicates_conflict() {
    let app = test_app();
    app.register("duplicate@example.com", "firstuser").await;

    let response = app
        .post_json(
            "/auth/register",
            json!({ "email": "duplicate@example.com", "password": PASSWORD, "nickname": "seconduser" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(error_message(&response), "Email already exists");

    let response = app
        .post_json(
            "/auth/register",
            json!({ "email": "other@example.com", "password": PASSWORD, "nickname": "firstuser" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(error_message(&response), "Nickname already exists");
}

// =============================================================================
// Verification & Login
// =============================================================================

#[tokio::test]
async fn test_login_before_verification_is_rejected() {
    let app = test_app();
    app.register("pending@example.com", "pending").await;

    let response = app
        .post_json(
            "/auth/login",
            json!({ "email": "pending@example.com", "password": PASSWORD }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&response), "Email not verified");
}

#[tokio::test]
async fn test_verify_email_with_wrong_token() {
    let app = test_app();
    let registered = app.register("wrong@example.com", "wrongtoken").await;
    let id = registered["id"].as_str().unwrap();

    let response = app
        .get(&format!("/auth/verify-email/{}/not-the-token", id), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .get(&format!("/auth/verify-email/{}/anything", Uuid::new_v4()), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_flow_issues_bearer_token() {
    let app = test_app();
    let (id, token) = app.verified_login("john@example.com", "john_doe").await;

    assert_eq!(app.tokens.verify(&token), Some(id));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = test_app();
    app.verified_login("john@example.com", "john_doe").await;

    let response = app
        .post_json(
            "/auth/login",
            json!({ "email": "john@example.com", "password": "WrongPass123!" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&response), "Incorrect email or password");
    assert_eq!(response.headers[header::WWW_AUTHENTICATE], "Bearer");

    let response = app
        .post_json(
            "/auth/login",
            json!({ "email": "nobody@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&response), "Incorrect email or password");
}

#[tokio::test]
async fn test_token_endpoint_accepts_form_credentials() {
    let app = test_app();
    let (id, _) = app.verified_login("form@example.com", "form_user").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "grant_type=password&username=form%40example.com&password={}",
            "SecurePass123%21"
        )))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.body["token_type"], "bearer");
    assert_eq!(response.body["expires_in"], 1800);
    let token = response.body["access_token"].as_str().unwrap();
    assert_eq!(app.tokens.verify(token), Some(id));
}

// =============================================================================
// Protected Routes
// =============================================================================

#[tokio::test]
async fn test_me_requires_bearer_token() {
    let app = test_app();
    let response = app.get("/users/me", None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers[header::WWW_AUTHENTICATE], "Bearer");
    assert_eq!(error_message(&response), "Invalid authentication credentials");
}

#[tokio::test]
async fn test_me_returns_profile() {
    let app = test_app();
    let (id, token) = app.verified_login("me@example.com", "me_user").await;

    let response = app.get("/users/me", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], id.as_str());
    assert_eq!(response.body["email_verified"], true);
    assert!(response.body["last_login_at"].is_string());
}

#[tokio::test]
async fn test_me_rejects_bad_tokens() {
    let app = test_app();
    let (id, _) = app.verified_login("bad@example.com", "bad_tokens").await;

    let response = app.get("/users/me", Some("not.a.valid.token")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let expired = app
        .tokens
        .issue_with_ttl(&id, Duration::seconds(-10))
        .unwrap();
    let response = app.get("/users/me", Some(&expired)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&response), "Invalid authentication credentials");

    let other_secret = TokenService::new(&JwtConfig::new(
        "another-secret-key-that-is-long-enough-too",
    ));
    let forged = other_secret.issue(&id).unwrap();
    let response = app.get("/users/me", Some(&forged)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let unknown = app.tokens.issue(Uuid::new_v4()).unwrap();
    let response = app.get("/users/me", Some(&unknown)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&response), "User not found");

    let not_uuid = app.tokens.issue("test_user").unwrap();
    let response = app.get("/users/me", Some(&not_uuid)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_message(&response), "Invalid token payload");
}

#[tokio::test]
async fn test_update_profile() {
    let app = test_app();
    let (_, token) = app.verified_login("profile@example.com", "profile_user").await;

    let response = app
        .send(json_request(
            Method::PUT,
            "/users/me",
            json!({ "bio": "I am a software developer" }),
            Some(&token),
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["bio"], "I am a software developer");
    assert_eq!(response.body["nickname"], "profile_user");

    let response = app
        .send(json_request(
            Method::PUT,
            "/users/me",
            json!({ "profile_picture_url": "invalid-url" }),
            Some(&token),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&response), "Invalid URL format");

    let response = app
        .send(json_request(
            Method::PUT,
            "/users/me",
            json!({ "bio": "changed" }),
            None,
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Mocked Services
// =============================================================================

#[tokio::test]
async fn test_locked_account_is_forbidden() {
    let mut auth = MockAuthService::new();
    auth.expect_authenticate()
        .returning(|_| Err(AppError::AccountLocked));
    let mut users = MockUserService::new();
    users.expect_get_user().never();

    let state = AppState::new(Arc::new(auth), Arc::new(users), GatewayConfig::default());
    let router = create_router(state);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .header(header::AUTHORIZATION, "Bearer locked-user-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
}

#[tokio::test]
async fn test_middleware_passes_resolved_user() {
    let user = User::new(
        "mock@example.com".to_string(),
        "mock_user".to_string(),
        "hash".to_string(),
        "token".to_string(),
    );
    let user_id = user.id;
    let resolved = user.clone();

    let mut auth = MockAuthService::new();
    auth.expect_authenticate()
        .withf(|token| token == "valid-test-token")
        .returning(move |_| Ok(resolved.clone()));
    let mut users = MockUserService::new();
    users
        .expect_get_user()
        .withf(move |id| *id == user_id)
        .times(1)
        .returning(move |_| {
            let mut user = user.clone();
            user.last_login_at = Some(Utc::now());
            Ok(user)
        });

    let state = AppState::new(Arc::new(auth), Arc::new(users), GatewayConfig::default());
    let response = create_router(state)
        .oneshot(
            Request::builder()
                .uri("/users/me")
                .header(header::AUTHORIZATION, "Bearer valid-test-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
