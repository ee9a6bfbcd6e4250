//! API Gateway Library
//!
//! This crate provides the HTTP REST API over the account services.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use auth_service_lib::client::LogMailer;
use auth_service_lib::config::AuthServiceConfig;
use auth_service_lib::repository::MemoryUserStore;
use auth_service_lib::AccountServices;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the application over an in-memory user store.
pub fn build_app(config: GatewayConfig, auth_config: &AuthServiceConfig) -> axum::Router {
    let services = AccountServices::new(
        auth_config,
        Arc::new(MemoryUserStore::new()),
        Arc::new(LogMailer::new(config.public_base_url.clone())),
    );
    let state = AppState::from_services(services, config);

    create_router(state).layer(TraceLayer::new_for_http())
}

/// Run the HTTP server with the given configuration.
pub async fn run_server_with_config(
    config: GatewayConfig,
    auth_config: AuthServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = config.bind_address().parse()?;
    let app = build_app(config, &auth_config);

    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
