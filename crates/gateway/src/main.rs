//! API Gateway - HTTP REST API for account management.

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_service_lib::config::AuthServiceConfig;
use gateway_lib::config::GatewayConfig;

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "HTTP API for user accounts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "GATEWAY_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "GATEWAY_PORT", default_value = "3000")]
        port: u16,
        /// Base URL for verification links (defaults to http://localhost:<port>)
        #[arg(long, env = "PUBLIC_BASE_URL")]
        public_base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Misconfiguration is fatal before anything binds
    let auth_config = AuthServiceConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            public_base_url,
        } => {
            let config = GatewayConfig::new(host, port, public_base_url);
            gateway_lib::run_server_with_config(config, auth_config).await?;
        }
    }

    Ok(())
}
