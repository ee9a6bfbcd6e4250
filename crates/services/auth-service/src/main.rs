//! Auth Service - operator tooling for password hashes and access tokens.

use std::process::ExitCode;

use chrono::Duration;
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_service_lib::config::AuthServiceConfig;
use auth_service_lib::service::TokenService;
use domain::{hash_password, verify_password, DEFAULT_BCRYPT_COST};

#[derive(Parser)]
#[command(name = "auth-service")]
#[command(about = "Password hashing and access token tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a password with bcrypt
    Hash {
        password: String,
        #[arg(long, env = "BCRYPT_COST", default_value_t = DEFAULT_BCRYPT_COST)]
        cost: u32,
    },
    /// Check a password against a bcrypt hash
    Check { password: String, hash: String },
    /// Issue or verify access tokens
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Issue a token for a subject
    Issue {
        subject: String,
        /// Lifetime in minutes (defaults to ACCESS_TOKEN_EXPIRE_MINUTES)
        #[arg(long, allow_negative_numbers = true)]
        ttl_minutes: Option<i64>,
    },
    /// Print the subject of a valid token
    Verify { token: String },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Hash { password, cost } => {
            println!("{}", hash_password(&password, cost)?);
        }
        Commands::Check { password, hash } => {
            if !verify_password(&password, &hash)? {
                println!("no match");
                return Ok(ExitCode::FAILURE);
            }
            println!("match");
        }
        Commands::Token { command } => {
            let config = AuthServiceConfig::from_env().map_err(|e| {
                error!("Invalid configuration: {}", e);
                e
            })?;
            let tokens = TokenService::new(&config.jwt);

            match command {
                TokenCommands::Issue {
                    subject,
                    ttl_minutes,
                } => {
                    let ttl = match ttl_minutes {
                        Some(minutes) => Duration::try_minutes(minutes)
                            .ok_or("--ttl-minutes is out of range")?,
                        None => tokens.default_ttl(),
                    };
                    println!("{}", tokens.issue_with_ttl(subject, ttl)?);
                }
                TokenCommands::Verify { token } => match tokens.verify(&token) {
                    Some(subject) => println!("{}", subject),
                    None => return Ok(ExitCode::FAILURE),
                },
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
