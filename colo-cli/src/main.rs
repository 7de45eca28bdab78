//! Colo Command Line Interface
//!
//! Usage:
//!   colo serve        - Start the API server
//!   colo probe        - Probe the platform schema and print capabilities
//!   colo status       - Show a running server's health

use clap::{Parser, Subcommand};
use std::sync::Arc;

use colo_api::{run_server, ApiConfig};
use colo_backend::{probe_capabilities, PlatformAuth, PlatformClient, PlatformConfig};

#[derive(Parser)]
#[command(name = "colo")]
#[command(about = "Colo camp operations service")]
#[command(version)]
struct Cli {
    /// Base URL of the hosted platform
    #[arg(long, env = "COLO_PLATFORM_URL", default_value = "http://localhost:54321")]
    platform_url: String,

    /// Privileged service key for the platform
    #[arg(long, env = "COLO_SERVICE_KEY", default_value = "")]
    service_key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Shared secret validating user access tokens
        #[arg(long, env = "COLO_JWT_SECRET")]
        jwt_secret: String,
        /// Shared secret for payment webhook signatures
        #[arg(long, env = "COLO_WEBHOOK_SECRET", default_value = "")]
        webhook_secret: String,
        /// Bucket holding project assets
        #[arg(long, default_value = "projets")]
        assets_bucket: String,
        /// Refresh token for the service's own platform session
        #[arg(long, env = "COLO_REFRESH_TOKEN")]
        refresh_token: Option<String>,
        /// Disable permissive CORS
        #[arg(long)]
        no_cors: bool,
    },

    /// Probe the platform schema and print the capability set
    Probe,

    /// Show the principal behind an access token
    Whoami {
        /// User access token
        #[arg(short, long)]
        token: String,
    },

    /// Show a running server's health
    Status {
        /// API server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        api_url: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run_command(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_command(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let platform = Arc::new(PlatformClient::new(PlatformConfig::new(
        &cli.platform_url,
        &cli.service_key,
    ))?);

    match cli.command {
        Commands::Serve {
            host,
            port,
            jwt_secret,
            webhook_secret,
            assets_bucket,
            refresh_token,
            no_cors,
        } => {
            println!("Starting Colo API server on {}:{}...", host, port);

            let config = ApiConfig {
                host,
                port,
                enable_cors: !no_cors,
                jwt_secret,
                webhook_secret,
                assets_bucket,
                refresh_token,
                ..ApiConfig::default()
            };

            run_server(config, platform).await?;
            Ok(())
        }

        Commands::Probe => {
            let capabilities = probe_capabilities(&platform).await?;
            println!("Capabilities: {:?}", capabilities);
            Ok(())
        }

        Commands::Whoami { token } => {
            let auth = PlatformAuth::new(platform, None);
            let principal = auth.user_from_token(&token).await?;
            println!(
                "Principal: {} <{}>",
                principal.id,
                principal.email.as_deref().unwrap_or("sans e-mail")
            );
            Ok(())
        }

        Commands::Status { api_url } => {
            println!("Checking server status at {}...", api_url);

            let client = reqwest::Client::new();
            let response = client
                .get(format!("{}/health", api_url))
                .send()
                .await?
                .json::<serde_json::Value>()
                .await?;

            println!("Status: {}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
