//! CheckPoint Server
//!
//! REST backend for the CheckPoint game-review client.

use checkpoint_core::{init_logging, LoggingConfig};
use checkpoint_server::{CheckpointServer, ServerConfig};
use clap::Parser;

/// CheckPoint Server - game reviews with ownership-gated mutation
#[derive(Parser)]
#[command(name = "checkpoint-server")]
#[command(about = "REST backend for the CheckPoint game-review client")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Database URL for review and user storage
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Set up logging first
    let logging = LoggingConfig {
        level: args.log_level.clone(),
        ..LoggingConfig::default()
    };
    if let Err(e) = init_logging(&logging) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    // Create server configuration from the environment, overridden by flags
    let mut config = ServerConfig::from_env();
    config.host = args.host;
    config.port = args.port;
    if args.database_url.is_some() {
        config.core.storage.database_url = args.database_url;
    }

    if std::env::var("CHECKPOINT_JWT_SECRET").is_err() {
        tracing::warn!(
            "CHECKPOINT_JWT_SECRET is not set; using the built-in development secret. \
             Set it before exposing this server."
        );
    }

    if config.core.storage.database_url.is_none() {
        tracing::warn!("DATABASE_URL is not set; reviews and users are stored in memory only.");
    }

    tracing::info!("Starting CheckPoint server on {}:{}", config.host, config.port);

    // Build and start the server
    let server = match CheckpointServer::new(config).await {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server (this will block until shutdown)
    if let Err(e) = server.start().await {
        eprintln!("Server failed to start: {}", e);
        std::process::exit(1);
    }
}
