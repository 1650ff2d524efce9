//! CheckPoint Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, ServerConfig, ServerError, ServerResult};
use axum::serve;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main CheckPoint web server
pub struct CheckpointServer {
    config: ServerConfig,
    state: AppState,
}

impl CheckpointServer {
    /// Create a new CheckPoint server
    pub async fn new(config: ServerConfig) -> ServerResult<Self> {
        config
            .core
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let state = AppState::new(config.clone()).await?;

        Ok(Self { config, state })
    }

    /// Start the web server
    pub async fn start(self) -> ServerResult<()> {
        let address = self.config.address();

        info!("Starting CheckPoint server");
        info!("Server address: http://{}", address);

        let app = create_app(self.state.clone());

        let listener = TcpListener::bind(&address)
            .await
            .map_err(ServerError::Server)?;

        info!("Server listening on http://{}", address);

        if let Err(e) = serve(listener, app).await {
            error!("Server error: {}", e);
            return Err(ServerError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for CheckpointServer
pub struct CheckpointServerBuilder {
    config: ServerConfig,
}

impl CheckpointServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set database URL
    pub fn database_url<S: Into<String>>(mut self, database_url: S) -> Self {
        self.config.core.storage.database_url = Some(database_url.into());
        self
    }

    /// Build the server
    pub async fn build(self) -> ServerResult<CheckpointServer> {
        CheckpointServer::new(self.config).await
    }
}

impl Default for CheckpointServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to start a server with configuration from the environment
pub async fn start_server() -> ServerResult<()> {
    let config = ServerConfig::from_env();
    let server = CheckpointServer::new(config).await?;
    server.start().await
}
