//! Configuration management
//!
//! All configuration is read once at process start; there is no hot reload.

use crate::error::{CheckpointError, CheckpointResult, ErrorContext};
use serde::{Deserialize, Serialize};

/// Token issuance settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session token lifetime in hours
    pub token_ttl_hours: i64,
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Sqlite connection string; when absent, in-memory stores are used
    pub database_url: Option<String>,
}

/// External game catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog API
    pub api_url: String,
    /// API key passed on every lookup
    pub api_key: Option<String>,
}

/// Top-level configuration for the CheckPoint backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            auth: AuthConfig { token_ttl_hours: 24 },
            storage: StorageConfig { database_url: None },
            catalog: CatalogConfig {
                api_url: "https://api.rawg.io/api/games".to_string(),
                api_key: None,
            },
        }
    }
}

impl CheckpointConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            auth: AuthConfig {
                token_ttl_hours: std::env::var("CHECKPOINT_TOKEN_TTL_HOURS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.auth.token_ttl_hours),
            },
            storage: StorageConfig {
                database_url: std::env::var("DATABASE_URL").ok(),
            },
            catalog: CatalogConfig {
                api_url: std::env::var("CATALOG_API_URL")
                    .unwrap_or(defaults.catalog.api_url),
                api_key: std::env::var("CATALOG_API_KEY").ok(),
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> CheckpointResult<()> {
        if self.auth.token_ttl_hours <= 0 {
            return Err(CheckpointError::Config {
                message: "Token TTL must be greater than 0 hours".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set CHECKPOINT_TOKEN_TTL_HOURS to a positive value"),
            });
        }

        if self.catalog.api_url.is_empty() {
            return Err(CheckpointError::Config {
                message: "Catalog API URL must not be empty".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set CATALOG_API_URL or leave it unset for the default"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CheckpointConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert!(config.storage.database_url.is_none());
    }

    #[test]
    fn test_non_positive_ttl_is_rejected() {
        let mut config = CheckpointConfig::default();
        config.auth.token_ttl_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_catalog_url_is_rejected() {
        let mut config = CheckpointConfig::default();
        config.catalog.api_url = String::new();
        assert!(config.validate().is_err());
    }
}
