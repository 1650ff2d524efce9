//! Sqlite connection bootstrap

use crate::{ServerError, ServerResult};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use tracing::{debug, info};

/// Connect to the configured sqlite database, creating it if missing
pub async fn connect(database_url: &str) -> ServerResult<SqlitePool> {
    info!("Connecting to database: {}", database_url);

    let pool = if database_url.starts_with("sqlite:") && !database_url.contains(":memory:") {
        let db_path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);

        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.exists() {
                debug!("Creating parent directory: {}", parent.display());
                std::fs::create_dir_all(parent).map_err(|e| {
                    ServerError::Database(format!("Failed to create directory: {}", e))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        SqlitePool::connect_with(options).await.map_err(|e| {
            ServerError::Database(format!("Failed to connect to database: {}", e))
        })?
    } else {
        SqlitePool::connect(database_url).await.map_err(|e| {
            ServerError::Database(format!("Failed to connect to database: {}", e))
        })?
    };

    info!("Database connection established");
    Ok(pool)
}
