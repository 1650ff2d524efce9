//! Read-only game catalog lookup
//!
//! Thin client over a RAWG-style catalog API. Lookups are proxied behind the
//! auth guard so the API key stays off the client; results are snapshotted
//! onto reviews at creation time and never synced back.

use checkpoint_core::{CatalogConfig, CheckpointError, CheckpointResult, ErrorContext};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A game as reported by the catalog
///
/// Field names mirror the upstream API so clients built against it keep
/// working unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogGame {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub released: Option<String>,
}

/// Search response envelope from the catalog
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<CatalogGame>,
}

/// Client for the external game catalog
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl CatalogClient {
    /// Create a new catalog client
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Search games by name
    pub async fn search(&self, query: &str) -> CheckpointResult<Vec<CatalogGame>> {
        debug!("Catalog search: {}", query);

        let mut request = self.http.get(&self.api_url).query(&[("search", query)]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| catalog_error("Catalog request failed", e))?
            .error_for_status()
            .map_err(|e| catalog_error("Catalog returned an error status", e))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| catalog_error("Catalog returned an unreadable body", e))?;

        Ok(body.results)
    }

    /// Fetch details for one game
    pub async fn game_details(&self, id: i64) -> CheckpointResult<CatalogGame> {
        debug!("Catalog details lookup: {}", id);

        let url = format!("{}/{}", self.api_url.trim_end_matches('/'), id);
        let mut request = self.http.get(&url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| catalog_error("Catalog request failed", e))?
            .error_for_status()
            .map_err(|e| catalog_error("Catalog returned an error status", e))?;

        response
            .json()
            .await
            .map_err(|e| catalog_error("Catalog returned an unreadable body", e))
    }
}

fn catalog_error(message: &str, source: reqwest::Error) -> CheckpointError {
    CheckpointError::Catalog {
        message: message.to_string(),
        source: Some(Box::new(source)),
        context: ErrorContext::new("catalog")
            .with_suggestion("Check CATALOG_API_URL and CATALOG_API_KEY"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_game_deserializes_upstream_shape() {
        let body = serde_json::json!({
            "id": 3498,
            "name": "Grand Theft Auto V",
            "background_image": "https://example.com/gta.jpg",
            "released": "2013-09-17",
            "rating": 4.47,
            "playtime": 74
        });

        // Extra upstream fields are ignored; the client keeps only what the
        // review snapshot needs.
        let game: CatalogGame = serde_json::from_value(body).unwrap();
        assert_eq!(game.id, 3498);
        assert_eq!(
            game.background_image.as_deref(),
            Some("https://example.com/gta.jpg")
        );
    }

    #[test]
    fn test_catalog_game_tolerates_missing_optional_fields() {
        let body = serde_json::json!({
            "id": 1,
            "name": "Obscure Gem"
        });

        let game: CatalogGame = serde_json::from_value(body).unwrap();
        assert!(game.background_image.is_none());
        assert!(game.released.is_none());
    }
}
