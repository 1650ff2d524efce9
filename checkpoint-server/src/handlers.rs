//! Request handlers for health checks and game catalog lookups

use crate::{auth::User, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Catalog search parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

/// Search the external game catalog
pub async fn search_games(
    State(state): State<AppState>,
    _user: User,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, StatusCode> {
    match state.catalog.search(&params.query).await {
        Ok(games) => Ok(Json(json!({ "results": games }))),
        Err(e) => {
            error!("Catalog search failed: {}", e);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

/// Fetch details for one game from the external catalog
pub async fn get_game(
    State(state): State<AppState>,
    _user: User,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    match state.catalog.game_details(id).await {
        Ok(game) => Ok(Json(json!(game))),
        Err(e) => {
            error!("Catalog details lookup failed: {}", e);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}
