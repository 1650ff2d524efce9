//! Review resource: store, access policy, and HTTP surface
//!
//! Request bodies are typed per operation and reject unknown fields, so a
//! payload can never smuggle an owner or game reference into a mutation.

pub mod handlers;
pub mod service;
pub mod store;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use checkpoint_core::CheckpointError;
use serde::Deserialize;
use serde_json::json;

/// Payload for creating a review
///
/// Game display fields are snapshotted onto the review at creation time and
/// never synced with the catalog afterwards.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateReviewRequest {
    pub game_id: i64,
    pub game_name: String,
    #[serde(default)]
    pub game_image: Option<String>,
    pub rating: u8,
    pub opinion: String,
    pub platform_played: String,
    pub recommended: bool,
}

/// Payload for editing a review; only the provided fields change
///
/// Owner, game reference, and id are immutable and have no corresponding
/// fields here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateReviewRequest {
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub opinion: Option<String>,
    #[serde(default)]
    pub platform_played: Option<String>,
    #[serde(default)]
    pub recommended: Option<bool>,
}

/// HTTP mapping for policy and storage errors
pub struct ApiError(pub CheckpointError);

impl From<CheckpointError> for ApiError {
    fn from(err: CheckpointError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self.0 {
            CheckpointError::Validation { message, .. } => {
                (StatusCode::BAD_REQUEST, "validation_error", message.clone())
            }
            CheckpointError::Forbidden { .. } => (
                StatusCode::UNAUTHORIZED,
                "forbidden",
                "Not authorized".to_string(),
            ),
            CheckpointError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                "not_found",
                "Review not found".to_string(),
            ),
            _ => {
                // Storage and internal failures surface as a generic server
                // error without leaking internals.
                self.0.log();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "server_error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_code,
            "message": message,
        }));

        (status, body).into_response()
    }
}
