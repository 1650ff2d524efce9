//! Authentication and authorization using Axum best practices
//!
//! Every protected endpoint resolves its acting identity through the [`User`]
//! extractor. Extraction verifies the bearer token and nothing else; a
//! request that fails here is rejected before any handler or store is
//! touched.

pub mod database;
pub mod handlers;
pub mod jwt;
pub mod users;


use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use jwt::AuthError;

/// Acting identity resolved from a verified session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: String,
    /// Username embedded in the token at issue time
    pub username: String,
}

impl User {
    pub fn new(id: String, username: String) -> Self {
        Self { id, username }
    }
}

/// Implement FromRequestParts for User (authenticated requests only)
///
/// Verification is purely computational: the token signature and expiry are
/// checked, the claims become the identity, and no store is consulted.
impl<S> FromRequestParts<S> for User
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = jwt::Claims::from_request_parts(parts, state).await?;
        Ok(claims.to_user())
    }
}
