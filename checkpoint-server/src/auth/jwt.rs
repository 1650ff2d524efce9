//! JWT session token implementation based on Axum official examples

use super::User;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// JWT signing keys - initialized from environment variable
static KEYS: LazyLock<Keys> = LazyLock::new(|| {
    let secret = std::env::var("CHECKPOINT_JWT_SECRET")
        .unwrap_or_else(|_| "checkpoint-default-secret-change-in-production".to_string());
    Keys::new(secret.as_bytes())
});

/// Session token lifetime - read once at startup
static TOKEN_TTL: LazyLock<Duration> = LazyLock::new(|| {
    let hours = std::env::var("CHECKPOINT_TOKEN_TTL_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(24);
    Duration::hours(hours)
});

/// JWT signing and verification keys
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Username at issue time
    pub username: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a new session token
    pub fn new(user_id: String, username: String) -> Self {
        let now = Utc::now();
        let exp = now + *TOKEN_TTL;

        Self {
            sub: user_id,
            username,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Convert claims to the acting identity
    pub fn to_user(&self) -> User {
        User::new(self.sub.clone(), self.username.clone())
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Token envelope returned at registration and login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn new(token: String) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in: TOKEN_TTL.num_seconds(),
        }
    }
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing credentials")]
    MissingCredentials,
    #[error("Token creation failed")]
    TokenCreation,
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("Malformed token")]
    MalformedToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token signature")]
    InvalidSignature,
    #[error("Storage failure")]
    StorageFailure,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Every guard failure renders the same response: callers cannot
        // distinguish a missing header from an expired or tampered token.
        let (status, error_code, message) = match self {
            AuthError::MissingAuthHeader
            | AuthError::MalformedToken
            | AuthError::TokenExpired
            | AuthError::InvalidSignature => {
                (StatusCode::UNAUTHORIZED, "unauthorized", "Not authorized")
            }
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid username or password",
            ),
            AuthError::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                "missing_credentials",
                "Username, email and password are required",
            ),
            AuthError::TokenCreation => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_creation_failed",
                "Failed to create authentication token",
            ),
            AuthError::StorageFailure => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                "Internal server error",
            ),
        };

        let body = Json(json!({
            "error": error_code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Session token utilities
pub struct TokenService;

impl TokenService {
    /// Issue a signed session token for an identity
    pub fn issue(user_id: String, username: String) -> Result<String, AuthError> {
        let claims = Claims::new(user_id, username);
        Self::sign(&claims)
    }

    pub(crate) fn sign(claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &KEYS.encoding).map_err(|e| {
            warn!("Failed to encode session token: {}", e);
            AuthError::TokenCreation
        })
    }

    /// Verify and decode a session token
    ///
    /// Purely computational; no store is consulted, which is also why no
    /// revocation exists in this design.
    pub fn verify(token: &str) -> Result<Claims, AuthError> {
        match decode::<Claims>(token, &KEYS.decoding, &Validation::default()) {
            Ok(data) => Ok(data.claims),
            Err(e) => {
                debug!("Token verification failed: {}", e);
                Err(match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                    _ => AuthError::MalformedToken,
                })
            }
        }
    }
}

/// FromRequestParts implementation for Claims (JWT extraction)
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Extract the token from the authorization header
        let auth_header = parts
            .headers
            .get("authorization")
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::MissingAuthHeader)?;

        // The credential must be scheme word, space, token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingAuthHeader)?;

        TokenService::verify(token)
    }
}
