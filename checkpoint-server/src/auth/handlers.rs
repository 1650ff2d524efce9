//! Authentication handlers for user registration, login, and session info

use super::{
    jwt::AuthError,
    users::{AuthResponse, LoginRequest, RegisterRequest},
    User,
};
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Json, Json as JsonExtractor};
use serde_json::{json, Value};
use tracing::info;

/// User registration endpoint
///
/// Register a new user account with username, email, and password.
/// Returns user information and a session token on success.
pub async fn register_user(
    State(app_state): State<AppState>,
    JsonExtractor(request): JsonExtractor<RegisterRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    info!("User registration attempt: {}", request.username);

    let response = app_state.user_service.register(request).await?;

    info!("User registered successfully: {}", response.user.username);
    Ok(Json(response))
}

/// User login endpoint
///
/// Authenticate user with username and password.
/// Returns user information and a session token on success.
pub async fn login_user(
    State(app_state): State<AppState>,
    JsonExtractor(request): JsonExtractor<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    info!("User login attempt: {}", request.username);

    let response = app_state.user_service.login(request).await?;

    info!("User logged in successfully: {}", response.user.username);
    Ok(Json(response))
}

/// Get current user information
///
/// Returns the identity resolved from the presented session token.
pub async fn get_current_user(user: User) -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "id": user.id,
        "username": user.username,
    })))
}

/// Logout endpoint (client-side token invalidation)
///
/// Tokens are stateless and cannot be revoked server-side; clients discard
/// their token after calling this endpoint.
pub async fn logout_user(user: User) -> Result<Json<Value>, StatusCode> {
    info!("User logout: {}", user.id);

    Ok(Json(json!({
        "message": "Logged out successfully",
        "userId": user.id
    })))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt;

    async fn create_test_app() -> Router {
        use super::*;
        use crate::ServerConfig;

        let app_state = crate::AppState::new(ServerConfig::default()).await.unwrap();

        Router::new()
            .route("/auth/register", axum::routing::post(register_user))
            .route("/auth/login", axum::routing::post(login_user))
            .route("/auth/me", axum::routing::get(get_current_user))
            .route("/auth/logout", axum::routing::post(logout_user))
            .with_state(app_state)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_user_registration() {
        let app = create_test_app().await;

        let request_body = json!({
            "username": "testuser",
            "email": "test@example.com",
            "password": "password123",
            "displayName": "Test User"
        });

        let response = app
            .oneshot(post_json("/auth/register", request_body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_user_login() {
        let app = create_test_app().await;

        let register_body = json!({
            "username": "logintest",
            "email": "login@example.com",
            "password": "password123"
        });

        let _register_response = app
            .clone()
            .oneshot(post_json("/auth/register", register_body))
            .await
            .unwrap();

        let login_body = json!({
            "username": "logintest",
            "password": "password123"
        });

        let response = app
            .oneshot(post_json("/auth/login", login_body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_login() {
        let app = create_test_app().await;

        let login_body = json!({
            "username": "nonexistent",
            "password": "wrongpassword"
        });

        let response = app
            .oneshot(post_json("/auth/login", login_body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_requires_credential() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_returns_token_identity() {
        let app = create_test_app().await;

        let register_body = json!({
            "username": "whoami",
            "email": "whoami@example.com",
            "password": "password123"
        });

        let response = app
            .clone()
            .oneshot(post_json("/auth/register", register_body))
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let token = body["token"].as_str().unwrap().to_string();
        let user_id = body["user"]["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["id"], user_id.as_str());
        assert_eq!(body["username"], "whoami");
    }
}
