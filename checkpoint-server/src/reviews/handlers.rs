//! Review endpoints
//!
//! Every handler resolves the acting identity through the `User` extractor
//! first; a request with no acceptable credential never reaches the policy.

use super::{ApiError, CreateReviewRequest, UpdateReviewRequest};
use crate::{auth::User, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use checkpoint_core::{Review, ReviewWithAuthor};
use serde_json::{json, Value};

/// Create a review owned by the acting identity
pub async fn create_review(
    State(state): State<AppState>,
    user: User,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let review = state.review_service.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Feed of all reviews, owner names joined in
pub async fn list_feed(
    State(state): State<AppState>,
    _user: User,
) -> Result<Json<Vec<ReviewWithAuthor>>, ApiError> {
    let reviews = state.review_service.list_feed().await?;
    Ok(Json(reviews))
}

/// The acting identity's own reviews
pub async fn list_my_reviews(
    State(state): State<AppState>,
    user: User,
) -> Result<Json<Vec<ReviewWithAuthor>>, ApiError> {
    let reviews = state.review_service.list_own(&user).await?;
    Ok(Json(reviews))
}

/// Reviews for one game
pub async fn list_reviews_for_game(
    State(state): State<AppState>,
    _user: User,
    Path(game_id): Path<i64>,
) -> Result<Json<Vec<ReviewWithAuthor>>, ApiError> {
    let reviews = state.review_service.list_by_game(game_id).await?;
    Ok(Json(reviews))
}

/// One review by id
pub async fn get_review(
    State(state): State<AppState>,
    _user: User,
    Path(id): Path<String>,
) -> Result<Json<Review>, ApiError> {
    let review = state.review_service.get(&id).await?;
    Ok(Json(review))
}

/// Edit a review; only the owner may do this
pub async fn update_review(
    State(state): State<AppState>,
    user: User,
    Path(id): Path<String>,
    Json(request): Json<UpdateReviewRequest>,
) -> Result<Json<Review>, ApiError> {
    let review = state.review_service.update(&user, &id, request).await?;
    Ok(Json(review))
}

/// Delete a review; only the owner may do this
pub async fn delete_review(
    State(state): State<AppState>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.review_service.delete(&user, &id).await?;
    Ok(Json(json!({ "message": "Review removed" })))
}

#[cfg(test)]
mod tests {
    use crate::{create_app, AppState, ServerConfig};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt;

    async fn create_test_app() -> Router {
        let state = AppState::new(ServerConfig::default()).await.unwrap();
        create_app(state)
    }

    async fn register(app: &Router, username: &str) -> String {
        let body = json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123"
        });

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/register")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    fn authed_post(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", token))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_requires_credential() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/reviews")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "gameId": 42,
                            "gameName": "Outer Wilds",
                            "rating": 8,
                            "opinion": "Great",
                            "platformPlayed": "PC",
                            "recommended": true
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_review_returns_created() {
        let app = create_test_app().await;
        let token = register(&app, "creator").await;

        let response = app
            .oneshot(authed_post(
                "/api/reviews",
                &token,
                json!({
                    "gameId": 42,
                    "gameName": "Outer Wilds",
                    "rating": 8,
                    "opinion": "Great",
                    "platformPlayed": "PC",
                    "recommended": true
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_create_review_rejects_out_of_range_rating() {
        let app = create_test_app().await;
        let token = register(&app, "rater").await;

        let response = app
            .oneshot(authed_post(
                "/api/reviews",
                &token,
                json!({
                    "gameId": 42,
                    "gameName": "Outer Wilds",
                    "rating": 11,
                    "opinion": "Great",
                    "platformPlayed": "PC",
                    "recommended": true
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_review_rejects_owner_field_in_payload() {
        let app = create_test_app().await;
        let token = register(&app, "smuggler").await;

        // Unknown fields are rejected before the policy runs, so a payload
        // can never influence the stored owner.
        let response = app
            .clone()
            .oneshot(authed_post(
                "/api/reviews",
                &token,
                json!({
                    "gameId": 42,
                    "gameName": "Outer Wilds",
                    "rating": 8,
                    "opinion": "Great",
                    "platformPlayed": "PC",
                    "recommended": true,
                    "owner": "someone-else"
                }),
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());

        // Nothing was written
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/reviews")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let feed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(feed.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_get_unknown_review_is_not_found() {
        let app = create_test_app().await;
        let token = register(&app, "reader").await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/reviews/no-such-id")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_feed_includes_owner_name() {
        let app = create_test_app().await;
        let token = register(&app, "feeder").await;

        let response = app
            .clone()
            .oneshot(authed_post(
                "/api/reviews",
                &token,
                json!({
                    "gameId": 42,
                    "gameName": "Outer Wilds",
                    "rating": 8,
                    "opinion": "Great",
                    "platformPlayed": "PC",
                    "recommended": true
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/reviews")
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
        let feed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(feed[0]["ownerName"], "feeder");
        assert_eq!(feed[0]["gameId"], 42);
    }
}
