//! Route definitions for the CheckPoint web server
//!
//! This module defines all the routes for the backend application.

use crate::{auth, handlers, reviews, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Authentication
        .route("/auth/register", post(auth::handlers::register_user))
        .route("/auth/login", post(auth::handlers::login_user))
        .route("/auth/me", get(auth::handlers::get_current_user))
        .route("/auth/logout", post(auth::handlers::logout_user))
        // Reviews
        .route(
            "/reviews",
            post(reviews::handlers::create_review).get(reviews::handlers::list_feed),
        )
        .route(
            "/reviews/my-reviews",
            get(reviews::handlers::list_my_reviews),
        )
        .route(
            "/reviews/game/{game_id}",
            get(reviews::handlers::list_reviews_for_game),
        )
        .route(
            "/reviews/{id}",
            get(reviews::handlers::get_review)
                .put(reviews::handlers::update_review)
                .delete(reviews::handlers::delete_review),
        )
        // Game catalog lookups
        .route("/games/search", get(handlers::search_games))
        .route("/games/{id}", get(handlers::get_game))
}
