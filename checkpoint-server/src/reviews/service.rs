//! Review access policy
//!
//! Decides, per operation, whether the acting identity may proceed and
//! computes the resulting document mutation. Ownership is recomputed against
//! the stored document on every mutating request; it is never taken from the
//! client and never cached.

use super::{store::ReviewStore, CreateReviewRequest, UpdateReviewRequest};
use crate::auth::{users::UserService, User};
use checkpoint_core::{
    forbidden_error, not_found_error, validation_error, CheckpointError, CheckpointResult,
    ErrorContext, Review, ReviewWithAuthor,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

/// Service enforcing the review operation rules
#[derive(Clone)]
pub struct ReviewService {
    store: ReviewStore,
    users: UserService,
}

impl ReviewService {
    pub fn new(store: ReviewStore, users: UserService) -> Self {
        Self { store, users }
    }

    /// Create a review owned by the acting identity
    ///
    /// The owner is always the verified identity of the request; payloads
    /// carry no owner field.
    pub async fn create(
        &self,
        actor: &User,
        request: CreateReviewRequest,
    ) -> CheckpointResult<Review> {
        validate_rating(request.rating)?;

        if request.game_name.trim().is_empty() {
            return Err(validation_error!(
                "Game name is required",
                "gameName",
                "reviews"
            ));
        }

        if request.opinion.trim().is_empty() {
            return Err(validation_error!(
                "Opinion is required",
                "opinion",
                "reviews"
            ));
        }

        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4().to_string(),
            owner: actor.id.clone(),
            game_id: request.game_id,
            game_name: request.game_name,
            game_image: request.game_image,
            rating: request.rating,
            opinion: request.opinion,
            platform_played: request.platform_played,
            recommended: request.recommended,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&review).await?;

        info!(review_id = %review.id, owner = %review.owner, "Review created");
        Ok(review)
    }

    /// All reviews with owner names joined in, newest first
    pub async fn list_feed(&self) -> CheckpointResult<Vec<ReviewWithAuthor>> {
        let reviews = self.store.list_all().await?;
        self.join_authors(reviews).await
    }

    /// The acting identity's own reviews
    pub async fn list_own(&self, actor: &User) -> CheckpointResult<Vec<ReviewWithAuthor>> {
        let reviews = self.store.list_by_owner(&actor.id).await?;
        self.join_authors(reviews).await
    }

    /// Reviews for one game
    pub async fn list_by_game(&self, game_id: i64) -> CheckpointResult<Vec<ReviewWithAuthor>> {
        let reviews = self.store.list_by_game(game_id).await?;
        self.join_authors(reviews).await
    }

    /// One review by id
    pub async fn get(&self, id: &str) -> CheckpointResult<Review> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| not_found_error!(format!("review {}", id), "reviews"))
    }

    /// Mutate a review's editable fields; only the owner may do this
    pub async fn update(
        &self,
        actor: &User,
        id: &str,
        changes: UpdateReviewRequest,
    ) -> CheckpointResult<Review> {
        if let Some(rating) = changes.rating {
            validate_rating(rating)?;
        }

        let mut review = self.get(id).await?;

        if review.owner != actor.id {
            warn!(review_id = %id, actor = %actor.id, "Rejected update by non-owner");
            return Err(forbidden_error!("Not authorized", "reviews"));
        }

        // Only {rating, opinion, platform, recommended} are mutable;
        // owner, game reference, and id never change.
        if let Some(rating) = changes.rating {
            review.rating = rating;
        }
        if let Some(opinion) = changes.opinion {
            review.opinion = opinion;
        }
        if let Some(platform_played) = changes.platform_played {
            review.platform_played = platform_played;
        }
        if let Some(recommended) = changes.recommended {
            review.recommended = recommended;
        }
        review.updated_at = Utc::now();

        self.store.put(&review).await?;

        info!(review_id = %id, owner = %review.owner, "Review updated");
        Ok(review)
    }

    /// Remove a review permanently; only the owner may do this
    pub async fn delete(&self, actor: &User, id: &str) -> CheckpointResult<()> {
        let review = self.get(id).await?;

        if review.owner != actor.id {
            warn!(review_id = %id, actor = %actor.id, "Rejected delete by non-owner");
            return Err(forbidden_error!("Not authorized", "reviews"));
        }

        self.store.delete(id).await?;

        info!(review_id = %id, owner = %review.owner, "Review deleted");
        Ok(())
    }

    async fn join_authors(&self, reviews: Vec<Review>) -> CheckpointResult<Vec<ReviewWithAuthor>> {
        let mut joined = Vec::with_capacity(reviews.len());
        for review in reviews {
            let owner_name = self
                .users
                .get_user_by_id(&review.owner)
                .await
                .map(|u| u.username)
                .unwrap_or_else(|| "unknown".to_string());
            joined.push(ReviewWithAuthor { review, owner_name });
        }
        Ok(joined)
    }
}

fn validate_rating(rating: u8) -> CheckpointResult<()> {
    if !Review::rating_in_range(rating) {
        return Err(validation_error!(
            "Rating must be between 1 and 10",
            "rating",
            "reviews"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::users::{RegisterRequest, UserService, UserStore};

    async fn registered_user(users: &UserService, username: &str) -> User {
        let response = users
            .register(RegisterRequest {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: "password123".to_string(),
                display_name: None,
            })
            .await
            .unwrap();
        User::new(response.user.id, response.user.username)
    }

    async fn test_service() -> (ReviewService, UserService) {
        let users = UserService::new(UserStore::memory());
        let service = ReviewService::new(ReviewStore::memory(), users.clone());
        (service, users)
    }

    fn create_request(game_id: i64, rating: u8) -> CreateReviewRequest {
        CreateReviewRequest {
            game_id,
            game_name: "Outer Wilds".to_string(),
            game_image: None,
            rating,
            opinion: "Great".to_string(),
            platform_played: "PC".to_string(),
            recommended: true,
        }
    }

    #[tokio::test]
    async fn test_create_sets_owner_from_acting_identity() {
        let (service, users) = test_service().await;
        let actor = registered_user(&users, "ana").await;

        let review = service.create(&actor, create_request(42, 8)).await.unwrap();

        assert_eq!(review.owner, actor.id);
        assert_eq!(review.rating, 8);
        assert_eq!(review.created_at, review.updated_at);
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_rating() {
        let (service, users) = test_service().await;
        let actor = registered_user(&users, "ana").await;

        let result = service.create(&actor, create_request(42, 0)).await;
        assert!(matches!(result, Err(CheckpointError::Validation { .. })));

        let result = service.create(&actor, create_request(42, 11)).await;
        assert!(matches!(result, Err(CheckpointError::Validation { .. })));

        assert!(service.list_feed().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_owner_cannot_update() {
        let (service, users) = test_service().await;
        let owner = registered_user(&users, "ana").await;
        let other = registered_user(&users, "bob").await;

        let review = service.create(&owner, create_request(42, 8)).await.unwrap();

        let result = service
            .update(
                &other,
                &review.id,
                UpdateReviewRequest {
                    rating: Some(1),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(CheckpointError::Forbidden { .. })));

        // The stored review is unchanged
        let stored = service.get(&review.id).await.unwrap();
        assert_eq!(stored.rating, 8);
        assert_eq!(stored.owner, owner.id);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_delete() {
        let (service, users) = test_service().await;
        let owner = registered_user(&users, "ana").await;
        let other = registered_user(&users, "bob").await;

        let review = service.create(&owner, create_request(42, 8)).await.unwrap();

        let result = service.delete(&other, &review.id).await;
        assert!(matches!(result, Err(CheckpointError::Forbidden { .. })));

        assert!(service.get(&review.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_owner_update_mutates_only_provided_fields() {
        let (service, users) = test_service().await;
        let owner = registered_user(&users, "ana").await;

        let review = service.create(&owner, create_request(42, 8)).await.unwrap();

        let updated = service
            .update(
                &owner,
                &review.id,
                UpdateReviewRequest {
                    rating: Some(9),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.rating, 9);
        assert_eq!(updated.opinion, "Great");
        assert_eq!(updated.platform_played, "PC");
        assert_eq!(updated.owner, owner.id);
        assert_eq!(updated.game_id, 42);
    }

    #[tokio::test]
    async fn test_owner_delete_then_read_is_not_found() {
        let (service, users) = test_service().await;
        let owner = registered_user(&users, "ana").await;

        let review = service.create(&owner, create_request(42, 8)).await.unwrap();

        service.delete(&owner, &review.id).await.unwrap();

        let result = service.get(&review.id).await;
        assert!(matches!(result, Err(CheckpointError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_unknown_review_is_not_found() {
        let (service, users) = test_service().await;
        let actor = registered_user(&users, "ana").await;

        let result = service
            .update(&actor, "missing-id", UpdateReviewRequest::default())
            .await;

        assert!(matches!(result, Err(CheckpointError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_feed_joins_owner_names() {
        let (service, users) = test_service().await;
        let ana = registered_user(&users, "ana").await;
        let bob = registered_user(&users, "bob").await;

        service.create(&ana, create_request(42, 8)).await.unwrap();
        service.create(&bob, create_request(7, 5)).await.unwrap();

        let feed = service.list_feed().await.unwrap();
        assert_eq!(feed.len(), 2);
        let mut names: Vec<_> = feed.iter().map(|r| r.owner_name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["ana".to_string(), "bob".to_string()]);
    }

    #[tokio::test]
    async fn test_list_own_and_by_game_filter() {
        let (service, users) = test_service().await;
        let ana = registered_user(&users, "ana").await;
        let bob = registered_user(&users, "bob").await;

        service.create(&ana, create_request(42, 8)).await.unwrap();
        service.create(&ana, create_request(7, 6)).await.unwrap();
        service.create(&bob, create_request(42, 4)).await.unwrap();

        let own = service.list_own(&ana).await.unwrap();
        assert_eq!(own.len(), 2);
        assert!(own.iter().all(|r| r.review.owner == ana.id));

        let by_game = service.list_by_game(42).await.unwrap();
        assert_eq!(by_game.len(), 2);
        assert!(by_game.iter().all(|r| r.review.game_id == 42));
    }
}
