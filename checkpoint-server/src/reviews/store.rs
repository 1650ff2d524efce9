//! Review persistence
//!
//! Writes are whole-document and atomic per review; concurrent updates to
//! the same review are last-write-wins.

use checkpoint_core::{storage_error, CheckpointError, CheckpointResult, ErrorContext, Review};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info};

/// Review store abstraction supporting both in-memory and database storage
#[derive(Debug, Clone)]
pub enum ReviewStore {
    /// In-memory storage (for development and testing)
    Memory {
        reviews: Arc<RwLock<HashMap<String, Review>>>,
    },
    /// Database storage (for production)
    Database(DatabaseReviewStore),
}

impl Default for ReviewStore {
    fn default() -> Self {
        Self::memory()
    }
}

impl ReviewStore {
    /// Create in-memory review store
    pub fn memory() -> Self {
        Self::Memory {
            reviews: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create database review store
    pub fn database(database_store: DatabaseReviewStore) -> Self {
        Self::Database(database_store)
    }

    /// Insert a newly created review
    pub async fn insert(&self, review: &Review) -> CheckpointResult<()> {
        match self {
            Self::Memory { reviews } => {
                let mut reviews = reviews.write().unwrap();
                reviews.insert(review.id.clone(), review.clone());
                Ok(())
            }
            Self::Database(db_store) => db_store.insert(review).await,
        }
    }

    /// Fetch one review by id
    pub async fn get(&self, id: &str) -> CheckpointResult<Option<Review>> {
        match self {
            Self::Memory { reviews } => {
                let reviews = reviews.read().unwrap();
                Ok(reviews.get(id).cloned())
            }
            Self::Database(db_store) => db_store.get(id).await,
        }
    }

    /// Replace a stored review with the given document (last-write-wins)
    pub async fn put(&self, review: &Review) -> CheckpointResult<()> {
        match self {
            Self::Memory { reviews } => {
                let mut reviews = reviews.write().unwrap();
                reviews.insert(review.id.clone(), review.clone());
                Ok(())
            }
            Self::Database(db_store) => db_store.put(review).await,
        }
    }

    /// Remove a review permanently
    pub async fn delete(&self, id: &str) -> CheckpointResult<()> {
        match self {
            Self::Memory { reviews } => {
                let mut reviews = reviews.write().unwrap();
                reviews.remove(id);
                Ok(())
            }
            Self::Database(db_store) => db_store.delete(id).await,
        }
    }

    /// All reviews, newest first
    pub async fn list_all(&self) -> CheckpointResult<Vec<Review>> {
        match self {
            Self::Memory { reviews } => {
                let reviews = reviews.read().unwrap();
                Ok(sorted_newest_first(reviews.values().cloned().collect()))
            }
            Self::Database(db_store) => db_store.list_all().await,
        }
    }

    /// Reviews created by one identity, newest first
    pub async fn list_by_owner(&self, owner_id: &str) -> CheckpointResult<Vec<Review>> {
        match self {
            Self::Memory { reviews } => {
                let reviews = reviews.read().unwrap();
                Ok(sorted_newest_first(
                    reviews
                        .values()
                        .filter(|r| r.owner == owner_id)
                        .cloned()
                        .collect(),
                ))
            }
            Self::Database(db_store) => db_store.list_by_owner(owner_id).await,
        }
    }

    /// Reviews for one game, newest first
    pub async fn list_by_game(&self, game_id: i64) -> CheckpointResult<Vec<Review>> {
        match self {
            Self::Memory { reviews } => {
                let reviews = reviews.read().unwrap();
                Ok(sorted_newest_first(
                    reviews
                        .values()
                        .filter(|r| r.game_id == game_id)
                        .cloned()
                        .collect(),
                ))
            }
            Self::Database(db_store) => db_store.list_by_game(game_id).await,
        }
    }
}

fn sorted_newest_first(mut reviews: Vec<Review>) -> Vec<Review> {
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    reviews
}

/// Database-backed review store
#[derive(Debug, Clone)]
pub struct DatabaseReviewStore {
    pool: SqlitePool,
}

impl DatabaseReviewStore {
    /// Create new database review store
    pub async fn new(pool: SqlitePool) -> CheckpointResult<Self> {
        let store = Self { pool };

        store.create_tables().await?;

        Ok(store)
    }

    /// Create database tables
    async fn create_tables(&self) -> CheckpointResult<()> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS reviews (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                game_id INTEGER NOT NULL,
                game_name TEXT NOT NULL,
                game_image TEXT,
                rating INTEGER NOT NULL,
                opinion TEXT NOT NULL,
                platform_played TEXT NOT NULL,
                recommended BOOLEAN NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_reviews_owner ON reviews(owner_id);
            CREATE INDEX IF NOT EXISTS idx_reviews_game ON reviews(game_id);
        "#;

        sqlx::query(query).execute(&self.pool).await.map_err(|e| {
            error!("Failed to create reviews table: {}", e);
            storage_error!("Failed to create reviews table", "reviews", e)
        })?;

        info!("Reviews table created successfully");
        Ok(())
    }

    async fn insert(&self, review: &Review) -> CheckpointResult<()> {
        let query = r#"
            INSERT INTO reviews (id, owner_id, game_id, game_name, game_image, rating, opinion, platform_played, recommended, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&review.id)
            .bind(&review.owner)
            .bind(review.game_id)
            .bind(&review.game_name)
            .bind(&review.game_image)
            .bind(review.rating as i64)
            .bind(&review.opinion)
            .bind(&review.platform_played)
            .bind(review.recommended)
            .bind(review.created_at.to_rfc3339())
            .bind(review.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to insert review: {}", e);
                storage_error!("Failed to insert review", "reviews", e)
            })?;

        debug!("Review inserted successfully: {}", review.id);
        Ok(())
    }

    async fn get(&self, id: &str) -> CheckpointResult<Option<Review>> {
        let row = sqlx::query("SELECT * FROM reviews WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to query review by id: {}", e);
                storage_error!("Failed to query review", "reviews", e)
            })?;

        match row {
            Some(row) => Ok(Some(row_to_review(&row)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, review: &Review) -> CheckpointResult<()> {
        let query = r#"
            INSERT OR REPLACE INTO reviews (id, owner_id, game_id, game_name, game_image, rating, opinion, platform_played, recommended, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&review.id)
            .bind(&review.owner)
            .bind(review.game_id)
            .bind(&review.game_name)
            .bind(&review.game_image)
            .bind(review.rating as i64)
            .bind(&review.opinion)
            .bind(&review.platform_played)
            .bind(review.recommended)
            .bind(review.created_at.to_rfc3339())
            .bind(review.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to save review: {}", e);
                storage_error!("Failed to save review", "reviews", e)
            })?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> CheckpointResult<()> {
        sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete review: {}", e);
                storage_error!("Failed to delete review", "reviews", e)
            })?;

        Ok(())
    }

    async fn list_all(&self) -> CheckpointResult<Vec<Review>> {
        let rows = sqlx::query("SELECT * FROM reviews ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to list reviews: {}", e);
                storage_error!("Failed to list reviews", "reviews", e)
            })?;

        rows.iter().map(row_to_review).collect()
    }

    async fn list_by_owner(&self, owner_id: &str) -> CheckpointResult<Vec<Review>> {
        let rows =
            sqlx::query("SELECT * FROM reviews WHERE owner_id = ? ORDER BY created_at DESC")
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    error!("Failed to list reviews by owner: {}", e);
                    storage_error!("Failed to list reviews", "reviews", e)
                })?;

        rows.iter().map(row_to_review).collect()
    }

    async fn list_by_game(&self, game_id: i64) -> CheckpointResult<Vec<Review>> {
        let rows = sqlx::query("SELECT * FROM reviews WHERE game_id = ? ORDER BY created_at DESC")
            .bind(game_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to list reviews by game: {}", e);
                storage_error!("Failed to list reviews", "reviews", e)
            })?;

        rows.iter().map(row_to_review).collect()
    }
}

fn row_to_review(row: &sqlx::sqlite::SqliteRow) -> CheckpointResult<Review> {
    let created_at: DateTime<Utc> = row
        .get::<String, _>("created_at")
        .parse()
        .map_err(|_| storage_error!("Invalid created_at timestamp", "reviews"))?;
    let updated_at: DateTime<Utc> = row
        .get::<String, _>("updated_at")
        .parse()
        .map_err(|_| storage_error!("Invalid updated_at timestamp", "reviews"))?;

    Ok(Review {
        id: row.get("id"),
        owner: row.get("owner_id"),
        game_id: row.get("game_id"),
        game_name: row.get("game_name"),
        game_image: row.get("game_image"),
        rating: row.get::<i64, _>("rating") as u8,
        opinion: row.get("opinion"),
        platform_played: row.get("platform_played"),
        recommended: row.get("recommended"),
        created_at,
        updated_at,
    })
}
