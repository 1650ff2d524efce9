//! Application state wiring services over the configured storage backend

use crate::{
    auth::{
        database::DatabaseUserStore,
        users::{UserService, UserStore},
    },
    catalog::CatalogClient,
    reviews::{
        service::ReviewService,
        store::{DatabaseReviewStore, ReviewStore},
    },
    storage, ServerConfig, ServerResult,
};
use tracing::{info, warn};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: ServerConfig,
    /// User service for authentication and user management
    pub user_service: UserService,
    /// Review service enforcing the access policy
    pub review_service: ReviewService,
    /// External game catalog client
    pub catalog: CatalogClient,
}

impl AppState {
    /// Create a new application state
    pub async fn new(config: ServerConfig) -> ServerResult<Self> {
        let (user_store, review_store) = match &config.core.storage.database_url {
            Some(database_url) => match Self::database_stores(database_url).await {
                Ok(stores) => {
                    info!("Database stores initialized successfully");
                    stores
                }
                Err(e) => {
                    warn!(
                        "Failed to initialize database stores, falling back to memory: {}",
                        e
                    );
                    (UserStore::memory(), ReviewStore::memory())
                }
            },
            None => (UserStore::memory(), ReviewStore::memory()),
        };

        let user_service = UserService::new(user_store);
        let review_service = ReviewService::new(review_store, user_service.clone());
        let catalog = CatalogClient::new(&config.core.catalog);

        let state = Self {
            config,
            user_service,
            review_service,
            catalog,
        };

        info!("Application state initialized successfully");
        Ok(state)
    }

    async fn database_stores(database_url: &str) -> ServerResult<(UserStore, ReviewStore)> {
        let pool = storage::connect(database_url).await?;

        let user_store = DatabaseUserStore::new(pool.clone())
            .await
            .map_err(|e| crate::ServerError::Database(e.to_string()))?;
        let review_store = DatabaseReviewStore::new(pool)
            .await
            .map_err(|e| crate::ServerError::Database(e.to_string()))?;

        Ok((
            UserStore::database(user_store),
            ReviewStore::database(review_store),
        ))
    }
}
