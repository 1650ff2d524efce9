//! User management and authentication

use super::{
    database::DatabaseUserStore,
    jwt::{AuthError, TokenResponse, TokenService},
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// User registration request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User registration/login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserInfo,
    #[serde(flatten)]
    pub tokens: TokenResponse,
}

/// Public user information
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Internal user data with password hash
#[derive(Debug, Clone)]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserData {
    /// Create new user with hashed password
    pub fn new(
        username: String,
        email: String,
        password: &str,
        display_name: Option<String>,
    ) -> Result<Self, AuthError> {
        let password_hash = hash_password(password)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            display_name,
            password_hash,
            created_at: chrono::Utc::now(),
        })
    }

    /// Verify password
    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash).unwrap_or(false)
    }

    /// Convert to public user info
    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// User store abstraction supporting both in-memory and database storage
#[derive(Debug, Clone)]
pub enum UserStore {
    /// In-memory storage (for development and testing)
    Memory {
        users: Arc<RwLock<HashMap<String, UserData>>>,
        users_by_email: Arc<RwLock<HashMap<String, String>>>, // email -> user_id
    },
    /// Database storage (for production)
    Database(DatabaseUserStore),
}

impl Default for UserStore {
    fn default() -> Self {
        Self::memory()
    }
}

impl UserStore {
    /// Create in-memory user store
    pub fn memory() -> Self {
        Self::Memory {
            users: Arc::new(RwLock::new(HashMap::new())),
            users_by_email: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create database user store
    pub fn database(database_store: DatabaseUserStore) -> Self {
        Self::Database(database_store)
    }

    /// Register new user
    pub async fn register_user(&self, request: RegisterRequest) -> Result<UserData, AuthError> {
        debug!("Starting user registration for: {}", request.username);

        // Validate input
        if request.username.is_empty() || request.email.is_empty() || request.password.is_empty() {
            debug!("Registration failed: missing credentials");
            return Err(AuthError::MissingCredentials);
        }

        if request.password.len() < 6 {
            debug!("Registration failed: password too short");
            return Err(AuthError::InvalidCredentials);
        }

        match self {
            Self::Memory {
                users,
                users_by_email,
            } => {
                {
                    let users_read = users.read().unwrap();
                    let users_by_email_read = users_by_email.read().unwrap();

                    if users_read.contains_key(&request.username) {
                        debug!(
                            "Registration failed: username '{}' already exists",
                            request.username
                        );
                        return Err(AuthError::InvalidCredentials);
                    }

                    if users_by_email_read.contains_key(&request.email) {
                        debug!(
                            "Registration failed: email '{}' already exists",
                            request.email
                        );
                        return Err(AuthError::InvalidCredentials);
                    }
                }

                let user_data = UserData::new(
                    request.username,
                    request.email,
                    &request.password,
                    request.display_name,
                )?;

                let mut users_write = users.write().unwrap();
                let mut users_by_email_write = users_by_email.write().unwrap();

                users_write.insert(user_data.username.clone(), user_data.clone());
                users_by_email_write.insert(user_data.email.clone(), user_data.id.clone());

                info!("Registered new user: {}", user_data.username);
                Ok(user_data)
            }
            Self::Database(db_store) => {
                let user_data = UserData::new(
                    request.username,
                    request.email,
                    &request.password,
                    request.display_name,
                )?;

                db_store.register_user(user_data).await
            }
        }
    }

    /// Authenticate user
    pub async fn authenticate_user(&self, request: LoginRequest) -> Result<UserData, AuthError> {
        match self {
            Self::Memory { users, .. } => {
                let users = users.read().unwrap();

                let user = users
                    .get(&request.username)
                    .ok_or(AuthError::InvalidCredentials)?;

                if !user.verify_password(&request.password) {
                    warn!("Invalid password for user: {}", request.username);
                    return Err(AuthError::InvalidCredentials);
                }

                debug!("User authenticated: {}", request.username);
                Ok(user.clone())
            }
            Self::Database(db_store) => {
                let user = db_store
                    .get_user_by_username(&request.username)
                    .await?
                    .ok_or(AuthError::InvalidCredentials)?;

                if !user.verify_password(&request.password) {
                    warn!("Invalid password for user: {}", request.username);
                    return Err(AuthError::InvalidCredentials);
                }

                debug!("User authenticated: {}", request.username);
                Ok(user)
            }
        }
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: &str) -> Option<UserData> {
        match self {
            Self::Memory { users, .. } => {
                let users = users.read().unwrap();
                users.values().find(|u| u.id == user_id).cloned()
            }
            Self::Database(db_store) => db_store.get_user_by_id(user_id).await.unwrap_or(None),
        }
    }

    /// Get user by username
    pub async fn get_user_by_username(&self, username: &str) -> Option<UserData> {
        match self {
            Self::Memory { users, .. } => {
                let users = users.read().unwrap();
                users.get(username).cloned()
            }
            Self::Database(db_store) => db_store
                .get_user_by_username(username)
                .await
                .unwrap_or(None),
        }
    }
}

/// User service for authentication operations
#[derive(Debug, Clone)]
pub struct UserService {
    store: UserStore,
}

impl Default for UserService {
    fn default() -> Self {
        Self {
            store: UserStore::default(),
        }
    }
}

impl UserService {
    /// Create new user service with custom store
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: &str) -> Option<UserData> {
        self.store.get_user_by_id(user_id).await
    }

    /// Get user by username
    pub async fn get_user_by_username(&self, username: &str) -> Option<UserData> {
        self.store.get_user_by_username(username).await
    }

    /// Register new user
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let user_data = self.store.register_user(request).await?;

        let token = TokenService::issue(user_data.id.clone(), user_data.username.clone())?;

        Ok(AuthResponse {
            user: user_data.to_user_info(),
            tokens: TokenResponse::new(token),
        })
    }

    /// Login user
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let user_data = self.store.authenticate_user(request).await?;

        let token = TokenService::issue(user_data.id.clone(), user_data.username.clone())?;

        Ok(AuthResponse {
            user: user_data.to_user_info(),
            tokens: TokenResponse::new(token),
        })
    }

    /// Get user store (for testing)
    pub fn store(&self) -> &UserStore {
        &self.store
    }
}

/// Hash password using Argon2
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::TokenCreation)
}

/// Verify password against hash
fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
