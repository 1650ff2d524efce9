//! Database-backed user storage implementation

use super::{jwt::AuthError, users::UserData};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::{debug, error, info};

/// Database user record
#[derive(Debug, sqlx::FromRow)]
struct UserRecord {
    id: String,
    username: String,
    email: String,
    display_name: Option<String>,
    password_hash: String,
    created_at: String, // ISO 8601 string
}

impl UserRecord {
    /// Convert to UserData
    fn to_user_data(&self) -> Result<UserData, AuthError> {
        let created_at: DateTime<Utc> = self
            .created_at
            .parse()
            .map_err(|_| AuthError::StorageFailure)?;

        Ok(UserData {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            password_hash: self.password_hash.clone(),
            created_at,
        })
    }

    /// Create from UserData
    fn from_user_data(user: &UserData) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            password_hash: user.password_hash.clone(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Database-backed user store
#[derive(Debug, Clone)]
pub struct DatabaseUserStore {
    pool: SqlitePool,
}

impl DatabaseUserStore {
    /// Create new database user store
    pub async fn new(pool: SqlitePool) -> Result<Self, AuthError> {
        let store = Self { pool };

        store.create_tables().await?;

        Ok(store)
    }

    /// Create database tables
    async fn create_tables(&self) -> Result<(), AuthError> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                display_name TEXT,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
        "#;

        sqlx::query(query).execute(&self.pool).await.map_err(|e| {
            error!("Failed to create users table: {}", e);
            AuthError::StorageFailure
        })?;

        info!("Users table created successfully");
        Ok(())
    }

    /// Insert user into database
    async fn insert_user(&self, user: &UserData) -> Result<(), AuthError> {
        let record = UserRecord::from_user_data(user);

        let query = r#"
            INSERT INTO users (id, username, email, display_name, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&record.id)
            .bind(&record.username)
            .bind(&record.email)
            .bind(&record.display_name)
            .bind(&record.password_hash)
            .bind(&record.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to insert user: {}", e);
                AuthError::InvalidCredentials
            })?;

        debug!("User inserted successfully: {}", user.username);
        Ok(())
    }

    /// Get user by username
    pub async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserData>, AuthError> {
        let query = "SELECT * FROM users WHERE username = ?";
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to query user by username: {}", e);
                AuthError::StorageFailure
            })?;

        if let Some(row) = row {
            let record = UserRecord {
                id: row.get("id"),
                username: row.get("username"),
                email: row.get("email"),
                display_name: row.get("display_name"),
                password_hash: row.get("password_hash"),
                created_at: row.get("created_at"),
            };

            Ok(Some(record.to_user_data()?))
        } else {
            Ok(None)
        }
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserData>, AuthError> {
        let query = "SELECT * FROM users WHERE id = ?";
        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to query user by ID: {}", e);
                AuthError::StorageFailure
            })?;

        if let Some(row) = row {
            let record = UserRecord {
                id: row.get("id"),
                username: row.get("username"),
                email: row.get("email"),
                display_name: row.get("display_name"),
                password_hash: row.get("password_hash"),
                created_at: row.get("created_at"),
            };

            Ok(Some(record.to_user_data()?))
        } else {
            Ok(None)
        }
    }

    /// Check if username exists
    pub async fn username_exists(&self, username: &str) -> Result<bool, AuthError> {
        let query = "SELECT COUNT(*) as count FROM users WHERE username = ?";
        let row = sqlx::query(query)
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to check username existence: {}", e);
                AuthError::StorageFailure
            })?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    /// Check if email exists
    pub async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let query = "SELECT COUNT(*) as count FROM users WHERE email = ?";
        let row = sqlx::query(query)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to check email existence: {}", e);
                AuthError::StorageFailure
            })?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    /// Register new user
    pub async fn register_user(&self, user: UserData) -> Result<UserData, AuthError> {
        // Check if username or email already exists
        if self.username_exists(&user.username).await? {
            return Err(AuthError::InvalidCredentials);
        }

        if self.email_exists(&user.email).await? {
            return Err(AuthError::InvalidCredentials);
        }

        self.insert_user(&user).await?;
        Ok(user)
    }
}
