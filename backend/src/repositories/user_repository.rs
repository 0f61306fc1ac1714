//! Database repository for user management operations.

use crate::database::models::{CreateUser, User};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, username, name, password_hash, email, role, \
     department_name, is_active, created_at, last_login";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database.
    pub async fn create_user(&self, user: CreateUser) -> Result<User> {
        let query = format!(
            "INSERT INTO users (username, name, password_hash, email, role, department_name, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(&user.username)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(&user.email)
            .bind(&user.role)
            .bind(&user.department_name)
            .bind(true)
            .bind(Utc::now())
            .fetch_one(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user by id, regardless of active status.
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user by email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Lists users with pagination and an optional substring search on
    /// username or display name. Returns the page and the unpaginated total.
    pub async fn list_users(
        &self,
        skip: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<(Vec<User>, i64)> {
        let pattern = search.map(|s| format!("%{}%", s));

        let (users, total) = match &pattern {
            Some(pattern) => {
                let query = format!(
                    "SELECT {USER_COLUMNS} FROM users
                     WHERE username LIKE ? OR name LIKE ?
                     ORDER BY id LIMIT ? OFFSET ?"
                );
                let users = sqlx::query_as::<_, User>(&query)
                    .bind(pattern)
                    .bind(pattern)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(self.pool)
                    .await?;

                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM users WHERE username LIKE ? OR name LIKE ?",
                )
                .bind(pattern)
                .bind(pattern)
                .fetch_one(self.pool)
                .await?;

                (users, total)
            }
            None => {
                let query =
                    format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT ? OFFSET ?");
                let users = sqlx::query_as::<_, User>(&query)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(self.pool)
                    .await?;

                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                    .fetch_one(self.pool)
                    .await?;

                (users, total)
            }
        };

        Ok((users, total))
    }

    /// Overwrites the mutable columns of a user row. The caller merges
    /// partial updates into a full set of values first.
    pub async fn update_user(
        &self,
        id: i64,
        username: &str,
        name: &str,
        password_hash: &str,
        email: &str,
        department_name: Option<&str>,
    ) -> Result<User> {
        let query = format!(
            "UPDATE users
             SET username = ?, name = ?, password_hash = ?, email = ?, department_name = ?
             WHERE id = ?
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(name)
            .bind(password_hash)
            .bind(email)
            .bind(department_name)
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(user)
    }

    /// Deletes a user. Returns `false` when no row matched.
    pub async fn delete_user(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Records a successful login.
    pub async fn touch_last_login(&self, id: i64, when: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(when)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}
