//! Database repository for consulting manager operations.

use crate::database::models::{ConsultingManager, CreateConsultingManager};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

const MANAGER_COLUMNS: &str = "id, name, email, department_name, created_at";

/// Repository for consulting manager database operations.
pub struct ManagerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ManagerRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_manager(
        &self,
        manager: CreateConsultingManager,
    ) -> Result<ConsultingManager> {
        let query = format!(
            "INSERT INTO consulting_managers (name, email, department_name, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING {MANAGER_COLUMNS}"
        );

        let manager = sqlx::query_as::<_, ConsultingManager>(&query)
            .bind(&manager.name)
            .bind(&manager.email)
            .bind(&manager.department_name)
            .bind(Utc::now())
            .fetch_one(self.pool)
            .await?;

        Ok(manager)
    }

    pub async fn get_manager_by_id(&self, id: i64) -> Result<Option<ConsultingManager>> {
        let query = format!("SELECT {MANAGER_COLUMNS} FROM consulting_managers WHERE id = ?");

        let manager = sqlx::query_as::<_, ConsultingManager>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(manager)
    }

    pub async fn get_manager_by_email(&self, email: &str) -> Result<Option<ConsultingManager>> {
        let query = format!("SELECT {MANAGER_COLUMNS} FROM consulting_managers WHERE email = ?");

        let manager = sqlx::query_as::<_, ConsultingManager>(&query)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(manager)
    }

    /// Lists managers with pagination and an optional name search.
    pub async fn list_managers(
        &self,
        skip: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<(Vec<ConsultingManager>, i64)> {
        let pattern = search.map(|s| format!("%{}%", s));

        let (managers, total) = match &pattern {
            Some(pattern) => {
                let query = format!(
                    "SELECT {MANAGER_COLUMNS} FROM consulting_managers
                     WHERE name LIKE ?
                     ORDER BY id LIMIT ? OFFSET ?"
                );
                let managers = sqlx::query_as::<_, ConsultingManager>(&query)
                    .bind(pattern)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(self.pool)
                    .await?;

                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM consulting_managers WHERE name LIKE ?",
                )
                .bind(pattern)
                .fetch_one(self.pool)
                .await?;

                (managers, total)
            }
            None => {
                let query = format!(
                    "SELECT {MANAGER_COLUMNS} FROM consulting_managers ORDER BY id LIMIT ? OFFSET ?"
                );
                let managers = sqlx::query_as::<_, ConsultingManager>(&query)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(self.pool)
                    .await?;

                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM consulting_managers")
                    .fetch_one(self.pool)
                    .await?;

                (managers, total)
            }
        };

        Ok((managers, total))
    }

    /// Deletes a manager. Returns `false` when no row matched.
    pub async fn delete_manager(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM consulting_managers WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
