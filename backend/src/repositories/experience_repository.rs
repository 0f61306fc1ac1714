//! Database repository for project experience operations.

use crate::database::models::{CreateProjectExperience, ProjectExperience};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

const EXPERIENCE_COLUMNS: &str = "id, no_sales_order, customer_name, project_name, \
     project_year, category, consulting_manager_id, created_at";

/// Repository for project experience database operations.
pub struct ExperienceRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ExperienceRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_experience(
        &self,
        experience: CreateProjectExperience,
    ) -> Result<ProjectExperience> {
        let query = format!(
            "INSERT INTO project_experience
             (no_sales_order, customer_name, project_name, project_year, category, consulting_manager_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {EXPERIENCE_COLUMNS}"
        );

        let experience = sqlx::query_as::<_, ProjectExperience>(&query)
            .bind(&experience.no_sales_order)
            .bind(&experience.customer_name)
            .bind(&experience.project_name)
            .bind(&experience.project_year)
            .bind(&experience.category)
            .bind(experience.consulting_manager_id)
            .bind(Utc::now())
            .fetch_one(self.pool)
            .await?;

        Ok(experience)
    }

    pub async fn get_experience_by_id(&self, id: i64) -> Result<Option<ProjectExperience>> {
        let query = format!("SELECT {EXPERIENCE_COLUMNS} FROM project_experience WHERE id = ?");

        let experience = sqlx::query_as::<_, ProjectExperience>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(experience)
    }

    /// Lists experiences with pagination and an optional project-name search.
    pub async fn list_experiences(
        &self,
        skip: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Result<(Vec<ProjectExperience>, i64)> {
        let pattern = search.map(|s| format!("%{}%", s));

        let (experiences, total) = match &pattern {
            Some(pattern) => {
                let query = format!(
                    "SELECT {EXPERIENCE_COLUMNS} FROM project_experience
                     WHERE project_name LIKE ?
                     ORDER BY id LIMIT ? OFFSET ?"
                );
                let experiences = sqlx::query_as::<_, ProjectExperience>(&query)
                    .bind(pattern)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(self.pool)
                    .await?;

                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM project_experience WHERE project_name LIKE ?",
                )
                .bind(pattern)
                .fetch_one(self.pool)
                .await?;

                (experiences, total)
            }
            None => {
                let query = format!(
                    "SELECT {EXPERIENCE_COLUMNS} FROM project_experience ORDER BY id LIMIT ? OFFSET ?"
                );
                let experiences = sqlx::query_as::<_, ProjectExperience>(&query)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(self.pool)
                    .await?;

                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project_experience")
                    .fetch_one(self.pool)
                    .await?;

                (experiences, total)
            }
        };

        Ok((experiences, total))
    }

    /// Overwrites the mutable columns of an experience row. The handler
    /// merges partial updates and referential checks first.
    pub async fn update_experience(
        &self,
        id: i64,
        no_sales_order: &str,
        customer_name: &str,
        project_name: &str,
        project_year: &str,
        category: &str,
        consulting_manager_id: Option<i64>,
    ) -> Result<ProjectExperience> {
        let query = format!(
            "UPDATE project_experience
             SET no_sales_order = ?, customer_name = ?, project_name = ?,
                 project_year = ?, category = ?, consulting_manager_id = ?
             WHERE id = ?
             RETURNING {EXPERIENCE_COLUMNS}"
        );

        let experience = sqlx::query_as::<_, ProjectExperience>(&query)
            .bind(no_sales_order)
            .bind(customer_name)
            .bind(project_name)
            .bind(project_year)
            .bind(category)
            .bind(consulting_manager_id)
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(experience)
    }

    /// Deletes an experience. Returns `false` when no row matched.
    pub async fn delete_experience(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM project_experience WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
