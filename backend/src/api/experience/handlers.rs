//! Handler functions for project experience CRUD endpoints.

use crate::api::common::{
    format_validation_errors, service_error_to_http, ListParams, PaginatedResponse,
};
use crate::database::models::{CreateProjectExperience, ProjectExperience, UpdateProjectExperience};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::experience_repository::ExperienceRepository;
use crate::repositories::manager_repository::ManagerRepository;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use validator::Validate;

/// Fails when the referenced consulting manager does not exist.
async fn ensure_manager_exists(pool: &SqlitePool, manager_id: i64) -> ServiceResult<()> {
    let exists = ManagerRepository::new(pool)
        .get_manager_by_id(manager_id)
        .await?
        .is_some();

    if !exists {
        return Err(ServiceError::not_found(
            "Consulting Manager",
            manager_id.to_string(),
        ));
    }

    Ok(())
}

#[axum::debug_handler]
pub async fn create_experience(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateProjectExperience>,
) -> Result<ResponseJson<ProjectExperience>, (StatusCode, String)> {
    if let Err(validation_errors) = payload.validate() {
        return Err(service_error_to_http(ServiceError::validation(
            format_validation_errors(validation_errors),
        )));
    }

    if let Some(manager_id) = payload.consulting_manager_id {
        ensure_manager_exists(&pool, manager_id)
            .await
            .map_err(service_error_to_http)?;
    }

    let experience = ExperienceRepository::new(&pool)
        .create_experience(payload)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok(ResponseJson(experience))
}

#[axum::debug_handler]
pub async fn list_experiences(
    Extension(pool): Extension<SqlitePool>,
    Query(params): Query<ListParams>,
) -> Result<ResponseJson<PaginatedResponse<ProjectExperience>>, (StatusCode, String)> {
    let (experiences, total) = ExperienceRepository::new(&pool)
        .list_experiences(params.skip(), params.limit(), params.search.as_deref())
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok(ResponseJson(PaginatedResponse {
        data: experiences,
        total,
    }))
}

#[axum::debug_handler]
pub async fn get_experience(
    Extension(pool): Extension<SqlitePool>,
    Path(project_id): Path<i64>,
) -> Result<ResponseJson<ProjectExperience>, (StatusCode, String)> {
    let experience = ExperienceRepository::new(&pool)
        .get_experience_by_id(project_id)
        .await
        .map_err(|e| service_error_to_http(e.into()))?
        .ok_or_else(|| {
            service_error_to_http(ServiceError::not_found(
                "Project Experience",
                project_id.to_string(),
            ))
        })?;

    Ok(ResponseJson(experience))
}

#[axum::debug_handler]
pub async fn update_experience(
    Extension(pool): Extension<SqlitePool>,
    Path(project_id): Path<i64>,
    Json(payload): Json<UpdateProjectExperience>,
) -> Result<ResponseJson<ProjectExperience>, (StatusCode, String)> {
    match apply_experience_update(&pool, project_id, payload).await {
        Ok(experience) => Ok(ResponseJson(experience)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

async fn apply_experience_update(
    pool: &SqlitePool,
    project_id: i64,
    payload: UpdateProjectExperience,
) -> ServiceResult<ProjectExperience> {
    if let Err(validation_errors) = payload.validate() {
        return Err(ServiceError::validation(format_validation_errors(
            validation_errors,
        )));
    }

    let repo = ExperienceRepository::new(pool);

    let current = repo
        .get_experience_by_id(project_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Project Experience", project_id.to_string()))?;

    if let Some(manager_id) = payload.consulting_manager_id {
        ensure_manager_exists(pool, manager_id).await?;
    }

    let updated = repo
        .update_experience(
            project_id,
            payload
                .no_sales_order
                .as_deref()
                .unwrap_or(&current.no_sales_order),
            payload
                .customer_name
                .as_deref()
                .unwrap_or(&current.customer_name),
            payload
                .project_name
                .as_deref()
                .unwrap_or(&current.project_name),
            payload
                .project_year
                .as_deref()
                .unwrap_or(&current.project_year),
            payload.category.as_deref().unwrap_or(&current.category),
            payload
                .consulting_manager_id
                .or(current.consulting_manager_id),
        )
        .await?;

    Ok(updated)
}

#[axum::debug_handler]
pub async fn delete_experience(
    Extension(pool): Extension<SqlitePool>,
    Path(project_id): Path<i64>,
) -> Result<ResponseJson<serde_json::Value>, (StatusCode, String)> {
    let deleted = ExperienceRepository::new(&pool)
        .delete_experience(project_id)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    if !deleted {
        return Err(service_error_to_http(ServiceError::not_found(
            "Project Experience",
            project_id.to_string(),
        )));
    }

    Ok(ResponseJson(serde_json::json!({
        "message": "Deleted successfully"
    })))
}
