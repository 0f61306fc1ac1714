//! Handler functions for consulting manager CRUD endpoints.

use crate::api::common::{
    format_validation_errors, service_error_to_http, ListParams, PaginatedResponse,
};
use crate::database::models::{ConsultingManager, CreateConsultingManager};
use crate::errors::ServiceError;
use crate::repositories::manager_repository::ManagerRepository;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use validator::Validate;

#[axum::debug_handler]
pub async fn create_manager(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<CreateConsultingManager>,
) -> Result<ResponseJson<ConsultingManager>, (StatusCode, String)> {
    if let Err(validation_errors) = payload.validate() {
        return Err(service_error_to_http(ServiceError::validation(
            format_validation_errors(validation_errors),
        )));
    }

    let repo = ManagerRepository::new(&pool);

    let exists = repo
        .get_manager_by_email(&payload.email)
        .await
        .map_err(|e| service_error_to_http(e.into()))?
        .is_some();
    if exists {
        return Err(service_error_to_http(ServiceError::already_exists(
            "Consulting Manager",
            &payload.email,
        )));
    }

    let manager = repo
        .create_manager(payload)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok(ResponseJson(manager))
}

#[axum::debug_handler]
pub async fn list_managers(
    Extension(pool): Extension<SqlitePool>,
    Query(params): Query<ListParams>,
) -> Result<ResponseJson<PaginatedResponse<ConsultingManager>>, (StatusCode, String)> {
    let (managers, total) = ManagerRepository::new(&pool)
        .list_managers(params.skip(), params.limit(), params.search.as_deref())
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok(ResponseJson(PaginatedResponse {
        data: managers,
        total,
    }))
}

#[axum::debug_handler]
pub async fn get_manager(
    Extension(pool): Extension<SqlitePool>,
    Path(manager_id): Path<i64>,
) -> Result<ResponseJson<ConsultingManager>, (StatusCode, String)> {
    let manager = ManagerRepository::new(&pool)
        .get_manager_by_id(manager_id)
        .await
        .map_err(|e| service_error_to_http(e.into()))?
        .ok_or_else(|| {
            service_error_to_http(ServiceError::not_found(
                "Consulting Manager",
                manager_id.to_string(),
            ))
        })?;

    Ok(ResponseJson(manager))
}

#[axum::debug_handler]
pub async fn delete_manager(
    Extension(pool): Extension<SqlitePool>,
    Path(manager_id): Path<i64>,
) -> Result<ResponseJson<serde_json::Value>, (StatusCode, String)> {
    let deleted = ManagerRepository::new(&pool)
        .delete_manager(manager_id)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    if !deleted {
        return Err(service_error_to_http(ServiceError::not_found(
            "Consulting Manager",
            manager_id.to_string(),
        )));
    }

    Ok(ResponseJson(serde_json::json!({
        "message": "Deleted successfully"
    })))
}
