//! Handler functions for user CRUD endpoints.
//!
//! User creation lives under `/auth/register`; these endpoints cover
//! listing, retrieval, partial update and deletion.

use crate::api::common::{
    format_validation_errors, service_error_to_http, ListParams, PaginatedResponse,
};
use crate::auth::password::hash_password;
use crate::database::models::{UpdateUser, UserOut};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use validator::Validate;

#[axum::debug_handler]
pub async fn list_users(
    Extension(pool): Extension<SqlitePool>,
    Query(params): Query<ListParams>,
) -> Result<ResponseJson<PaginatedResponse<UserOut>>, (StatusCode, String)> {
    let repo = UserRepository::new(&pool);

    let (users, total) = repo
        .list_users(params.skip(), params.limit(), params.search.as_deref())
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    Ok(ResponseJson(PaginatedResponse {
        data: users.into_iter().map(UserOut::from).collect(),
        total,
    }))
}

#[axum::debug_handler]
pub async fn get_user(
    Extension(pool): Extension<SqlitePool>,
    Path(user_id): Path<i64>,
) -> Result<ResponseJson<UserOut>, (StatusCode, String)> {
    let user = UserRepository::new(&pool)
        .get_user_by_id(user_id)
        .await
        .map_err(|e| service_error_to_http(e.into()))?
        .ok_or_else(|| {
            service_error_to_http(ServiceError::not_found("User", user_id.to_string()))
        })?;

    Ok(ResponseJson(user.into()))
}

#[axum::debug_handler]
pub async fn update_user(
    Extension(pool): Extension<SqlitePool>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateUser>,
) -> Result<ResponseJson<UserOut>, (StatusCode, String)> {
    match apply_user_update(&pool, user_id, payload).await {
        Ok(user) => Ok(ResponseJson(user)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Merges a partial update onto the stored row. Uniqueness is re-checked
/// when username or email change; a new password is re-hashed before it
/// reaches the repository.
async fn apply_user_update(
    pool: &SqlitePool,
    user_id: i64,
    payload: UpdateUser,
) -> ServiceResult<UserOut> {
    if let Err(validation_errors) = payload.validate() {
        return Err(ServiceError::validation(format_validation_errors(
            validation_errors,
        )));
    }

    let repo = UserRepository::new(pool);

    let current = repo
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

    if let Some(username) = &payload.username {
        if *username != current.username
            && repo.get_user_by_username(username).await?.is_some()
        {
            return Err(ServiceError::already_exists("User", username));
        }
    }

    if let Some(email) = &payload.email {
        if *email != current.email && repo.get_user_by_email(email).await?.is_some() {
            return Err(ServiceError::already_exists("User", email));
        }
    }

    let password_hash = match &payload.password {
        Some(password) => hash_password(password)?,
        None => current.password_hash.clone(),
    };

    let username = payload.username.as_deref().unwrap_or(&current.username);
    let name = payload.name.as_deref().unwrap_or(&current.name);
    let email = payload.email.as_deref().unwrap_or(&current.email);
    let department_name = payload
        .department_name
        .as_deref()
        .or(current.department_name.as_deref());

    let updated = repo
        .update_user(user_id, username, name, &password_hash, email, department_name)
        .await?;

    Ok(updated.into())
}

#[axum::debug_handler]
pub async fn delete_user(
    Extension(pool): Extension<SqlitePool>,
    Path(user_id): Path<i64>,
) -> Result<ResponseJson<serde_json::Value>, (StatusCode, String)> {
    let deleted = UserRepository::new(&pool)
        .delete_user(user_id)
        .await
        .map_err(|e| service_error_to_http(e.into()))?;

    if !deleted {
        return Err(service_error_to_http(ServiceError::not_found(
            "User",
            user_id.to_string(),
        )));
    }

    Ok(ResponseJson(serde_json::json!({
        "message": "Deleted successfully"
    })))
}
