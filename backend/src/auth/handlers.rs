//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse incoming requests and delegate to
//! [`AuthService`](crate::auth::service::AuthService) for the actual work.

use crate::api::common::service_error_to_http;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::database::models::UserOut;
use crate::errors::ServiceError;
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::JwtKeys;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Handle user registration
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(keys): Extension<Arc<JwtKeys>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<ResponseJson<UserOut>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, keys);

    match auth_service.register(payload).await {
        Ok(user) => Ok(ResponseJson(user.into())),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(keys): Extension<Arc<JwtKeys>>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<LoginResponse>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, keys);

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle token refresh request
#[axum::debug_handler]
pub async fn refresh_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(keys): Extension<Arc<JwtKeys>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<ResponseJson<RefreshTokenResponse>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, keys);

    match auth_service.refresh_token(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request (client-side token invalidation)
#[axum::debug_handler]
pub async fn logout() -> ResponseJson<serde_json::Value> {
    // Tokens are stateless; logout means the client drops them.
    ResponseJson(serde_json::json!({
        "message": "Logged out successfully"
    }))
}

/// Get current user information from the authenticated principal
#[axum::debug_handler]
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(principal): Extension<Principal>,
) -> Result<ResponseJson<UserOut>, (StatusCode, String)> {
    let user = UserRepository::new(&pool)
        .get_user_by_id(principal.id)
        .await
        .map_err(|e| service_error_to_http(ServiceError::Database { source: e }))?
        .ok_or_else(|| {
            service_error_to_http(ServiceError::not_found("User", principal.id.to_string()))
        })?;

    Ok(ResponseJson(user.into()))
}
