//! HTTP routes for user CRUD. All routes sit behind the auth gate.

use crate::api::user::handlers::*;
use crate::auth::middleware::require_auth;
use axum::{
    middleware,
    routing::{delete, get, put},
    Router,
};

pub fn user_router() -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/{user_id}", get(get_user))
        .route("/{user_id}", put(update_user))
        .route("/{user_id}", delete(delete_user))
        .layer(middleware::from_fn(require_auth))
}
