//! HTTP routes for project experience CRUD. All routes sit behind the
//! auth gate.

use crate::api::experience::handlers::*;
use crate::auth::middleware::require_auth;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

pub fn experience_router() -> Router {
    Router::new()
        .route("/", post(create_experience))
        .route("/", get(list_experiences))
        .route("/{project_id}", get(get_experience))
        .route("/{project_id}", put(update_experience))
        .route("/{project_id}", delete(delete_experience))
        .layer(middleware::from_fn(require_auth))
}
