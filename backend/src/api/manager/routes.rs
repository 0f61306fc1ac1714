//! HTTP routes for consulting manager CRUD. All routes sit behind the
//! auth gate.

use crate::api::manager::handlers::*;
use crate::auth::middleware::require_auth;
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

pub fn manager_router() -> Router {
    Router::new()
        .route("/", post(create_manager))
        .route("/", get(list_managers))
        .route("/{manager_id}", get(get_manager))
        .route("/{manager_id}", delete(delete_manager))
        .layer(middleware::from_fn(require_auth))
}
