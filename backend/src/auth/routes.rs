//! Defines the HTTP routes specifically for authentication.
//!
//! Register, login and refresh are public; `/me` sits behind the auth
//! middleware. These are designed to be nested into the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::require_auth;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .route("/me", get(me).layer(middleware::from_fn(require_auth)))
}
