//! Main entry point for the Project Management API backend.
//!
//! This file initializes the Axum web server, sets up the database pool,
//! builds the token issuer/verifier from configuration, and registers all
//! API routes and middleware.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod utils;

use axum::{
    http::{header, HeaderValue, Method},
    response::Json,
    routing::get,
    Extension, Router,
};
use config::Config;
use database::Database;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::fmt::init;
use utils::jwt::JwtKeys;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let db = Database::new(&config).await.unwrap();
    let pool = db.pool().clone();

    // Built once at startup; verification state is read-only afterwards.
    let jwt_keys = Arc::new(JwtKeys::new(&config));

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .nest("/users", api::user::routes::user_router())
        .nest("/consulting-manager", api::manager::routes::manager_router())
        .nest(
            "/project-experience",
            api::experience::routes::experience_router(),
        )
        .layer(cors)
        .layer(Extension(pool))
        .layer(Extension(jwt_keys));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting Project Management API on port {}", config.server_port);
    axum::serve(listener, app).await.unwrap();
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "Project Management API",
        "version": "1.0.0"
    }))
}
