//! Authentication module: credential hashing, token lifecycle, the auth
//! gate and the register/login/refresh flows.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;
