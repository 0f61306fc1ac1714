//! API route handlers and shared request/response plumbing.

pub mod common;
pub mod experience;
pub mod manager;
pub mod user;
