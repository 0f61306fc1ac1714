//! Database repositories, one per persisted entity.

pub mod experience_repository;
pub mod manager_repository;
pub mod user_repository;
