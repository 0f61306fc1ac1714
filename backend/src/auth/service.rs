//! Core business logic for the authentication system.

use crate::api::common::format_validation_errors;
use crate::auth::models::*;
use crate::auth::password::{hash_password, verify_password};
use crate::database::models::{CreateUser, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::{JwtKeys, KeyFlavor};
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use validator::Validate;

/// Authentication service for registration, login and token refresh.
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    keys: Arc<JwtKeys>,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a SqlitePool, keys: Arc<JwtKeys>) -> Self {
        AuthService { pool, keys }
    }

    /// Registers a new user. The raw password is hashed before anything is
    /// persisted and is never logged.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<User> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(format_validation_errors(
                validation_errors,
            )));
        }

        let repo = UserRepository::new(self.pool);

        if repo.get_user_by_username(&request.username).await?.is_some() {
            return Err(ServiceError::already_exists("User", &request.username));
        }

        if repo.get_user_by_email(&request.email).await?.is_some() {
            return Err(ServiceError::already_exists("User", &request.email));
        }

        let password_hash = hash_password(&request.password)?;

        let user = repo
            .create_user(CreateUser {
                username: request.username,
                name: request.name,
                password_hash,
                email: request.email,
                role: request.role,
                department_name: request.department_name,
            })
            .await?;

        Ok(user)
    }

    /// Authenticates a user and issues one access and one refresh token.
    ///
    /// A missing user, an inactive user and a wrong password all produce
    /// the same [`ServiceError::InvalidCredentials`].
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        if let Err(validation_errors) = request.validate() {
            return Err(ServiceError::validation(format_validation_errors(
                validation_errors,
            )));
        }

        let repo = UserRepository::new(self.pool);

        let user = repo
            .get_user_by_username(&request.username)
            .await?
            .filter(|user| user.is_active)
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        repo.touch_last_login(user.id, Utc::now()).await?;

        let access_token = self
            .keys
            .issue_access_token(user.id, &user.role, &user.username, None)?;
        let refresh_token = self.keys.issue_refresh_token(user.id, &user.username, None)?;

        Ok(LoginResponse {
            access_token,
            refresh_token,
            username: user.username,
            email: user.email,
            role: user.role,
        })
    }

    /// Exchanges a valid refresh token for a fresh access token.
    ///
    /// The new token is built from the user's current username and role as
    /// read from the store, not from the old token's claims, so a role
    /// change since login takes effect here. The refresh token itself is
    /// not rotated.
    pub async fn refresh_token(
        &self,
        request: RefreshTokenRequest,
    ) -> ServiceResult<RefreshTokenResponse> {
        let claims = self
            .keys
            .verify(&request.refresh_token, KeyFlavor::Refresh)
            .map_err(|kind| {
                tracing::debug!(error = %kind, "refresh token rejected");
                ServiceError::unauthorized("invalid or expired refresh token")
            })?;

        let subject_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| ServiceError::unauthorized("invalid or expired refresh token"))?;

        let user = UserRepository::new(self.pool)
            .get_user_by_id(subject_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or(ServiceError::SubjectNotFound {
                identifier: claims.sub,
            })?;

        let access_token = self
            .keys
            .issue_access_token(user.id, &user.role, &user.username, None)?;

        Ok(RefreshTokenResponse {
            access_token,
            username: user.username,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::database::Database;
    use jsonwebtoken::Algorithm;

    fn test_config() -> Config {
        Config {
            // A pool larger than one would hand each connection its own
            // in-memory database.
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "primary-test-secret".to_string(),
            jwt_refresh_secret: Some("refresh-test-secret".to_string()),
            jwt_algorithm: Algorithm::HS256,
            access_token_expire_minutes: 600,
            refresh_token_expire_minutes: 600,
            server_port: 8000,
        }
    }

    async fn setup() -> (Database, Arc<JwtKeys>) {
        let config = test_config();
        let db = Database::new(&config).await.unwrap();
        let keys = Arc::new(JwtKeys::new(&config));
        (db, keys)
    }

    fn alice_registration() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            name: "Alice".to_string(),
            password: "correct horse battery staple".to_string(),
            email: "alice@example.com".to_string(),
            department_name: None,
            role: "admin".to_string(),
        }
    }

    fn login_request(password: &str) -> LoginRequest {
        LoginRequest {
            username: "alice".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_login_refresh_roundtrip() {
        let (db, keys) = setup().await;
        let service = AuthService::new(db.pool(), keys.clone());

        let user = service.register(alice_registration()).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "correct horse battery staple");

        let login = service
            .login(login_request("correct horse battery staple"))
            .await
            .unwrap();
        assert_eq!(login.username, "alice");
        assert_eq!(login.role, "admin");

        let claims = keys.verify(&login.access_token, KeyFlavor::Access).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.rl.as_deref(), Some("admin"));

        let refreshed = service
            .refresh_token(RefreshTokenRequest {
                refresh_token: login.refresh_token,
            })
            .await
            .unwrap();
        let claims = keys
            .verify(&refreshed.access_token, KeyFlavor::Access)
            .unwrap();
        assert_eq!(claims.un, "alice");
    }

    #[tokio::test]
    async fn duplicate_username_rejected() {
        let (db, keys) = setup().await;
        let service = AuthService::new(db.pool(), keys);

        service.register(alice_registration()).await.unwrap();

        let mut second = alice_registration();
        second.email = "other@example.com".to_string();
        let error = service.register(second).await.unwrap_err();
        assert!(matches!(error, ServiceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_get_the_same_error() {
        let (db, keys) = setup().await;
        let service = AuthService::new(db.pool(), keys);

        let error = service
            .login(login_request("whatever"))
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::InvalidCredentials));

        service.register(alice_registration()).await.unwrap();
        let error = service.login(login_request("wrong")).await.unwrap_err();
        assert!(matches!(error, ServiceError::InvalidCredentials));
    }

    #[tokio::test]
    async fn refresh_for_deleted_subject_issues_nothing() {
        let (db, keys) = setup().await;
        let service = AuthService::new(db.pool(), keys);

        let user = service.register(alice_registration()).await.unwrap();
        let login = service
            .login(login_request("correct horse battery staple"))
            .await
            .unwrap();

        UserRepository::new(db.pool())
            .delete_user(user.id)
            .await
            .unwrap();

        let error = service
            .refresh_token(RefreshTokenRequest {
                refresh_token: login.refresh_token,
            })
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::SubjectNotFound { .. }));
    }

    #[tokio::test]
    async fn refresh_rejects_inactive_subject() {
        let (db, keys) = setup().await;
        let service = AuthService::new(db.pool(), keys);

        let user = service.register(alice_registration()).await.unwrap();
        let login = service
            .login(login_request("correct horse battery staple"))
            .await
            .unwrap();

        sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
            .bind(user.id)
            .execute(db.pool())
            .await
            .unwrap();

        let error = service
            .refresh_token(RefreshTokenRequest {
                refresh_token: login.refresh_token,
            })
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::SubjectNotFound { .. }));
    }

    #[tokio::test]
    async fn refresh_uses_current_role_from_the_store() {
        let (db, keys) = setup().await;
        let service = AuthService::new(db.pool(), keys.clone());

        let user = service.register(alice_registration()).await.unwrap();
        let login = service
            .login(login_request("correct horse battery staple"))
            .await
            .unwrap();

        sqlx::query("UPDATE users SET role = 'viewer' WHERE id = ?")
            .bind(user.id)
            .execute(db.pool())
            .await
            .unwrap();

        let refreshed = service
            .refresh_token(RefreshTokenRequest {
                refresh_token: login.refresh_token,
            })
            .await
            .unwrap();
        assert_eq!(refreshed.role, "viewer");

        let claims = keys
            .verify(&refreshed.access_token, KeyFlavor::Access)
            .unwrap();
        assert_eq!(claims.rl.as_deref(), Some("viewer"));
    }

    #[tokio::test]
    async fn access_token_is_not_a_refresh_token() {
        let (db, keys) = setup().await;
        let service = AuthService::new(db.pool(), keys);

        service.register(alice_registration()).await.unwrap();
        let login = service
            .login(login_request("correct horse battery staple"))
            .await
            .unwrap();

        let error = service
            .refresh_token(RefreshTokenRequest {
                refresh_token: login.access_token,
            })
            .await
            .unwrap_err();
        assert!(matches!(error, ServiceError::Unauthorized { .. }));
    }
}
