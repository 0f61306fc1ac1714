//! Data structures for authentication-related entities.
//!
//! Request/response payloads for register, login and token refresh, plus
//! the [`Principal`] recovered from a verified access token.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::jwt::Claims;

/// The authenticated identity attached to a request by the auth middleware.
///
/// Derived from verified token claims on every request and never persisted;
/// handlers that need fresh user data re-read it from the store by `id`.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub role: Option<String>,
}

impl Principal {
    /// Builds a principal from verified claims. Returns `None` when the
    /// subject claim is not a numeric user id.
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let id = claims.sub.parse::<i64>().ok()?;
        Some(Principal {
            id,
            username: claims.un.clone(),
            role: claims.rl.clone(),
        })
    }
}

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub department_name: Option<String>,

    /// Role label embedded in access tokens. Defaults to the empty string.
    #[serde(default)]
    pub role: String,
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response containing both tokens and basic user info
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

/// Token refresh request
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Token refresh response. The refresh token itself is not rotated; the
/// presented one stays valid until its own expiry.
#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub username: String,
    pub role: String,
}
