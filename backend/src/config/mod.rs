//! Central module for application-wide configuration settings.
//!
//! Configuration is read from the environment exactly once at startup and
//! then passed into the token issuer/verifier, the auth middleware and the
//! services as an immutable value. Nothing reads the environment after that.

use anyhow::{bail, Context, Result};
use jsonwebtoken::Algorithm;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub jwt_secret: String,
    /// Optional distinct secret for refresh tokens. See [`Config::refresh_secret`].
    pub jwt_refresh_secret: Option<String>,
    pub jwt_algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_minutes: i64,
    pub server_port: u16,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET_KEY").context("JWT_SECRET_KEY not set")?;

        let jwt_refresh_secret = env::var("JWT_REFRESH_SECRET_KEY").ok();

        let jwt_algorithm = parse_hmac_algorithm(
            &env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string()),
        )?;

        let access_token_expire_minutes = env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "600".to_string())
            .parse::<i64>()
            .context("ACCESS_TOKEN_EXPIRE_MINUTES must be a valid number")?;

        let refresh_token_expire_minutes = env::var("REFRESH_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "600".to_string())
            .parse::<i64>()
            .context("REFRESH_TOKEN_EXPIRE_MINUTES must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            jwt_secret,
            jwt_refresh_secret,
            jwt_algorithm,
            access_token_expire_minutes,
            refresh_token_expire_minutes,
            server_port,
        })
    }

    /// Secret used to sign and verify refresh tokens.
    ///
    /// Resolution rule: `JWT_REFRESH_SECRET_KEY` when configured, otherwise
    /// the primary secret. Running without a distinct refresh secret means
    /// both token flavors share one key, which is weaker but supported.
    pub fn refresh_secret(&self) -> &str {
        self.jwt_refresh_secret.as_deref().unwrap_or(&self.jwt_secret)
    }
}

/// Parses a symmetric HMAC algorithm name. Asymmetric algorithms are not
/// supported since both signing sides hold the same secret; configuring one
/// is a startup error, not a per-request error.
fn parse_hmac_algorithm(name: &str) -> Result<Algorithm> {
    match name {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => bail!("JWT_ALGORITHM must be HS256, HS384 or HS512, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(refresh: Option<&str>) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 3,
            jwt_secret: "primary".to_string(),
            jwt_refresh_secret: refresh.map(str::to_string),
            jwt_algorithm: Algorithm::HS256,
            access_token_expire_minutes: 600,
            refresh_token_expire_minutes: 600,
            server_port: 8000,
        }
    }

    #[test]
    fn refresh_secret_prefers_dedicated_key() {
        let config = config_with(Some("refresh"));
        assert_eq!(config.refresh_secret(), "refresh");
    }

    #[test]
    fn refresh_secret_falls_back_to_primary() {
        let config = config_with(None);
        assert_eq!(config.refresh_secret(), "primary");
    }

    #[test]
    fn algorithm_parsing() {
        assert_eq!(parse_hmac_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_hmac_algorithm("HS512").unwrap(), Algorithm::HS512);
        assert!(parse_hmac_algorithm("RS256").is_err());
        assert!(parse_hmac_algorithm("none").is_err());
    }
}
