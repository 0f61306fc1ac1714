//! JWT token issuance and verification.
//!
//! Tokens come in two flavors: access tokens, signed with the primary
//! secret and carrying a role claim, and refresh tokens, signed with the
//! refresh secret (which resolves to the primary secret when no distinct
//! one is configured). A token is only as trusted as its flavor's key: the
//! signature must validate under that key before any claim is read, and an
//! expired token is invalid no matter how it is signed.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};

/// Which signing key a token is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFlavor {
    Access,
    Refresh,
}

/// Why a presented token was rejected. The auth gate and the refresh flow
/// collapse all of these into a single 401 for the client; the distinction
/// exists for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("malformed token")]
    Malformed,
    #[error("missing subject claim")]
    MissingSubject,
}

/// Signed token claims.
///
/// `sub` and `un` are defaulted on decode so that a structurally valid
/// token without a subject surfaces as [`TokenError::MissingSubject`]
/// rather than a generic decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject id, the stringified numeric user id.
    #[serde(default)]
    pub sub: String,
    /// Username at issuance time.
    #[serde(default)]
    pub un: String,
    /// Role, present on access tokens only. Empty string is a valid role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rl: Option<String>,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

/// Token issuer and verifier, constructed once from [`Config`] at startup
/// and shared read-only across requests.
pub struct JwtKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    header: Header,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtKeys {
    pub fn new(config: &Config) -> Self {
        let refresh_secret = config.refresh_secret();

        let mut validation = Validation::new(config.jwt_algorithm);
        validation.validate_exp = true;
        // No clock leeway: an expired token is expired.
        validation.leeway = 0;

        JwtKeys {
            access_encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            header: Header::new(config.jwt_algorithm),
            validation,
            access_ttl: Duration::minutes(config.access_token_expire_minutes),
            refresh_ttl: Duration::minutes(config.refresh_token_expire_minutes),
        }
    }

    /// Issues an access token for a subject. `ttl` overrides the configured
    /// access-token lifetime when given.
    pub fn issue_access_token(
        &self,
        subject_id: i64,
        role: &str,
        username: &str,
        ttl: Option<Duration>,
    ) -> ServiceResult<String> {
        let exp = Utc::now() + ttl.unwrap_or(self.access_ttl);

        let claims = Claims {
            sub: subject_id.to_string(),
            un: username.to_string(),
            rl: Some(role.to_string()),
            exp: exp.timestamp() as usize,
        };

        encode(&self.header, &claims, &self.access_encoding)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Issues a refresh token for a subject. Refresh tokens carry no role
    /// claim; the role is re-read from the store when the token is redeemed.
    pub fn issue_refresh_token(
        &self,
        subject_id: i64,
        username: &str,
        ttl: Option<Duration>,
    ) -> ServiceResult<String> {
        let exp = Utc::now() + ttl.unwrap_or(self.refresh_ttl);

        let claims = Claims {
            sub: subject_id.to_string(),
            un: username.to_string(),
            rl: None,
            exp: exp.timestamp() as usize,
        };

        encode(&self.header, &claims, &self.refresh_encoding)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Verifies a token against the key for the given flavor and returns
    /// its claims.
    ///
    /// Exactly one of four things is wrong with a rejected token: it is
    /// expired, its signature does not validate under the flavor's key, it
    /// is not decodable at all, or it carries no subject.
    pub fn verify(&self, token: &str, flavor: KeyFlavor) -> Result<Claims, TokenError> {
        let decoding_key = match flavor {
            KeyFlavor::Access => &self.access_decoding,
            KeyFlavor::Refresh => &self.refresh_decoding,
        };

        let data = decode::<Claims>(token, decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }
        })?;

        if data.claims.sub.is_empty() {
            return Err(TokenError::MissingSubject);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    fn test_config(refresh_secret: Option<&str>) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 3,
            jwt_secret: "primary-test-secret".to_string(),
            jwt_refresh_secret: refresh_secret.map(str::to_string),
            jwt_algorithm: Algorithm::HS256,
            access_token_expire_minutes: 600,
            refresh_token_expire_minutes: 600,
            server_port: 8000,
        }
    }

    fn keys() -> JwtKeys {
        JwtKeys::new(&test_config(Some("refresh-test-secret")))
    }

    #[test]
    fn access_token_roundtrip() {
        let keys = keys();
        let token = keys
            .issue_access_token(42, "admin", "alice", Some(Duration::minutes(15)))
            .unwrap();

        let claims = keys.verify(&token, KeyFlavor::Access).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.un, "alice");
        assert_eq!(claims.rl.as_deref(), Some("admin"));
    }

    #[test]
    fn refresh_token_roundtrip_has_no_role() {
        let keys = keys();
        let token = keys.issue_refresh_token(7, "bob", None).unwrap();

        let claims = keys.verify(&token, KeyFlavor::Refresh).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.un, "bob");
        assert_eq!(claims.rl, None);
    }

    #[test]
    fn empty_role_is_preserved() {
        let keys = keys();
        let token = keys.issue_access_token(1, "", "carol", None).unwrap();

        let claims = keys.verify(&token, KeyFlavor::Access).unwrap();
        assert_eq!(claims.rl.as_deref(), Some(""));
    }

    #[test]
    fn expired_token_rejected() {
        let keys = keys();
        let token = keys
            .issue_access_token(42, "admin", "alice", Some(Duration::minutes(-5)))
            .unwrap();

        assert_eq!(
            keys.verify(&token, KeyFlavor::Access),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn flavor_secrets_are_not_interchangeable() {
        let keys = keys();

        let access = keys.issue_access_token(42, "admin", "alice", None).unwrap();
        assert_eq!(
            keys.verify(&access, KeyFlavor::Refresh),
            Err(TokenError::InvalidSignature)
        );

        let refresh = keys.issue_refresh_token(42, "alice", None).unwrap();
        assert_eq!(
            keys.verify(&refresh, KeyFlavor::Access),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn refresh_flavor_falls_back_to_primary_secret() {
        let keys = JwtKeys::new(&test_config(None));

        let access = keys.issue_access_token(42, "admin", "alice", None).unwrap();
        assert!(keys.verify(&access, KeyFlavor::Refresh).is_ok());
    }

    #[test]
    fn tampered_payload_invalidates_signature() {
        let keys = keys();
        let token = keys.issue_access_token(42, "admin", "alice", None).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let mut payload = parts[1].to_string();
        let replacement = if payload.starts_with('A') { "B" } else { "A" };
        payload.replace_range(0..1, replacement);
        let tampered = format!("{}.{}.{}", parts[0], payload, parts[2]);

        assert_eq!(
            keys.verify(&tampered, KeyFlavor::Access),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn undecodable_token_is_malformed() {
        let keys = keys();
        assert_eq!(
            keys.verify("not-a-token", KeyFlavor::Access),
            Err(TokenError::Malformed)
        );
        assert_eq!(
            keys.verify("still.not.jwt", KeyFlavor::Access),
            Err(TokenError::Malformed)
        );
        assert_eq!(keys.verify("", KeyFlavor::Access), Err(TokenError::Malformed));
    }

    #[test]
    fn token_without_subject_rejected() {
        #[derive(Serialize)]
        struct NoSub {
            un: String,
            exp: usize,
        }

        let keys = keys();
        let claims = NoSub {
            un: "alice".to_string(),
            exp: (Utc::now() + Duration::minutes(15)).timestamp() as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"primary-test-secret"),
        )
        .unwrap();

        assert_eq!(
            keys.verify(&token, KeyFlavor::Access),
            Err(TokenError::MissingSubject)
        );
    }
}
