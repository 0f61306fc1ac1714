//! Middleware for protecting authenticated routes.
//!
//! The gate makes exactly one verification attempt per request: it extracts
//! a bearer token from the `Authorization` header, verifies it as an access
//! token, and either attaches the recovered [`Principal`] to the request or
//! rejects with 401. Which of the four token failures occurred is logged,
//! never revealed to the client.

use crate::auth::models::Principal;
use crate::utils::jwt::{JwtKeys, KeyFlavor};
use axum::{
    extract::{Extension, Request},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Pulls the token out of an `Authorization: Bearer <token>` header.
/// A missing header, a non-bearer scheme, or an empty token all yield
/// `None`; the verifier is never invoked for these.
pub(crate) fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// JWT authentication middleware
pub async fn require_auth(
    Extension(keys): Extension<Arc<JwtKeys>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(request.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    match keys.verify(token, KeyFlavor::Access) {
        Ok(claims) => {
            let principal =
                Principal::from_claims(&claims).ok_or(StatusCode::UNAUTHORIZED)?;
            request.extensions_mut().insert(principal);
            Ok(next.run(request).await)
        }
        Err(kind) => {
            tracing::debug!(error = %kind, "access token rejected");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_yields_none() {
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }

    #[test]
    fn wrong_scheme_yields_none() {
        assert_eq!(extract_bearer(&headers_with("Token abc")), None);
        assert_eq!(extract_bearer(&headers_with("Basic dXNlcjpwdw==")), None);
        assert_eq!(extract_bearer(&headers_with("bearer abc")), None);
    }

    #[test]
    fn empty_token_yields_none() {
        assert_eq!(extract_bearer(&headers_with("Bearer ")), None);
    }

    #[test]
    fn bearer_token_extracted() {
        assert_eq!(extract_bearer(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }
}
