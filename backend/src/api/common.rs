//! Shared API plumbing: error-to-HTTP mapping, pagination and validation
//! formatting.
//!
//! All errors leave the service layer as [`ServiceError`] and are converted
//! here into `(StatusCode, message)` pairs. Auth failures deliberately map
//! to one generic 401; the specific token failure is only ever logged.

use crate::errors::ServiceError;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// Paginated list response: one page of items plus the unpaginated total.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
}

fn default_limit() -> i64 {
    10
}

/// Query parameters shared by all list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub search: Option<String>,
}

impl ListParams {
    /// Offset, clamped to zero.
    pub fn skip(&self) -> i64 {
        self.skip.max(0)
    }

    /// Page size, clamped to zero. SQLite reads a negative `LIMIT` as
    /// "unbounded", so negatives must never reach the query.
    pub fn limit(&self) -> i64 {
        self.limit.max(0)
    }
}

/// Converts service errors to appropriate HTTP responses.
pub fn service_error_to_http(error: ServiceError) -> (StatusCode, String) {
    let status = match &error {
        ServiceError::InvalidCredentials => StatusCode::BAD_REQUEST,
        ServiceError::Unauthorized { .. } | ServiceError::SubjectNotFound { .. } => {
            StatusCode::UNAUTHORIZED
        }
        ServiceError::Validation { .. } | ServiceError::AlreadyExists { .. } => {
            StatusCode::BAD_REQUEST
        }
        ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ServiceError::Database { .. } | ServiceError::InternalError { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %error, "request failed");
        return (status, "Internal server error".to_string());
    }

    // A deactivated refresh subject is reported with the same generic
    // message as any other refresh failure.
    if let ServiceError::SubjectNotFound { .. } = &error {
        return (status, "invalid or expired refresh token".to_string());
    }

    (status, error.to_string())
}

/// Flattens `validator` field errors into one readable message.
pub fn format_validation_errors(errors: ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error.message.as_ref().unwrap_or(&"Invalid value".into())
                )
            })
        })
        .collect::<Vec<String>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_map_to_unauthorized() {
        let (status, message) =
            service_error_to_http(ServiceError::unauthorized("invalid or expired refresh token"));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(message.contains("invalid or expired refresh token"));

        let (status, message) = service_error_to_http(ServiceError::SubjectNotFound {
            identifier: "42".to_string(),
        });
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        // The subject id must not leak to the client.
        assert!(!message.contains("42"));
    }

    #[test]
    fn credential_and_conflict_failures_map_to_bad_request() {
        let (status, _) = service_error_to_http(ServiceError::InvalidCredentials);
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = service_error_to_http(ServiceError::already_exists("User", "alice"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let (status, _) = service_error_to_http(ServiceError::not_found("Consulting Manager", "9"));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn negative_pagination_is_clamped() {
        let params = ListParams {
            skip: -3,
            limit: -1,
            search: None,
        };
        assert_eq!(params.skip(), 0);
        assert_eq!(params.limit(), 0);

        let params = ListParams {
            skip: 20,
            limit: 10,
            search: None,
        };
        assert_eq!(params.skip(), 20);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let (status, message) =
            service_error_to_http(ServiceError::internal_error("secret detail"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret detail"));
    }
}
