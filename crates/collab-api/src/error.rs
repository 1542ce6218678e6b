//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use collab_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Hint for the frontend to offer signup on unknown-account logins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggest_signup: Option<bool>,
}

impl ApiErrorResponse {
    /// A plain error body with no extra hints.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            suggest_signup: None,
        }
    }
}

/// Domain error wrapper carrying the HTTP conversion.
///
/// Handlers return this so `?` lifts any `AppError` straight into a
/// response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;

        // All authentication failures collapse to one generic body so a
        // client cannot distinguish expired from superseded tokens.
        if err.kind.is_unauthorized() {
            tracing::debug!(kind = %err.kind, detail = %err.message, "Rejecting unauthorized request");
            let body = ApiErrorResponse::new("UNAUTHORIZED", "Unauthorized");
            return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        }

        let (status, error_code) = match &err.kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            // Duplicate accounts report 400, matching the frontend contract.
            ErrorKind::Conflict => (StatusCode::BAD_REQUEST, "CONFLICT"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::OAuthExchange => (StatusCode::BAD_REQUEST, "OAUTH_EXCHANGE_FAILED"),
            ErrorKind::OAuthProfile => (StatusCode::BAD_REQUEST, "OAUTH_PROFILE_INCOMPLETE"),
            ErrorKind::Upstream => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_UNAVAILABLE"),
            _ => {
                tracing::error!(kind = %err.kind, error = %err.message, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ApiErrorResponse::new(error_code, err.message.clone());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn respond(err: AppError) -> Response {
        ApiError::from(err).into_response()
    }

    #[test]
    fn test_auth_failures_collapse_to_generic_401() {
        for err in [
            AppError::token_expired("expired"),
            AppError::token_malformed("garbled"),
            AppError::session_superseded("older session"),
            AppError::user_not_found("gone"),
            AppError::invalid_credentials("bad password"),
        ] {
            let response = respond(err);
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_conflict_maps_to_400() {
        let response = respond(AppError::conflict("Email already registered"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_account_maps_to_404() {
        let response = respond(AppError::not_found("User not found"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_maps_to_500() {
        let response = respond(AppError::upstream("provider not configured"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
