//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use vault_core::VaultError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            ApiError::Internal(msg) => {
                // Detail stays in the logs, not on the wire.
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<VaultError> for ApiError {
    fn from(e: VaultError) -> Self {
        match e {
            VaultError::Validation(msg) => Self::Validation(msg),
            VaultError::Unauthorized(msg) => Self::Unauthorized(msg),
            VaultError::Forbidden(msg) => Self::Forbidden(msg),
            VaultError::NotFound(msg) => Self::NotFound(msg),
            VaultError::Conflict(msg) => Self::Conflict(msg),
            VaultError::Storage(msg) | VaultError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .map(|e| e.code.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field}: {detail}")
            })
            .collect();
        parts.sort();
        Self::Validation(parts.join("; "))
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_taxonomy_onto_http() {
        let resp = ApiError::from(VaultError::not_found("Resource", "res_1")).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiError::from(VaultError::Conflict("dup".into())).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        // Storage detail never maps to a client error.
        let resp = ApiError::from(VaultError::Storage("creds".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
