//! Shared error taxonomy
//!
//! Every layer reports failures through [`VaultError`]; the API layer owns
//! the mapping to HTTP status codes. Storage errors carry only a message so
//! that driver types do not leak upward.

use thiserror::Error;

/// Domain-level error taxonomy
#[derive(Error, Debug)]
pub enum VaultError {
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

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VaultError {
    /// Not-found error for an entity, by kind and identifier
    pub fn not_found(kind: &str, id: &str) -> Self {
        Self::NotFound(format!("{} {} not found", kind, id))
    }

    /// Whether this error maps to a client fault (4xx)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::Internal(_))
    }
}

/// Result alias used across the workspace
pub type VaultResult<T> = Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_server_faults() {
        assert!(!VaultError::Storage("down".into()).is_client_error());
        assert!(VaultError::not_found("Resource", "res_1").is_client_error());
    }
}
