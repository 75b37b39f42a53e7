//! Domain error taxonomy.
//!
//! A single tagged enum covers every failure the domain layer can
//! surface. Transport status codes are assigned at the API boundary,
//! never here.

use thiserror::Error;
use uuid::Uuid;

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors produced by repositories and domain services.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or out-of-range input; client-fixable.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness or already-exists violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A required capability was not held by the principal.
    /// Carries the missing capability and resource for observability.
    #[error("Missing capability {capability}")]
    Authorization {
        capability: String,
        resource: Option<Uuid>,
    },

    /// Store or otherwise unexpected failure; retryable.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Shorthand for a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Shorthand for an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.clone().map(|m| m.to_string()).unwrap_or_default()
                    )
                })
            })
            .collect();

        DomainError::Validation(details.join(", "))
    }
}

impl From<shared::cursor::CursorError> for DomainError {
    fn from(_: shared::cursor::CursorError) -> Self {
        DomainError::Validation("Invalid pagination cursor".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            DomainError::validation("bad input").to_string(),
            "Validation error: bad input"
        );
        assert_eq!(
            DomainError::not_found("club").to_string(),
            "Not found: club"
        );
        assert_eq!(
            DomainError::conflict("duplicate name").to_string(),
            "Conflict: duplicate name"
        );
        assert_eq!(
            DomainError::internal("store down").to_string(),
            "Internal error: store down"
        );
    }

    #[test]
    fn test_authorization_carries_context() {
        let err = DomainError::Authorization {
            capability: "manage_club".to_string(),
            resource: Some(Uuid::nil()),
        };
        assert_eq!(err.to_string(), "Missing capability manage_club");
        match err {
            DomainError::Authorization { resource, .. } => {
                assert_eq!(resource, Some(Uuid::nil()))
            }
            _ => panic!("Expected Authorization error"),
        }
    }

    #[test]
    fn test_from_cursor_error() {
        let err: DomainError = shared::cursor::CursorError::InvalidEncoding.into();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
