//! Catalog-specific error types.

use thiserror::Error;

use super::course::CourseState;
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, Permission, ValidationError};
use crate::domain::publication::GatewayErrorKind;

/// Errors raised by course operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseError {
    #[error("Course not found: {0}")]
    NotFound(CourseId),

    #[error("Cannot move course from {} to {}", .from.as_str(), .to.as_str())]
    IllegalTransition { from: CourseState, to: CourseState },

    #[error("Permission '{0}' required")]
    PermissionDenied(Permission),

    /// Archived courses cannot spawn new sessions.
    #[error("Course {0} is archived")]
    Archived(CourseId),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// The ticketing service could not supply the event being imported.
    #[error("Ticketing gateway error ({kind}): {message}")]
    Gateway {
        kind: GatewayErrorKind,
        message: String,
    },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl CourseError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CourseError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        CourseError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CourseError::NotFound(_) => ErrorCode::CourseNotFound,
            CourseError::IllegalTransition { .. } | CourseError::Archived(_) => {
                ErrorCode::InvalidStateTransition
            }
            CourseError::PermissionDenied(_) => ErrorCode::Forbidden,
            CourseError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CourseError::Gateway { .. } => ErrorCode::ExternalServiceError,
            CourseError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ValidationError> for CourseError {
    fn from(err: ValidationError) -> Self {
        CourseError::validation(err.field().to_string(), err.to_string())
    }
}

impl From<DomainError> for CourseError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => CourseError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => CourseError::Infrastructure(err.to_string()),
        }
    }
}
