//! Session-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | PermissionDenied | 403 |
//! | IllegalTransition | 409 |
//! | Conflict | 409 |
//! | PublicationInProgress | 409 |
//! | Sync(IndeterminateSchedule) | 422 |
//! | Sync(Gateway/PartialSync) | 502 / 503 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use thiserror::Error;

use super::guards::LifecycleAction;
use super::state::SessionState;
use crate::domain::foundation::{DomainError, ErrorCode, Permission, SessionId, ValidationError};
use crate::domain::publication::{RemoteEventId, SyncError};

/// Errors raised by session lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    /// Guard refused for the current state; nothing changed.
    #[error("Cannot {action} a session in state {state}")]
    IllegalTransition {
        action: LifecycleAction,
        state: SessionState,
    },

    /// Actor lacks the permission the operation needs; nothing changed.
    #[error("Permission '{permission}' required to {action}")]
    PermissionDenied {
        action: LifecycleAction,
        permission: Permission,
    },

    /// Actor may not read this part of the session.
    #[error("Permission '{0}' required")]
    Forbidden(Permission),

    /// The session already points at a different remote event.
    #[error("Session is bound to remote event {existing}, not {attempted}")]
    BindingMismatch {
        existing: RemoteEventId,
        attempted: RemoteEventId,
    },

    /// Another publisher holds the session's publication claim.
    #[error("Session {0} is already being published")]
    PublicationInProgress(SessionId),

    /// Optimistic-lock retries ran out.
    #[error("Session {0} was modified concurrently")]
    Conflict(SessionId),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl SessionError {
    pub fn illegal(action: LifecycleAction, state: SessionState) -> Self {
        SessionError::IllegalTransition { action, state }
    }

    pub fn permission_denied(action: LifecycleAction) -> Self {
        SessionError::PermissionDenied {
            action,
            permission: Permission::ManageSessionState,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::IllegalTransition { .. } | SessionError::BindingMismatch { .. } => {
                ErrorCode::InvalidStateTransition
            }
            SessionError::PermissionDenied { .. } | SessionError::Forbidden(_) => {
                ErrorCode::Forbidden
            }
            SessionError::Conflict(_) | SessionError::PublicationInProgress(_) => {
                ErrorCode::ConcurrencyConflict
            }
            SessionError::Sync(err) => err.code(),
            SessionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SessionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::validation(err.field().to_string(), err.to_string())
    }
}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => SessionError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => SessionError::Infrastructure(err.to_string()),
        }
    }
}
