//! Publication synchronization errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::binding::RemoteEventId;
use crate::domain::foundation::{Currency, ErrorCode};

/// Whether re-invoking publish can be expected to help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorKind {
    /// Transport failure, timeout, rate limit or remote 5xx.
    Transient,
    /// Remote rejected the request; needs operator attention.
    Permanent,
}

impl GatewayErrorKind {
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayErrorKind::Transient)
    }
}

impl fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayErrorKind::Transient => write!(f, "transient"),
            GatewayErrorKind::Permanent => write!(f, "permanent"),
        }
    }
}

/// Failure of `synchronize`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// No calendar, an open-ended recurrence, or no occurrences at all.
    #[error("Schedule is indeterminate: {reason}")]
    IndeterminateSchedule { reason: String },

    /// Event creation failed; nothing is bound.
    #[error("Ticketing gateway error ({kind}): {message}")]
    Gateway {
        kind: GatewayErrorKind,
        message: String,
    },

    /// Event exists remotely and is bound, but its ticket class is missing.
    #[error("Remote event {remote_event_id} has no ticket class ({kind}): {message}")]
    PartialSync {
        remote_event_id: RemoteEventId,
        kind: GatewayErrorKind,
        message: String,
    },

    /// A price is in a different currency from the one events are listed in.
    #[error("{field} is priced in {found}, events are listed in {expected}")]
    CurrencyMismatch {
        field: &'static str,
        expected: Currency,
        found: Currency,
    },

    /// Sync progress could not be written back.
    #[error("Could not record sync progress: {0}")]
    Persistence(String),
}

impl SyncError {
    pub fn indeterminate(reason: impl Into<String>) -> Self {
        SyncError::IndeterminateSchedule {
            reason: reason.into(),
        }
    }

    pub fn gateway(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        SyncError::Gateway {
            kind,
            message: message.into(),
        }
    }

    /// True if re-invoking publish may succeed without operator action.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Gateway { kind, .. } | SyncError::PartialSync { kind, .. } => {
                kind.is_transient()
            }
            SyncError::Persistence(_) => true,
            SyncError::IndeterminateSchedule { .. } | SyncError::CurrencyMismatch { .. } => false,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SyncError::IndeterminateSchedule { .. } | SyncError::CurrencyMismatch { .. } => {
                ErrorCode::ValidationFailed
            }
            SyncError::Gateway { .. } | SyncError::PartialSync { .. } => {
                ErrorCode::ExternalServiceError
            }
            SyncError::Persistence(_) => ErrorCode::DatabaseError,
        }
    }
}

/// Remote cancellation that did not go through. Never blocks the local cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesyncWarning {
    pub remote_event_id: RemoteEventId,
    pub message: String,
}
