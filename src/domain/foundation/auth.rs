//! Authentication types for the domain layer.
//!
//! These types represent an authenticated actor extracted from a bearer token.
//! Any token issuer can populate them via the `TokenValidator` port.

use super::UserId;
use thiserror::Error;

/// Actor extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identity from the token subject.
    pub id: UserId,

    /// Display name if the token carries one.
    pub display_name: Option<String>,
}

impl AuthenticatedActor {
    pub fn new(id: UserId, display_name: Option<String>) -> Self {
        Self { id, display_name }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// The validator could not be reached or is misconfigured.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
