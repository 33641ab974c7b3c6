//! Token validation port.
//!
//! HTTP middleware uses this to turn a Bearer token into an
//! `AuthenticatedActor`. Implementations exist for HS256 JWTs and for tests.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedActor};

/// Validates access tokens and extracts the actor identity.
///
/// # Contract
///
/// Implementations must:
/// - Validate the token signature
/// - Validate issuer and expiry claims
/// - Return `AuthError::InvalidToken` for malformed/bad signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedActor, AuthError>;
}
