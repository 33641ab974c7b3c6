//! Mock token validator for testing.
//!
//! Maps fixed bearer strings to actors so HTTP tests can authenticate
//! without minting JWTs.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockTokenValidator::new().with_test_actor("staff-token", "staff-1");
//!
//! let actor = validator.validate("staff-token").await?;
//! assert_eq!(actor.id.as_str(), "staff-1");
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedActor, UserId};
use crate::ports::TokenValidator;

/// Mock token validator for testing.
///
/// Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockTokenValidator {
    tokens: RwLock<HashMap<String, AuthenticatedActor>>,
    /// Returned for every validation while set
    force_error: RwLock<Option<AuthError>>,
}

impl MockTokenValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actor(self, token: impl Into<String>, actor: AuthenticatedActor) -> Self {
        self.tokens
            .write()
            .expect("MockTokenValidator: lock poisoned")
            .insert(token.into(), actor);
        self
    }

    /// Registers a token for an actor with the given id and no display name.
    ///
    /// # Panics
    ///
    /// If `actor_id` is blank.
    pub fn with_test_actor(self, token: impl Into<String>, actor_id: impl Into<String>) -> Self {
        let id = UserId::new(actor_id).expect("MockTokenValidator: blank actor id");
        self.with_actor(token, AuthenticatedActor::new(id, None))
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .expect("MockTokenValidator: lock poisoned") = Some(error);
        self
    }

    pub fn clear_error(&self) {
        *self
            .force_error
            .write()
            .expect("MockTokenValidator: lock poisoned") = None;
    }
}

#[async_trait]
impl TokenValidator for MockTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedActor, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .expect("MockTokenValidator: lock poisoned")
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .expect("MockTokenValidator: lock poisoned")
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
