//! HS256 JWT validator.
//!
//! Validates bearer tokens signed with a shared secret. The `sub` claim
//! becomes the actor's identity; `name` (or `preferred_username`) its
//! display name.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedActor, UserId};
use crate::ports::TokenValidator;

/// Configuration for HS256 validation.
#[derive(Clone)]
pub struct JwtConfig {
    secret: Vec<u8>,
    issuer: Option<String>,
    leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            issuer: None,
            leeway_secs: 30,
        }
    }

    /// Require tokens to carry this `iss` claim.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

/// Claims read from a staff token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,

    /// Expiry timestamp (Unix epoch seconds)
    exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    preferred_username: Option<String>,
}

/// Token validator for HS256-signed JWTs.
pub struct JwtTokenValidator {
    config: JwtConfig,
    decoding_key: DecodingKey,
}

impl JwtTokenValidator {
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(&config.secret);
        Self {
            config,
            decoding_key,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.config.leeway_secs;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &self.config.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

#[async_trait]
impl TokenValidator for JwtTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedActor, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    ErrorKind::InvalidIssuer => {
                        tracing::warn!("Invalid issuer in token");
                        AuthError::InvalidToken
                    }
                    _ => {
                        tracing::warn!("Token validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            })?;
        let claims = token_data.claims;

        let actor_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!("Invalid subject in token: {:?}", claims.sub);
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedActor::new(
            actor_id,
            claims.name.or(claims.preferred_username),
        ))
    }
}

impl std::fmt::Debug for JwtTokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenValidator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
