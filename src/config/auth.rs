//! Authentication configuration

use serde::Deserialize;
use std::fmt;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum HS256 key length accepted in production.
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Bearer token settings (HS256 JWTs).
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret
    pub jwt_secret: String,

    /// Expected `iss` claim, if tokens carry one
    pub issuer: Option<String>,

    /// Clock skew tolerated when checking `exp`, in seconds
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Short secrets are tolerated in development only.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if *environment == Environment::Production
            && self.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN
        {
            return Err(ValidationError::JwtSecretTooShort);
        }
        Ok(())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: None,
            leeway_secs: default_leeway(),
        }
    }
}

fn default_leeway() -> u64 {
    30
}
