//! Ticketing service configuration (Eventbrite-shaped API)

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;
use crate::domain::foundation::Currency;

/// Ticketing configuration
#[derive(Clone, Deserialize)]
pub struct TicketingConfig {
    /// OAuth token for the service
    pub api_token: String,

    /// API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// ISO 4217 code events are listed in
    #[serde(default = "default_currency")]
    pub currency: String,

    /// IANA zone events are displayed in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Deadline for each gateway or calendar call, in seconds
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,
}

impl TicketingConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// The configured currency, parsed.
    pub fn currency(&self) -> Result<Currency, ValidationError> {
        Currency::new(&self.currency)
            .map_err(|_| ValidationError::InvalidCurrency(self.currency.clone()))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate ticketing configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.api_token.is_empty() {
            return Err(ValidationError::MissingRequired("TICKETING__API_TOKEN"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ValidationError::InvalidTicketingUrl);
        }
        if *environment == Environment::Production && !self.base_url.starts_with("https://") {
            return Err(ValidationError::TicketingUrlMustBeHttps);
        }
        if self.timezone.trim().is_empty() {
            return Err(ValidationError::MissingRequired("TICKETING__TIMEZONE"));
        }
        if self.call_timeout_secs == 0 || self.call_timeout_secs > 120 {
            return Err(ValidationError::InvalidCallTimeout);
        }
        self.currency().map(|_| ())
    }
}

impl fmt::Debug for TicketingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketingConfig")
            .field("api_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("currency", &self.currency)
            .field("timezone", &self.timezone)
            .field("call_timeout_secs", &self.call_timeout_secs)
            .finish()
    }
}

impl Default for TicketingConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: default_base_url(),
            currency: default_currency(),
            timezone: default_timezone(),
            call_timeout_secs: default_call_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.eventbriteapi.com/v3".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

fn default_call_timeout() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> TicketingConfig {
        TicketingConfig {
            api_token: "EB-TOKEN".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_ticketing_defaults() {
        let config = TicketingConfig::default();
        assert_eq!(config.call_timeout(), Duration::from_secs(15));
        assert_eq!(config.currency().unwrap(), Currency::usd());
        assert_eq!(config.base_url(), "https://www.eventbriteapi.com/v3");
    }

    #[test]
    fn test_validation_missing_token() {
        let config = TicketingConfig::default();
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_production_requires_https() {
        let config = TicketingConfig {
            base_url: "http://localhost:9000".to_string(),
            ..valid()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::TicketingUrlMustBeHttps)
        );
    }

    #[test]
    fn test_invalid_currency() {
        let config = TicketingConfig {
            currency: "dollars".to_string(),
            ..valid()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidCurrency("dollars".to_string()))
        );
    }

    #[test]
    fn test_call_timeout_bounds() {
        let config = TicketingConfig {
            call_timeout_secs: 0,
            ..valid()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidCallTimeout)
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = TicketingConfig {
            base_url: "https://tickets.example.org/v3/".to_string(),
            ..valid()
        };
        assert_eq!(config.base_url(), "https://tickets.example.org/v3");
    }

    #[test]
    fn test_debug_redacts_token() {
        assert!(!format!("{:?}", valid()).contains("EB-TOKEN"));
    }
}
