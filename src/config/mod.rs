//! Typed settings read from the process environment.
//!
//! Every key lives under the `WORKSHOP_CATALOG` prefix with `__` between
//! path segments, so `WORKSHOP_CATALOG__TICKETING__CURRENCY=CAD` sets
//! `ticketing.currency`. A `.env` file in the working directory is read
//! first when present.

mod auth;
mod database;
mod error;
mod lifecycle;
mod server;
mod ticketing;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use lifecycle::LifecycleConfig;
pub use server::{Environment, ServerConfig};
pub use ticketing::TicketingConfig;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    /// Eventbrite credentials and publishing defaults
    pub ticketing: TicketingConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub lifecycle: LifecycleConfig,
}

impl AppConfig {
    /// Reads `.env` (if any) and the prefixed environment.
    ///
    /// Missing required keys or unparseable values fail here. Range and
    /// format checks are left to [`AppConfig::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WORKSHOP_CATALOG")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .map_err(ConfigError::from)
    }

    /// Runs each section's checks; production tightens the ticketing and
    /// auth rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.ticketing.validate(&self.server.environment)?;
        self.auth.validate(&self.server.environment)?;
        self.lifecycle.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
