//! Ticketing adapters.
//!
//! Implements the `TicketingGateway` port for the Eventbrite v3 API, plus an
//! in-process mock for tests and local runs.
//!
//! # Configuration
//!
//! Required environment variables:
//! - `WORKSHOP_CATALOG__TICKETING__API_TOKEN`: private OAuth token

mod eventbrite_adapter;
mod eventbrite_types;
mod mock_ticketing_gateway;

pub use eventbrite_adapter::{EventbriteConfig, EventbriteGateway, DEFAULT_BASE_URL};
pub use mock_ticketing_gateway::{GatewayOperation, MockTicketingGateway};
