//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - Repositories, permission grants and calendar tables
//! - `ticketing` - Eventbrite gateway (and a mock)
//! - `auth` - Bearer token validation
//! - `http` - axum routes, DTOs and middleware
//! - `memory` - In-process adapters for tests and local runs

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod ticketing;
