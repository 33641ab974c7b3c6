//! Workshop Catalog - course catalog backend for a community workshop.
//!
//! Courses are templates; sessions are scheduled instances that move through
//! an approval lifecycle and are published to an external ticketing service.
//! Descriptions are rendered through a `{{keyword}}` template engine before
//! publication.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
