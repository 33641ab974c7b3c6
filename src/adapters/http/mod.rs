//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure;
//! `router` mounts them behind the auth middleware.

pub mod course;
pub mod error;
mod health;
pub mod middleware;
mod router;
pub mod session;

pub use course::CourseHandlers;
pub use error::ErrorResponse;
pub use router::app_router;
pub use session::SessionHandlers;
