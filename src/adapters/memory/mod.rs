//! In-memory adapters for tests and local runs without a database.
//!
//! # Security Note
//!
//! These adapters are for **testing only**. They use `.expect()` on lock
//! operations which will panic if a lock is poisoned.

mod catalog_store;
mod session_repository;
mod static_calendar;
mod static_oracle;

pub use catalog_store::{InMemoryCourseRepository, InMemoryInstructorReader, InMemoryTemplateTextStore};
pub use session_repository::InMemorySessionRepository;
pub use static_calendar::StaticCalendarProvider;
pub use static_oracle::StaticPermissionOracle;
