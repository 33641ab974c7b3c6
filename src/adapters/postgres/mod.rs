//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresSessionRepository` - Sessions with optimistic version checks
//! - `PostgresCourseRepository` - Course templates
//! - `PostgresInstructorReader` - Instructors joined with their person records
//! - `PostgresTemplateTextReader` - Keyword snapshots for description rendering
//! - `PostgresPermissionOracle` - Grant table lookups (fail-secure)
//! - `PostgresCalendarProvider` - Recurring-event specifications and occurrences

mod calendar_provider;
mod course_repository;
mod instructor_reader;
mod permission_oracle;
mod session_repository;
mod template_text_reader;

pub use calendar_provider::PostgresCalendarProvider;
pub use course_repository::PostgresCourseRepository;
pub use instructor_reader::PostgresInstructorReader;
pub use permission_oracle::PostgresPermissionOracle;
pub use session_repository::PostgresSessionRepository;
pub use template_text_reader::PostgresTemplateTextReader;
