//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## External Collaborators
//!
//! - `PermissionOracle` - "does actor X hold permission P on object O"
//! - `CalendarProvider` - Recurring-event descriptions and occurrences
//! - `TicketingGateway` - Remote events, ticket classes and attendees
//! - `TokenValidator` - Bearer token validation
//!
//! ## Persistence
//!
//! - `SessionRepository` - Session aggregates with optimistic concurrency
//! - `CourseRepository` - Course aggregates
//! - `InstructorReader` - Instructor lookups for collaborator checks
//! - `TemplateTextReader` - Snapshots of the keyword store

mod calendar_provider;
mod course_repository;
mod instructor_reader;
mod permission_oracle;
mod session_repository;
mod template_text_reader;
mod ticketing_gateway;
mod token_validator;

pub use calendar_provider::{CalendarProvider, RecurrenceDescription};
pub use course_repository::CourseRepository;
pub use instructor_reader::InstructorReader;
pub use permission_oracle::{PermissionOracle, ResourceRef};
pub use session_repository::{SessionFilter, SessionRepository};
pub use template_text_reader::TemplateTextReader;
pub use ticketing_gateway::{
    RemoteAttendee, RemoteEvent, RemoteEventDetails, RemoteTicketClass, TicketingError,
    TicketingErrorCode, TicketingGateway,
};
pub use token_validator::TokenValidator;
