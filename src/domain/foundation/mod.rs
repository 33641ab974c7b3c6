//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and the state machine
//! trait that form the vocabulary of the workshop catalog domain.

mod auth;
mod authorization;
mod errors;
mod ids;
mod money;
mod percentage;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedActor};
pub use authorization::Permission;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    CalendarEventId, CategoryId, CourseId, InstructorId, PersonId, RoomId, SessionId, UserId,
};
pub use money::{Currency, Money};
pub use percentage::Percentage;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
