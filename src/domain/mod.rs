//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, state machine trait)
//! - `catalog` - Courses, rooms and categories
//! - `people` - Persons, instructors and authorization policies
//! - `session` - Session aggregate and lifecycle state machine
//! - `publication` - Remote bindings, event/ticket specifications and sync errors
//! - `template_text` - Keyword snippets and `{{keyword}}` substitution

pub mod catalog;
pub mod foundation;
pub mod people;
pub mod publication;
pub mod session;
pub mod template_text;
