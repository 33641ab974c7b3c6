//! Catalog domain module.
//!
//! Courses are templates; rooms and categories are the sets a course is
//! filed under. Sessions copy `CourseDetails` when they are created.

mod course;
mod details;
mod errors;
mod room;

pub use course::{Course, CourseState, ImportedEvent};
pub use details::{
    BilledHours, CourseDetails, EnrollmentBounds, MaterialCostCollection, DEFAULT_PREREQUISITES,
};
pub use errors::CourseError;
pub use room::{Category, Room};
