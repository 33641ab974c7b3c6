//! People domain module.
//!
//! An `Instructor` embeds a `Person` value rather than extending it.

mod instructor;
mod person;
pub mod policy;

pub use instructor::{
    instructor_names, EmploymentType, Instructor, InstructorFinancials, PaymentType,
    DEFAULT_REVENUE_SHARE,
};
pub use person::{ContactMethod, Person};
