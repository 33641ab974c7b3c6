//! Course command handlers.

mod change_course_state;
mod convert_event_to_course;

pub use change_course_state::{ChangeCourseStateCommand, ChangeCourseStateHandler};
pub use convert_event_to_course::{ConvertEventToCourseCommand, ConvertEventToCourseHandler};
