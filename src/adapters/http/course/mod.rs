//! HTTP adapter for course endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CourseResponse, CreateSessionRequest, ImportEventRequest};
pub use handlers::CourseHandlers;
pub use routes::course_routes;
