//! HTTP routes for course endpoints.

use axum::{routing::post, Router};

use super::handlers::{
    archive_course, create_session, import_event, restore_course, CourseHandlers,
};

/// Creates the course router, mounted at `/api/courses`.
///
/// # Routes
/// - `POST /import-event` - Import a remote event as a course
/// - `POST /:id/sessions` - Schedule a session of the course
/// - `POST /:id/archive` - Archive the course
/// - `POST /:id/restore` - Make an archived course current again
pub fn course_routes(handlers: CourseHandlers) -> Router {
    Router::new()
        .route("/import-event", post(import_event))
        .route("/:id/sessions", post(create_session))
        .route("/:id/archive", post(archive_course))
        .route("/:id/restore", post(restore_course))
        .with_state(handlers)
}
