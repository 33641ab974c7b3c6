//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    cancel_session, get_session, list_attendees, list_sessions, publish_session, submit_session,
    SessionHandlers,
};

/// Creates the session router, mounted at `/api/sessions`.
///
/// # Routes
/// - `GET /` - List sessions (`state`, `sync_status`, `course_id` filters)
/// - `GET /:id` - Session details
/// - `GET /:id/attendees` - Attendees of the remote event
/// - `POST /:id/submit` - Draft → needs approval
/// - `POST /:id/publish` - Publish to the ticketing service
/// - `POST /:id/cancel` - Cancel, then cancel remotely
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", get(list_sessions))
        .route("/:id", get(get_session))
        .route("/:id/attendees", get(list_attendees))
        .route("/:id/submit", post(submit_session))
        .route("/:id/publish", post(publish_session))
        .route("/:id/cancel", post(cancel_session))
        .with_state(handlers)
}
