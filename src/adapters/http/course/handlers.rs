//! HTTP handlers for course endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{gateway_status, invalid_id, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::session::SessionResponse;
use crate::application::handlers::course::{
    ChangeCourseStateCommand, ChangeCourseStateHandler, ConvertEventToCourseCommand,
    ConvertEventToCourseHandler,
};
use crate::application::handlers::session::{CreateSessionCommand, CreateSessionHandler};
use crate::domain::catalog::{CourseError, CourseState};
use crate::domain::foundation::{CourseId, UserId};
use crate::domain::publication::RemoteEventId;

use super::dto::{CourseResponse, CreateSessionRequest, ImportEventRequest};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct CourseHandlers {
    create_session_handler: Arc<CreateSessionHandler>,
    import_handler: Arc<ConvertEventToCourseHandler>,
    change_state_handler: Arc<ChangeCourseStateHandler>,
}

impl CourseHandlers {
    pub fn new(
        create_session_handler: Arc<CreateSessionHandler>,
        import_handler: Arc<ConvertEventToCourseHandler>,
        change_state_handler: Arc<ChangeCourseStateHandler>,
    ) -> Self {
        Self {
            create_session_handler,
            import_handler,
            change_state_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/courses/:id/sessions - Schedule a draft session
pub async fn create_session(
    State(handlers): State<CourseHandlers>,
    RequireAuth(actor): RequireAuth,
    Path(course_id): Path<String>,
    body: Option<Json<CreateSessionRequest>>,
) -> Response {
    let Ok(course_id) = course_id.parse::<CourseId>() else {
        return invalid_id("course");
    };
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let cmd = CreateSessionCommand {
        actor: actor.id,
        course_id,
        calendar_ref: req.calendar_ref,
    };

    match handlers.create_session_handler.handle(cmd).await {
        Ok(session) => {
            (StatusCode::CREATED, Json(SessionResponse::from(&session))).into_response()
        }
        Err(e) => handle_course_error(e),
    }
}

/// POST /api/courses/import-event - Create a course from a remote event
pub async fn import_event(
    State(handlers): State<CourseHandlers>,
    RequireAuth(actor): RequireAuth,
    Json(req): Json<ImportEventRequest>,
) -> Response {
    let Ok(remote_event_id) = RemoteEventId::new(req.remote_event_id) else {
        return ErrorResponse::bad_request("remote_event_id cannot be empty")
            .into_response_with(StatusCode::BAD_REQUEST);
    };

    let cmd = ConvertEventToCourseCommand {
        actor: actor.id,
        remote_event_id,
    };

    match handlers.import_handler.handle(cmd).await {
        Ok(course) => (StatusCode::CREATED, Json(CourseResponse::from(&course))).into_response(),
        Err(e) => handle_course_error(e),
    }
}

/// POST /api/courses/:id/archive
pub async fn archive_course(
    State(handlers): State<CourseHandlers>,
    RequireAuth(actor): RequireAuth,
    Path(course_id): Path<String>,
) -> Response {
    change_state(handlers, actor.id, course_id, CourseState::Archived).await
}

/// POST /api/courses/:id/restore
pub async fn restore_course(
    State(handlers): State<CourseHandlers>,
    RequireAuth(actor): RequireAuth,
    Path(course_id): Path<String>,
) -> Response {
    change_state(handlers, actor.id, course_id, CourseState::Current).await
}

async fn change_state(
    handlers: CourseHandlers,
    actor: UserId,
    course_id: String,
    target: CourseState,
) -> Response {
    let Ok(course_id) = course_id.parse::<CourseId>() else {
        return invalid_id("course");
    };

    let cmd = ChangeCourseStateCommand {
        actor,
        course_id,
        target,
    };

    match handlers.change_state_handler.handle(cmd).await {
        Ok(course) => (StatusCode::OK, Json(CourseResponse::from(&course))).into_response(),
        Err(e) => handle_course_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_course_error(error: CourseError) -> Response {
    let message = error.to_string();
    match error {
        CourseError::NotFound(id) => {
            ErrorResponse::not_found("Course", &id.to_string()).into_response_with(StatusCode::NOT_FOUND)
        }
        CourseError::PermissionDenied(_) => {
            ErrorResponse::forbidden(message).into_response_with(StatusCode::FORBIDDEN)
        }
        CourseError::IllegalTransition { .. } | CourseError::Archived(_) => {
            ErrorResponse::conflict(message).into_response_with(StatusCode::CONFLICT)
        }
        CourseError::ValidationFailed { .. } => {
            ErrorResponse::bad_request(message).into_response_with(StatusCode::BAD_REQUEST)
        }
        CourseError::Gateway { kind, .. } => ErrorResponse::gateway(message)
            .with_details(serde_json::json!({ "kind": kind, "retryable": kind.is_transient() }))
            .into_response_with(gateway_status(kind)),
        CourseError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "Course operation failed");
            ErrorResponse::internal("Internal error").into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
