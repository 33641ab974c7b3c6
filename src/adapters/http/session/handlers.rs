//! HTTP handlers for session endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{gateway_status, invalid_id, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::session::{
    CancelSessionCommand, CancelSessionHandler, GetSessionHandler, GetSessionQuery,
    ListSessionsHandler, ListSessionsQuery as ListSessionsAppQuery, LoadAttendeesHandler,
    LoadAttendeesQuery, PublishSessionCommand, PublishSessionHandler, SubmitForApprovalCommand,
    SubmitForApprovalHandler,
};
use crate::domain::foundation::SessionId;
use crate::domain::publication::SyncError;
use crate::domain::session::SessionError;

use super::dto::{
    AttendeeListResponse, CancelSessionResponse, ListSessionsQuery, SessionListResponse,
    SessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    submit_handler: Arc<SubmitForApprovalHandler>,
    publish_handler: Arc<PublishSessionHandler>,
    cancel_handler: Arc<CancelSessionHandler>,
    get_handler: Arc<GetSessionHandler>,
    list_handler: Arc<ListSessionsHandler>,
    attendees_handler: Arc<LoadAttendeesHandler>,
}

impl SessionHandlers {
    pub fn new(
        submit_handler: Arc<SubmitForApprovalHandler>,
        publish_handler: Arc<PublishSessionHandler>,
        cancel_handler: Arc<CancelSessionHandler>,
        get_handler: Arc<GetSessionHandler>,
        list_handler: Arc<ListSessionsHandler>,
        attendees_handler: Arc<LoadAttendeesHandler>,
    ) -> Self {
        Self {
            submit_handler,
            publish_handler,
            cancel_handler,
            get_handler,
            list_handler,
            attendees_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions/:id/submit - Ask staff to approve a draft
pub async fn submit_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(actor): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return invalid_id("session");
    };

    let cmd = SubmitForApprovalCommand {
        actor: actor.id,
        session_id,
    };

    match handlers.submit_handler.handle(cmd).await {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/sessions/:id/publish - Publish to the ticketing service
pub async fn publish_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(actor): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return invalid_id("session");
    };

    let cmd = PublishSessionCommand {
        actor: actor.id,
        session_id,
    };

    match handlers.publish_handler.handle(cmd).await {
        Ok(result) => {
            (StatusCode::OK, Json(SessionResponse::from(&result.session))).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/sessions/:id/cancel - Cancel locally, then remotely
pub async fn cancel_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(actor): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return invalid_id("session");
    };

    let cmd = CancelSessionCommand {
        actor: actor.id,
        session_id,
    };

    match handlers.cancel_handler.handle(cmd).await {
        Ok(result) => {
            let response = CancelSessionResponse {
                session: SessionResponse::from(&result.session),
                desync_warning: result.desync_warning.map(Into::into),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

/// GET /api/sessions/:id - Get session details
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(_actor): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return invalid_id("session");
    };

    match handlers.get_handler.handle(GetSessionQuery { session_id }).await {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// GET /api/sessions - List sessions, optionally filtered
pub async fn list_sessions(
    State(handlers): State<SessionHandlers>,
    RequireAuth(_actor): RequireAuth,
    Query(query_params): Query<ListSessionsQuery>,
) -> Response {
    let query = ListSessionsAppQuery {
        filter: query_params.into(),
    };

    match handlers.list_handler.handle(query).await {
        Ok(sessions) => (StatusCode::OK, Json(SessionListResponse::from(sessions))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// GET /api/sessions/:id/attendees - Attendees of the bound remote event
pub async fn list_attendees(
    State(handlers): State<SessionHandlers>,
    RequireAuth(actor): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return invalid_id("session");
    };

    let query = LoadAttendeesQuery {
        actor: actor.id,
        session_id,
    };

    match handlers.attendees_handler.handle(query).await {
        Ok(attendees) => {
            let response = AttendeeListResponse {
                session_id: session_id.to_string(),
                total: attendees.len(),
                attendees: attendees.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_session_error(error: SessionError) -> Response {
    let message = error.to_string();
    match error {
        SessionError::NotFound(id) => {
            ErrorResponse::not_found("Session", &id.to_string()).into_response_with(StatusCode::NOT_FOUND)
        }
        SessionError::PermissionDenied { .. } | SessionError::Forbidden(_) => {
            ErrorResponse::forbidden(message).into_response_with(StatusCode::FORBIDDEN)
        }
        SessionError::IllegalTransition { state, .. } => ErrorResponse::conflict(message)
            .with_details(serde_json::json!({ "state": state }))
            .into_response_with(StatusCode::CONFLICT),
        SessionError::BindingMismatch { .. }
        | SessionError::Conflict(_)
        | SessionError::PublicationInProgress(_) => {
            ErrorResponse::conflict(message).into_response_with(StatusCode::CONFLICT)
        }
        SessionError::ValidationFailed { .. } => {
            ErrorResponse::bad_request(message).into_response_with(StatusCode::BAD_REQUEST)
        }
        SessionError::Sync(sync) => handle_sync_error(sync, message),
        SessionError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "Session operation failed");
            ErrorResponse::internal("Internal error").into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn handle_sync_error(error: SyncError, message: String) -> Response {
    match error {
        SyncError::IndeterminateSchedule { .. } | SyncError::CurrencyMismatch { .. } => {
            ErrorResponse::unprocessable(message)
                .into_response_with(StatusCode::UNPROCESSABLE_ENTITY)
        }
        SyncError::Gateway { kind, .. } => ErrorResponse::gateway(message)
            .with_details(serde_json::json!({ "kind": kind, "retryable": kind.is_transient() }))
            .into_response_with(gateway_status(kind)),
        SyncError::PartialSync {
            remote_event_id,
            kind,
            ..
        } => ErrorResponse::new("PARTIAL_SYNC", message)
            .with_details(serde_json::json!({
                "remote_event_id": remote_event_id,
                "kind": kind,
                "retryable": kind.is_transient(),
            }))
            .into_response_with(gateway_status(kind)),
        SyncError::Persistence(msg) => {
            tracing::error!(error = %msg, "Sync progress not recorded");
            ErrorResponse::internal("Internal error").into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
