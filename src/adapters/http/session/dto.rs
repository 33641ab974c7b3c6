//! HTTP DTOs for session endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, Money};
use crate::domain::publication::DesyncWarning;
use crate::domain::session::{Session, SessionState, SyncStatus};
use crate::ports::{RemoteAttendee, SessionFilter};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Query parameters for listing sessions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSessionsQuery {
    #[serde(default)]
    pub state: Option<SessionState>,
    #[serde(default)]
    pub sync_status: Option<SyncStatus>,
    #[serde(default)]
    pub course_id: Option<CourseId>,
}

impl From<ListSessionsQuery> for SessionFilter {
    fn from(query: ListSessionsQuery) -> Self {
        SessionFilter {
            state: query.state,
            sync_status: query.sync_status,
            course_id: query.course_id,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoneyResponse {
    pub currency: String,
    pub amount_minor: i64,
}

impl From<&Money> for MoneyResponse {
    fn from(money: &Money) -> Self {
        Self {
            currency: money.currency().as_str().to_string(),
            amount_minor: money.amount_minor(),
        }
    }
}

/// Detailed session view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub course_id: String,
    pub name: String,
    pub state: SessionState,
    pub sync_status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_ticket_class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_ref: Option<String>,
    pub min_enrollment: u16,
    pub max_enrollment: u16,
    pub ticket_price: MoneyResponse,
    pub material_cost: MoneyResponse,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        let details = session.details();
        Self {
            id: session.id().to_string(),
            course_id: session.course_id().to_string(),
            name: session.name().to_string(),
            state: session.state(),
            sync_status: session.sync_status(),
            remote_event_id: session.remote().map(|r| r.event_id.to_string()),
            remote_ticket_class_id: session
                .remote()
                .and_then(|r| r.ticket_class_id.as_ref())
                .map(|t| t.to_string()),
            calendar_ref: session.calendar_ref().map(|c| c.to_string()),
            min_enrollment: details.enrollment.min(),
            max_enrollment: details.enrollment.max(),
            ticket_price: (&details.ticket_price).into(),
            material_cost: (&details.material_cost).into(),
            version: session.version(),
            created_at: session.created_at().as_datetime().to_rfc3339(),
            updated_at: session.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

/// List of sessions, most recently updated first.
#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub items: Vec<SessionResponse>,
    pub total: usize,
}

impl From<Vec<Session>> for SessionListResponse {
    fn from(sessions: Vec<Session>) -> Self {
        Self {
            total: sessions.len(),
            items: sessions.iter().map(Into::into).collect(),
        }
    }
}

/// Remote cancellation that failed; the local cancel still happened.
#[derive(Debug, Clone, Serialize)]
pub struct DesyncWarningResponse {
    pub remote_event_id: String,
    pub message: String,
}

impl From<DesyncWarning> for DesyncWarningResponse {
    fn from(warning: DesyncWarning) -> Self {
        Self {
            remote_event_id: warning.remote_event_id.to_string(),
            message: warning.message,
        }
    }
}

/// Response for cancel.
#[derive(Debug, Clone, Serialize)]
pub struct CancelSessionResponse {
    pub session: SessionResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desync_warning: Option<DesyncWarningResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendeeResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub checked_in: bool,
}

impl From<RemoteAttendee> for AttendeeResponse {
    fn from(attendee: RemoteAttendee) -> Self {
        Self {
            id: attendee.id,
            name: attendee.name,
            email: attendee.email,
            ticket_class_name: attendee.ticket_class_name,
            status: attendee.status,
            checked_in: attendee.checked_in,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendeeListResponse {
    pub session_id: String,
    pub attendees: Vec<AttendeeResponse>,
    pub total: usize,
}
