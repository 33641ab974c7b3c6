//! HTTP DTOs for course endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::session::MoneyResponse;
use crate::domain::catalog::{Course, CourseState};
use crate::domain::foundation::CalendarEventId;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to schedule a session of a course.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Recurring-event specification the session follows.
    #[serde(default)]
    pub calendar_ref: Option<CalendarEventId>,
}

/// Request to import a remote event as a new course.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportEventRequest {
    pub remote_event_id: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub id: String,
    pub name: String,
    pub state: CourseState,
    pub blurb: String,
    pub description: String,
    pub min_enrollment: u16,
    pub max_enrollment: u16,
    pub ticket_price: MoneyResponse,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        let details = course.details();
        Self {
            id: course.id().to_string(),
            name: course.name().to_string(),
            state: course.state(),
            blurb: details.blurb.clone(),
            description: details.description.clone(),
            min_enrollment: details.enrollment.min(),
            max_enrollment: details.enrollment.max(),
            ticket_price: (&details.ticket_price).into(),
            created_at: course.created_at().as_datetime().to_rfc3339(),
            updated_at: course.updated_at().as_datetime().to_rfc3339(),
        }
    }
}
