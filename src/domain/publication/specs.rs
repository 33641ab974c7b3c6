//! What gets sent to the ticketing service when a session is published.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::multipart::MultipartText;
use crate::domain::catalog::CourseDetails;
use crate::domain::foundation::{Currency, Money, SessionId, Timestamp, ValidationError};

/// Base name of the single ticket class every published session gets.
pub const GENERAL_ADMISSION: &str = "General Admission";

/// One meeting of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Occurrence {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, ValidationError> {
        if end.is_before(&start) {
            return Err(ValidationError::invalid_format(
                "occurrence",
                "end is before start",
            ));
        }
        Ok(Self { start, end })
    }
}

/// First start and last end of a finite, non-empty list of occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceSpan {
    pub start: Timestamp,
    pub end: Timestamp,
    pub count: usize,
}

impl OccurrenceSpan {
    /// Returns `None` for an empty list.
    pub fn from_occurrences(occurrences: &[Occurrence]) -> Option<Self> {
        let start = occurrences.iter().map(|o| o.start).min()?;
        let end = occurrences.iter().map(|o| o.end).max()?;
        Some(Self {
            start,
            end,
            count: occurrences.len(),
        })
    }
}

/// Event creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpec {
    pub name: MultipartText,
    pub description: MultipartText,
    /// Rendered blurb.
    pub summary: Option<MultipartText>,
    pub start: Timestamp,
    pub end: Timestamp,
    /// IANA zone the service should display times in.
    pub timezone: String,
    pub capacity: u16,
    pub currency: Currency,
    /// Stable per session so a repeated create can be recognised remotely.
    pub idempotency_key: String,
}

/// Ticket class creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketClassSpec {
    pub name: String,
    pub description: String,
    pub quantity_total: u16,
    pub cost: Money,
    pub free: bool,
    pub donation: bool,
    pub include_fee: bool,
}

impl TicketClassSpec {
    /// Paid general admission sized to the session's maximum enrollment.
    pub fn general_admission(details: &CourseDetails) -> Self {
        let name = if details.material_cost_collection.is_in_ticket() {
            format!("{} + Materials", GENERAL_ADMISSION)
        } else {
            GENERAL_ADMISSION.to_string()
        };
        Self {
            name,
            description: String::new(),
            quantity_total: details.enrollment.max(),
            cost: details.ticket_price.clone(),
            free: false,
            donation: false,
            include_fee: false,
        }
    }
}

/// Derives the event-creation idempotency key from the session id.
pub fn event_idempotency_key(session_id: &SessionId) -> String {
    let name = format!("session:{}:event", session_id);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
}
