//! Ticketing gateway port for the external event-ticketing service.
//!
//! Defines the contract for creating remote events and ticket classes,
//! cancelling events, and reading them back (import, attendee lists).
//!
//! # Design
//!
//! - **Service agnostic**: Works with any Eventbrite-shaped API
//! - **Classified failures**: Every error says whether a retry can help
//! - **Idempotent creation**: `EventSpec` carries an idempotency key

use crate::domain::catalog::ImportedEvent;
use crate::domain::foundation::{Money, Timestamp, ValidationError};
use crate::domain::publication::{
    EventSpec, GatewayErrorKind, MultipartText, RemoteEventId, RemoteTicketClassId,
    TicketClassSpec,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for the ticketing service.
#[async_trait]
pub trait TicketingGateway: Send + Sync {
    /// Create a remote event.
    async fn create_event(&self, spec: &EventSpec) -> Result<RemoteEvent, TicketingError>;

    /// Create a ticket class on an existing remote event.
    async fn create_ticket_class(
        &self,
        event_id: &RemoteEventId,
        spec: &TicketClassSpec,
    ) -> Result<RemoteTicketClass, TicketingError>;

    /// Cancel a remote event.
    async fn cancel_event(&self, event_id: &RemoteEventId) -> Result<(), TicketingError>;

    /// Fetch an event with its ticket classes.
    async fn get_event(&self, event_id: &RemoteEventId)
        -> Result<RemoteEventDetails, TicketingError>;

    /// List attendees registered for an event.
    async fn list_attendees(
        &self,
        event_id: &RemoteEventId,
    ) -> Result<Vec<RemoteAttendee>, TicketingError>;
}

/// Event as returned on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: RemoteEventId,

    /// Public listing URL, if the service returned one.
    pub url: Option<String>,

    /// Service-side status (e.g. `draft`, `live`).
    pub status: Option<String>,
}

/// Ticket class as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTicketClass {
    pub id: RemoteTicketClassId,
    pub name: String,

    /// Absent for free tickets.
    pub cost: Option<Money>,

    pub quantity_total: u32,
}

/// Full event, as fetched for import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEventDetails {
    pub id: RemoteEventId,
    pub name: MultipartText,
    pub description: MultipartText,
    pub capacity: u32,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub ticket_classes: Vec<RemoteTicketClass>,
}

impl RemoteEventDetails {
    /// The fields a course copies from a remote event.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if the capacity does not fit an enrollment count
    pub fn to_imported_event(&self) -> Result<ImportedEvent, ValidationError> {
        let capacity = u16::try_from(self.capacity).map_err(|_| {
            ValidationError::out_of_range(
                "capacity",
                1,
                i64::from(u16::MAX),
                i64::from(self.capacity),
            )
        })?;
        Ok(ImportedEvent {
            name: self.name.text.clone(),
            description_text: self.description.text.clone(),
            capacity,
            first_ticket_cost: self.ticket_classes.first().and_then(|t| t.cost.clone()),
        })
    }
}

/// Someone registered for a remote event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAttendee {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub ticket_class_name: Option<String>,

    /// Service-side status (e.g. `attending`, `refunded`).
    pub status: Option<String>,

    pub checked_in: bool,
}

/// Errors from ticketing service operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketingError {
    pub code: TicketingErrorCode,

    pub message: String,

    /// HTTP status returned by the service, if any.
    pub status: Option<u16>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl TicketingError {
    pub fn new(code: TicketingErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TicketingErrorCode::NetworkError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TicketingErrorCode::Timeout, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(TicketingErrorCode::InvalidRequest, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(TicketingErrorCode::NotFound, format!("{} not found", resource))
    }

    /// Classifies an HTTP status: 429 and 5xx are transient, other 4xx permanent.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let code = match status {
            401 | 403 => TicketingErrorCode::AuthenticationError,
            404 => TicketingErrorCode::NotFound,
            429 => TicketingErrorCode::RateLimitExceeded,
            400..=499 => TicketingErrorCode::InvalidRequest,
            500..=599 => TicketingErrorCode::ProviderError,
            _ => TicketingErrorCode::Unknown,
        };
        Self::new(code, message).with_status(status)
    }

    pub fn kind(&self) -> GatewayErrorKind {
        if self.retryable {
            GatewayErrorKind::Transient
        } else {
            GatewayErrorKind::Permanent
        }
    }
}

impl std::fmt::Display for TicketingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for TicketingError {}

/// Ticketing error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketingErrorCode {
    /// Connection failed before a response arrived.
    NetworkError,

    /// Call exceeded the configured deadline.
    Timeout,

    /// Token rejected.
    AuthenticationError,

    NotFound,

    RateLimitExceeded,

    /// Remote validation rejected the request.
    InvalidRequest,

    /// Remote 5xx.
    ProviderError,

    /// Response could not be understood.
    Unknown,
}

impl TicketingErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TicketingErrorCode::NetworkError
                | TicketingErrorCode::Timeout
                | TicketingErrorCode::RateLimitExceeded
                | TicketingErrorCode::ProviderError
        )
    }
}

impl std::fmt::Display for TicketingErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TicketingErrorCode::NetworkError => "network_error",
            TicketingErrorCode::Timeout => "timeout",
            TicketingErrorCode::AuthenticationError => "authentication_error",
            TicketingErrorCode::NotFound => "not_found",
            TicketingErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            TicketingErrorCode::InvalidRequest => "invalid_request",
            TicketingErrorCode::ProviderError => "provider_error",
            TicketingErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
