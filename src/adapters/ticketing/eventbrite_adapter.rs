//! Eventbrite ticketing adapter.
//!
//! Implements the `TicketingGateway` trait against the Eventbrite v3 REST API.
//!
//! # Security
//!
//! - The OAuth token is held as `secrecy::SecretString` and only exposed
//!   when building the `Authorization` header
//!
//! # Configuration
//!
//! ```ignore
//! let config = EventbriteConfig::new(token).with_base_url(base_url);
//! let gateway = EventbriteGateway::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::domain::publication::{EventSpec, RemoteEventId, RemoteTicketClassId, TicketClassSpec};
use crate::ports::{
    RemoteAttendee, RemoteEvent, RemoteEventDetails, RemoteTicketClass, TicketingError,
    TicketingErrorCode, TicketingGateway,
};

use super::eventbrite_types::{
    CreateEventRequest, CreateTicketClassRequest, EbAttendee, EbAttendeePage, EbError, EbEvent,
    EbTicketClass,
};

/// Public API root.
pub const DEFAULT_BASE_URL: &str = "https://www.eventbriteapi.com/v3";

/// Upper bound on attendee pages followed for one listing.
const MAX_ATTENDEE_PAGES: usize = 200;

/// Eventbrite API configuration.
#[derive(Clone)]
pub struct EventbriteConfig {
    /// Private OAuth token.
    api_token: SecretString,

    /// API root without trailing slash.
    api_base_url: String,
}

impl EventbriteConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: SecretString::new(api_token.into()),
            api_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (sandbox or local stub).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.api_base_url
    }
}

impl std::fmt::Debug for EventbriteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventbriteConfig")
            .field("api_token", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Eventbrite ticketing adapter.
pub struct EventbriteGateway {
    config: EventbriteConfig,
    http_client: reqwest::Client,
}

impl EventbriteGateway {
    pub fn new(config: EventbriteConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.config.api_token.expose_secret())
    }

    /// Sends a request and decodes a successful JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<T, TicketingError> {
        let response = self.dispatch(request, operation).await?;
        response.json::<T>().await.map_err(|e| {
            TicketingError::new(
                TicketingErrorCode::Unknown,
                format!("Failed to parse Eventbrite {} response: {}", operation, e),
            )
        })
    }

    /// Sends a request and classifies any non-success status.
    async fn dispatch(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<Response, TicketingError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| TicketingError::network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        let message = EbError::describe(&error_text);
        tracing::error!(
            operation,
            status = status.as_u16(),
            error = %message,
            "Eventbrite call failed"
        );
        Err(TicketingError::from_status(
            status.as_u16(),
            format!("Eventbrite API error: {}", message),
        ))
    }
}

#[async_trait]
impl TicketingGateway for EventbriteGateway {
    async fn create_event(&self, spec: &EventSpec) -> Result<RemoteEvent, TicketingError> {
        let request = self
            .http_client
            .post(self.url("events/"))
            .header("Idempotency-Key", &spec.idempotency_key)
            .json(&CreateEventRequest::from_spec(spec));

        let event: EbEvent = self.send(request, "create_event").await?;
        let remote = to_remote_event(event)?;

        tracing::info!(event_id = %remote.id, "Created Eventbrite event");
        Ok(remote)
    }

    async fn create_ticket_class(
        &self,
        event_id: &RemoteEventId,
        spec: &TicketClassSpec,
    ) -> Result<RemoteTicketClass, TicketingError> {
        let request = self
            .http_client
            .post(self.url(&format!("events/{}/ticket_classes/", event_id)))
            .json(&CreateTicketClassRequest::from_spec(spec));

        let ticket_class: EbTicketClass = self.send(request, "create_ticket_class").await?;
        let remote = to_remote_ticket_class(ticket_class)?;

        tracing::info!(
            event_id = %event_id,
            ticket_class_id = %remote.id,
            "Created Eventbrite ticket class"
        );
        Ok(remote)
    }

    async fn cancel_event(&self, event_id: &RemoteEventId) -> Result<(), TicketingError> {
        let request = self
            .http_client
            .post(self.url(&format!("events/{}/cancel/", event_id)));

        self.dispatch(request, "cancel_event").await?;
        tracing::info!(event_id = %event_id, "Canceled Eventbrite event");
        Ok(())
    }

    async fn get_event(
        &self,
        event_id: &RemoteEventId,
    ) -> Result<RemoteEventDetails, TicketingError> {
        let request = self
            .http_client
            .get(self.url(&format!("events/{}/", event_id)))
            .query(&[("expand", "ticket_classes")]);

        let event: EbEvent = self.send(request, "get_event").await?;
        to_remote_event_details(event)
    }

    async fn list_attendees(
        &self,
        event_id: &RemoteEventId,
    ) -> Result<Vec<RemoteAttendee>, TicketingError> {
        let mut attendees = Vec::new();
        let mut continuation: Option<String> = None;

        for _ in 0..MAX_ATTENDEE_PAGES {
            let mut request = self
                .http_client
                .get(self.url(&format!("events/{}/attendees/", event_id)));
            if let Some(token) = &continuation {
                request = request.query(&[("continuation", token.as_str())]);
            }

            let page: EbAttendeePage = self.send(request, "list_attendees").await?;
            attendees.extend(page.attendees.into_iter().map(to_remote_attendee));

            continuation = page
                .pagination
                .filter(|p| p.has_more_items)
                .and_then(|p| p.continuation);
            if continuation.is_none() {
                return Ok(attendees);
            }
        }

        tracing::warn!(
            event_id = %event_id,
            fetched = attendees.len(),
            "Attendee listing truncated at page limit"
        );
        Ok(attendees)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response mapping
// ════════════════════════════════════════════════════════════════════════════

fn malformed(what: &str) -> TicketingError {
    TicketingError::new(
        TicketingErrorCode::Unknown,
        format!("Eventbrite returned a malformed {}", what),
    )
}

fn to_remote_event(event: EbEvent) -> Result<RemoteEvent, TicketingError> {
    Ok(RemoteEvent {
        id: RemoteEventId::new(event.id).map_err(|_| malformed("event id"))?,
        url: event.url,
        status: event.status,
    })
}

fn to_remote_ticket_class(ticket_class: EbTicketClass) -> Result<RemoteTicketClass, TicketingError> {
    Ok(RemoteTicketClass {
        id: RemoteTicketClassId::new(ticket_class.id).map_err(|_| malformed("ticket class id"))?,
        cost: ticket_class.cost.as_ref().and_then(|c| c.to_money()),
        name: ticket_class.name,
        quantity_total: ticket_class.quantity_total,
    })
}

fn to_remote_event_details(event: EbEvent) -> Result<RemoteEventDetails, TicketingError> {
    let ticket_classes = event
        .ticket_classes
        .into_iter()
        .map(to_remote_ticket_class)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RemoteEventDetails {
        id: RemoteEventId::new(event.id).map_err(|_| malformed("event id"))?,
        name: event.name.into(),
        description: event.description.into(),
        capacity: event.capacity.unwrap_or(0),
        start: event.start.map(|s| s.utc),
        end: event.end.map(|e| e.utc),
        ticket_classes,
    })
}

fn to_remote_attendee(attendee: EbAttendee) -> RemoteAttendee {
    RemoteAttendee {
        id: attendee.id,
        name: attendee.profile.name.unwrap_or_default(),
        email: attendee.profile.email,
        ticket_class_name: attendee.ticket_class_name,
        status: attendee.status,
        checked_in: attendee.checked_in,
    }
}
