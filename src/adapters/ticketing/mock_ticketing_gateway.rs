//! Mock ticketing gateway for testing.
//!
//! Behaves like a well-mannered ticketing service: event creation is
//! deduplicated by idempotency key, created events can be fetched back,
//! and every call is recorded for assertions.
//!
//! # Features
//!
//! - Scripted failures per operation (consumed in order)
//! - Simulated latency for timeout testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let gateway = MockTicketingGateway::new();
//! gateway.fail_next(GatewayOperation::CreateTicketClass, TicketingError::timeout("slow"));
//!
//! let event = gateway.create_event(&spec).await?;
//! assert!(gateway.create_ticket_class(&event.id, &ticket).await.is_err());
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::publication::{EventSpec, RemoteEventId, RemoteTicketClassId, TicketClassSpec};
use crate::ports::{
    RemoteAttendee, RemoteEvent, RemoteEventDetails, RemoteTicketClass, TicketingError,
    TicketingGateway,
};

/// Gateway operations that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    CreateEvent,
    CreateTicketClass,
    CancelEvent,
    GetEvent,
    ListAttendees,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    events: HashMap<String, RemoteEventDetails>,
    by_idempotency_key: HashMap<String, RemoteEventId>,
    attendees: HashMap<String, Vec<RemoteAttendee>>,
    failures: HashMap<GatewayOperation, VecDeque<TicketingError>>,
    created_events: Vec<EventSpec>,
    created_ticket_classes: Vec<(RemoteEventId, TicketClassSpec)>,
    canceled_events: Vec<RemoteEventId>,
}

/// In-memory stand-in for the remote ticketing service.
#[derive(Debug, Clone, Default)]
pub struct MockTicketingGateway {
    state: Arc<Mutex<State>>,
    delay: Duration,
}

impl MockTicketingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds latency to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Seeds an event that exists remotely (for imports).
    pub fn with_event(self, event: RemoteEventDetails) -> Self {
        self.lock().events.insert(event.id.as_str().to_string(), event);
        self
    }

    pub fn with_attendees(self, event_id: &RemoteEventId, attendees: Vec<RemoteAttendee>) -> Self {
        self.lock()
            .attendees
            .insert(event_id.as_str().to_string(), attendees);
        self
    }

    /// Queues a failure for the next call of `operation`.
    pub fn fail_next(&self, operation: GatewayOperation, error: TicketingError) {
        self.lock()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    // === Test Helpers ===

    /// Specs passed to `create_event`, including deduplicated repeats.
    pub fn created_events(&self) -> Vec<EventSpec> {
        self.lock().created_events.clone()
    }

    /// Distinct remote events that exist.
    pub fn remote_event_count(&self) -> usize {
        self.lock().events.len()
    }

    pub fn created_ticket_classes(&self) -> Vec<(RemoteEventId, TicketClassSpec)> {
        self.lock().created_ticket_classes.clone()
    }

    pub fn canceled_events(&self) -> Vec<RemoteEventId> {
        self.lock().canceled_events.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("MockTicketingGateway: lock poisoned")
    }

    async fn begin(&self, operation: GatewayOperation) -> Result<(), TicketingError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self
            .lock()
            .failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn next_id(state: &mut State, prefix: &str) -> String {
        state.next_id += 1;
        format!("{}-{}", prefix, state.next_id)
    }
}

#[async_trait]
impl TicketingGateway for MockTicketingGateway {
    async fn create_event(&self, spec: &EventSpec) -> Result<RemoteEvent, TicketingError> {
        self.begin(GatewayOperation::CreateEvent).await?;
        let mut state = self.lock();
        state.created_events.push(spec.clone());

        if let Some(existing) = state.by_idempotency_key.get(&spec.idempotency_key) {
            return Ok(RemoteEvent {
                id: existing.clone(),
                url: None,
                status: Some("draft".to_string()),
            });
        }

        let raw = Self::next_id(&mut state, "evt");
        let id = RemoteEventId::new(raw.clone())
            .map_err(|e| TicketingError::invalid_request(e.to_string()))?;
        state
            .by_idempotency_key
            .insert(spec.idempotency_key.clone(), id.clone());
        state.events.insert(
            raw.clone(),
            RemoteEventDetails {
                id: id.clone(),
                name: spec.name.clone(),
                description: spec.description.clone(),
                capacity: u32::from(spec.capacity),
                start: Some(spec.start),
                end: Some(spec.end),
                ticket_classes: Vec::new(),
            },
        );

        Ok(RemoteEvent {
            id,
            url: Some(format!("https://tickets.example.test/e/{}", raw)),
            status: Some("draft".to_string()),
        })
    }

    async fn create_ticket_class(
        &self,
        event_id: &RemoteEventId,
        spec: &TicketClassSpec,
    ) -> Result<RemoteTicketClass, TicketingError> {
        self.begin(GatewayOperation::CreateTicketClass).await?;
        let mut state = self.lock();
        if !state.events.contains_key(event_id.as_str()) {
            return Err(TicketingError::not_found("event"));
        }

        let raw = Self::next_id(&mut state, "tc");
        let ticket_class = RemoteTicketClass {
            id: RemoteTicketClassId::new(raw)
                .map_err(|e| TicketingError::invalid_request(e.to_string()))?,
            name: spec.name.clone(),
            cost: (!spec.free).then(|| spec.cost.clone()),
            quantity_total: u32::from(spec.quantity_total),
        };
        state
            .created_ticket_classes
            .push((event_id.clone(), spec.clone()));
        if let Some(event) = state.events.get_mut(event_id.as_str()) {
            event.ticket_classes.push(ticket_class.clone());
        }
        Ok(ticket_class)
    }

    async fn cancel_event(&self, event_id: &RemoteEventId) -> Result<(), TicketingError> {
        self.begin(GatewayOperation::CancelEvent).await?;
        let mut state = self.lock();
        if !state.events.contains_key(event_id.as_str()) {
            return Err(TicketingError::not_found("event"));
        }
        state.canceled_events.push(event_id.clone());
        Ok(())
    }

    async fn get_event(
        &self,
        event_id: &RemoteEventId,
    ) -> Result<RemoteEventDetails, TicketingError> {
        self.begin(GatewayOperation::GetEvent).await?;
        self.lock()
            .events
            .get(event_id.as_str())
            .cloned()
            .ok_or_else(|| TicketingError::not_found("event"))
    }

    async fn list_attendees(
        &self,
        event_id: &RemoteEventId,
    ) -> Result<Vec<RemoteAttendee>, TicketingError> {
        self.begin(GatewayOperation::ListAttendees).await?;
        let state = self.lock();
        if !state.events.contains_key(event_id.as_str())
            && !state.attendees.contains_key(event_id.as_str())
        {
            return Err(TicketingError::not_found("event"));
        }
        Ok(state
            .attendees
            .get(event_id.as_str())
            .cloned()
            .unwrap_or_default())
    }
}
