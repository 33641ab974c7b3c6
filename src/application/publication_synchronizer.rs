//! PublicationSynchronizer - pushes a session to the ticketing service.
//!
//! Publication is a two-step remote protocol (event, then ticket class).
//! Progress is written back to the session after each step so a failed
//! run can be resumed without creating a second remote event. The caller
//! holds the session's publication claim for the whole run; the claim is
//! cleared when the run ends either way.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use uuid::Uuid;

use super::deadline;
use super::handlers::session::transition::apply_with_retry;
use super::handlers::DEFAULT_CONFLICT_RETRIES;
use crate::domain::foundation::{Currency, DomainError};
use crate::domain::publication::{
    event_idempotency_key, DesyncWarning, EventSpec, GatewayErrorKind, MultipartText, OccurrenceSpan,
    RemoteBinding, RemoteEventId, SyncError, TicketClassSpec,
};
use crate::domain::session::{Session, SessionError};
use crate::domain::template_text::TemplateSnapshot;
use crate::ports::{
    CalendarProvider, SessionRepository, TemplateTextReader, TicketingError, TicketingGateway,
};

/// Settings for talking to the ticketing service.
#[derive(Debug, Clone)]
pub struct SynchronizerSettings {
    /// Deadline for each gateway and calendar call.
    pub call_timeout: Duration,
    /// Currency events are listed in.
    pub currency: Currency,
    /// IANA zone events are displayed in.
    pub timezone: String,
    /// Re-reads allowed when recording progress races another writer.
    pub conflict_retries: u32,
}

impl Default for SynchronizerSettings {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(15),
            currency: Currency::usd(),
            timezone: "America/Chicago".to_string(),
            conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }
}

pub struct PublicationSynchronizer {
    gateway: Arc<dyn TicketingGateway>,
    calendar: Arc<dyn CalendarProvider>,
    templates: Arc<dyn TemplateTextReader>,
    sessions: Arc<dyn SessionRepository>,
    settings: SynchronizerSettings,
}

impl PublicationSynchronizer {
    pub fn new(
        gateway: Arc<dyn TicketingGateway>,
        calendar: Arc<dyn CalendarProvider>,
        templates: Arc<dyn TemplateTextReader>,
        sessions: Arc<dyn SessionRepository>,
        settings: SynchronizerSettings,
    ) -> Self {
        Self {
            gateway,
            calendar,
            templates,
            sessions,
            settings,
        }
    }

    pub fn call_timeout(&self) -> Duration {
        self.settings.call_timeout
    }

    /// Resolves the schedule and pushes the session.
    ///
    /// The session must already be in ready_to_publish.
    pub async fn synchronize(&self, session: &mut Session) -> Result<RemoteBinding, SyncError> {
        let span = self.resolve_schedule(session).await?;
        self.push(session, span).await
    }

    /// First start and last end of the session's meetings.
    ///
    /// # Errors
    ///
    /// - `IndeterminateSchedule` without a calendar, for an open-ended
    ///   recurrence, or when no occurrence falls in the window
    /// - `Gateway` (transient) if the calendar fails or times out
    pub async fn resolve_schedule(&self, session: &Session) -> Result<OccurrenceSpan, SyncError> {
        let calendar_ref = session
            .calendar_ref()
            .ok_or_else(|| SyncError::indeterminate("session has no calendar event"))?;
        let limit = self.settings.call_timeout;

        let description = deadline::external(limit, "describe", self.calendar.describe(calendar_ref))
            .await
            .map_err(calendar_failure)?
            .ok_or_else(|| SyncError::indeterminate("calendar event does not exist"))?;
        if description.is_open_ended() {
            return Err(SyncError::indeterminate(
                "recurrence has no end of recurring period",
            ));
        }

        let (window_start, window_end) = description.occurrence_window();
        let occurrences = deadline::external(
            limit,
            "occurrences",
            self.calendar
                .occurrences(calendar_ref, window_start, window_end),
        )
        .await
        .map_err(calendar_failure)?;

        OccurrenceSpan::from_occurrences(&occurrences)
            .ok_or_else(|| SyncError::indeterminate("recurrence yields no occurrences"))
    }

    /// Creates (or reuses) the remote event, then its ticket class.
    ///
    /// On failure the session's publication claim is released so the
    /// publish can be retried at once.
    ///
    /// # Errors
    ///
    /// - `Gateway` if event creation fails; nothing is bound
    /// - `PartialSync` if the ticket class fails; the event stays bound
    /// - `Persistence` if progress could not be written back
    pub async fn push(
        &self,
        session: &mut Session,
        span: OccurrenceSpan,
    ) -> Result<RemoteBinding, SyncError> {
        let claim = session.publication_claim().copied();
        let result = self.push_claimed(session, span).await;
        if let (Err(_), Some(claim)) = (&result, claim) {
            self.release(session, &claim.token).await;
        }
        result
    }

    async fn push_claimed(
        &self,
        session: &mut Session,
        span: OccurrenceSpan,
    ) -> Result<RemoteBinding, SyncError> {
        self.check_currency(session)?;
        let limit = self.settings.call_timeout;

        let event_id = match session.remote_event_id().cloned() {
            Some(existing) => {
                info!(
                    session_id = %session.id(),
                    remote_event_id = %existing,
                    "Resuming publication at ticket class"
                );
                existing
            }
            None => {
                let spec = self.event_spec(session, span).await?;
                let event = deadline::ticketing(limit, "create_event", self.gateway.create_event(&spec))
                    .await
                    .map_err(|e| SyncError::gateway(e.kind(), e.message))?;
                info!(
                    session_id = %session.id(),
                    remote_event_id = %event.id,
                    occurrences = span.count,
                    "Remote event created"
                );

                let bound = self
                    .record(session, |s| s.record_remote_event(event.id.clone()))
                    .await;
                if let Err(e) = bound {
                    warn!(
                        session_id = %session.id(),
                        remote_event_id = %event.id,
                        error = %e,
                        "Remote event created but binding not stored"
                    );
                    return Err(e);
                }
                event.id
            }
        };

        let ticket_spec = TicketClassSpec::general_admission(session.details());
        let ticket_class = deadline::ticketing(
            limit,
            "create_ticket_class",
            self.gateway.create_ticket_class(&event_id, &ticket_spec),
        )
        .await
        .map_err(|e| partial_sync(session, &event_id, e))?;

        self.record(session, |s| s.complete_publication(ticket_class.id.clone()))
            .await?;
        info!(
            session_id = %session.id(),
            remote_event_id = %event_id,
            ticket_class_id = %ticket_class.id,
            "Session published"
        );

        session
            .remote()
            .cloned()
            .ok_or_else(|| SyncError::Persistence("binding lost after publication".to_string()))
    }

    /// Best-effort remote cancellation. Never fails; problems come back as
    /// a warning for the caller to surface.
    pub async fn desync(&self, event_id: &RemoteEventId) -> Option<DesyncWarning> {
        let result = deadline::ticketing(
            self.settings.call_timeout,
            "cancel_event",
            self.gateway.cancel_event(event_id),
        )
        .await;

        match result {
            Ok(()) => {
                info!(remote_event_id = %event_id, "Remote event canceled");
                None
            }
            Err(e) => {
                warn!(
                    remote_event_id = %event_id,
                    error = %e,
                    "Remote event could not be canceled; listing is out of date"
                );
                Some(DesyncWarning {
                    remote_event_id: event_id.clone(),
                    message: e.to_string(),
                })
            }
        }
    }

    async fn event_spec(&self, session: &Session, span: OccurrenceSpan) -> Result<EventSpec, SyncError> {
        let details = session.details();
        let snapshot = self.snapshot().await?;
        let description = snapshot.render(&details.description);
        let summary = snapshot.render(&details.blurb);

        Ok(EventSpec {
            name: MultipartText::plain(details.name.clone()),
            description: MultipartText::from_markdown(description),
            summary: (!summary.trim().is_empty()).then(|| MultipartText::from_markdown(summary)),
            start: span.start,
            end: span.end,
            timezone: self.settings.timezone.clone(),
            capacity: details.enrollment.max(),
            currency: self.settings.currency.clone(),
            idempotency_key: event_idempotency_key(session.id()),
        })
    }

    /// The ticket price must be in the listing currency; the remote service
    /// would otherwise read the amount in the wrong unit.
    pub fn check_currency(&self, session: &Session) -> Result<(), SyncError> {
        let price = session.details().ticket_price.currency();
        let expected = &self.settings.currency;
        if price != expected {
            return Err(SyncError::CurrencyMismatch {
                field: "ticket price",
                expected: expected.clone(),
                found: price.clone(),
            });
        }
        Ok(())
    }

    async fn snapshot(&self) -> Result<TemplateSnapshot, SyncError> {
        self.templates
            .snapshot()
            .await
            .map_err(|e| SyncError::Persistence(format!("template texts unavailable: {}", e)))
    }

    /// Applies `change` to the stored session and writes it back,
    /// re-reading on version conflicts so remote progress is never dropped.
    async fn record<F>(&self, session: &mut Session, change: F) -> Result<(), SyncError>
    where
        F: FnMut(&mut Session) -> Result<(), SessionError>,
    {
        let (stored, ()) = apply_with_retry(
            self.sessions.as_ref(),
            session.id(),
            self.settings.conflict_retries,
            change,
        )
        .await
        .map_err(|e| SyncError::Persistence(e.to_string()))?;
        *session = stored;
        Ok(())
    }

    async fn release(&self, session: &mut Session, token: &Uuid) {
        let released = apply_with_retry(
            self.sessions.as_ref(),
            session.id(),
            self.settings.conflict_retries,
            |s| Ok(s.release_publication(token)),
        )
        .await;

        match released {
            Ok((stored, _)) => *session = stored,
            Err(e) => warn!(
                session_id = %session.id(),
                error = %e,
                "Publication claim not released; it lapses with its lease"
            ),
        }
    }
}

fn calendar_failure(err: DomainError) -> SyncError {
    SyncError::gateway(
        GatewayErrorKind::Transient,
        format!("calendar: {}", err),
    )
}

fn partial_sync(session: &Session, event_id: &RemoteEventId, err: TicketingError) -> SyncError {
    warn!(
        session_id = %session.id(),
        remote_event_id = %event_id,
        error = %err,
        "Ticket class creation failed; session left partially synced"
    );
    SyncError::PartialSync {
        remote_event_id: event_id.clone(),
        kind: err.kind(),
        message: err.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemorySessionRepository, InMemoryTemplateTextStore, StaticCalendarProvider,
    };
    use crate::adapters::ticketing::{GatewayOperation, MockTicketingGateway};
    use crate::domain::catalog::{Course, CourseDetails, EnrollmentBounds, MaterialCostCollection};
    use crate::domain::foundation::{CalendarEventId, CourseId, Money, SessionId, Timestamp};
    use crate::domain::publication::Occurrence;
    use crate::domain::session::{SessionState, SyncStatus};
    use crate::domain::template_text::{TemplateKeyword, TemplateText};
    use crate::ports::RecurrenceDescription;
    use chrono::{TimeZone, Utc};

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn ts(day: u32, hour: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap())
    }

    fn ready_session(calendar_ref: Option<CalendarEventId>) -> Session {
        let details = CourseDetails::new(
            "Intro to Blacksmithing",
            "Bring {{ safety }} and curiosity.",
            EnrollmentBounds::new(4, 20).unwrap(),
            Money::new(5000, Currency::usd()).unwrap(),
        )
        .unwrap()
        .with_blurb("Hit *hot* metal.")
        .with_material_cost(
            Money::new(1500, Currency::usd()).unwrap(),
            MaterialCostCollection::Ticket,
        );
        let course = Course::new(CourseId::new(), details);
        let mut session = Session::from_course(SessionId::new(), &course).unwrap();
        if let Some(calendar_ref) = calendar_ref {
            session.attach_calendar(calendar_ref).unwrap();
        }
        session.begin_publish(true).unwrap();
        session
    }

    fn three_weeks(calendar_ref: CalendarEventId) -> StaticCalendarProvider {
        let description = RecurrenceDescription {
            title: "Blacksmithing".to_string(),
            start: ts(2, 18),
            end: ts(2, 21),
            rule: Some("weekly".to_string()),
            end_recurring_period: Some(ts(16, 23)),
        };
        let occurrences = [2, 9, 16]
            .iter()
            .map(|d| Occurrence::new(ts(*d, 18), ts(*d, 21)).unwrap())
            .collect();
        StaticCalendarProvider::new().with_schedule(calendar_ref, description, occurrences)
    }

    struct Fixture {
        gateway: MockTicketingGateway,
        sessions: Arc<InMemorySessionRepository>,
        synchronizer: PublicationSynchronizer,
    }

    fn fixture(session: &Session, calendar: StaticCalendarProvider) -> Fixture {
        let gateway = MockTicketingGateway::new();
        let sessions = Arc::new(InMemorySessionRepository::new().with_session(session.clone()));
        let templates = InMemoryTemplateTextStore::new().with_text(TemplateText::new(
            TemplateKeyword::new("safety").unwrap(),
            "**closed-toe shoes**",
        ));
        let synchronizer = PublicationSynchronizer::new(
            Arc::new(gateway.clone()),
            Arc::new(calendar),
            Arc::new(templates),
            sessions.clone(),
            SynchronizerSettings::default(),
        );
        Fixture {
            gateway,
            sessions,
            synchronizer,
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn synchronize_publishes_event_and_ticket_class() {
        let calendar_ref = CalendarEventId::new();
        let mut session = ready_session(Some(calendar_ref));
        let fx = fixture(&session, three_weeks(calendar_ref));

        let binding = fx.synchronizer.synchronize(&mut session).await.unwrap();

        assert!(binding.is_complete());
        assert_eq!(session.state(), SessionState::Public);
        assert_eq!(session.sync_status(), SyncStatus::Synced);

        let events = fx.gateway.created_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start, ts(2, 18));
        assert_eq!(events[0].end, ts(16, 21));
        assert_eq!(events[0].capacity, 20);
        let summary = events[0].summary.as_ref().unwrap();
        assert_eq!(summary.text, "Hit *hot* metal.");
        assert_eq!(summary.html, "<p>Hit <em>hot</em> metal.</p>\n");
        assert!(events[0].description.text.contains("**closed-toe shoes**"));
        assert!(events[0]
            .description
            .html
            .contains("<strong>closed-toe shoes</strong>"));

        let tickets = fx.gateway.created_ticket_classes();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].1.name, "General Admission + Materials");
        assert_eq!(tickets[0].1.quantity_total, 20);
        assert_eq!(tickets[0].1.cost.to_gateway_string(), "USD,5000");

        let stored = fx.sessions.get(session.id()).unwrap();
        assert_eq!(stored.state(), SessionState::Public);
    }

    #[tokio::test]
    async fn missing_calendar_is_indeterminate() {
        let mut session = ready_session(None);
        let fx = fixture(&session, StaticCalendarProvider::new());

        let err = fx.synchronizer.synchronize(&mut session).await.unwrap_err();

        assert!(matches!(err, SyncError::IndeterminateSchedule { .. }));
        assert!(fx.gateway.created_events().is_empty());
    }

    #[tokio::test]
    async fn open_ended_recurrence_is_indeterminate() {
        let calendar_ref = CalendarEventId::new();
        let session = ready_session(Some(calendar_ref));
        let description = RecurrenceDescription {
            title: "Forever".to_string(),
            start: ts(2, 18),
            end: ts(2, 21),
            rule: Some("weekly".to_string()),
            end_recurring_period: None,
        };
        let calendar = StaticCalendarProvider::new().with_schedule(calendar_ref, description, vec![]);
        let fx = fixture(&session, calendar);

        let err = fx.synchronizer.resolve_schedule(&session).await.unwrap_err();
        assert!(matches!(err, SyncError::IndeterminateSchedule { .. }));
    }

    #[tokio::test]
    async fn empty_occurrence_list_is_indeterminate() {
        let calendar_ref = CalendarEventId::new();
        let session = ready_session(Some(calendar_ref));
        let description = RecurrenceDescription {
            title: "Never".to_string(),
            start: ts(2, 18),
            end: ts(2, 21),
            rule: None,
            end_recurring_period: None,
        };
        let calendar = StaticCalendarProvider::new().with_schedule(calendar_ref, description, vec![]);
        let fx = fixture(&session, calendar);

        let err = fx.synchronizer.resolve_schedule(&session).await.unwrap_err();
        assert!(matches!(err, SyncError::IndeterminateSchedule { .. }));
    }

    #[tokio::test]
    async fn calendar_outage_is_transient() {
        let calendar_ref = CalendarEventId::new();
        let session = ready_session(Some(calendar_ref));
        let calendar = three_weeks(calendar_ref);
        calendar.set_unavailable(true);
        let fx = fixture(&session, calendar);

        let err = fx.synchronizer.resolve_schedule(&session).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn event_failure_leaves_session_unbound() {
        let calendar_ref = CalendarEventId::new();
        let mut session = ready_session(Some(calendar_ref));
        let fx = fixture(&session, three_weeks(calendar_ref));
        fx.gateway.fail_next(
            GatewayOperation::CreateEvent,
            TicketingError::from_status(400, "venue required"),
        );

        let err = fx.synchronizer.synchronize(&mut session).await.unwrap_err();

        assert_eq!(
            err,
            SyncError::gateway(GatewayErrorKind::Permanent, "venue required")
        );
        assert_eq!(session.state(), SessionState::ReadyToPublish);
        assert!(session.remote().is_none());
        assert!(session.publication_claim().is_none());
        assert!(fx.gateway.created_ticket_classes().is_empty());
    }

    #[tokio::test]
    async fn currency_mismatch_stops_before_the_gateway() {
        let calendar_ref = CalendarEventId::new();
        let mut session = ready_session(Some(calendar_ref));
        let gateway = MockTicketingGateway::new();
        let sessions = Arc::new(InMemorySessionRepository::new().with_session(session.clone()));
        let synchronizer = PublicationSynchronizer::new(
            Arc::new(gateway.clone()),
            Arc::new(three_weeks(calendar_ref)),
            Arc::new(InMemoryTemplateTextStore::new()),
            sessions.clone(),
            SynchronizerSettings {
                currency: Currency::new("CAD").unwrap(),
                ..SynchronizerSettings::default()
            },
        );

        let err = synchronizer.synchronize(&mut session).await.unwrap_err();

        assert_eq!(
            err,
            SyncError::CurrencyMismatch {
                field: "ticket price",
                expected: Currency::new("CAD").unwrap(),
                found: Currency::usd(),
            }
        );
        assert!(gateway.created_events().is_empty());
        assert!(session.publication_claim().is_none());
        assert_eq!(sessions.get(session.id()).unwrap().state(), SessionState::ReadyToPublish);
    }

    #[tokio::test]
    async fn binding_survives_a_racing_writer() {
        let calendar_ref = CalendarEventId::new();
        let mut session = ready_session(Some(calendar_ref));
        let fx = fixture(&session, three_weeks(calendar_ref));
        fx.sessions.inject_conflicts(1);

        fx.synchronizer.synchronize(&mut session).await.unwrap();

        assert_eq!(fx.gateway.created_events().len(), 1);
        let stored = fx.sessions.get(session.id()).unwrap();
        assert_eq!(stored.state(), SessionState::Public);
        assert_eq!(stored.remote_event_id(), session.remote_event_id());
        assert!(stored.invariants_hold());
    }

    #[tokio::test]
    async fn ticket_class_failure_is_partial_sync_and_persisted() {
        let calendar_ref = CalendarEventId::new();
        let mut session = ready_session(Some(calendar_ref));
        let fx = fixture(&session, three_weeks(calendar_ref));
        fx.gateway.fail_next(
            GatewayOperation::CreateTicketClass,
            TicketingError::from_status(503, "maintenance"),
        );

        let err = fx.synchronizer.synchronize(&mut session).await.unwrap_err();

        match err {
            SyncError::PartialSync { kind, .. } => assert_eq!(kind, GatewayErrorKind::Transient),
            other => panic!("expected partial sync, got {:?}", other),
        }
        let stored = fx.sessions.get(session.id()).unwrap();
        assert_eq!(stored.state(), SessionState::ReadyToPublish);
        assert_eq!(stored.sync_status(), SyncStatus::EventCreated);
        assert!(stored.remote_event_id().is_some());
        assert!(stored.publication_claim().is_none());
    }

    #[tokio::test]
    async fn retry_after_partial_sync_reuses_event() {
        let calendar_ref = CalendarEventId::new();
        let mut session = ready_session(Some(calendar_ref));
        let fx = fixture(&session, three_weeks(calendar_ref));
        fx.gateway.fail_next(
            GatewayOperation::CreateTicketClass,
            TicketingError::network("reset"),
        );

        assert!(fx.synchronizer.synchronize(&mut session).await.is_err());
        let first_event = session.remote_event_id().cloned();
        fx.synchronizer.synchronize(&mut session).await.unwrap();

        assert_eq!(fx.gateway.created_events().len(), 1);
        assert_eq!(fx.gateway.remote_event_count(), 1);
        assert_eq!(session.remote_event_id().cloned(), first_event);
        assert_eq!(session.state(), SessionState::Public);
    }

    #[tokio::test]
    async fn slow_gateway_times_out_as_transient() {
        let calendar_ref = CalendarEventId::new();
        let mut session = ready_session(Some(calendar_ref));
        let gateway = MockTicketingGateway::new().with_delay(Duration::from_millis(200));
        let sessions = Arc::new(InMemorySessionRepository::new().with_session(session.clone()));
        let synchronizer = PublicationSynchronizer::new(
            Arc::new(gateway),
            Arc::new(three_weeks(calendar_ref)),
            Arc::new(InMemoryTemplateTextStore::new()),
            sessions,
            SynchronizerSettings {
                call_timeout: Duration::from_millis(20),
                ..Default::default()
            },
        );

        let err = synchronizer.synchronize(&mut session).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Gateway {
                kind: GatewayErrorKind::Transient,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn desync_failure_becomes_warning() {
        let session = ready_session(None);
        let fx = fixture(&session, StaticCalendarProvider::new());
        let event_id = RemoteEventId::new("evt-gone").unwrap();

        let warning = fx.synchronizer.desync(&event_id).await.unwrap();
        assert_eq!(warning.remote_event_id, event_id);
    }
}
