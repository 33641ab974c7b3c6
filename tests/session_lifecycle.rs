//! End-to-end lifecycle tests over the in-memory adapters.
//!
//! These tests drive the application handlers the way the HTTP layer does:
//! 1. A course spawns a draft session
//! 2. The session moves through approval and publication
//! 3. The ticketing gateway sees exactly the calls the lifecycle implies

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use workshop_catalog::adapters::memory::{
    InMemoryCourseRepository, InMemoryInstructorReader, InMemorySessionRepository,
    InMemoryTemplateTextStore, StaticCalendarProvider, StaticPermissionOracle,
};
use workshop_catalog::adapters::ticketing::{GatewayOperation, MockTicketingGateway};
use workshop_catalog::application::{
    CancelSessionCommand, CancelSessionHandler, CreateSessionCommand, CreateSessionHandler,
    PublicationSynchronizer, PublishSessionCommand, PublishSessionHandler,
    SubmitForApprovalCommand, SubmitForApprovalHandler, SynchronizerSettings,
};
use workshop_catalog::domain::catalog::{
    Course, CourseDetails, EnrollmentBounds, MaterialCostCollection,
};
use workshop_catalog::domain::foundation::{
    CalendarEventId, CourseId, Currency, Money, Permission, Timestamp, UserId,
};
use workshop_catalog::domain::publication::{Occurrence, SyncError};
use workshop_catalog::domain::session::{Session, SessionError, SessionState, SyncStatus};
use workshop_catalog::domain::template_text::{TemplateKeyword, TemplateText};
use workshop_catalog::ports::{RecurrenceDescription, TicketingError};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn staff() -> UserId {
    UserId::new("staff-1").unwrap()
}

fn member() -> UserId {
    UserId::new("member-7").unwrap()
}

fn at(day: u32, hour: u32) -> Timestamp {
    Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 10, day, hour, 0, 0).unwrap())
}

/// 20 seats at $50, materials collected through the ticket.
fn screen_printing() -> Course {
    let details = CourseDetails::new(
        "Screen Printing",
        "Bring a shirt. {{safety}}",
        EnrollmentBounds::new(4, 20).unwrap(),
        Money::new(5000, Currency::usd()).unwrap(),
    )
    .unwrap()
    .with_blurb("Print your own {{medium}}.")
    .with_material_cost(
        Money::new(1500, Currency::usd()).unwrap(),
        MaterialCostCollection::Ticket,
    );
    Course::new(CourseId::new(), details)
}

/// Three weekly meetings, recurrence closed on the last one.
fn weekly(calendar_ref: CalendarEventId) -> StaticCalendarProvider {
    let description = RecurrenceDescription {
        title: "Screen Printing".to_string(),
        start: at(7, 18),
        end: at(7, 21),
        rule: Some("FREQ=WEEKLY".to_string()),
        end_recurring_period: Some(at(21, 21)),
    };
    let occurrences = [7, 14, 21]
        .iter()
        .map(|day| Occurrence::new(at(*day, 18), at(*day, 21)).unwrap())
        .collect();
    StaticCalendarProvider::new().with_schedule(calendar_ref, description, occurrences)
}

/// Weekly forever.
fn open_ended(calendar_ref: CalendarEventId) -> StaticCalendarProvider {
    let description = RecurrenceDescription {
        title: "Open Studio".to_string(),
        start: at(7, 18),
        end: at(7, 21),
        rule: Some("FREQ=WEEKLY".to_string()),
        end_recurring_period: None,
    };
    StaticCalendarProvider::new().with_schedule(calendar_ref, description, Vec::new())
}

struct Workshop {
    course: Course,
    calendar_ref: CalendarEventId,
    sessions: Arc<InMemorySessionRepository>,
    gateway: MockTicketingGateway,
    create: CreateSessionHandler,
    submit: SubmitForApprovalHandler,
    publish: PublishSessionHandler,
    cancel: CancelSessionHandler,
}

impl Workshop {
    fn new(calendar: impl FnOnce(CalendarEventId) -> StaticCalendarProvider) -> Self {
        let course = screen_printing();
        let calendar_ref = CalendarEventId::new();

        let sessions = Arc::new(InMemorySessionRepository::new());
        let courses = Arc::new(InMemoryCourseRepository::new().with_course(course.clone()));
        let templates = InMemoryTemplateTextStore::new()
            .with_text(TemplateText::new(
                TemplateKeyword::new("safety").unwrap(),
                "Closed-toe shoes required.",
            ))
            .with_text(TemplateText::new(
                TemplateKeyword::new("medium").unwrap(),
                "t-shirt",
            ));
        let oracle = Arc::new(
            StaticPermissionOracle::new()
                .grant(staff(), Permission::ManageSessionState)
                .grant(staff(), Permission::ManageCourseState),
        );
        let gateway = MockTicketingGateway::new();

        let synchronizer = Arc::new(PublicationSynchronizer::new(
            Arc::new(gateway.clone()),
            Arc::new(calendar(calendar_ref)),
            Arc::new(templates),
            sessions.clone(),
            SynchronizerSettings::default(),
        ));

        Self {
            create: CreateSessionHandler::new(
                courses,
                sessions.clone(),
                Arc::new(InMemoryInstructorReader::new()),
                oracle.clone(),
            ),
            submit: SubmitForApprovalHandler::new(sessions.clone(), oracle.clone()),
            publish: PublishSessionHandler::new(
                sessions.clone(),
                oracle.clone(),
                synchronizer.clone(),
            ),
            cancel: CancelSessionHandler::new(sessions.clone(), oracle, synchronizer),
            course,
            calendar_ref,
            sessions,
            gateway,
        }
    }

    async fn draft(&self) -> Session {
        self.create
            .handle(CreateSessionCommand {
                actor: staff(),
                course_id: *self.course.id(),
                calendar_ref: Some(self.calendar_ref),
            })
            .await
            .unwrap()
    }

    async fn submitted(&self) -> Session {
        let session = self.draft().await;
        self.submit
            .handle(SubmitForApprovalCommand {
                actor: member(),
                session_id: *session.id(),
            })
            .await
            .unwrap()
    }

    async fn publish(&self, session: &Session) -> Result<Session, SessionError> {
        self.publish
            .handle(PublishSessionCommand {
                actor: staff(),
                session_id: *session.id(),
            })
            .await
            .map(|result| result.session)
    }

    fn stored(&self, session: &Session) -> Session {
        self.sessions.get(session.id()).unwrap()
    }
}

// =============================================================================
// Publication
// =============================================================================

#[tokio::test]
async fn approved_session_publishes_with_materials_ticket() {
    let shop = Workshop::new(weekly);
    let session = shop.submitted().await;
    assert_eq!(session.state(), SessionState::NeedsApproval);

    let published = shop.publish(&session).await.unwrap();

    assert_eq!(published.state(), SessionState::Public);
    assert_eq!(published.sync_status(), SyncStatus::Synced);
    assert!(published.remote().unwrap().is_complete());

    let events = shop.gateway.created_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].capacity, 20);
    assert_eq!(events[0].start, at(7, 18));
    assert_eq!(events[0].end, at(21, 21));

    let ticket_classes = shop.gateway.created_ticket_classes();
    assert_eq!(ticket_classes.len(), 1);
    let (event_id, ticket) = &ticket_classes[0];
    assert_eq!(Some(event_id), published.remote_event_id());
    assert_eq!(ticket.name, "General Admission + Materials");
    assert_eq!(ticket.quantity_total, 20);
    assert_eq!(ticket.cost.amount_minor(), 5000);
    assert!(!ticket.free && !ticket.donation && !ticket.include_fee);
}

#[tokio::test]
async fn published_description_has_keywords_resolved() {
    let shop = Workshop::new(weekly);
    let session = shop.draft().await;

    shop.publish(&session).await.unwrap();

    let event = &shop.gateway.created_events()[0];
    assert_eq!(event.description.text, "Bring a shirt. Closed-toe shoes required.");
    assert!(event.description.html.contains("Closed-toe shoes required."));
    assert_eq!(event.summary.as_deref(), Some("Print your own t-shirt."));
}

#[tokio::test]
async fn open_ended_recurrence_is_rejected_before_any_change() {
    let shop = Workshop::new(open_ended);
    let session = shop.submitted().await;
    let version_before = shop.stored(&session).version();

    let err = shop.publish(&session).await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Sync(SyncError::IndeterminateSchedule { .. })
    ));
    let stored = shop.stored(&session);
    assert_eq!(stored.state(), SessionState::NeedsApproval);
    assert_eq!(stored.version(), version_before);
    assert!(stored.remote().is_none());
    assert!(shop.gateway.created_events().is_empty());
}

#[tokio::test]
async fn ticket_class_failure_leaves_session_partially_synced() {
    let shop = Workshop::new(weekly);
    let session = shop.draft().await;
    shop.gateway.fail_next(
        GatewayOperation::CreateTicketClass,
        TicketingError::timeout("ticket class timed out"),
    );

    let err = shop.publish(&session).await.unwrap_err();

    let SessionError::Sync(SyncError::PartialSync { remote_event_id, .. }) = err else {
        panic!("expected partial sync, got {err:?}");
    };
    let stored = shop.stored(&session);
    assert_eq!(stored.state(), SessionState::ReadyToPublish);
    assert_eq!(stored.sync_status(), SyncStatus::EventCreated);
    assert_eq!(stored.remote_event_id(), Some(&remote_event_id));
    assert!(stored.is_partially_synced());
    assert!(stored.invariants_hold());
}

#[tokio::test]
async fn retrying_partial_sync_reuses_the_bound_event() {
    let shop = Workshop::new(weekly);
    let session = shop.draft().await;
    shop.gateway.fail_next(
        GatewayOperation::CreateTicketClass,
        TicketingError::network("connection reset"),
    );
    shop.publish(&session).await.unwrap_err();
    let bound = shop.stored(&session).remote_event_id().cloned().unwrap();

    let published = shop.publish(&session).await.unwrap();

    assert_eq!(published.state(), SessionState::Public);
    assert_eq!(published.remote_event_id(), Some(&bound));
    assert_eq!(shop.gateway.remote_event_count(), 1);
    let ticket_classes = shop.gateway.created_ticket_classes();
    assert_eq!(ticket_classes.last().map(|(id, _)| id), Some(&bound));
}

#[tokio::test]
async fn event_creation_failure_binds_nothing() {
    let shop = Workshop::new(weekly);
    let session = shop.draft().await;
    shop.gateway.fail_next(
        GatewayOperation::CreateEvent,
        TicketingError::invalid_request("venue required"),
    );

    let err = shop.publish(&session).await.unwrap_err();

    let SessionError::Sync(sync) = err else {
        panic!("expected sync error");
    };
    assert!(!sync.is_retryable());
    let stored = shop.stored(&session);
    assert_eq!(stored.state(), SessionState::ReadyToPublish);
    assert_eq!(stored.sync_status(), SyncStatus::NotSynced);
    assert!(stored.remote().is_none());
}

#[tokio::test]
async fn publish_survives_concurrent_writer() {
    let shop = Workshop::new(weekly);
    let session = shop.draft().await;
    shop.sessions.inject_conflicts(2);

    let published = shop.publish(&session).await.unwrap();

    assert_eq!(published.state(), SessionState::Public);
    assert_eq!(shop.gateway.remote_event_count(), 1);
}

// =============================================================================
// Approval
// =============================================================================

#[tokio::test]
async fn second_submission_is_illegal_and_changes_nothing() {
    let shop = Workshop::new(weekly);
    let session = shop.submitted().await;
    let version = shop.stored(&session).version();

    let err = shop
        .submit
        .handle(SubmitForApprovalCommand {
            actor: member(),
            session_id: *session.id(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::IllegalTransition { .. }));
    let stored = shop.stored(&session);
    assert_eq!(stored.state(), SessionState::NeedsApproval);
    assert_eq!(stored.version(), version);
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn cancel_public_session_cancels_remote_event() {
    let shop = Workshop::new(weekly);
    let session = shop.draft().await;
    let published = shop.publish(&session).await.unwrap();

    let result = shop
        .cancel
        .handle(CancelSessionCommand {
            actor: staff(),
            session_id: *session.id(),
        })
        .await
        .unwrap();

    assert_eq!(result.session.state(), SessionState::Canceled);
    assert!(result.desync_warning.is_none());
    assert_eq!(
        shop.gateway.canceled_events(),
        vec![published.remote_event_id().cloned().unwrap()]
    );
}

#[tokio::test]
async fn remote_cancel_failure_is_a_warning_only() {
    let shop = Workshop::new(weekly);
    let session = shop.draft().await;
    let published = shop.publish(&session).await.unwrap();
    shop.gateway.fail_next(
        GatewayOperation::CancelEvent,
        TicketingError::network("connection refused"),
    );

    let result = shop
        .cancel
        .handle(CancelSessionCommand {
            actor: staff(),
            session_id: *session.id(),
        })
        .await
        .unwrap();

    assert_eq!(result.session.state(), SessionState::Canceled);
    let warning = result.desync_warning.expect("desync warning");
    assert_eq!(Some(&warning.remote_event_id), published.remote_event_id());

    let stored = shop.stored(&session);
    assert_eq!(stored.state(), SessionState::Canceled);
    assert_eq!(stored.remote_event_id(), published.remote_event_id());
}

#[tokio::test]
async fn canceled_session_cannot_be_published() {
    let shop = Workshop::new(weekly);
    let session = shop.draft().await;
    shop.cancel
        .handle(CancelSessionCommand {
            actor: staff(),
            session_id: *session.id(),
        })
        .await
        .unwrap();

    let err = shop.publish(&session).await.unwrap_err();

    assert!(matches!(err, SessionError::IllegalTransition { .. }));
    assert!(shop.gateway.created_events().is_empty());
}

#[tokio::test]
async fn member_cannot_cancel() {
    let shop = Workshop::new(weekly);
    let session = shop.draft().await;

    let err = shop
        .cancel
        .handle(CancelSessionCommand {
            actor: member(),
            session_id: *session.id(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::PermissionDenied { .. }));
    assert_eq!(shop.stored(&session).state(), SessionState::Draft);
}
