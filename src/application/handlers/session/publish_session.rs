//! PublishSessionHandler - approves a session and lists it remotely.

use std::sync::Arc;

use tracing::info;

use super::transition::{self, DEFAULT_CONFLICT_RETRIES};
use crate::application::PublicationSynchronizer;
use crate::domain::foundation::{SessionId, UserId};
use crate::domain::publication::RemoteBinding;
use crate::domain::session::{LifecycleAction, Session, SessionError};
use crate::ports::{PermissionOracle, SessionRepository};

#[derive(Debug, Clone)]
pub struct PublishSessionCommand {
    pub actor: UserId,
    pub session_id: SessionId,
}

#[derive(Debug, Clone)]
pub struct PublishSessionResult {
    pub session: Session,
    pub binding: RemoteBinding,
}

/// Handler for publishing.
///
/// Order of checks: permission, state, schedule, currency. Only then does the
/// session move to ready_to_publish and the synchronizer run. A sync
/// failure leaves the session in ready_to_publish; publishing again
/// resumes from whatever was already bound.
pub struct PublishSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    oracle: Arc<dyn PermissionOracle>,
    synchronizer: Arc<PublicationSynchronizer>,
    conflict_retries: u32,
}

impl PublishSessionHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        oracle: Arc<dyn PermissionOracle>,
        synchronizer: Arc<PublicationSynchronizer>,
    ) -> Self {
        Self {
            sessions,
            oracle,
            synchronizer,
            conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }

    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.conflict_retries = retries;
        self
    }

    pub async fn handle(
        &self,
        cmd: PublishSessionCommand,
    ) -> Result<PublishSessionResult, SessionError> {
        let holds =
            transition::holds_manage(self.oracle.as_ref(), &cmd.actor, &cmd.session_id).await?;

        // Schedule is checked before any write so an indeterminate one
        // leaves the session exactly as it was.
        let current = transition::load(self.sessions.as_ref(), &cmd.session_id).await?;
        current.check(LifecycleAction::Publish, holds)?;
        let span = self.synchronizer.resolve_schedule(&current).await?;
        self.synchronizer.check_currency(&current)?;

        // Claiming under the version check makes a concurrent publisher
        // fail here, before any remote call.
        let (mut session, claim) = transition::apply_with_retry(
            self.sessions.as_ref(),
            &cmd.session_id,
            self.conflict_retries,
            |s| s.begin_publish(holds),
        )
        .await?;
        info!(
            session_id = %session.id(),
            actor = %cmd.actor,
            resumed = session.remote().is_some(),
            claim = %claim.token,
            "Publishing session"
        );

        let binding = self.synchronizer.push(&mut session, span).await?;
        Ok(PublishSessionResult { session, binding })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemorySessionRepository, InMemoryTemplateTextStore, StaticCalendarProvider,
        StaticPermissionOracle,
    };
    use crate::adapters::ticketing::{GatewayOperation, MockTicketingGateway};
    use crate::application::SynchronizerSettings;
    use crate::domain::catalog::{Course, CourseDetails, EnrollmentBounds};
    use crate::domain::foundation::{
        CalendarEventId, CourseId, Currency, Money, Permission, Timestamp,
    };
    use crate::domain::publication::{Occurrence, SyncError};
    use crate::domain::session::{SessionState, SyncStatus};
    use crate::ports::{RecurrenceDescription, TicketingError};
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn staff() -> UserId {
        UserId::new("staff-1").unwrap()
    }

    fn instructor() -> UserId {
        UserId::new("instructor-1").unwrap()
    }

    fn ts(day: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2025, 9, day, 18, 0, 0).unwrap())
    }

    fn draft(calendar_ref: Option<CalendarEventId>) -> Session {
        draft_priced_in(calendar_ref, Currency::usd())
    }

    fn draft_priced_in(calendar_ref: Option<CalendarEventId>, currency: Currency) -> Session {
        let details = CourseDetails::new(
            "Bookbinding",
            "Coptic stitch.",
            EnrollmentBounds::new(3, 12).unwrap(),
            Money::new(6000, currency).unwrap(),
        )
        .unwrap();
        let mut session =
            Session::from_course(SessionId::new(), &Course::new(CourseId::new(), details))
                .unwrap();
        if let Some(calendar_ref) = calendar_ref {
            session.attach_calendar(calendar_ref).unwrap();
        }
        session
    }

    fn one_off(calendar_ref: CalendarEventId) -> StaticCalendarProvider {
        let description = RecurrenceDescription {
            title: "Bookbinding".to_string(),
            start: ts(6),
            end: ts(6).add_hours(3),
            rule: None,
            end_recurring_period: None,
        };
        StaticCalendarProvider::new().with_schedule(
            calendar_ref,
            description,
            vec![Occurrence::new(ts(6), ts(6).add_hours(3)).unwrap()],
        )
    }

    struct Fixture {
        handler: PublishSessionHandler,
        repo: Arc<InMemorySessionRepository>,
        gateway: MockTicketingGateway,
    }

    fn fixture(session: &Session, calendar: StaticCalendarProvider) -> Fixture {
        fixture_with_gateway(session, calendar, MockTicketingGateway::new())
    }

    fn fixture_with_gateway(
        session: &Session,
        calendar: StaticCalendarProvider,
        gateway: MockTicketingGateway,
    ) -> Fixture {
        let repo = Arc::new(InMemorySessionRepository::new().with_session(session.clone()));
        let synchronizer = Arc::new(PublicationSynchronizer::new(
            Arc::new(gateway.clone()),
            Arc::new(calendar),
            Arc::new(InMemoryTemplateTextStore::new()),
            repo.clone(),
            SynchronizerSettings::default(),
        ));
        let oracle = StaticPermissionOracle::new().grant(staff(), Permission::ManageSessionState);
        Fixture {
            handler: PublishSessionHandler::new(repo.clone(), Arc::new(oracle), synchronizer),
            repo,
            gateway,
        }
    }

    fn cmd(actor: UserId, session: &Session) -> PublishSessionCommand {
        PublishSessionCommand {
            actor,
            session_id: *session.id(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn staff_publishes_draft() {
        let calendar_ref = CalendarEventId::new();
        let session = draft(Some(calendar_ref));
        let fx = fixture(&session, one_off(calendar_ref));

        let result = fx.handler.handle(cmd(staff(), &session)).await.unwrap();

        assert_eq!(result.session.state(), SessionState::Public);
        assert!(result.binding.is_complete());
        let stored = fx.repo.get(session.id()).unwrap();
        assert_eq!(stored.sync_status(), SyncStatus::Synced);
        assert!(stored.invariants_hold());
    }

    #[tokio::test]
    async fn publish_without_permission_is_denied() {
        let calendar_ref = CalendarEventId::new();
        let session = draft(Some(calendar_ref));
        let fx = fixture(&session, one_off(calendar_ref));

        let err = fx.handler.handle(cmd(instructor(), &session)).await.unwrap_err();

        assert!(matches!(err, SessionError::PermissionDenied { .. }));
        assert!(fx.gateway.created_events().is_empty());
        assert_eq!(fx.repo.update_count(), 0);
    }

    #[tokio::test]
    async fn permission_is_checked_before_state() {
        let mut session = draft(None);
        session.cancel(true).unwrap();
        let fx = fixture(&session, StaticCalendarProvider::new());

        let err = fx.handler.handle(cmd(instructor(), &session)).await.unwrap_err();
        assert!(matches!(err, SessionError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn publishing_canceled_session_is_illegal() {
        let mut session = draft(None);
        session.cancel(true).unwrap();
        let fx = fixture(&session, StaticCalendarProvider::new());

        let err = fx.handler.handle(cmd(staff(), &session)).await.unwrap_err();
        assert_eq!(
            err,
            SessionError::illegal(LifecycleAction::Publish, SessionState::Canceled)
        );
    }

    #[tokio::test]
    async fn indeterminate_schedule_leaves_state_untouched() {
        let mut session = draft(None);
        session.submit_for_approval(false).unwrap();
        let fx = fixture(&session, StaticCalendarProvider::new());

        let err = fx.handler.handle(cmd(staff(), &session)).await.unwrap_err();

        assert!(matches!(
            err,
            SessionError::Sync(SyncError::IndeterminateSchedule { .. })
        ));
        let stored = fx.repo.get(session.id()).unwrap();
        assert_eq!(stored.state(), SessionState::NeedsApproval);
        assert_eq!(fx.repo.update_count(), 0);
    }

    #[tokio::test]
    async fn foreign_ticket_price_is_rejected_before_any_remote_call() {
        let calendar_ref = CalendarEventId::new();
        let session = draft_priced_in(Some(calendar_ref), Currency::new("EUR").unwrap());
        let fx = fixture(&session, one_off(calendar_ref));

        let err = fx.handler.handle(cmd(staff(), &session)).await.unwrap_err();

        assert!(matches!(
            err,
            SessionError::Sync(SyncError::CurrencyMismatch { .. })
        ));
        assert!(fx.gateway.created_events().is_empty());
        assert!(fx.gateway.created_ticket_classes().is_empty());
        assert_eq!(fx.repo.update_count(), 0);
        assert_eq!(fx.repo.get(session.id()).unwrap().state(), SessionState::Draft);
    }

    #[tokio::test]
    async fn gateway_failure_leaves_ready_to_publish() {
        let calendar_ref = CalendarEventId::new();
        let session = draft(Some(calendar_ref));
        let fx = fixture(&session, one_off(calendar_ref));
        fx.gateway.fail_next(
            GatewayOperation::CreateEvent,
            TicketingError::network("connection refused"),
        );

        let err = fx.handler.handle(cmd(staff(), &session)).await.unwrap_err();

        assert!(matches!(err, SessionError::Sync(SyncError::Gateway { .. })));
        let stored = fx.repo.get(session.id()).unwrap();
        assert_eq!(stored.state(), SessionState::ReadyToPublish);
        assert_eq!(stored.sync_status(), SyncStatus::NotSynced);
        assert!(stored.publication_claim().is_none());

        let retried = fx.handler.handle(cmd(staff(), &session)).await.unwrap();
        assert_eq!(retried.session.state(), SessionState::Public);
        assert_eq!(fx.gateway.created_events().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_publishes_create_one_remote_event() {
        let calendar_ref = CalendarEventId::new();
        let session = draft(Some(calendar_ref));
        let gateway = MockTicketingGateway::new().with_delay(Duration::from_millis(50));
        let fx = fixture_with_gateway(&session, one_off(calendar_ref), gateway);

        let (first, second) = tokio::join!(
            fx.handler.handle(cmd(staff(), &session)),
            fx.handler.handle(cmd(staff(), &session)),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(SessionError::PublicationInProgress(_)))));
        assert_eq!(fx.gateway.created_events().len(), 1);

        let stored = fx.repo.get(session.id()).unwrap();
        assert_eq!(stored.state(), SessionState::Public);
        assert!(stored.publication_claim().is_none());
        assert!(stored.invariants_hold());
    }

    #[tokio::test]
    async fn republishing_public_session_is_illegal() {
        let calendar_ref = CalendarEventId::new();
        let session = draft(Some(calendar_ref));
        let fx = fixture(&session, one_off(calendar_ref));
        fx.handler.handle(cmd(staff(), &session)).await.unwrap();

        let err = fx.handler.handle(cmd(staff(), &session)).await.unwrap_err();

        assert_eq!(
            err,
            SessionError::illegal(LifecycleAction::Publish, SessionState::Public)
        );
        assert_eq!(fx.gateway.remote_event_count(), 1);
    }

    #[tokio::test]
    async fn conflicting_writer_is_retried() {
        let calendar_ref = CalendarEventId::new();
        let session = draft(Some(calendar_ref));
        let fx = fixture(&session, one_off(calendar_ref));
        fx.repo.inject_conflicts(1);

        let result = fx.handler.handle(cmd(staff(), &session)).await.unwrap();
        assert_eq!(result.session.state(), SessionState::Public);
    }
}
