//! LoadAttendeesHandler - who registered for a published session.

use std::sync::Arc;
use std::time::Duration;

use super::transition;
use crate::application::deadline;
use crate::domain::foundation::{Permission, SessionId, UserId};
use crate::domain::publication::SyncError;
use crate::domain::session::SessionError;
use crate::ports::{PermissionOracle, RemoteAttendee, SessionRepository, TicketingGateway};

#[derive(Debug, Clone)]
pub struct LoadAttendeesQuery {
    pub actor: UserId,
    pub session_id: SessionId,
}

pub struct LoadAttendeesHandler {
    sessions: Arc<dyn SessionRepository>,
    oracle: Arc<dyn PermissionOracle>,
    gateway: Arc<dyn TicketingGateway>,
    call_timeout: Duration,
}

impl LoadAttendeesHandler {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        oracle: Arc<dyn PermissionOracle>,
        gateway: Arc<dyn TicketingGateway>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            oracle,
            gateway,
            call_timeout,
        }
    }

    /// Attendees of the bound remote event; empty when nothing is bound.
    pub async fn handle(
        &self,
        query: LoadAttendeesQuery,
    ) -> Result<Vec<RemoteAttendee>, SessionError> {
        if !transition::holds_manage(self.oracle.as_ref(), &query.actor, &query.session_id).await? {
            return Err(SessionError::Forbidden(Permission::ManageSessionState));
        }

        let session = transition::load(self.sessions.as_ref(), &query.session_id).await?;
        let Some(event_id) = session.remote_event_id() else {
            return Ok(Vec::new());
        };

        deadline::ticketing(
            self.call_timeout,
            "list_attendees",
            self.gateway.list_attendees(event_id),
        )
        .await
        .map_err(|e| SessionError::Sync(SyncError::gateway(e.kind(), e.message)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemorySessionRepository, StaticPermissionOracle};
    use crate::adapters::ticketing::{GatewayOperation, MockTicketingGateway};
    use crate::domain::catalog::{Course, CourseDetails, EnrollmentBounds};
    use crate::domain::foundation::{CourseId, Currency, Money};
    use crate::domain::publication::{GatewayErrorKind, RemoteEventId};
    use crate::domain::session::Session;
    use crate::ports::TicketingError;

    fn staff() -> UserId {
        UserId::new("staff-1").unwrap()
    }

    fn session(bound_to: Option<&str>) -> Session {
        let details = CourseDetails::new(
            "Rug Tufting",
            "Yarn.",
            EnrollmentBounds::new(1, 4).unwrap(),
            Money::new(9000, Currency::usd()).unwrap(),
        )
        .unwrap();
        let mut session =
            Session::from_course(SessionId::new(), &Course::new(CourseId::new(), details))
                .unwrap();
        if let Some(id) = bound_to {
            session.begin_publish(true).unwrap();
            session
                .record_remote_event(RemoteEventId::new(id).unwrap())
                .unwrap();
        }
        session
    }

    fn attendee(name: &str) -> RemoteAttendee {
        RemoteAttendee {
            id: format!("att-{}", name),
            name: name.to_string(),
            email: Some(format!("{}@example.test", name)),
            ticket_class_name: Some("General Admission".to_string()),
            status: Some("attending".to_string()),
            checked_in: false,
        }
    }

    fn handler(session: &Session, gateway: MockTicketingGateway) -> LoadAttendeesHandler {
        let repo = InMemorySessionRepository::new().with_session(session.clone());
        let oracle = StaticPermissionOracle::new().grant(staff(), Permission::ManageSessionState);
        LoadAttendeesHandler::new(
            Arc::new(repo),
            Arc::new(oracle),
            Arc::new(gateway),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn lists_attendees_of_bound_event() {
        let session = session(Some("evt-11"));
        let gateway = MockTicketingGateway::new().with_attendees(
            &RemoteEventId::new("evt-11").unwrap(),
            vec![attendee("ana"), attendee("bo")],
        );

        let attendees = handler(&session, gateway)
            .handle(LoadAttendeesQuery {
                actor: staff(),
                session_id: *session.id(),
            })
            .await
            .unwrap();

        assert_eq!(attendees.len(), 2);
        assert_eq!(attendees[0].name, "ana");
    }

    #[tokio::test]
    async fn unbound_session_has_no_attendees() {
        let session = session(None);
        let attendees = handler(&session, MockTicketingGateway::new())
            .handle(LoadAttendeesQuery {
                actor: staff(),
                session_id: *session.id(),
            })
            .await
            .unwrap();
        assert!(attendees.is_empty());
    }

    #[tokio::test]
    async fn requires_manage_permission() {
        let session = session(Some("evt-11"));
        let err = handler(&session, MockTicketingGateway::new())
            .handle(LoadAttendeesQuery {
                actor: UserId::new("student").unwrap(),
                session_id: *session.id(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::Forbidden(Permission::ManageSessionState));
    }

    #[tokio::test]
    async fn gateway_failure_is_classified() {
        let session = session(Some("evt-11"));
        let gateway = MockTicketingGateway::new();
        gateway.fail_next(
            GatewayOperation::ListAttendees,
            TicketingError::from_status(401, "token revoked"),
        );

        let err = handler(&session, gateway)
            .handle(LoadAttendeesQuery {
                actor: staff(),
                session_id: *session.id(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SessionError::Sync(SyncError::gateway(GatewayErrorKind::Permanent, "token revoked"))
        );
    }
}
