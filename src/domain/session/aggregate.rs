//! Session aggregate - a scheduled instance of a course.
//!
//! A session copies its course's details at creation and from then on is
//! mutated only through lifecycle operations. Sessions are never deleted;
//! canceled sessions are kept for history.

use serde::{Deserialize, Serialize};

use super::errors::SessionError;
use super::claim::PublicationClaim;
use super::guards::{self, GuardRejection, LifecycleAction};
use super::state::{SessionState, SyncStatus};
use crate::domain::catalog::{Course, CourseDetails, CourseError};
use crate::domain::foundation::{CalendarEventId, CourseId, SessionId, StateMachine, Timestamp};
use crate::domain::publication::{RemoteBinding, RemoteEventId, RemoteTicketClassId};

/// Session aggregate.
///
/// # Invariants
///
/// - `remote` is set only once the state has reached `ready_to_publish`
///   (it survives a later cancel)
/// - `sync_status` is `event_created` iff `remote` has no ticket class,
///   `synced` iff it has one
/// - `claim` is held only while the state is `ready_to_publish`
/// - `state` only changes through a guarded lifecycle operation
/// - `version` increases by one per successful write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    course_id: CourseId,
    details: CourseDetails,
    state: SessionState,
    sync_status: SyncStatus,
    remote: Option<RemoteBinding>,
    claim: Option<PublicationClaim>,
    calendar_ref: Option<CalendarEventId>,
    version: i64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Creates a draft session by copying the course's details.
    ///
    /// # Errors
    ///
    /// - `Archived` if the course is archived
    pub fn from_course(id: SessionId, course: &Course) -> Result<Self, CourseError> {
        if course.is_archived() {
            return Err(CourseError::Archived(*course.id()));
        }
        let now = Timestamp::now();
        Ok(Self {
            id,
            course_id: *course.id(),
            details: course.details().clone(),
            state: SessionState::Draft,
            sync_status: SyncStatus::NotSynced,
            remote: None,
            claim: None,
            calendar_ref: None,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        course_id: CourseId,
        details: CourseDetails,
        state: SessionState,
        sync_status: SyncStatus,
        remote: Option<RemoteBinding>,
        claim: Option<PublicationClaim>,
        calendar_ref: Option<CalendarEventId>,
        version: i64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            course_id,
            details,
            state,
            sync_status,
            remote,
            claim,
            calendar_ref,
            version,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn details(&self) -> &CourseDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync_status
    }

    pub fn remote(&self) -> Option<&RemoteBinding> {
        self.remote.as_ref()
    }

    pub fn remote_event_id(&self) -> Option<&RemoteEventId> {
        self.remote.as_ref().map(|r| &r.event_id)
    }

    pub fn publication_claim(&self) -> Option<&PublicationClaim> {
        self.claim.as_ref()
    }

    pub fn calendar_ref(&self) -> Option<&CalendarEventId> {
        self.calendar_ref.as_ref()
    }

    /// Version last read from or written to storage.
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Remote event exists but has no ticket class.
    pub fn is_partially_synced(&self) -> bool {
        self.sync_status == SyncStatus::EventCreated
    }

    /// Checks the binding/state invariants.
    pub fn invariants_hold(&self) -> bool {
        let binding_ok = match &self.remote {
            None => self.sync_status == SyncStatus::NotSynced,
            Some(binding) => {
                let status_ok = if binding.is_complete() {
                    self.sync_status == SyncStatus::Synced
                } else {
                    self.sync_status == SyncStatus::EventCreated
                };
                status_ok
                    && matches!(
                        self.state,
                        SessionState::ReadyToPublish | SessionState::Public | SessionState::Canceled
                    )
            }
        };
        let public_ok = self.state != SessionState::Public
            || self.remote.as_ref().is_some_and(RemoteBinding::is_complete);
        let claim_ok = self.claim.is_none() || self.state == SessionState::ReadyToPublish;
        binding_ok && public_ok && claim_ok
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Draft → needs_approval, for actors without manage permission.
    ///
    /// # Errors
    ///
    /// - `IllegalTransition` if not a draft or the actor is privileged
    pub fn submit_for_approval(&mut self, holds_manage: bool) -> Result<(), SessionError> {
        self.apply(LifecycleAction::SubmitForApproval, holds_manage)
    }

    /// Moves to ready_to_publish and claims the publication for the
    /// caller. Synchronization follows separately and must end with
    /// [`complete_publication`](Self::complete_publication) or
    /// [`release_publication`](Self::release_publication).
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` without manage permission
    /// - `IllegalTransition` from public or canceled
    /// - `PublicationInProgress` while another publisher's claim is live
    pub fn begin_publish(&mut self, holds_manage: bool) -> Result<PublicationClaim, SessionError> {
        self.check(LifecycleAction::Publish, holds_manage)?;
        let now = Timestamp::now();
        if self.claim.is_some_and(|claim| claim.is_held_at(&now)) {
            return Err(SessionError::PublicationInProgress(self.id));
        }
        self.apply(LifecycleAction::Publish, holds_manage)?;
        let claim = PublicationClaim::new(now);
        self.claim = Some(claim);
        Ok(claim)
    }

    /// Drops the caller's claim after a failed synchronization.
    ///
    /// Returns false, changing nothing, if the claim is no longer the
    /// caller's.
    pub fn release_publication(&mut self, token: &uuid::Uuid) -> bool {
        match self.claim {
            Some(claim) if claim.token == *token => {
                self.claim = None;
                self.touch();
                true
            }
            _ => false,
        }
    }

    /// Moves to canceled and returns the remote event to desync, if any.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` without manage permission
    /// - `IllegalTransition` from ready_to_publish or canceled
    pub fn cancel(&mut self, holds_manage: bool) -> Result<Option<RemoteEventId>, SessionError> {
        self.apply(LifecycleAction::Cancel, holds_manage)?;
        Ok(self.remote_event_id().cloned())
    }

    /// Checks whether `action` would be accepted, without changing anything.
    pub fn check(&self, action: LifecycleAction, holds_manage: bool) -> Result<(), SessionError> {
        guards::evaluate(action, holds_manage, self.state)
            .map(|_| ())
            .map_err(|rejection| self.rejection(action, rejection))
    }

    /// Binds the remote event created for this session.
    ///
    /// Binding the same event again is a no-op.
    pub fn record_remote_event(&mut self, event_id: RemoteEventId) -> Result<(), SessionError> {
        self.ensure_publishing(LifecycleAction::Publish)?;
        match &self.remote {
            Some(existing) if existing.event_id == event_id => Ok(()),
            Some(existing) => Err(SessionError::BindingMismatch {
                existing: existing.event_id.clone(),
                attempted: event_id,
            }),
            None => {
                self.remote = Some(RemoteBinding::event_only(event_id));
                self.sync_status = SyncStatus::EventCreated;
                self.touch();
                Ok(())
            }
        }
    }

    /// Binds the ticket class and moves the session to public.
    pub fn complete_publication(
        &mut self,
        ticket_class_id: RemoteTicketClassId,
    ) -> Result<(), SessionError> {
        self.ensure_publishing(LifecycleAction::Publish)?;
        let Some(binding) = self.remote.as_mut() else {
            return Err(SessionError::illegal(LifecycleAction::Publish, self.state));
        };
        let next = self
            .state
            .transition_to(SessionState::Public)
            .map_err(|_| SessionError::illegal(LifecycleAction::Publish, self.state))?;

        binding.ticket_class_id = Some(ticket_class_id);
        self.sync_status = SyncStatus::Synced;
        self.state = next;
        self.claim = None;
        self.touch();
        Ok(())
    }

    /// Points the session at a recurring-event specification.
    ///
    /// Only allowed before publication starts.
    pub fn attach_calendar(&mut self, calendar_ref: CalendarEventId) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Draft | SessionState::NeedsApproval) {
            return Err(SessionError::validation(
                "calendar_ref",
                format!("cannot reschedule a session in state {}", self.state),
            ));
        }
        self.calendar_ref = Some(calendar_ref);
        self.touch();
        Ok(())
    }

    /// Records the version storage now holds. Called by repositories after a write.
    pub fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn apply(&mut self, action: LifecycleAction, holds_manage: bool) -> Result<(), SessionError> {
        let target = guards::evaluate(action, holds_manage, self.state)
            .map_err(|rejection| self.rejection(action, rejection))?;
        self.state = self
            .state
            .transition_to(target)
            .map_err(|_| SessionError::illegal(action, self.state))?;
        self.touch();
        Ok(())
    }

    fn ensure_publishing(&self, action: LifecycleAction) -> Result<(), SessionError> {
        if self.state == SessionState::ReadyToPublish {
            Ok(())
        } else {
            Err(SessionError::illegal(action, self.state))
        }
    }

    fn rejection(&self, action: LifecycleAction, rejection: GuardRejection) -> SessionError {
        match rejection {
            GuardRejection::PermissionDenied => SessionError::permission_denied(action),
            GuardRejection::IllegalTransition => SessionError::illegal(action, self.state),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
