//! Session repository port.
//!
//! Defines the contract for persisting and retrieving Session aggregates.
//!
//! # Design
//!
//! - **Optimistic concurrency**: `update` writes only if the stored version
//!   still equals the session's version, then bumps it
//! - **No deletes**: canceled sessions stay for history

use crate::domain::foundation::{CourseId, DomainError, SessionId};
use crate::domain::session::{Session, SessionState, SyncStatus};
use async_trait::async_trait;
use serde::Deserialize;

/// Criteria for listing sessions. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SessionFilter {
    pub state: Option<SessionState>,
    pub sync_status: Option<SyncStatus>,
    pub course_id: Option<CourseId>,
}

impl SessionFilter {
    /// Sessions whose remote event lacks a ticket class.
    pub fn partially_synced() -> Self {
        Self {
            sync_status: Some(SyncStatus::EventCreated),
            ..Default::default()
        }
    }

    pub fn matches(&self, session: &Session) -> bool {
        self.state.map_or(true, |s| s == session.state())
            && self.sync_status.map_or(true, |s| s == session.sync_status())
            && self.course_id.map_or(true, |c| &c == session.course_id())
    }
}

/// Repository port for Session aggregate persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Save a new session.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &Session) -> Result<(), DomainError>;

    /// Update an existing session, guarded by its version.
    ///
    /// On success the session's version is advanced to the stored value.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if session doesn't exist
    /// - `ConcurrencyConflict` if the stored version moved on
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &mut Session) -> Result<(), DomainError>;

    /// Find a session by its ID.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// List sessions matching the filter, most recently updated first.
    async fn list(&self, filter: &SessionFilter) -> Result<Vec<Session>, DomainError>;
}
