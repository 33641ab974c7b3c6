//! In-memory session repository with version checks.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::session::Session;
use crate::ports::{SessionFilter, SessionRepository};

/// Session store that behaves like the Postgres adapter: `update` only
/// lands if the stored version still matches.
///
/// Concurrent writers can be simulated with [`inject_conflicts`], which
/// makes the next `n` updates lose the race to a phantom writer.
///
/// [`inject_conflicts`]: InMemorySessionRepository::inject_conflicts
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, Session>>,
    pending_conflicts: RwLock<u32>,
    fail_updates: RwLock<bool>,
    updates: RwLock<u32>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(self, session: Session) -> Self {
        self.sessions
            .write()
            .expect("InMemorySessionRepository: lock poisoned")
            .insert(*session.id(), session);
        self
    }

    /// Makes the next `count` updates fail with a concurrency conflict.
    ///
    /// Each injected conflict also advances the stored version, as a
    /// concurrent writer would.
    pub fn inject_conflicts(&self, count: u32) {
        *self
            .pending_conflicts
            .write()
            .expect("InMemorySessionRepository: lock poisoned") = count;
    }

    /// Makes every update fail with a database error until reset.
    pub fn set_fail_updates(&self, fail: bool) {
        *self
            .fail_updates
            .write()
            .expect("InMemorySessionRepository: lock poisoned") = fail;
    }

    /// The stored copy of a session.
    pub fn get(&self, id: &SessionId) -> Option<Session> {
        self.sessions
            .read()
            .expect("InMemorySessionRepository: lock poisoned")
            .get(id)
            .cloned()
    }

    /// Successful updates so far.
    pub fn update_count(&self) -> u32 {
        *self
            .updates
            .read()
            .expect("InMemorySessionRepository: lock poisoned")
    }

    fn take_conflict(&self) -> bool {
        let mut pending = self
            .pending_conflicts
            .write()
            .expect("InMemorySessionRepository: lock poisoned");
        if *pending > 0 {
            *pending -= 1;
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        self.sessions
            .write()
            .expect("InMemorySessionRepository: lock poisoned")
            .insert(*session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &mut Session) -> Result<(), DomainError> {
        if *self
            .fail_updates
            .read()
            .expect("InMemorySessionRepository: lock poisoned")
        {
            return Err(DomainError::database("Simulated update failure"));
        }

        let conflict = self.take_conflict();
        let mut sessions = self
            .sessions
            .write()
            .expect("InMemorySessionRepository: lock poisoned");
        let stored = sessions.get_mut(session.id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )
        })?;

        if conflict {
            stored.set_version(stored.version() + 1);
        }
        if stored.version() != session.version() {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!(
                    "Session {} was modified concurrently (expected version {}, found {})",
                    session.id(),
                    session.version(),
                    stored.version()
                ),
            ));
        }

        session.set_version(session.version() + 1);
        *stored = session.clone();
        drop(sessions);
        *self
            .updates
            .write()
            .expect("InMemorySessionRepository: lock poisoned") += 1;
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        Ok(self.get(id))
    }

    async fn list(&self, filter: &SessionFilter) -> Result<Vec<Session>, DomainError> {
        let mut sessions: Vec<Session> = self
            .sessions
            .read()
            .expect("InMemorySessionRepository: lock poisoned")
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Course, CourseDetails, EnrollmentBounds};
    use crate::domain::foundation::{CourseId, Currency, Money};
    use crate::domain::session::SessionState;

    fn session() -> Session {
        let details = CourseDetails::new(
            "Lathe Basics",
            "Turn things.",
            EnrollmentBounds::new(2, 8).unwrap(),
            Money::new(4000, Currency::usd()).unwrap(),
        )
        .unwrap();
        let course = Course::new(CourseId::new(), details);
        Session::from_course(SessionId::new(), &course).unwrap()
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let mut s = session();
        let repo = InMemorySessionRepository::new().with_session(s.clone());

        s.begin_publish(true).unwrap();
        repo.update(&mut s).await.unwrap();

        assert_eq!(s.version(), 1);
        let stored = repo.get(s.id()).unwrap();
        assert_eq!(stored.version(), 1);
        assert_eq!(stored.state(), SessionState::ReadyToPublish);
    }

    #[tokio::test]
    async fn stale_update_is_a_conflict() {
        let s = session();
        let repo = InMemorySessionRepository::new().with_session(s.clone());

        let mut first = s.clone();
        let mut second = s;
        repo.update(&mut first).await.unwrap();
        let err = repo.update(&mut second).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(second.version(), 0);
    }

    #[tokio::test]
    async fn injected_conflict_advances_stored_version() {
        let mut s = session();
        let repo = InMemorySessionRepository::new().with_session(s.clone());
        repo.inject_conflicts(1);

        assert!(repo.update(&mut s).await.unwrap_err().is_conflict());
        let mut fresh = repo.get(s.id()).unwrap();
        assert_eq!(fresh.version(), 1);
        repo.update(&mut fresh).await.unwrap();
        assert_eq!(repo.update_count(), 1);
    }

    #[tokio::test]
    async fn update_of_unknown_session_is_not_found() {
        let mut s = session();
        let repo = InMemorySessionRepository::new();
        let err = repo.update(&mut s).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }

    #[tokio::test]
    async fn list_applies_filter() {
        let draft = session();
        let mut ready = session();
        ready.begin_publish(true).unwrap();
        let repo = InMemorySessionRepository::new()
            .with_session(draft)
            .with_session(ready.clone());

        let filter = SessionFilter {
            state: Some(SessionState::ReadyToPublish),
            ..Default::default()
        };
        let listed = repo.list(&filter).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), ready.id());
    }
}
