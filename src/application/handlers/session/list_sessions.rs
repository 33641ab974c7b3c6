//! ListSessionsHandler - Query handler for filtered session listings.
//!
//! Operators find half-published sessions with
//! `SessionFilter::partially_synced()`.

use std::sync::Arc;

use crate::domain::session::{Session, SessionError};
use crate::ports::{SessionFilter, SessionRepository};

#[derive(Debug, Clone, Default)]
pub struct ListSessionsQuery {
    pub filter: SessionFilter,
}

pub struct ListSessionsHandler {
    sessions: Arc<dyn SessionRepository>,
}

impl ListSessionsHandler {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, query: ListSessionsQuery) -> Result<Vec<Session>, SessionError> {
        self.sessions
            .list(&query.filter)
            .await
            .map_err(|e| SessionError::infrastructure(e.to_string()))
    }
}
