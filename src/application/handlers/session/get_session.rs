//! GetSessionHandler - Query handler for retrieving a session.

use std::sync::Arc;

use super::transition;
use crate::domain::foundation::SessionId;
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionRepository;

/// Query to get a session by ID.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Handler for retrieving session details. Any authenticated actor may read.
pub struct GetSessionHandler {
    sessions: Arc<dyn SessionRepository>,
}

impl GetSessionHandler {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<Session, SessionError> {
        transition::load(self.sessions.as_ref(), &query.session_id).await
    }
}
