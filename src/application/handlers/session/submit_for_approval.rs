//! SubmitForApprovalHandler - instructors hand a draft to staff.

use std::sync::Arc;

use tracing::info;

use super::transition::{self, DEFAULT_CONFLICT_RETRIES};
use crate::domain::foundation::{SessionId, UserId};
use crate::domain::session::{Session, SessionError};
use crate::ports::{PermissionOracle, SessionRepository};

#[derive(Debug, Clone)]
pub struct SubmitForApprovalCommand {
    pub actor: UserId,
    pub session_id: SessionId,
}

/// Handler for draft → needs_approval.
///
/// Staff who can publish directly are refused: the approval queue is for
/// actors without manage permission.
pub struct SubmitForApprovalHandler {
    sessions: Arc<dyn SessionRepository>,
    oracle: Arc<dyn PermissionOracle>,
    conflict_retries: u32,
}

impl SubmitForApprovalHandler {
    pub fn new(sessions: Arc<dyn SessionRepository>, oracle: Arc<dyn PermissionOracle>) -> Self {
        Self {
            sessions,
            oracle,
            conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }

    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.conflict_retries = retries;
        self
    }

    pub async fn handle(&self, cmd: SubmitForApprovalCommand) -> Result<Session, SessionError> {
        let holds =
            transition::holds_manage(self.oracle.as_ref(), &cmd.actor, &cmd.session_id).await?;

        let (session, ()) = transition::apply_with_retry(
            self.sessions.as_ref(),
            &cmd.session_id,
            self.conflict_retries,
            |s| s.submit_for_approval(holds),
        )
        .await?;

        info!(session_id = %session.id(), actor = %cmd.actor, "Session submitted for approval");
        Ok(session)
    }
}
