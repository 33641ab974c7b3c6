//! CancelSessionHandler - cancels locally, then tries to cancel remotely.

use std::sync::Arc;

use tracing::info;

use super::transition::{self, DEFAULT_CONFLICT_RETRIES};
use crate::application::PublicationSynchronizer;
use crate::domain::foundation::{SessionId, UserId};
use crate::domain::publication::DesyncWarning;
use crate::domain::session::{Session, SessionError};
use crate::ports::{PermissionOracle, SessionRepository};

#[derive(Debug, Clone)]
pub struct CancelSessionCommand {
    pub actor: UserId,
    pub session_id: SessionId,
}

/// Result of a cancellation.
#[derive(Debug, Clone)]
pub struct CancelSessionResult {
    pub session: Session,
    /// Set when the remote event could not be canceled. The local
    /// cancellation stands regardless.
    pub desync_warning: Option<DesyncWarning>,
}

pub struct CancelSessionHandler {
    sessions: Arc<dyn SessionRepository>,
    oracle: Arc<dyn PermissionOracle>,
    synchronizer: Arc<PublicationSynchronizer>,
    conflict_retries: u32,
}

impl CancelSessionHandler {
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
        cmd: CancelSessionCommand,
    ) -> Result<CancelSessionResult, SessionError> {
        let holds =
            transition::holds_manage(self.oracle.as_ref(), &cmd.actor, &cmd.session_id).await?;

        let (session, remote_event) = transition::apply_with_retry(
            self.sessions.as_ref(),
            &cmd.session_id,
            self.conflict_retries,
            |s| s.cancel(holds),
        )
        .await?;
        info!(session_id = %session.id(), actor = %cmd.actor, "Session canceled");

        let desync_warning = match remote_event {
            Some(event_id) => self.synchronizer.desync(&event_id).await,
            None => None,
        };

        Ok(CancelSessionResult {
            session,
            desync_warning,
        })
    }
}
