//! Read → guard → write with bounded retries on version conflicts.

use tracing::{debug, warn};

use crate::domain::foundation::{Permission, SessionId, UserId};
use crate::domain::session::{Session, SessionError};
use crate::ports::{PermissionOracle, ResourceRef, SessionRepository};

/// Conflict retries when configuration says nothing.
pub const DEFAULT_CONFLICT_RETRIES: u32 = 3;

pub(crate) async fn load(
    sessions: &dyn SessionRepository,
    id: &SessionId,
) -> Result<Session, SessionError> {
    sessions
        .find_by_id(id)
        .await
        .map_err(|e| SessionError::infrastructure(e.to_string()))?
        .ok_or(SessionError::NotFound(*id))
}

/// Whether `actor` holds manage-session-state; an oracle failure is an
/// infrastructure error, never a yes or a no.
pub(crate) async fn holds_manage(
    oracle: &dyn PermissionOracle,
    actor: &UserId,
    id: &SessionId,
) -> Result<bool, SessionError> {
    oracle
        .has_permission(actor, Permission::ManageSessionState, &ResourceRef::Session(*id))
        .await
        .map_err(|e| SessionError::infrastructure(e.to_string()))
}

/// Applies `change` to a freshly read session and writes it back.
///
/// A version conflict re-reads the session and evaluates `change` again,
/// so a guard that no longer holds is reported instead of overwritten.
/// Gives up with `Conflict` after `retries` extra attempts.
pub(crate) async fn apply_with_retry<T, F>(
    sessions: &dyn SessionRepository,
    id: &SessionId,
    retries: u32,
    mut change: F,
) -> Result<(Session, T), SessionError>
where
    F: FnMut(&mut Session) -> Result<T, SessionError>,
{
    for attempt in 0..=retries {
        let mut session = load(sessions, id).await?;
        let outcome = change(&mut session)?;
        match sessions.update(&mut session).await {
            Ok(()) => return Ok((session, outcome)),
            Err(e) if e.is_conflict() => {
                debug!(session_id = %id, attempt, "Version conflict, re-reading session");
            }
            Err(e) => return Err(SessionError::infrastructure(e.to_string())),
        }
    }

    warn!(session_id = %id, retries, "Giving up after repeated version conflicts");
    Err(SessionError::Conflict(*id))
}
