//! PostgreSQL implementation of SessionRepository.
//!
//! Persists Session aggregates to PostgreSQL. Course details are stored as a
//! JSONB snapshot because a session owns its copy of them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::catalog::CourseDetails;
use crate::domain::foundation::{
    CalendarEventId, CourseId, DomainError, ErrorCode, SessionId, Timestamp,
};
use crate::domain::publication::{RemoteBinding, RemoteEventId, RemoteTicketClassId};
use crate::domain::session::{PublicationClaim, Session, SessionState, SyncStatus};
use crate::ports::{SessionFilter, SessionRepository};

const SESSION_COLUMNS: &str = r#"
    id, course_id, details, state, sync_status, remote_event_id,
    remote_ticket_class_id, publish_claim, publish_claimed_at, calendar_ref,
    version, created_at, updated_at
"#;

/// PostgreSQL implementation of SessionRepository.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: &SessionId) -> Result<bool, DomainError> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM sessions WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to check session existence: {}", e),
                )
            })?;

        Ok(result.0)
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        let (event_id, ticket_class_id) = binding_columns(session.remote());
        let (claim_token, claim_at) = claim_columns(session.publication_claim());

        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, course_id, details, state, sync_status, remote_event_id,
                remote_ticket_class_id, publish_claim, publish_claimed_at, calendar_ref,
                version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.course_id().as_uuid())
        .bind(Json(session.details()))
        .bind(session.state().as_str())
        .bind(session.sync_status().as_str())
        .bind(event_id)
        .bind(ticket_class_id)
        .bind(claim_token)
        .bind(claim_at)
        .bind(session.calendar_ref().map(|c| *c.as_uuid()))
        .bind(session.version())
        .bind(session.created_at().as_datetime())
        .bind(session.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert session: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, session: &mut Session) -> Result<(), DomainError> {
        let (event_id, ticket_class_id) = binding_columns(session.remote());
        let (claim_token, claim_at) = claim_columns(session.publication_claim());

        let new_version: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE sessions SET
                details = $3,
                state = $4,
                sync_status = $5,
                remote_event_id = $6,
                remote_ticket_class_id = $7,
                publish_claim = $8,
                publish_claimed_at = $9,
                calendar_ref = $10,
                updated_at = $11,
                version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING version
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.version())
        .bind(Json(session.details()))
        .bind(session.state().as_str())
        .bind(session.sync_status().as_str())
        .bind(event_id)
        .bind(ticket_class_id)
        .bind(claim_token)
        .bind(claim_at)
        .bind(session.calendar_ref().map(|c| *c.as_uuid()))
        .bind(session.updated_at().as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update session: {}", e),
            )
        })?;

        match new_version {
            Some((version,)) => {
                session.set_version(version);
                Ok(())
            }
            None if self.exists(session.id()).await? => Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!("Session {} was modified concurrently", session.id()),
            )
            .with_detail("expected_version", session.version().to_string())),
            None => Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )),
        }
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM sessions WHERE id = $1", SESSION_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to fetch session: {}", e),
                )
            })?;

        row.map(row_to_session).transpose()
    }

    async fn list(&self, filter: &SessionFilter) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM sessions
            WHERE ($1::text IS NULL OR state = $1)
              AND ($2::text IS NULL OR sync_status = $2)
              AND ($3::uuid IS NULL OR course_id = $3)
            ORDER BY updated_at DESC
            "#,
            SESSION_COLUMNS
        ))
        .bind(filter.state.map(|s| s.as_str()))
        .bind(filter.sync_status.map(|s| s.as_str()))
        .bind(filter.course_id.map(|c| *c.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list sessions: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_session).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Type Conversions
// ════════════════════════════════════════════════════════════════════════════

fn binding_columns(remote: Option<&RemoteBinding>) -> (Option<&str>, Option<&str>) {
    match remote {
        Some(binding) => (
            Some(binding.event_id.as_str()),
            binding.ticket_class_id.as_ref().map(|t| t.as_str()),
        ),
        None => (None, None),
    }
}

fn claim_columns(claim: Option<&PublicationClaim>) -> (Option<Uuid>, Option<DateTime<Utc>>) {
    match claim {
        Some(claim) => (Some(claim.token), Some(*claim.claimed_at.as_datetime())),
        None => (None, None),
    }
}

fn corrupt(message: String) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, message)
}

fn row_to_session(row: PgRow) -> Result<Session, DomainError> {
    let get_err = |e: sqlx::Error| corrupt(format!("Failed to read session row: {}", e));

    let id: Uuid = row.try_get("id").map_err(get_err)?;
    let course_id: Uuid = row.try_get("course_id").map_err(get_err)?;
    let Json(details): Json<CourseDetails> = row.try_get("details").map_err(get_err)?;
    let state: String = row.try_get("state").map_err(get_err)?;
    let sync_status: String = row.try_get("sync_status").map_err(get_err)?;
    let remote_event_id: Option<String> = row.try_get("remote_event_id").map_err(get_err)?;
    let remote_ticket_class_id: Option<String> =
        row.try_get("remote_ticket_class_id").map_err(get_err)?;
    let claim_token: Option<Uuid> = row.try_get("publish_claim").map_err(get_err)?;
    let claimed_at: Option<DateTime<Utc>> = row.try_get("publish_claimed_at").map_err(get_err)?;
    let calendar_ref: Option<Uuid> = row.try_get("calendar_ref").map_err(get_err)?;
    let version: i64 = row.try_get("version").map_err(get_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(get_err)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(get_err)?;

    let state = SessionState::parse(&state)
        .ok_or_else(|| corrupt(format!("Invalid session state: {}", state)))?;
    let sync_status = SyncStatus::parse(&sync_status)
        .ok_or_else(|| corrupt(format!("Invalid sync status: {}", sync_status)))?;

    let remote = match remote_event_id {
        Some(event_id) => Some(RemoteBinding {
            event_id: RemoteEventId::new(event_id)
                .map_err(|e| corrupt(format!("Invalid remote event id: {}", e)))?,
            ticket_class_id: remote_ticket_class_id
                .map(RemoteTicketClassId::new)
                .transpose()
                .map_err(|e| corrupt(format!("Invalid remote ticket class id: {}", e)))?,
        }),
        None => None,
    };

    Ok(Session::reconstitute(
        SessionId::from_uuid(id),
        CourseId::from_uuid(course_id),
        details,
        state,
        sync_status,
        remote,
        claim_token.zip(claimed_at).map(|(token, at)| PublicationClaim {
            token,
            claimed_at: Timestamp::from_datetime(at),
        }),
        calendar_ref.map(CalendarEventId::from_uuid),
        version,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_columns_for_unbound_session() {
        assert_eq!(binding_columns(None), (None, None));
    }

    #[test]
    fn binding_columns_for_partial_binding() {
        let binding = RemoteBinding::event_only(RemoteEventId::new("e-1").unwrap());
        assert_eq!(binding_columns(Some(&binding)), (Some("e-1"), None));
    }

    #[test]
    fn binding_columns_for_complete_binding() {
        let binding = RemoteBinding {
            event_id: RemoteEventId::new("e-1").unwrap(),
            ticket_class_id: Some(RemoteTicketClassId::new("t-1").unwrap()),
        };
        assert_eq!(binding_columns(Some(&binding)), (Some("e-1"), Some("t-1")));
    }

    #[test]
    fn claim_columns_are_both_set_or_both_null() {
        assert_eq!(claim_columns(None), (None, None));
        let claim = PublicationClaim::new(Timestamp::now());
        let (token, at) = claim_columns(Some(&claim));
        assert_eq!(token, Some(claim.token));
        assert_eq!(at, Some(*claim.claimed_at.as_datetime()));
    }

    #[test]
    fn stored_state_strings_parse() {
        for state in ["draft", "needs_approval", "ready_to_publish", "public", "canceled"] {
            assert!(SessionState::parse(state).is_some(), "{}", state);
        }
        for status in ["not_synced", "event_created", "synced"] {
            assert!(SyncStatus::parse(status).is_some(), "{}", status);
        }
    }
}
