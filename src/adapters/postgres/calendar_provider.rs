//! PostgreSQL implementation of CalendarProvider.
//!
//! Reads recurring-event specifications and their materialized occurrences
//! from the tables the calendar application maintains. Nothing here expands
//! recurrence rules.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{CalendarEventId, DomainError, ErrorCode, Timestamp};
use crate::domain::publication::Occurrence;
use crate::ports::{CalendarProvider, RecurrenceDescription};

type DescriptionRow = (
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<String>,
    Option<DateTime<Utc>>,
);

/// PostgreSQL implementation of the CalendarProvider port.
#[derive(Clone)]
pub struct PostgresCalendarProvider {
    pool: PgPool,
}

impl PostgresCalendarProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CalendarProvider for PostgresCalendarProvider {
    async fn describe(
        &self,
        calendar_ref: &CalendarEventId,
    ) -> Result<Option<RecurrenceDescription>, DomainError> {
        let row: Option<DescriptionRow> = sqlx::query_as(
            r#"
            SELECT title, start_at, end_at, rule, end_recurring_period
            FROM calendar_events
            WHERE id = $1
            "#,
        )
        .bind(calendar_ref.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to describe calendar event: {}", e),
            )
        })?;

        Ok(row.map(|(title, start, end, rule, until)| RecurrenceDescription {
            title,
            start: Timestamp::from_datetime(start),
            end: Timestamp::from_datetime(end),
            rule,
            end_recurring_period: until.map(Timestamp::from_datetime),
        }))
    }

    async fn occurrences(
        &self,
        calendar_ref: &CalendarEventId,
        window_start: Timestamp,
        window_end: Timestamp,
    ) -> Result<Vec<Occurrence>, DomainError> {
        let rows: Vec<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT start_at, end_at
            FROM calendar_occurrences
            WHERE calendar_event_id = $1
              AND start_at >= $2
              AND end_at <= $3
              AND NOT cancelled
            ORDER BY start_at
            "#,
        )
        .bind(calendar_ref.as_uuid())
        .bind(window_start.as_datetime())
        .bind(window_end.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load occurrences: {}", e),
            )
        })?;

        rows.into_iter()
            .map(|(start, end)| {
                Occurrence::new(Timestamp::from_datetime(start), Timestamp::from_datetime(end))
                    .map_err(|e| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Invalid occurrence for {}: {}", calendar_ref, e),
                        )
                    })
            })
            .collect()
    }
}
