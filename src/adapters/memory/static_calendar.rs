//! Calendar provider serving fixed schedules.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use crate::domain::foundation::{CalendarEventId, DomainError, ErrorCode, Timestamp};
use crate::domain::publication::Occurrence;
use crate::ports::{CalendarProvider, RecurrenceDescription};

#[derive(Debug, Clone)]
struct Schedule {
    description: RecurrenceDescription,
    occurrences: Vec<Occurrence>,
}

#[derive(Debug, Default)]
pub struct StaticCalendarProvider {
    schedules: RwLock<HashMap<CalendarEventId, Schedule>>,
    unavailable: RwLock<bool>,
    delay: Option<Duration>,
}

impl StaticCalendarProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schedule with its precomputed occurrences.
    pub fn with_schedule(
        self,
        calendar_ref: CalendarEventId,
        description: RecurrenceDescription,
        occurrences: Vec<Occurrence>,
    ) -> Self {
        self.schedules
            .write()
            .expect("StaticCalendarProvider: lock poisoned")
            .insert(
                calendar_ref,
                Schedule {
                    description,
                    occurrences,
                },
            );
        self
    }

    /// Delays every call, for timeout tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self
            .unavailable
            .write()
            .expect("StaticCalendarProvider: lock poisoned") = unavailable;
    }

    async fn guard(&self) -> Result<(), DomainError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if *self
            .unavailable
            .read()
            .expect("StaticCalendarProvider: lock poisoned")
        {
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                "Calendar unavailable",
            ));
        }
        Ok(())
    }

    fn schedule(&self, calendar_ref: &CalendarEventId) -> Option<Schedule> {
        self.schedules
            .read()
            .expect("StaticCalendarProvider: lock poisoned")
            .get(calendar_ref)
            .cloned()
    }
}

#[async_trait]
impl CalendarProvider for StaticCalendarProvider {
    async fn describe(
        &self,
        calendar_ref: &CalendarEventId,
    ) -> Result<Option<RecurrenceDescription>, DomainError> {
        self.guard().await?;
        Ok(self.schedule(calendar_ref).map(|s| s.description))
    }

    async fn occurrences(
        &self,
        calendar_ref: &CalendarEventId,
        window_start: Timestamp,
        window_end: Timestamp,
    ) -> Result<Vec<Occurrence>, DomainError> {
        self.guard().await?;
        let mut occurrences: Vec<Occurrence> = self
            .schedule(calendar_ref)
            .map(|s| s.occurrences)
            .unwrap_or_default()
            .into_iter()
            .filter(|o| !o.start.is_before(&window_start) && !o.end.is_after(&window_end))
            .collect();
        occurrences.sort_by_key(|o| o.start);
        Ok(occurrences)
    }
}
