//! Calendar provider port.
//!
//! Sessions point at a recurring-event specification owned by an external
//! calendar. This port describes that specification and expands it into
//! concrete occurrences; it is not a recurrence engine itself.

use async_trait::async_trait;

use crate::domain::foundation::{CalendarEventId, DomainError, Timestamp};
use crate::domain::publication::Occurrence;

/// Summary of a recurring-event specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceDescription {
    pub title: String,
    /// Start of the first occurrence.
    pub start: Timestamp,
    /// End of the first occurrence.
    pub end: Timestamp,
    /// Recurrence rule name (e.g. `weekly`); `None` for a one-off event.
    pub rule: Option<String>,
    /// Last day the rule applies; `None` means the rule never stops.
    pub end_recurring_period: Option<Timestamp>,
}

impl RecurrenceDescription {
    /// A rule without an end date cannot be published.
    pub fn is_open_ended(&self) -> bool {
        self.rule.is_some() && self.end_recurring_period.is_none()
    }

    /// Window that contains every occurrence, padded a day on each side
    /// so occurrences touching the boundaries are not dropped.
    pub fn occurrence_window(&self) -> (Timestamp, Timestamp) {
        let last = self.end_recurring_period.unwrap_or(self.end);
        (self.start.add_days(-1), last.add_days(1))
    }
}

/// Port for reading schedules.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Describe a recurring-event specification. `None` if it does not exist.
    async fn describe(
        &self,
        calendar_ref: &CalendarEventId,
    ) -> Result<Option<RecurrenceDescription>, DomainError>;

    /// Occurrences within the window, ordered by start.
    async fn occurrences(
        &self,
        calendar_ref: &CalendarEventId,
        window_start: Timestamp,
        window_end: Timestamp,
    ) -> Result<Vec<Occurrence>, DomainError>;

    /// True when the schedule has no determinable end (or does not exist).
    async fn is_indeterminate(&self, calendar_ref: &CalendarEventId) -> Result<bool, DomainError> {
        Ok(self
            .describe(calendar_ref)
            .await?
            .map_or(true, |d| d.is_open_ended()))
    }
}
