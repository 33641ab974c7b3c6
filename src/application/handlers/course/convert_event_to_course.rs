//! ConvertEventToCourseHandler - imports a remote event as a new course.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::application::deadline;
use crate::domain::catalog::{Course, CourseError};
use crate::domain::foundation::{CourseId, Currency, Money, Permission, UserId};
use crate::domain::publication::RemoteEventId;
use crate::ports::{CourseRepository, PermissionOracle, ResourceRef, TicketingGateway};

#[derive(Debug, Clone)]
pub struct ConvertEventToCourseCommand {
    pub actor: UserId,
    pub remote_event_id: RemoteEventId,
}

/// Handler for importing events.
///
/// The course takes the event's name, plain-text description and
/// capacity, and the price of its first ticket class. Events without a
/// priced ticket class import as free.
pub struct ConvertEventToCourseHandler {
    courses: Arc<dyn CourseRepository>,
    oracle: Arc<dyn PermissionOracle>,
    gateway: Arc<dyn TicketingGateway>,
    currency: Currency,
    call_timeout: Duration,
}

impl ConvertEventToCourseHandler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        oracle: Arc<dyn PermissionOracle>,
        gateway: Arc<dyn TicketingGateway>,
        currency: Currency,
        call_timeout: Duration,
    ) -> Self {
        Self {
            courses,
            oracle,
            gateway,
            currency,
            call_timeout,
        }
    }

    pub async fn handle(&self, cmd: ConvertEventToCourseCommand) -> Result<Course, CourseError> {
        if !self
            .oracle
            .has_permission(&cmd.actor, Permission::ManageCourseState, &ResourceRef::Global)
            .await?
        {
            return Err(CourseError::PermissionDenied(Permission::ManageCourseState));
        }

        let event = deadline::ticketing(
            self.call_timeout,
            "get_event",
            self.gateway.get_event(&cmd.remote_event_id),
        )
        .await
        .map_err(|e| CourseError::Gateway {
            kind: e.kind(),
            message: e.message,
        })?;

        let imported = event.to_imported_event()?;
        let course = Course::from_imported_event(
            CourseId::new(),
            &imported,
            Money::zero(self.currency.clone()),
        )?;
        self.courses.save(&course).await?;

        info!(
            course_id = %course.id(),
            remote_event_id = %cmd.remote_event_id,
            actor = %cmd.actor,
            "Course imported from remote event"
        );
        Ok(course)
    }
}
