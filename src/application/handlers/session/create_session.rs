//! CreateSessionHandler - schedules a new session of a course.

use std::sync::Arc;

use tracing::info;

use crate::domain::catalog::CourseError;
use crate::domain::foundation::{CalendarEventId, CourseId, InstructorId, Permission, SessionId, UserId};
use crate::domain::people::policy;
use crate::domain::session::Session;
use crate::ports::{
    CourseRepository, InstructorReader, PermissionOracle, ResourceRef, SessionRepository,
};

/// Command to create a session from a course.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub actor: UserId,
    pub course_id: CourseId,
    /// Recurring-event specification to attach, if already known.
    pub calendar_ref: Option<CalendarEventId>,
}

/// Handler for creating sessions.
///
/// Staff with course-state permission and the course's own instructors
/// may create sessions. The new session starts as a draft with a copy of
/// the course details.
pub struct CreateSessionHandler {
    courses: Arc<dyn CourseRepository>,
    sessions: Arc<dyn SessionRepository>,
    instructors: Arc<dyn InstructorReader>,
    oracle: Arc<dyn PermissionOracle>,
}

impl CreateSessionHandler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        sessions: Arc<dyn SessionRepository>,
        instructors: Arc<dyn InstructorReader>,
        oracle: Arc<dyn PermissionOracle>,
    ) -> Self {
        Self {
            courses,
            sessions,
            instructors,
            oracle,
        }
    }

    pub async fn handle(&self, cmd: CreateSessionCommand) -> Result<Session, CourseError> {
        // 1. Find the course
        let course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or(CourseError::NotFound(cmd.course_id))?;

        // 2. Staff permission or collaborator
        let holds = self
            .oracle
            .has_permission(
                &cmd.actor,
                Permission::ManageCourseState,
                &ResourceRef::Course(cmd.course_id),
            )
            .await?;
        let instructors = if holds {
            Vec::new()
        } else {
            let ids: Vec<InstructorId> =
                course.details().instructor_ids.iter().copied().collect();
            self.instructors.find_by_ids(&ids).await?
        };
        if !policy::can_create_session(&cmd.actor, &instructors, holds) {
            return Err(CourseError::PermissionDenied(Permission::ManageCourseState));
        }

        // 3. Build the draft
        let mut session = Session::from_course(SessionId::new(), &course)?;
        if let Some(calendar_ref) = cmd.calendar_ref {
            session
                .attach_calendar(calendar_ref)
                .map_err(|e| CourseError::validation("calendar_ref", e.to_string()))?;
        }

        // 4. Persist
        self.sessions.save(&session).await?;

        info!(
            session_id = %session.id(),
            course_id = %cmd.course_id,
            actor = %cmd.actor,
            "Session created"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryCourseRepository, InMemoryInstructorReader, InMemorySessionRepository,
        StaticPermissionOracle,
    };
    use crate::domain::catalog::{Course, CourseDetails, EnrollmentBounds};
    use crate::domain::foundation::{Currency, Money, PersonId};
    use crate::domain::people::{
        EmploymentType, Instructor, InstructorFinancials, PaymentType, Person,
    };
    use crate::domain::session::SessionState;

    fn staff() -> UserId {
        UserId::new("staff-1").unwrap()
    }

    fn teacher_login() -> UserId {
        UserId::new("glass-instructor").unwrap()
    }

    fn instructor() -> Instructor {
        let person = Person::new(PersonId::new(), "Ada Glass")
            .unwrap()
            .linked_to(teacher_login());
        Instructor::new(
            InstructorId::new(),
            person,
            InstructorFinancials::new(EmploymentType::Contractor1099, PaymentType::Deposit),
        )
    }

    fn course(instructor: &Instructor) -> Course {
        let details = CourseDetails::new(
            "Stained Glass",
            "Lead came.",
            EnrollmentBounds::new(2, 6).unwrap(),
            Money::new(8000, Currency::usd()).unwrap(),
        )
        .unwrap()
        .with_instructors([instructor.id]);
        Course::new(CourseId::new(), details)
    }

    struct Fixture {
        handler: CreateSessionHandler,
        courses: Arc<InMemoryCourseRepository>,
        sessions: Arc<InMemorySessionRepository>,
    }

    fn fixture(course: &Course, instructor: Instructor) -> Fixture {
        let courses = Arc::new(InMemoryCourseRepository::new().with_course(course.clone()));
        let sessions = Arc::new(InMemorySessionRepository::new());
        let instructors = Arc::new(InMemoryInstructorReader::new().with_instructor(instructor));
        let oracle = StaticPermissionOracle::new().grant(staff(), Permission::ManageCourseState);
        Fixture {
            handler: CreateSessionHandler::new(
                courses.clone(),
                sessions.clone(),
                instructors,
                Arc::new(oracle),
            ),
            courses,
            sessions,
        }
    }

    #[tokio::test]
    async fn staff_creates_draft_with_course_details() {
        let instructor = instructor();
        let course = course(&instructor);
        let fx = fixture(&course, instructor);
        let calendar_ref = CalendarEventId::new();

        let session = fx
            .handler
            .handle(CreateSessionCommand {
                actor: staff(),
                course_id: *course.id(),
                calendar_ref: Some(calendar_ref),
            })
            .await
            .unwrap();

        assert_eq!(session.state(), SessionState::Draft);
        assert_eq!(session.name(), "Stained Glass");
        assert_eq!(session.calendar_ref(), Some(&calendar_ref));
        assert!(fx.sessions.get(session.id()).is_some());
    }

    #[tokio::test]
    async fn collaborator_may_create_session() {
        let instructor = instructor();
        let course = course(&instructor);
        let fx = fixture(&course, instructor);

        let result = fx
            .handler
            .handle(CreateSessionCommand {
                actor: teacher_login(),
                course_id: *course.id(),
                calendar_ref: None,
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn stranger_is_denied() {
        let instructor = instructor();
        let course = course(&instructor);
        let fx = fixture(&course, instructor);

        let err = fx
            .handler
            .handle(CreateSessionCommand {
                actor: UserId::new("someone-else").unwrap(),
                course_id: *course.id(),
                calendar_ref: None,
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CourseError::PermissionDenied(Permission::ManageCourseState)
        );
    }

    #[tokio::test]
    async fn archived_course_cannot_spawn_sessions() {
        let instructor = instructor();
        let mut course = course(&instructor);
        course.archive().unwrap();
        let fx = fixture(&course, instructor);

        let err = fx
            .handler
            .handle(CreateSessionCommand {
                actor: staff(),
                course_id: *course.id(),
                calendar_ref: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err, CourseError::Archived(*course.id()));
        assert!(fx.courses.get(course.id()).unwrap().is_archived());
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let instructor = instructor();
        let course = course(&instructor);
        let fx = fixture(&course, instructor);
        let missing = CourseId::new();

        let err = fx
            .handler
            .handle(CreateSessionCommand {
                actor: staff(),
                course_id: missing,
                calendar_ref: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err, CourseError::NotFound(missing));
    }
}
