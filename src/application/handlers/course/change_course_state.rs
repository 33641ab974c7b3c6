//! ChangeCourseStateHandler - archives or restores a course.

use std::sync::Arc;

use tracing::info;

use crate::domain::catalog::{Course, CourseError, CourseState};
use crate::domain::foundation::{CourseId, Permission, UserId};
use crate::ports::{CourseRepository, PermissionOracle, ResourceRef};

#[derive(Debug, Clone)]
pub struct ChangeCourseStateCommand {
    pub actor: UserId,
    pub course_id: CourseId,
    pub target: CourseState,
}

/// Archived courses drop out of the catalog and cannot spawn sessions;
/// existing sessions are unaffected.
///
/// Only manage-course-state allows this. Being one of the course's
/// instructors lets an actor edit the course, not retire it.
pub struct ChangeCourseStateHandler {
    courses: Arc<dyn CourseRepository>,
    oracle: Arc<dyn PermissionOracle>,
}

impl ChangeCourseStateHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, oracle: Arc<dyn PermissionOracle>) -> Self {
        Self { courses, oracle }
    }

    pub async fn handle(&self, cmd: ChangeCourseStateCommand) -> Result<Course, CourseError> {
        let mut course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or(CourseError::NotFound(cmd.course_id))?;

        let holds = self
            .oracle
            .has_permission(
                &cmd.actor,
                Permission::ManageCourseState,
                &ResourceRef::Course(cmd.course_id),
            )
            .await?;
        if !holds {
            return Err(CourseError::PermissionDenied(Permission::ManageCourseState));
        }

        match cmd.target {
            CourseState::Archived => course.archive()?,
            CourseState::Current => course.restore()?,
        }
        self.courses.update(&course).await?;

        info!(
            course_id = %cmd.course_id,
            state = course.state().as_str(),
            actor = %cmd.actor,
            "Course state changed"
        );
        Ok(course)
    }
}
