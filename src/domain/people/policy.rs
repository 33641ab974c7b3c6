//! Authorization policies for catalog entities.
//!
//! Each policy is a pure function of the actor, the entity's relevant facts
//! and the permissions the caller already resolved through the oracle. They
//! are composed from two predicates: `is_author` (the person record is the
//! actor's own) and `is_collaborator` (the actor teaches the course/session).
//!
//! Session creation goes through `can_create_session`. The profile,
//! session-edit, session-delete and instructor-change rules back the
//! administrative editing screens. Those screens are not served by this
//! crate, so nothing here calls them yet; they are the rules an editing
//! surface must apply.
//!
//! Archiving or restoring a course is not covered by `can_change_course`.
//! That needs manage-course-state on its own.

use super::instructor::Instructor;
use super::person::Person;
use crate::domain::foundation::{Permission, UserId};
use crate::domain::session::SessionState;

/// The person record belongs to the actor.
pub fn is_author(actor: &UserId, person: &Person) -> bool {
    person.is_linked_to(actor)
}

/// The actor is one of the listed instructors.
pub fn is_collaborator(actor: &UserId, instructors: &[Instructor]) -> bool {
    instructors.iter().any(|i| is_author(actor, &i.person))
}

/// Instructors may edit their own profile. Nobody else gets it through this rule.
pub fn can_edit_instructor_profile(actor: &UserId, instructor: &Instructor) -> bool {
    is_author(actor, &instructor.person)
}

/// Staff with course-state permission, or the course's own instructors.
pub fn can_change_course(
    actor: &UserId,
    course_instructors: &[Instructor],
    holds_manage_course_state: bool,
) -> bool {
    holds_manage_course_state || is_collaborator(actor, course_instructors)
}

/// Same rule as changing the course a session is spawned from.
pub fn can_create_session(
    actor: &UserId,
    course_instructors: &[Instructor],
    holds_manage_course_state: bool,
) -> bool {
    can_change_course(actor, course_instructors, holds_manage_course_state)
}

/// Session collaborators may edit the copied fields of their session.
pub fn can_change_session(
    actor: &UserId,
    session_instructors: &[Instructor],
    holds_manage_session_state: bool,
) -> bool {
    holds_manage_session_state || is_collaborator(actor, session_instructors)
}

/// Collaborators may discard a session only while it is still a draft.
pub fn can_delete_session(
    actor: &UserId,
    session_instructors: &[Instructor],
    state: SessionState,
) -> bool {
    state == SessionState::Draft && is_collaborator(actor, session_instructors)
}

/// Which parts of an instructor record a change touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstructorChange {
    pub profile: bool,
    pub financials: bool,
    pub user_link: bool,
}

/// Checks an instructor change field group by field group.
///
/// `held` is the set of permissions the actor holds on this instructor.
/// Returns the first missing permission, or `None` when the change is allowed.
/// A profile change without an author match and without any permission is
/// reported as missing administer-instructor-financials, the broadest grant
/// over instructor records.
pub fn missing_permission_for_instructor_change(
    actor: &UserId,
    instructor: &Instructor,
    change: InstructorChange,
    held: &[Permission],
) -> Option<Permission> {
    let holds = |p: Permission| held.contains(&p);

    if change.financials && !holds(Permission::AdministerInstructorFinancials) {
        return Some(Permission::AdministerInstructorFinancials);
    }
    if change.user_link && !holds(Permission::ManageUserAssociation) {
        return Some(Permission::ManageUserAssociation);
    }
    if change.profile
        && !can_edit_instructor_profile(actor, instructor)
        && !holds(Permission::AdministerInstructorFinancials)
    {
        return Some(Permission::AdministerInstructorFinancials);
    }
    None
}
