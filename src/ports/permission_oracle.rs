//! Permission oracle port.
//!
//! Answers "does actor X hold permission P on resource R". The system does
//! not define roles itself; it only consumes these answers.
//!
//! An oracle that cannot answer returns an error instead of guessing.
//! Some guards need the permission to be *absent* (only non-staff submit
//! for approval), so neither `true` nor `false` is a safe default.

use async_trait::async_trait;
use std::fmt;

use crate::domain::foundation::{
    CourseId, DomainError, InstructorId, Permission, SessionId, UserId,
};

/// The object a permission is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    Session(SessionId),
    Course(CourseId),
    Instructor(InstructorId),
    /// Not tied to a single record (e.g. importing a remote event).
    Global,
}

impl ResourceRef {
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceRef::Session(_) => "session",
            ResourceRef::Course(_) => "course",
            ResourceRef::Instructor(_) => "instructor",
            ResourceRef::Global => "global",
        }
    }

    /// Record id as a string; `None` for global.
    pub fn id_string(&self) -> Option<String> {
        match self {
            ResourceRef::Session(id) => Some(id.to_string()),
            ResourceRef::Course(id) => Some(id.to_string()),
            ResourceRef::Instructor(id) => Some(id.to_string()),
            ResourceRef::Global => None,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id_string() {
            Some(id) => write!(f, "{}:{}", self.kind(), id),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// Port for permission checks.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    /// Whether the actor holds the permission on the resource.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` if the grant store cannot be read
    async fn has_permission(
        &self,
        actor: &UserId,
        permission: Permission,
        resource: &ResourceRef,
    ) -> Result<bool, DomainError>;
}
