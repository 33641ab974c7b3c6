//! Named permissions.
//!
//! The decision itself comes from the `PermissionOracle` port; this module
//! provides the vocabulary and the codes the oracle stores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named capabilities an actor may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Publish and cancel sessions.
    ManageSessionState,
    /// Archive and restore courses, import remote events.
    ManageCourseState,
    /// Edit instructor employment, payment and revenue-share fields.
    AdministerInstructorFinancials,
    /// Link a person record to an authentication identity.
    ManageUserAssociation,
}

impl Permission {
    /// Returns the permission code as stored by the oracle.
    pub fn code(&self) -> &'static str {
        match self {
            Permission::ManageSessionState => "classes.change_session_state",
            Permission::ManageCourseState => "classes.change_course_state",
            Permission::AdministerInstructorFinancials => "classes.admin_instructor",
            Permission::ManageUserAssociation => "classes.change_user",
        }
    }

    /// Parses a stored permission code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "classes.change_session_state" => Some(Permission::ManageSessionState),
            "classes.change_course_state" => Some(Permission::ManageCourseState),
            "classes.admin_instructor" => Some(Permission::AdministerInstructorFinancials),
            "classes.change_user" => Some(Permission::ManageUserAssociation),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
