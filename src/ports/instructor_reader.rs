//! Instructor reader port (read side).
//!
//! Collaborator checks need the instructors of a course or session together
//! with the identities their person records are linked to.

use crate::domain::foundation::{DomainError, InstructorId};
use crate::domain::people::Instructor;
use async_trait::async_trait;

#[async_trait]
pub trait InstructorReader: Send + Sync {
    /// Loads the given instructors. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[InstructorId]) -> Result<Vec<Instructor>, DomainError>;
}
