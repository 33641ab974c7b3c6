//! Course repository port.

use crate::domain::catalog::Course;
use crate::domain::foundation::{CourseId, DomainError};
use async_trait::async_trait;

/// Repository port for Course aggregate persistence.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Save a new course.
    async fn save(&self, course: &Course) -> Result<(), DomainError>;

    /// Update an existing course.
    ///
    /// # Errors
    ///
    /// - `CourseNotFound` if course doesn't exist
    async fn update(&self, course: &Course) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;
}
