//! In-memory courses, instructors and template texts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::catalog::Course;
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, InstructorId};
use crate::domain::people::Instructor;
use crate::domain::template_text::{TemplateSnapshot, TemplateText};
use crate::ports::{CourseRepository, InstructorReader, TemplateTextReader};

#[derive(Debug, Default)]
pub struct InMemoryCourseRepository {
    courses: RwLock<HashMap<CourseId, Course>>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_course(self, course: Course) -> Self {
        self.courses
            .write()
            .expect("InMemoryCourseRepository: lock poisoned")
            .insert(*course.id(), course);
        self
    }

    pub fn get(&self, id: &CourseId) -> Option<Course> {
        self.courses
            .read()
            .expect("InMemoryCourseRepository: lock poisoned")
            .get(id)
            .cloned()
    }

    pub fn all(&self) -> Vec<Course> {
        self.courses
            .read()
            .expect("InMemoryCourseRepository: lock poisoned")
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn save(&self, course: &Course) -> Result<(), DomainError> {
        self.courses
            .write()
            .expect("InMemoryCourseRepository: lock poisoned")
            .insert(*course.id(), course.clone());
        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<(), DomainError> {
        let mut courses = self
            .courses
            .write()
            .expect("InMemoryCourseRepository: lock poisoned");
        match courses.get_mut(course.id()) {
            Some(stored) => {
                *stored = course.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::CourseNotFound,
                format!("Course not found: {}", course.id()),
            )),
        }
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        Ok(self.get(id))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryInstructorReader {
    instructors: RwLock<HashMap<InstructorId, Instructor>>,
}

impl InMemoryInstructorReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instructor(self, instructor: Instructor) -> Self {
        self.instructors
            .write()
            .expect("InMemoryInstructorReader: lock poisoned")
            .insert(instructor.id, instructor);
        self
    }
}

#[async_trait]
impl InstructorReader for InMemoryInstructorReader {
    async fn find_by_ids(&self, ids: &[InstructorId]) -> Result<Vec<Instructor>, DomainError> {
        let instructors = self
            .instructors
            .read()
            .expect("InMemoryInstructorReader: lock poisoned");
        Ok(ids
            .iter()
            .filter_map(|id| instructors.get(id).cloned())
            .collect())
    }
}

/// Keyword store. Edits made through [`upsert`] show up in the next snapshot.
///
/// [`upsert`]: InMemoryTemplateTextStore::upsert
#[derive(Debug, Default)]
pub struct InMemoryTemplateTextStore {
    texts: RwLock<Vec<TemplateText>>,
}

impl InMemoryTemplateTextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, text: TemplateText) -> Self {
        self.upsert(text);
        self
    }

    pub fn upsert(&self, text: TemplateText) {
        let mut texts = self
            .texts
            .write()
            .expect("InMemoryTemplateTextStore: lock poisoned");
        texts.retain(|t| t.keyword != text.keyword);
        texts.push(text);
    }
}

#[async_trait]
impl TemplateTextReader for InMemoryTemplateTextStore {
    async fn snapshot(&self) -> Result<TemplateSnapshot, DomainError> {
        let texts = self
            .texts
            .read()
            .expect("InMemoryTemplateTextStore: lock poisoned")
            .clone();
        Ok(TemplateSnapshot::from_entries(texts))
    }
}
