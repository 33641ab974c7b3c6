//! Course aggregate - a reusable template for scheduled sessions.
//!
//! Courses are never deleted once sessions reference them; they are archived.

use serde::{Deserialize, Serialize};

use super::details::{CourseDetails, EnrollmentBounds};
use super::errors::CourseError;
use crate::domain::foundation::{CourseId, Money, StateMachine, Timestamp};

/// Lifecycle of a course template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseState {
    #[default]
    Current,
    Archived,
}

impl CourseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseState::Current => "current",
            CourseState::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "current" => Some(CourseState::Current),
            "archived" => Some(CourseState::Archived),
            _ => None,
        }
    }
}

impl StateMachine for CourseState {
    fn valid_transitions(&self) -> &'static [Self] {
        match self {
            CourseState::Current => &[CourseState::Archived],
            CourseState::Archived => &[CourseState::Current],
        }
    }
}

/// The parts of a remote ticketed event a course can be built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedEvent {
    pub name: String,
    /// Plain-text rendering of the remote description.
    pub description_text: String,
    pub capacity: u16,
    /// Cost of the first ticket class, if the event has any.
    pub first_ticket_cost: Option<Money>,
}

/// Course aggregate.
///
/// # Invariants
///
/// - `details.name` is non-empty
/// - enrollment bounds hold (`min <= max`, `max > 0`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    details: CourseDetails,
    state: CourseState,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Course {
    /// Creates a current course.
    pub fn new(id: CourseId, details: CourseDetails) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            details,
            state: CourseState::Current,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a current course from a remote event.
    pub fn from_imported_event(
        id: CourseId,
        event: &ImportedEvent,
        default_price: Money,
    ) -> Result<Self, CourseError> {
        let enrollment = EnrollmentBounds::new(0, event.capacity)?;
        let details = CourseDetails::new(
            event.name.clone(),
            event.description_text.clone(),
            enrollment,
            default_price,
        )?;
        let mut course = Self::new(id, details);
        course.set_from_event(event)?;
        Ok(course)
    }

    /// Reconstitute a course from persistence (no validation).
    pub fn reconstitute(
        id: CourseId,
        details: CourseDetails,
        state: CourseState,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            details,
            state,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &CourseId {
        &self.id
    }

    pub fn details(&self) -> &CourseDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn state(&self) -> CourseState {
        self.state
    }

    pub fn is_archived(&self) -> bool {
        self.state == CourseState::Archived
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Archives the course. Existing sessions are unaffected.
    ///
    /// # Errors
    ///
    /// - `IllegalTransition` if already archived
    pub fn archive(&mut self) -> Result<(), CourseError> {
        self.transition(CourseState::Archived)
    }

    /// Returns an archived course to the current catalog.
    ///
    /// # Errors
    ///
    /// - `IllegalTransition` if the course is current
    pub fn restore(&mut self) -> Result<(), CourseError> {
        self.transition(CourseState::Current)
    }

    /// Overwrites name, description, capacity and price from a remote event.
    pub fn set_from_event(&mut self, event: &ImportedEvent) -> Result<(), CourseError> {
        if event.name.trim().is_empty() {
            return Err(CourseError::validation("name", "Remote event has no name"));
        }
        let enrollment = EnrollmentBounds::new(
            self.details.enrollment.min().min(event.capacity),
            event.capacity,
        )?;

        self.details.name = event.name.clone();
        self.details.description = event.description_text.clone();
        self.details.enrollment = enrollment;
        if let Some(cost) = &event.first_ticket_cost {
            self.details.ticket_price = cost.clone();
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    fn transition(&mut self, target: CourseState) -> Result<(), CourseError> {
        if !self.state.can_transition_to(&target) {
            return Err(CourseError::IllegalTransition {
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
