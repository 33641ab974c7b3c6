//! Descriptive, enrollment and pricing fields shared by courses and sessions.
//!
//! A session copies these from its course at creation time; after that the
//! two evolve independently.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::foundation::{
    CategoryId, Currency, InstructorId, Money, RoomId, ValidationError,
};

/// Prerequisite text applied when none is given.
pub const DEFAULT_PREREQUISITES: &str = "Students must be at least 18 years of age.";

/// How the material cost of a course reaches the workshop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCostCollection {
    /// Included in the ticket price.
    Ticket,
    /// Collected by the instructor at the first meeting.
    Instructor,
    #[default]
    Unspecified,
}

impl MaterialCostCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialCostCollection::Ticket => "ticket",
            MaterialCostCollection::Instructor => "instructor",
            MaterialCostCollection::Unspecified => "unspecified",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "ticket" => Ok(MaterialCostCollection::Ticket),
            "instructor" => Ok(MaterialCostCollection::Instructor),
            "unspecified" | "" => Ok(MaterialCostCollection::Unspecified),
            other => Err(ValidationError::invalid_format(
                "material_cost_collection",
                format!("unknown collection mode '{}'", other),
            )),
        }
    }

    pub fn is_in_ticket(&self) -> bool {
        matches!(self, MaterialCostCollection::Ticket)
    }
}

/// Minimum and maximum enrollment.
///
/// # Invariants
///
/// - `min <= max`
/// - `max > 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentBounds {
    min: u16,
    max: u16,
}

impl EnrollmentBounds {
    pub fn new(min: u16, max: u16) -> Result<Self, ValidationError> {
        if max == 0 {
            return Err(ValidationError::out_of_range(
                "max_enrollment",
                1,
                i64::from(u16::MAX),
                0,
            ));
        }
        if min > max {
            return Err(ValidationError::out_of_range(
                "min_enrollment",
                0,
                i64::from(max),
                i64::from(min),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u16 {
        self.min
    }

    pub fn max(&self) -> u16 {
        self.max
    }
}

/// Billed instructor hours, kept in hundredths of an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BilledHours(u32);

impl BilledHours {
    /// Largest value the four-digit, two-decimal field can hold (99.99).
    pub const MAX_HUNDREDTHS: u32 = 9_999;

    pub fn from_hundredths(hundredths: u32) -> Result<Self, ValidationError> {
        if hundredths > Self::MAX_HUNDREDTHS {
            return Err(ValidationError::out_of_range(
                "instructor_hours",
                0,
                i64::from(Self::MAX_HUNDREDTHS),
                i64::from(hundredths),
            ));
        }
        Ok(Self(hundredths))
    }

    pub fn hundredths(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for BilledHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Fields a session inherits from its course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDetails {
    pub name: String,
    /// Roughly one paragraph, shown on the public site.
    pub blurb: String,
    /// Markdown body; may contain `{{keyword}}` placeholders.
    pub description: String,
    pub student_prerequisites: Option<String>,
    /// Classroom requirements (tools, projector, consumables).
    pub requirements: Option<String>,
    pub room_ids: BTreeSet<RoomId>,
    pub category_ids: BTreeSet<CategoryId>,
    pub instructor_ids: BTreeSet<InstructorId>,
    pub number_of_meetings: u16,
    pub instructor_hours: BilledHours,
    pub enrollment: EnrollmentBounds,
    pub ticket_price: Money,
    pub material_cost: Money,
    pub material_cost_collection: MaterialCostCollection,
}

impl CourseDetails {
    /// Creates details with defaults for everything but the required fields.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        enrollment: EnrollmentBounds,
        ticket_price: Money,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let currency = ticket_price.currency().clone();
        Ok(Self {
            name,
            blurb: String::new(),
            description: description.into(),
            student_prerequisites: Some(DEFAULT_PREREQUISITES.to_string()),
            requirements: None,
            room_ids: BTreeSet::new(),
            category_ids: BTreeSet::new(),
            instructor_ids: BTreeSet::new(),
            number_of_meetings: 1,
            instructor_hours: BilledHours::default(),
            enrollment,
            ticket_price,
            material_cost: Money::zero(currency),
            material_cost_collection: MaterialCostCollection::Unspecified,
        })
    }

    pub fn with_blurb(mut self, blurb: impl Into<String>) -> Self {
        self.blurb = blurb.into();
        self
    }

    pub fn with_material_cost(mut self, cost: Money, collection: MaterialCostCollection) -> Self {
        self.material_cost = cost;
        self.material_cost_collection = collection;
        self
    }

    pub fn with_instructors(mut self, ids: impl IntoIterator<Item = InstructorId>) -> Self {
        self.instructor_ids.extend(ids);
        self
    }

    pub fn with_rooms(mut self, ids: impl IntoIterator<Item = RoomId>) -> Self {
        self.room_ids.extend(ids);
        self
    }

    pub fn with_categories(mut self, ids: impl IntoIterator<Item = CategoryId>) -> Self {
        self.category_ids.extend(ids);
        self
    }

    /// Currency used when nothing else determines one.
    pub fn currency(&self) -> &Currency {
        self.ticket_price.currency()
    }
}
