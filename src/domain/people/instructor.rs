//! Instructor entity - a Person plus teaching and payroll details.

use serde::{Deserialize, Serialize};

use super::person::Person;
use crate::domain::foundation::{InstructorId, Percentage, ValidationError};

/// Default share of the ticket price paid to the instructor.
pub const DEFAULT_REVENUE_SHARE: Percentage = Percentage::HALF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "w2")]
    W2,
    #[serde(rename = "1099")]
    Contractor1099,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::W2 => "w2",
            EmploymentType::Contractor1099 => "1099",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "w2" => Ok(EmploymentType::W2),
            "1099" => Ok(EmploymentType::Contractor1099),
            other => Err(ValidationError::invalid_format(
                "employment_type",
                format!("unknown employment type '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Check,
    Deposit,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Check => "check",
            PaymentType::Deposit => "deposit",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "check" => Ok(PaymentType::Check),
            "deposit" => Ok(PaymentType::Deposit),
            other => Err(ValidationError::invalid_format(
                "payment_type",
                format!("unknown payment type '{}'", other),
            )),
        }
    }
}

/// Fields only an actor with instructor-financials permission may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorFinancials {
    pub employment_type: EmploymentType,
    pub payment_type: PaymentType,
    pub revenue_share: Percentage,
}

impl InstructorFinancials {
    pub fn new(employment_type: EmploymentType, payment_type: PaymentType) -> Self {
        Self {
            employment_type,
            payment_type,
            revenue_share: DEFAULT_REVENUE_SHARE,
        }
    }
}

/// An instructor: a person with a bio, photo and payroll classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: InstructorId,
    pub person: Person,
    pub bio: String,
    /// Storage path of the profile photo.
    pub photo: Option<String>,
    pub financials: InstructorFinancials,
}

impl Instructor {
    pub fn new(id: InstructorId, person: Person, financials: InstructorFinancials) -> Self {
        Self {
            id,
            person,
            bio: String::new(),
            photo: None,
            financials,
        }
    }

    pub fn name_display(&self) -> String {
        self.person.name_display()
    }

    /// Instructor's cut of a ticket price, in minor units.
    pub fn share_of(&self, ticket_price_minor: i64) -> i64 {
        self.financials.revenue_share.of_minor_units(ticket_price_minor)
    }
}

/// Comma-separated display names, the way course listings show instructors.
pub fn instructor_names(instructors: &[Instructor]) -> String {
    instructors
        .iter()
        .map(Instructor::name_display)
        .collect::<Vec<_>>()
        .join(", ")
}
