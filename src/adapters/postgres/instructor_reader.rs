//! PostgreSQL implementation of InstructorReader.
//!
//! Instructors are stored separately from the person records they extend;
//! both are joined here.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, InstructorId, Percentage, PersonId, UserId, ValidationError,
};
use crate::domain::people::{
    ContactMethod, EmploymentType, Instructor, InstructorFinancials, PaymentType, Person,
};
use crate::ports::InstructorReader;

/// PostgreSQL implementation of InstructorReader.
#[derive(Clone)]
pub struct PostgresInstructorReader {
    pool: PgPool,
}

impl PostgresInstructorReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InstructorReader for PostgresInstructorReader {
    async fn find_by_ids(&self, ids: &[InstructorId]) -> Result<Vec<Instructor>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(
            r#"
            SELECT i.id, i.bio, i.photo, i.employment_type, i.payment_type, i.revenue_share,
                   p.id AS person_id, p.name, p.handle, p.user_id, p.phone_number,
                   p.preferred_contact_method, p.emergency_contact
            FROM instructors i
            JOIN persons p ON p.id = i.person_id
            WHERE i.id = ANY($1)
            ORDER BY p.name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch instructors: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_instructor).collect()
    }
}

fn row_to_instructor(row: PgRow) -> Result<Instructor, DomainError> {
    let get_err = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to read instructor row: {}", e),
        )
    };
    let invalid = |e: ValidationError| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid instructor data: {}", e),
        )
    };

    let id: Uuid = row.try_get("id").map_err(get_err)?;
    let bio: String = row.try_get("bio").map_err(get_err)?;
    let photo: Option<String> = row.try_get("photo").map_err(get_err)?;
    let employment_type: String = row.try_get("employment_type").map_err(get_err)?;
    let payment_type: String = row.try_get("payment_type").map_err(get_err)?;
    let revenue_share: i16 = row.try_get("revenue_share").map_err(get_err)?;

    let person_id: Uuid = row.try_get("person_id").map_err(get_err)?;
    let name: String = row.try_get("name").map_err(get_err)?;
    let handle: Option<String> = row.try_get("handle").map_err(get_err)?;
    let user_id: Option<String> = row.try_get("user_id").map_err(get_err)?;
    let phone_number: Option<String> = row.try_get("phone_number").map_err(get_err)?;
    let contact_method: String = row.try_get("preferred_contact_method").map_err(get_err)?;
    let emergency_contact: Option<Uuid> = row.try_get("emergency_contact").map_err(get_err)?;

    let revenue_share = u8::try_from(revenue_share)
        .map_err(|_| ValidationError::out_of_range("revenue_share", 0, 100, revenue_share.into()))
        .and_then(Percentage::try_new)
        .map_err(invalid)?;

    let mut person = Person::new(PersonId::from_uuid(person_id), name)
        .map_err(invalid)?
        .with_handle(handle.unwrap_or_default());
    person.user_id = user_id.map(UserId::new).transpose().map_err(invalid)?;
    person.phone_number = phone_number;
    person.preferred_contact_method = ContactMethod::parse(&contact_method).map_err(invalid)?;
    person.emergency_contact = emergency_contact.map(PersonId::from_uuid);

    let mut financials = InstructorFinancials::new(
        EmploymentType::parse(&employment_type).map_err(invalid)?,
        PaymentType::parse(&payment_type).map_err(invalid)?,
    );
    financials.revenue_share = revenue_share;

    let mut instructor = Instructor::new(InstructorId::from_uuid(id), person, financials);
    instructor.bio = bio;
    instructor.photo = photo;
    Ok(instructor)
}
