//! PostgreSQL implementation of CourseRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::catalog::{Course, CourseDetails, CourseState};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, Timestamp};
use crate::ports::CourseRepository;

/// PostgreSQL implementation of CourseRepository.
#[derive(Clone)]
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn save(&self, course: &Course) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, name, details, state, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(course.id().as_uuid())
        .bind(course.name())
        .bind(Json(course.details()))
        .bind(course.state().as_str())
        .bind(course.created_at().as_datetime())
        .bind(course.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert course: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE courses SET
                name = $2,
                details = $3,
                state = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(course.id().as_uuid())
        .bind(course.name())
        .bind(Json(course.details()))
        .bind(course.state().as_str())
        .bind(course.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update course: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CourseNotFound,
                format!("Course not found: {}", course.id()),
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, details, state, created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch course: {}", e),
            )
        })?;

        row.map(row_to_course).transpose()
    }
}

fn row_to_course(row: PgRow) -> Result<Course, DomainError> {
    let get_err = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to read course row: {}", e),
        )
    };

    let id: Uuid = row.try_get("id").map_err(get_err)?;
    let Json(details): Json<CourseDetails> = row.try_get("details").map_err(get_err)?;
    let state: String = row.try_get("state").map_err(get_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(get_err)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(get_err)?;

    let state = CourseState::parse(&state).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid course state: {}", state),
        )
    })?;

    Ok(Course::reconstitute(
        CourseId::from_uuid(id),
        details,
        state,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
