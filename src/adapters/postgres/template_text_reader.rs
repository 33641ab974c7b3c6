//! PostgreSQL implementation of TemplateTextReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::template_text::{TemplateKeyword, TemplateSnapshot, TemplateText};
use crate::ports::TemplateTextReader;

/// Reads the whole `template_texts` table per snapshot.
#[derive(Clone)]
pub struct PostgresTemplateTextReader {
    pool: PgPool,
}

impl PostgresTemplateTextReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateTextReader for PostgresTemplateTextReader {
    async fn snapshot(&self) -> Result<TemplateSnapshot, DomainError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT keyword, text FROM template_texts")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to load template texts: {}", e),
                    )
                })?;

        Ok(TemplateSnapshot::from_entries(
            rows.into_iter().filter_map(|(keyword, text)| {
                match TemplateKeyword::new(&keyword) {
                    Ok(keyword) => Some(TemplateText::new(keyword, text)),
                    Err(e) => {
                        tracing::warn!(keyword = %keyword, error = %e, "Skipping invalid template keyword");
                        None
                    }
                }
            }),
        ))
    }
}
