//! PostgreSQL implementation of PermissionOracle.
//!
//! Grants live in `permission_grants`. A row with resource kind `global`
//! covers every resource; otherwise kind and id must match.
//!
//! Query errors are reported, never turned into an answer.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Permission, UserId};
use crate::ports::{PermissionOracle, ResourceRef};

/// PostgreSQL implementation of the PermissionOracle port.
#[derive(Clone)]
pub struct PostgresPermissionOracle {
    pool: PgPool,
}

impl PostgresPermissionOracle {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionOracle for PostgresPermissionOracle {
    async fn has_permission(
        &self,
        actor: &UserId,
        permission: Permission,
        resource: &ResourceRef,
    ) -> Result<bool, DomainError> {
        let (held,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM permission_grants
                WHERE user_id = $1
                  AND permission = $2
                  AND (resource_kind = 'global'
                       OR (resource_kind = $3 AND resource_id = $4))
            )
            "#,
        )
        .bind(actor.as_str())
        .bind(permission.code())
        .bind(resource.kind())
        .bind(resource.id_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::warn!(
                actor = %actor,
                permission = %permission,
                resource = %resource,
                error = %e,
                "Permission lookup failed"
            );
            DomainError::database(format!("Failed to read permission grants: {}", e))
        })?;

        Ok(held)
    }
}
