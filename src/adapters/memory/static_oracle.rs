//! Permission oracle backed by a fixed grant table.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, Permission, UserId};
use crate::ports::{PermissionOracle, ResourceRef};

/// Grants are global: holding a permission covers every resource.
#[derive(Debug, Default)]
pub struct StaticPermissionOracle {
    grants: RwLock<HashSet<(UserId, Permission)>>,
    unavailable: RwLock<bool>,
}

impl StaticPermissionOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(self, actor: UserId, permission: Permission) -> Self {
        self.grants
            .write()
            .expect("StaticPermissionOracle: lock poisoned")
            .insert((actor, permission));
        self
    }

    pub fn revoke(&self, actor: &UserId, permission: Permission) {
        self.grants
            .write()
            .expect("StaticPermissionOracle: lock poisoned")
            .remove(&(actor.clone(), permission));
    }

    /// While set, every lookup fails as if the grant store were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self
            .unavailable
            .write()
            .expect("StaticPermissionOracle: lock poisoned") = unavailable;
    }
}

#[async_trait]
impl PermissionOracle for StaticPermissionOracle {
    async fn has_permission(
        &self,
        actor: &UserId,
        permission: Permission,
        _resource: &ResourceRef,
    ) -> Result<bool, DomainError> {
        if *self
            .unavailable
            .read()
            .expect("StaticPermissionOracle: lock poisoned")
        {
            return Err(DomainError::database("Simulated grant store outage"));
        }
        Ok(self
            .grants
            .read()
            .expect("StaticPermissionOracle: lock poisoned")
            .contains(&(actor.clone(), permission)))
    }
}
