//! Session lifecycle tuning

use serde::Deserialize;

use super::error::ValidationError;

const MAX_CONFLICT_RETRIES: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleConfig {
    /// Extra attempts after an optimistic-lock conflict
    #[serde(default = "default_conflict_retries")]
    pub conflict_retries: u32,
}

impl LifecycleConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.conflict_retries > MAX_CONFLICT_RETRIES {
            return Err(ValidationError::TooManyConflictRetries);
        }
        Ok(())
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            conflict_retries: default_conflict_retries(),
        }
    }
}

fn default_conflict_retries() -> u32 {
    3
}
