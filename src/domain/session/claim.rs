//! Publication claims.
//!
//! Publishing makes remote calls that cannot be rolled back, so only one
//! publisher may work on a session at a time. The claim is written under
//! the session's version check before the first remote call and cleared
//! when the publisher finishes, successfully or not.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::Timestamp;

/// A claim older than this is treated as abandoned (its holder crashed or
/// timed out without releasing it) and may be taken over.
pub const PUBLICATION_LEASE_MINUTES: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicationClaim {
    pub token: Uuid,
    pub claimed_at: Timestamp,
}

impl PublicationClaim {
    pub fn new(claimed_at: Timestamp) -> Self {
        Self {
            token: Uuid::new_v4(),
            claimed_at,
        }
    }

    pub fn is_held_at(&self, now: &Timestamp) -> bool {
        now.is_before(&self.claimed_at.add_minutes(PUBLICATION_LEASE_MINUTES))
    }
}
