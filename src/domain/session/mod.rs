//! Session domain module.
//!
//! A session is a scheduled instance of a course. Its `state` moves through
//! draft, needs_approval, ready_to_publish and public, and can be canceled
//! from any active state except an in-flight publication.
//!
//! Guards are pure functions (see [`guards`]); the aggregate applies them
//! and records remote bindings produced by the publication synchronizer.

mod aggregate;
mod claim;
mod errors;
pub mod guards;
mod state;

pub use aggregate::Session;
pub use claim::{PublicationClaim, PUBLICATION_LEASE_MINUTES};
pub use errors::SessionError;
pub use guards::LifecycleAction;
pub use state::{SessionState, SyncStatus};
