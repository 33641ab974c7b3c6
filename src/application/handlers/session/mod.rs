//! Session command and query handlers.

mod cancel_session;
mod create_session;
mod get_session;
mod list_sessions;
mod load_attendees;
mod publish_session;
mod submit_for_approval;
pub(crate) mod transition;

pub use cancel_session::{CancelSessionCommand, CancelSessionHandler, CancelSessionResult};
pub use create_session::{CreateSessionCommand, CreateSessionHandler};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use list_sessions::{ListSessionsHandler, ListSessionsQuery};
pub use load_attendees::{LoadAttendeesHandler, LoadAttendeesQuery};
pub use publish_session::{PublishSessionCommand, PublishSessionHandler, PublishSessionResult};
pub use submit_for_approval::{SubmitForApprovalCommand, SubmitForApprovalHandler};
pub use transition::DEFAULT_CONFLICT_RETRIES;
