//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod course;
pub mod session;

pub use course::{
    ChangeCourseStateCommand, ChangeCourseStateHandler, ConvertEventToCourseCommand,
    ConvertEventToCourseHandler,
};
pub use session::{
    CancelSessionCommand, CancelSessionHandler, CancelSessionResult, CreateSessionCommand,
    CreateSessionHandler, GetSessionHandler, GetSessionQuery, ListSessionsHandler,
    ListSessionsQuery, LoadAttendeesHandler, LoadAttendeesQuery, PublishSessionCommand,
    PublishSessionHandler, PublishSessionResult, SubmitForApprovalCommand,
    SubmitForApprovalHandler, DEFAULT_CONFLICT_RETRIES,
};
