//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Lifecycle commands follow read → guard → write with optimistic retries;
//! remote publication is delegated to the `PublicationSynchronizer`.

pub(crate) mod deadline;
pub mod handlers;
mod publication_synchronizer;

pub use handlers::{
    // Course handlers
    ChangeCourseStateCommand, ChangeCourseStateHandler, ConvertEventToCourseCommand,
    ConvertEventToCourseHandler,
    // Session handlers
    CancelSessionCommand, CancelSessionHandler, CancelSessionResult, CreateSessionCommand,
    CreateSessionHandler, GetSessionHandler, GetSessionQuery, ListSessionsHandler,
    ListSessionsQuery, LoadAttendeesHandler, LoadAttendeesQuery, PublishSessionCommand,
    PublishSessionHandler, PublishSessionResult, SubmitForApprovalCommand,
    SubmitForApprovalHandler, DEFAULT_CONFLICT_RETRIES,
};
pub use publication_synchronizer::{PublicationSynchronizer, SynchronizerSettings};
