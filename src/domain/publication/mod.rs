//! Publication domain module.
//!
//! Value types for turning a session into a remote ticketed event: the
//! remote identifiers a session binds to, the multipart text format, the
//! event and ticket-class requests, and the ways synchronization fails.

mod binding;
mod errors;
mod multipart;
mod specs;

pub use binding::{RemoteBinding, RemoteEventId, RemoteTicketClassId};
pub use errors::{DesyncWarning, GatewayErrorKind, SyncError};
pub use multipart::{markdown_to_html, MultipartText};
pub use specs::{
    event_idempotency_key, EventSpec, Occurrence, OccurrenceSpan, TicketClassSpec,
    GENERAL_ADMISSION,
};
