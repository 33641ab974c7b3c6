//! HTTP adapter for session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AttendeeListResponse, AttendeeResponse, CancelSessionResponse, DesyncWarningResponse,
    ListSessionsQuery, MoneyResponse, SessionListResponse, SessionResponse,
};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
