//! Identifiers of gateway-owned entities a session points at.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

macro_rules! remote_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

remote_id!(
    /// Id of an event on the ticketing service.
    RemoteEventId,
    "remote_event_id"
);

remote_id!(
    /// Id of a ticket class on the ticketing service.
    RemoteTicketClassId,
    "remote_ticket_class_id"
);

/// Remote entities bound to a session.
///
/// The ticket class is absent after a partial sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteBinding {
    pub event_id: RemoteEventId,
    pub ticket_class_id: Option<RemoteTicketClassId>,
}

impl RemoteBinding {
    pub fn event_only(event_id: RemoteEventId) -> Self {
        Self {
            event_id,
            ticket_class_id: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.ticket_class_id.is_some()
    }
}
