//! Session lifecycle state machine and remote sync status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle state of a scheduled session.
///
/// ```text
/// draft ──► needs_approval ──► ready_to_publish ──► public
///   │  └───────────────────────────▲                 │
///   │              │                                 │
///   └──────────────┴──────────► canceled ◄───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Initial state; editable by collaborators.
    #[default]
    Draft,

    /// Submitted by an instructor, waiting for staff.
    NeedsApproval,

    /// Publication started; the remote event may be partly created.
    ReadyToPublish,

    /// Live on the ticketing service.
    Public,

    /// Terminal. Kept for history.
    Canceled,
}

impl SessionState {
    pub const ALL: [SessionState; 5] = [
        SessionState::Draft,
        SessionState::NeedsApproval,
        SessionState::ReadyToPublish,
        SessionState::Public,
        SessionState::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Draft => "draft",
            SessionState::NeedsApproval => "needs_approval",
            SessionState::ReadyToPublish => "ready_to_publish",
            SessionState::Public => "public",
            SessionState::Canceled => "canceled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// True once publication has started (a remote event may exist).
    pub fn has_reached_publication(&self) -> bool {
        matches!(self, SessionState::ReadyToPublish | SessionState::Public)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StateMachine for SessionState {
    fn valid_transitions(&self) -> &'static [Self] {
        use SessionState::*;
        match self {
            Draft => &[NeedsApproval, ReadyToPublish, Canceled],
            NeedsApproval => &[ReadyToPublish, Canceled],
            // Self-loop: publication resumed after a partial sync.
            ReadyToPublish => &[ReadyToPublish, Public],
            Public => &[Canceled],
            Canceled => &[],
        }
    }
}

/// How far the remote side of a publication got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    NotSynced,

    /// Remote event exists but its ticket class does not (partial sync).
    EventCreated,

    Synced,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::NotSynced => "not_synced",
            SyncStatus::EventCreated => "event_created",
            SyncStatus::Synced => "synced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "not_synced" => Some(SyncStatus::NotSynced),
            "event_created" => Some(SyncStatus::EventCreated),
            "synced" => Some(SyncStatus::Synced),
            _ => None,
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
