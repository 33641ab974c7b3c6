//! Lifecycle guards.
//!
//! Every guard is a pure function of whether the actor holds the
//! manage-session-state permission and the session's current state.
//! Permission is checked before state for publish and cancel.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::state::SessionState;

/// The lifecycle operations an actor can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    SubmitForApproval,
    Publish,
    Cancel,
}

impl LifecycleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleAction::SubmitForApproval => "submit_for_approval",
            LifecycleAction::Publish => "publish",
            LifecycleAction::Cancel => "cancel",
        }
    }

    /// State the session lands in when the guard passes.
    pub fn target(&self) -> SessionState {
        match self {
            LifecycleAction::SubmitForApproval => SessionState::NeedsApproval,
            LifecycleAction::Publish => SessionState::ReadyToPublish,
            LifecycleAction::Cancel => SessionState::Canceled,
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a guard refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    PermissionDenied,
    IllegalTransition,
}

/// Submitting is for non-privileged owners; staff publish directly.
pub fn can_submit_for_approval(holds_manage: bool, state: SessionState) -> bool {
    !holds_manage && state == SessionState::Draft
}

pub fn can_publish(holds_manage: bool, state: SessionState) -> bool {
    holds_manage && publishable_from(state)
}

pub fn can_cancel(holds_manage: bool, state: SessionState) -> bool {
    holds_manage && cancelable_from(state)
}

fn publishable_from(state: SessionState) -> bool {
    matches!(
        state,
        SessionState::Draft | SessionState::NeedsApproval | SessionState::ReadyToPublish
    )
}

fn cancelable_from(state: SessionState) -> bool {
    matches!(
        state,
        SessionState::Draft | SessionState::NeedsApproval | SessionState::Public
    )
}

/// Evaluates the guard for `action`, returning the target state on success.
///
/// Submitting as a privileged actor is an illegal transition rather than a
/// permission failure: the actor has more rights than the operation wants.
pub fn evaluate(
    action: LifecycleAction,
    holds_manage: bool,
    state: SessionState,
) -> Result<SessionState, GuardRejection> {
    match action {
        LifecycleAction::SubmitForApproval => {
            if can_submit_for_approval(holds_manage, state) {
                Ok(action.target())
            } else {
                Err(GuardRejection::IllegalTransition)
            }
        }
        LifecycleAction::Publish => {
            if !holds_manage {
                Err(GuardRejection::PermissionDenied)
            } else if publishable_from(state) {
                Ok(action.target())
            } else {
                Err(GuardRejection::IllegalTransition)
            }
        }
        LifecycleAction::Cancel => {
            if !holds_manage {
                Err(GuardRejection::PermissionDenied)
            } else if cancelable_from(state) {
                Ok(action.target())
            } else {
                Err(GuardRejection::IllegalTransition)
            }
        }
    }
}
