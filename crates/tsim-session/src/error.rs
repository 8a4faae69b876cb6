//! Error types for runs.

use thiserror::Error;

use tsim_core::CoreError;
use tsim_dialogue::DialogueError;
use tsim_mechanics::MechError;

/// Result type for run operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// An action that is not allowed in the run's current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAction {
    /// Another action on this run is still being applied.
    #[error("another action is still being resolved")]
    AlreadyResolving,

    /// A combat action was submitted outside combat.
    #[error("not in combat")]
    NotInCombat,

    /// A dialogue choice was submitted during combat.
    #[error("in combat; choose a combat action")]
    InCombat,

    /// No dialogue session is open.
    #[error("no dialogue session is active")]
    NoActiveSession,

    /// The run already has its ending.
    #[error("the run has finished")]
    RunFinished,

    /// The choice index is out of range.
    #[error("invalid choice {index}: {count} available")]
    InvalidChoice {
        /// Requested index.
        index: usize,
        /// Number of choices.
        count: usize,
    },
}

/// Errors surfaced by [`Run`](crate::Run) and [`RunHandle`](crate::RunHandle).
#[derive(Debug, Error)]
pub enum SessionError {
    /// A class, client, node, or item reference is missing or malformed.
    #[error("content error: {0}")]
    Content(String),

    /// The item has no uses left.
    #[error("no uses left for item '{0}'")]
    EmptyInventory(String),

    /// The action is not allowed right now.
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),

    /// Run state is corrupt. Never expected in correct operation.
    #[error("state bounds violation: {0}")]
    StateBoundsViolation(String),
}

impl From<CoreError> for SessionError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Content(msg) => Self::Content(msg),
            CoreError::EmptyInventory(item) => Self::EmptyInventory(item),
            CoreError::Parse(e) => Self::Content(e.to_string()),
            violation @ CoreError::StateBoundsViolation { .. } => {
                Self::StateBoundsViolation(violation.to_string())
            }
        }
    }
}

impl From<MechError> for SessionError {
    fn from(err: MechError) -> Self {
        match err {
            MechError::CombatOver => InvalidAction::NotInCombat.into(),
            MechError::Core(e) => e.into(),
        }
    }
}

impl From<DialogueError> for SessionError {
    fn from(err: DialogueError) -> Self {
        match err {
            DialogueError::SessionInactive => InvalidAction::NoActiveSession.into(),
            DialogueError::InvalidChoice { index, count } => {
                InvalidAction::InvalidChoice { index, count }.into()
            }
            DialogueError::Core(e) => e.into(),
        }
    }
}
