//! Error types for the dialogue engine.

use tsim_core::CoreError;

/// Errors raised while walking a dialogue tree.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    /// The session has already ended.
    #[error("no dialogue session is active")]
    SessionInactive,

    /// The choice index is out of range.
    #[error("invalid choice {index}: node has {count} choices")]
    InvalidChoice {
        /// Requested index.
        index: usize,
        /// Number of choices available.
        count: usize,
    },

    /// Malformed content.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for dialogue operations.
pub type DialogueResult<T> = Result<T, DialogueError>;
