use crate::stat::Stat;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by profile mutations and content lookups.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Content references something that does not exist or is malformed.
    #[error("content error: {0}")]
    Content(String),

    /// The item exists but has no uses left.
    #[error("no uses left for item '{0}'")]
    EmptyInventory(String),

    /// A stat escaped its configured bounds. Never expected in correct operation.
    #[error("stat {stat} escaped its bounds: {value} not in [{min}, {max}]")]
    StateBoundsViolation {
        /// The offending stat.
        stat: Stat,
        /// The out-of-range value.
        value: i32,
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },

    /// The content data could not be parsed.
    #[error("failed to parse content: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CoreError {
    /// Shorthand for building a [`CoreError::Content`].
    pub fn content(message: impl Into<String>) -> Self {
        Self::Content(message.into())
    }
}
