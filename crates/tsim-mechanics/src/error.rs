//! Error types for the combat engine.

use tsim_core::CoreError;

/// Errors raised while resolving combat.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// An action was submitted after the combat was decided.
    #[error("combat is already over")]
    CombatOver,

    /// A profile or content error, e.g. an empty or unknown item.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience result type for combat operations.
pub type MechResult<T> = Result<T, MechError>;
