//! Dialogue-tree engine for the therapy simulator.
//!
//! [`DialogueEngine`] walks one client's tree, applying the approach
//! [effect table](ApproachEffect) and the [`DialoguePolicy`] numbers to the
//! therapist's profile and the client's encounter state.

/// Approach effect table.
pub mod effect;
/// The dialogue engine.
pub mod engine;
/// Error types.
pub mod error;
/// Dialogue tuning.
pub mod policy;

pub use effect::ApproachEffect;
pub use engine::{ChoiceContext, ChoiceOutcome, DialogueEngine, SessionStatus, Transition};
pub use error::{DialogueError, DialogueResult};
pub use policy::{Complication, DialoguePolicy};
