//! Dice, meters, and turn-based combat for the therapy simulator.
//!
//! All randomness goes through the [`Roller`] trait so runs can be seeded
//! and tests can script exact faces.

/// Turn-based combat.
pub mod combat;
/// Dice and rollers.
pub mod dice;
/// Error types.
pub mod error;
/// Bounded resource meters.
pub mod meter;

pub use combat::{CombatAction, CombatContext, CombatEvent, CombatOutcome, CombatRules, CombatSession};
pub use dice::{Die, Roller, ScriptedRolls};
pub use error::{MechError, MechResult};
pub use meter::Meter;
