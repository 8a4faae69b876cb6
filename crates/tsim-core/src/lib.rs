//! Core data model for the therapy simulator.
//!
//! Provides the therapist [`StatProfile`] with its clamped stats, inventory,
//! and narrative flags; the immutable [`ContentCatalog`] of classes,
//! locations, clients, and items; and the [`EndingResolver`] that maps a
//! final profile to one of the content-defined endings.

/// Therapeutic approach types.
pub mod approach;
/// Content definitions and dialogue trees.
pub mod catalog;
/// Predicates over a profile.
pub mod condition;
/// Per-session client state.
pub mod encounter;
/// Ending rules and resolution.
pub mod ending;
/// Error types.
pub mod error;
/// Narrative flag counters.
pub mod flags;
/// Item uses.
pub mod inventory;
/// The bundled content pack.
pub mod preset;
/// The therapist's mutable state.
pub mod profile;
/// Stats, bounds, and deltas.
pub mod stat;
/// Catalog validation.
pub mod validate;

pub use approach::ApproachType;
pub use catalog::{
    Choice, ClassDefinition, Client, ContentCatalog, DialogueNode, DialogueTree, ItemDefinition,
    Location, NodeIndex, StageBonus,
};
pub use condition::{Condition, Measure, Threshold};
pub use encounter::Encounter;
pub use ending::{Ending, EndingProgress, EndingResolver, EndingRule, EndingTier};
pub use error::{CoreError, CoreResult};
pub use flags::{FlagEffect, FlagOp, Flags};
pub use inventory::{Inventory, ItemUse};
pub use profile::StatProfile;
pub use stat::{Stat, StatBlock, StatBounds, StatChange, StatDeltas};
pub use validate::{ValidationIssue, validate_catalog, validate_catalog_with};
