//! Runs of the therapy simulator.
//!
//! A [`Run`] strings client sessions together: it opens each client's
//! dialogue, escalates into combat when a client breaks down, grants
//! session rewards and level-ups, advances the therapist through the
//! locations, and resolves the ending. Every step is recorded in the
//! [`Journal`]. [`RunHandle`] shares a run across threads and rejects
//! overlapping actions.

/// Unattended play.
pub mod autoplay;
/// Run tuning.
pub mod config;
/// Error types.
pub mod error;
/// Thread-safe run handle.
pub mod handle;
/// Chronological run journal.
pub mod journal;
/// Locations, rewards, and levels.
pub mod progression;
/// The run state machine.
pub mod run;
/// What the presentation layer sees.
pub mod view;

pub use autoplay::{Strategy, autoplay};
pub use config::{ProgressionRules, RunConfig};
pub use error::{InvalidAction, SessionError, SessionResult};
pub use handle::{RunHandle, start_run};
pub use journal::{EndReason, Journal, JournalEntry};
pub use progression::{
    LevelUp, ProgressSummary, Progression, SessionRecord, SessionRewards, StageAdvance,
    apply_level_ups, award_session,
};
pub use run::{Run, RunId};
pub use view::{ChoiceReport, CombatReport, ItemReport, SessionClose, View};
