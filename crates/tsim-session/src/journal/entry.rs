//! Journal entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The final location's requirement was met.
    CareerComplete,
    /// No unseen clients were left at the current location.
    ContentExhausted,
    /// Too many combat defeats in one encounter.
    Meltdown,
    /// The player asked to end the run.
    Requested,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CareerComplete => write!(f, "career complete"),
            Self::ContentExhausted => write!(f, "no clients left"),
            Self::Meltdown => write!(f, "meltdown"),
            Self::Requested => write!(f, "ended by request"),
        }
    }
}

/// A single entry in the run journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JournalEntry {
    /// The run began.
    RunStarted {
        /// Run id.
        run_id: String,
        /// Chosen class.
        class: String,
        /// RNG seed.
        seed: u64,
        /// When the run began.
        timestamp: DateTime<Utc>,
    },
    /// A client session opened.
    SessionStarted {
        /// Client name.
        client: String,
        /// Location name.
        location: String,
        /// Absurdity at the start.
        absurdity: u32,
        /// When the session opened.
        timestamp: DateTime<Utc>,
    },
    /// The therapist picked a dialogue choice.
    ChoiceMade {
        /// Client name.
        client: String,
        /// Choice label.
        choice: String,
        /// Approach of the choice.
        approach: String,
        /// Stat changes, rendered.
        changes: Vec<String>,
        /// Absurdity after the choice.
        absurdity: u32,
        /// When chosen.
        timestamp: DateTime<Utc>,
    },
    /// A crisis complication fired.
    Complication {
        /// What happened.
        description: String,
        /// When it fired.
        timestamp: DateTime<Utc>,
    },
    /// Absurdity crossed the breakthrough threshold.
    Breakthrough {
        /// Client name.
        client: String,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// One combat event.
    CombatTurn {
        /// Client name.
        client: String,
        /// The event, rendered.
        text: String,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// A fight ended.
    CombatResolved {
        /// Client name.
        client: String,
        /// Whether the therapist won.
        victory: bool,
        /// Attempt number.
        attempt: u32,
        /// When it ended.
        timestamp: DateTime<Utc>,
    },
    /// An item was used.
    ItemUsed {
        /// Item id.
        item: String,
        /// Stat change, rendered.
        change: String,
        /// Uses left.
        remaining: u32,
        /// When used.
        timestamp: DateTime<Utc>,
    },
    /// A session finished and rewards were granted.
    SessionCompleted {
        /// Client name.
        client: String,
        /// XP granted.
        xp: u32,
        /// Net reputation change.
        reputation: i32,
        /// Item found, if any.
        item_found: Option<String>,
        /// When it finished.
        timestamp: DateTime<Utc>,
    },
    /// Broken content was skipped.
    ContentFault {
        /// The error message.
        message: String,
        /// When it was hit.
        timestamp: DateTime<Utc>,
    },
    /// The therapist gained a level.
    LevelUp {
        /// New level.
        level: u32,
        /// Stat changes, rendered.
        changes: Vec<String>,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// The career moved to a new location.
    LocationAdvanced {
        /// New location name.
        location: String,
        /// Bonus summary.
        bonus: String,
        /// When it happened.
        timestamp: DateTime<Utc>,
    },
    /// The run ended.
    RunEnded {
        /// Ending title.
        ending: String,
        /// Why it ended.
        reason: EndReason,
        /// When it ended.
        timestamp: DateTime<Utc>,
    },
}
