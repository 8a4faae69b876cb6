//! What the presentation layer sees.

use serde::{Deserialize, Serialize};

use tsim_core::{Ending, ItemUse};
use tsim_dialogue::ChoiceOutcome;
use tsim_mechanics::{CombatEvent, CombatOutcome, Meter};

use crate::progression::{LevelUp, SessionRewards, StageAdvance};

/// The current screen of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    /// A dialogue node awaiting a choice.
    Dialogue {
        /// Client name.
        client: String,
        /// Location name.
        location: String,
        /// Node text.
        text: String,
        /// Extra client line, if any.
        reply: Option<String>,
        /// Choice labels, in index order.
        choices: Vec<String>,
        /// The client's current absurdity.
        absurdity: u32,
    },
    /// A fight in progress.
    Combat {
        /// Client name.
        client: String,
        /// Flavor text for the breakdown.
        flavor: String,
        /// Therapist sanity.
        sanity: Meter,
        /// Client chaos.
        chaos: Meter,
        /// Turns taken.
        turn: u32,
        /// Attempt number.
        attempt: u32,
    },
    /// The run is over.
    Finished(Ending),
    /// Between sessions. Only seen while an action is mid-flight.
    Idle,
}

impl View {
    /// Whether the run is over.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

/// What closing a session produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClose {
    /// Client id.
    pub client_id: String,
    /// Rewards granted.
    pub rewards: SessionRewards,
    /// Levels gained.
    pub level_ups: Vec<LevelUp>,
    /// Location change, if the requirement was met.
    pub advance: Option<StageAdvance>,
}

/// Result of [`Run::submit_choice`](crate::Run::submit_choice).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceReport {
    /// Everything the choice did.
    pub outcome: ChoiceOutcome,
    /// Levels gained from breakthrough XP.
    pub level_ups: Vec<LevelUp>,
    /// Set when the session ended normally.
    pub session: Option<SessionClose>,
    /// Set when the choice pointed at missing content.
    pub content_error: Option<String>,
    /// The screen after the choice.
    pub next: View,
}

/// Result of [`Run::combat_action`](crate::Run::combat_action).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatReport {
    /// Events of this turn.
    pub events: Vec<CombatEvent>,
    /// Sanity after the turn.
    pub sanity: Meter,
    /// Chaos after the turn.
    pub chaos: Meter,
    /// How the fight stands.
    pub outcome: CombatOutcome,
    /// Set on defeat when a fresh fight begins.
    pub restarted: bool,
    /// Set on victory.
    pub session: Option<SessionClose>,
    /// The screen after the turn.
    pub next: View,
}

/// Result of [`Run::use_item`](crate::Run::use_item).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// The item's effect.
    pub used: ItemUse,
    /// Set when the item was used as a combat action.
    pub combat: Option<CombatReport>,
}
