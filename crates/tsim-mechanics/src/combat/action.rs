//! Combat actions and the event log.

use serde::{Deserialize, Serialize};
use tsim_core::StatChange;

use crate::dice::Die;

/// What the therapist does on their turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatAction {
    /// Empathy + d6 against the client's chaos.
    EmpathySupport,
    /// Insight + d6 against the client's chaos.
    LogicAnalysis,
    /// Patience + d4 sanity recovery, and brace for the next counter.
    PatientListening,
    /// Use an inventory item by id.
    UseItem(String),
}

impl CombatAction {
    /// Parse a player command (`empathy`, `logic`, `patience`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "empathy" | "support" | "e" => Some(Self::EmpathySupport),
            "logic" | "analysis" | "insight" | "l" => Some(Self::LogicAnalysis),
            "patience" | "listen" | "p" => Some(Self::PatientListening),
            _ => None,
        }
    }
}

impl std::fmt::Display for CombatAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmpathySupport => write!(f, "Emotional Support"),
            Self::LogicAnalysis => write!(f, "Logical Analysis"),
            Self::PatientListening => write!(f, "Patient Listening"),
            Self::UseItem(item) => write!(f, "Use {item}"),
        }
    }
}

/// A recorded combat event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// The client broke down and combat began.
    Began {
        /// Client name.
        client: String,
        /// Which attempt against this client (1-based).
        attempt: u32,
        /// Starting sanity.
        sanity: u32,
        /// Starting chaos.
        chaos: u32,
    },
    /// The therapist struck at the client's chaos.
    Struck {
        /// Turn number.
        turn: u32,
        /// The action used.
        action: CombatAction,
        /// Die rolled.
        die: Die,
        /// Face rolled.
        roll: u32,
        /// Chaos removed.
        damage: u32,
    },
    /// The therapist recovered sanity by listening.
    Listened {
        /// Turn number.
        turn: u32,
        /// Face rolled.
        roll: u32,
        /// Sanity restored.
        healed: u32,
    },
    /// The therapist used an item.
    ItemUsed {
        /// Turn number.
        turn: u32,
        /// Item id.
        item: String,
        /// Resulting stat change.
        change: StatChange,
        /// Sanity restored alongside a composure item.
        sanity_restored: u32,
    },
    /// The client hit back.
    CounterAttack {
        /// Turn number.
        turn: u32,
        /// Face rolled.
        roll: u32,
        /// Damage before mitigation.
        raw: u32,
        /// Sanity actually lost.
        damage: u32,
        /// Whether patient listening softened the blow.
        mitigated: bool,
    },
    /// Chaos reached 0.
    Victory {
        /// Turn number.
        turn: u32,
    },
    /// Sanity reached 0.
    Defeat {
        /// Turn number.
        turn: u32,
    },
}

impl std::fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Began {
                client,
                attempt,
                sanity,
                chaos,
            } => write!(
                f,
                "{client} is having a psychological breakdown! (attempt {attempt}, sanity {sanity}, chaos {chaos})"
            ),
            Self::Struck {
                turn,
                action,
                die,
                roll,
                damage,
            } => write!(
                f,
                "Turn {turn}: {action}! Rolled {roll} on {die}, {damage} chaos removed"
            ),
            Self::Listened { turn, roll, healed } => write!(
                f,
                "Turn {turn}: You endure patiently. Rolled {roll}, restored {healed} sanity"
            ),
            Self::ItemUsed {
                turn,
                item,
                change,
                sanity_restored,
            } => {
                write!(f, "Turn {turn}: You use {item} ({change})")?;
                if *sanity_restored > 0 {
                    write!(f, ", +{sanity_restored} sanity")?;
                }
                Ok(())
            }
            Self::CounterAttack {
                roll,
                raw,
                damage,
                mitigated,
                ..
            } => {
                if *mitigated {
                    write!(
                        f,
                        "Client lashes out for {raw} but your patience reduces it to {damage}"
                    )
                } else {
                    write!(f, "Client lashes out! Rolled {roll}, {damage} sanity lost")
                }
            }
            Self::Victory { turn } => write!(f, "Turn {turn}: Victory! The client calms down"),
            Self::Defeat { turn } => write!(f, "Turn {turn}: Defeat! Your sanity has shattered"),
        }
    }
}
