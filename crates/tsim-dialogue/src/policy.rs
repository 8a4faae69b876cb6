//! Tunable dialogue numbers: absurdity reduction, crisis, breakthroughs.

use serde::{Deserialize, Serialize};

/// What goes wrong when the therapist is in crisis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complication {
    /// The client gets this much more absurd.
    ExtraAbsurdity(u32),
    /// The client's reply is replaced with the policy's negative line.
    ForcedNegativeReply,
}

impl std::fmt::Display for Complication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtraAbsurdity(n) => write!(f, "your frayed nerves make things worse (+{n} absurdity)"),
            Self::ForcedNegativeReply => write!(f, "your frayed nerves show and the client notices"),
        }
    }
}

/// Dialogue tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialoguePolicy {
    /// Absurdity removed by Empathetic, Analytical, and Patient choices.
    pub base_reduction: u32,
    /// Stat value at which an approach is mastered.
    pub mastery_threshold: i32,
    /// Reduction multiplier for mastered approaches, in percent. Rounded up.
    pub mastery_pct: u32,
    /// A stat at or below this value puts the therapist in crisis.
    pub crisis_threshold: i32,
    /// Applied once per choice while in crisis.
    pub complication: Complication,
    /// Reply used by [`Complication::ForcedNegativeReply`].
    pub negative_reply: String,
    /// Absurdity at or below which a breakthrough happens.
    pub breakthrough_threshold: u32,
    /// XP granted on breakthrough.
    pub breakthrough_xp: u32,
    /// Reputation granted on breakthrough.
    pub breakthrough_rep: u32,
}

impl Default for DialoguePolicy {
    fn default() -> Self {
        Self {
            base_reduction: 2,
            mastery_threshold: 10,
            mastery_pct: 150,
            crisis_threshold: 2,
            complication: Complication::ExtraAbsurdity(1),
            negative_reply: "You're not even listening to me, are you?".to_string(),
            breakthrough_threshold: 2,
            breakthrough_xp: 2,
            breakthrough_rep: 1,
        }
    }
}

impl DialoguePolicy {
    /// Set the base reduction.
    pub fn with_base_reduction(mut self, amount: u32) -> Self {
        self.base_reduction = amount;
        self
    }

    /// Set the mastery threshold and multiplier.
    pub fn with_mastery(mut self, threshold: i32, pct: u32) -> Self {
        self.mastery_threshold = threshold;
        self.mastery_pct = pct;
        self
    }

    /// Set the crisis threshold.
    pub fn with_crisis_threshold(mut self, threshold: i32) -> Self {
        self.crisis_threshold = threshold;
        self
    }

    /// Set the crisis complication.
    pub fn with_complication(mut self, complication: Complication) -> Self {
        self.complication = complication;
        self
    }

    /// Set the breakthrough threshold.
    pub fn with_breakthrough_threshold(mut self, threshold: u32) -> Self {
        self.breakthrough_threshold = threshold;
        self
    }

    /// Absurdity removed by a reducing approach, given the trained stat.
    pub fn reduction(&self, stat_value: i32) -> u32 {
        if stat_value >= self.mastery_threshold {
            self.base_reduction.saturating_mul(self.mastery_pct).div_ceil(100)
        } else {
            self.base_reduction
        }
    }
}
