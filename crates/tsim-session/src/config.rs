//! Run configuration.

use serde::{Deserialize, Serialize};

use tsim_core::StatBounds;
use tsim_dialogue::DialoguePolicy;
use tsim_mechanics::CombatRules;

/// Session rewards, leveling, and item discovery numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionRules {
    /// XP per level; 0 disables leveling.
    pub xp_per_level: u32,
    /// XP for finishing any session.
    pub base_xp: u32,
    /// Extra XP for a life-changing breakthrough.
    pub life_changing_xp: u32,
    /// Reputation for a life-changing breakthrough.
    pub life_changing_rep: u32,
    /// Final absurdity at or below which a session counts as good progress.
    pub good_progress_absurdity: u32,
    /// Extra XP for good progress.
    pub good_progress_xp: u32,
    /// Reputation lost when the session had a Challenging choice.
    pub challenge_rep_penalty: u32,
    /// Final absurdity at or below which composure recovers.
    pub recovery_absurdity: u32,
    /// Composure recovered.
    pub recovery_composure: i32,
    /// Chance in percent to find an item after a session.
    pub item_find_pct: u32,
    /// Added to the find chance when final absurdity is within `recovery_absurdity`.
    pub item_find_bonus_pct: u32,
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self {
            xp_per_level: 5,
            base_xp: 3,
            life_changing_xp: 3,
            life_changing_rep: 2,
            good_progress_absurdity: 4,
            good_progress_xp: 1,
            challenge_rep_penalty: 1,
            recovery_absurdity: 3,
            recovery_composure: 1,
            item_find_pct: 15,
            item_find_bonus_pct: 5,
        }
    }
}

impl ProgressionRules {
    /// Set XP per level.
    pub fn with_xp_per_level(mut self, xp: u32) -> Self {
        self.xp_per_level = xp;
        self
    }

    /// Set the item discovery chance and its bonus.
    pub fn with_item_find(mut self, pct: u32, bonus_pct: u32) -> Self {
        self.item_find_pct = pct;
        self.item_find_bonus_pct = bonus_pct;
        self
    }
}

/// Everything tunable about a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// RNG seed for reproducible runs.
    pub seed: u64,
    /// Stat clamp range.
    pub bounds: StatBounds,
    /// Dialogue tuning.
    pub dialogue: DialoguePolicy,
    /// Combat tuning.
    pub combat: CombatRules,
    /// Rewards and leveling.
    pub progression: ProgressionRules,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            bounds: StatBounds::default(),
            dialogue: DialoguePolicy::default(),
            combat: CombatRules::default(),
            progression: ProgressionRules::default(),
        }
    }
}

impl RunConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the stat bounds.
    pub fn with_bounds(mut self, bounds: StatBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the dialogue policy.
    pub fn with_dialogue(mut self, policy: DialoguePolicy) -> Self {
        self.dialogue = policy;
        self
    }

    /// Set the combat rules.
    pub fn with_combat(mut self, rules: CombatRules) -> Self {
        self.combat = rules;
        self
    }

    /// Set the progression rules.
    pub fn with_progression(mut self, rules: ProgressionRules) -> Self {
        self.progression = rules;
        self
    }

    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
