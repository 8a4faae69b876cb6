//! Narrative flags: named counters that feed the ending rules.
//!
//! A boolean flag is stored as a counter of at least 1, so content can use
//! a single `flag` effect for both "set" and "count".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Incremented for every Challenging choice.
pub const HEATED_ARGUMENTS: &str = "heated_arguments";
/// Incremented when dialogue drives absurdity under the breakthrough threshold.
pub const BREAKTHROUGHS: &str = "breakthroughs";
/// Incremented when a session ends after a life-changing breakthrough choice.
pub const LIFE_CHANGING_BREAKTHROUGHS: &str = "life_changing_breakthroughs";
/// Incremented by content when the therapist embraces a client's delusion.
pub const JOINED_DELUSIONS: &str = "joined_delusions";
/// Set when the therapist breaks down after repeated combat defeats.
pub const MELTED_DOWN: &str = "melted_down";

/// How a choice changes a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagOp {
    /// Raise the counter to at least 1.
    Set,
    /// Add 1 to the counter.
    Increment,
}

/// A flag mutation carried by a dialogue choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagEffect {
    /// Flag key.
    pub key: String,
    /// What to do with it.
    #[serde(default = "default_flag_op")]
    pub op: FlagOp,
}

fn default_flag_op() -> FlagOp {
    FlagOp::Increment
}

impl FlagEffect {
    /// An increment effect for `key`.
    pub fn increment(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            op: FlagOp::Increment,
        }
    }

    /// A set effect for `key`.
    pub fn set(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            op: FlagOp::Set,
        }
    }
}

/// The flag counters of one run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags(BTreeMap<String, u32>);

impl Flags {
    /// No flags set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count for `key` (0 if never touched).
    pub fn count(&self, key: &str) -> u32 {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Whether `key` has a count of at least 1.
    pub fn is_set(&self, key: &str) -> bool {
        self.count(key) > 0
    }

    /// Add one to `key`, returning the new count.
    pub fn increment(&mut self, key: &str) -> u32 {
        let entry = self.0.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }

    /// Raise `key` to at least 1.
    pub fn set(&mut self, key: &str) {
        let entry = self.0.entry(key.to_string()).or_insert(0);
        *entry = (*entry).max(1);
    }

    /// Apply a choice's flag effect.
    pub fn apply(&mut self, effect: &FlagEffect) {
        match effect.op {
            FlagOp::Set => self.set(&effect.key),
            FlagOp::Increment => {
                self.increment(&effect.key);
            }
        }
    }

    /// Iterate `(key, count)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_flag_is_zero() {
        let flags = Flags::new();
        assert_eq!(flags.count(MELTED_DOWN), 0);
        assert!(!flags.is_set(MELTED_DOWN));
    }

    #[test]
    fn set_is_idempotent() {
        let mut flags = Flags::new();
        flags.set(MELTED_DOWN);
        flags.set(MELTED_DOWN);
        assert_eq!(flags.count(MELTED_DOWN), 1);
    }

    #[test]
    fn set_does_not_lower_a_counter() {
        let mut flags = Flags::new();
        flags.increment(HEATED_ARGUMENTS);
        flags.increment(HEATED_ARGUMENTS);
        flags.apply(&FlagEffect::set(HEATED_ARGUMENTS));
        assert_eq!(flags.count(HEATED_ARGUMENTS), 2);
    }

    #[test]
    fn effect_defaults_to_increment() {
        let effect: FlagEffect = serde_json::from_str(r#"{"key": "joined_delusions"}"#).unwrap();
        assert_eq!(effect.op, FlagOp::Increment);
        let mut flags = Flags::new();
        flags.apply(&effect);
        flags.apply(&effect);
        assert_eq!(flags.count(JOINED_DELUSIONS), 2);
    }
}
