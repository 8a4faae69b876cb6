//! The four therapist stats, their bounds, and stat deltas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One of the four therapist stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    /// How much nonsense the therapist tolerates before snapping.
    Patience,
    /// How well the therapist connects with clients.
    Empathy,
    /// How well the therapist analyzes problems.
    Insight,
    /// Mental stability; also the baseline for combat sanity.
    Composure,
}

impl Stat {
    /// All stats in display order.
    pub const ALL: [Stat; 4] = [
        Stat::Patience,
        Stat::Empathy,
        Stat::Insight,
        Stat::Composure,
    ];

    /// Parse a stat from its name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "patience" => Some(Self::Patience),
            "empathy" => Some(Self::Empathy),
            "insight" => Some(Self::Insight),
            "composure" => Some(Self::Composure),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patience => write!(f, "Patience"),
            Self::Empathy => write!(f, "Empathy"),
            Self::Insight => write!(f, "Insight"),
            Self::Composure => write!(f, "Composure"),
        }
    }
}

/// Inclusive range every stat is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBounds {
    /// Lowest legal value.
    pub min: i32,
    /// Highest legal value.
    pub max: i32,
}

impl StatBounds {
    /// Create bounds. `max` is raised to `min` if given lower.
    pub fn new(min: i32, max: i32) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    /// Clamp a value into the bounds.
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Whether the value lies within the bounds.
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for StatBounds {
    fn default() -> Self {
        Self { min: 1, max: 15 }
    }
}

/// Concrete values for all four stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatBlock {
    /// Patience value.
    pub patience: i32,
    /// Empathy value.
    pub empathy: i32,
    /// Insight value.
    pub insight: i32,
    /// Composure value.
    pub composure: i32,
}

impl StatBlock {
    /// Build a block from values in `Stat::ALL` order.
    pub fn new(patience: i32, empathy: i32, insight: i32, composure: i32) -> Self {
        Self {
            patience,
            empathy,
            insight,
            composure,
        }
    }

    /// Read one stat.
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Patience => self.patience,
            Stat::Empathy => self.empathy,
            Stat::Insight => self.insight,
            Stat::Composure => self.composure,
        }
    }

    /// Mutable access to one stat.
    pub fn get_mut(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Patience => &mut self.patience,
            Stat::Empathy => &mut self.empathy,
            Stat::Insight => &mut self.insight,
            Stat::Composure => &mut self.composure,
        }
    }

    /// Iterate `(stat, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        Stat::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

/// A sparse set of stat changes. Zero entries are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatDeltas(BTreeMap<Stat, i32>);

impl StatDeltas {
    /// An empty delta set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` to the change recorded for `stat`.
    pub fn add(&mut self, stat: Stat, delta: i32) {
        let entry = self.0.entry(stat).or_insert(0);
        *entry += delta;
        if *entry == 0 {
            self.0.remove(&stat);
        }
    }

    /// Builder form of [`StatDeltas::add`].
    pub fn with(mut self, stat: Stat, delta: i32) -> Self {
        self.add(stat, delta);
        self
    }

    /// Merge another delta set into this one.
    pub fn merge(&mut self, other: &StatDeltas) {
        for (stat, delta) in other.iter() {
            self.add(stat, delta);
        }
    }

    /// The change recorded for `stat` (0 if none).
    pub fn get(&self, stat: Stat) -> i32 {
        self.0.get(&stat).copied().unwrap_or(0)
    }

    /// Iterate non-zero `(stat, delta)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        self.0.iter().map(|(s, d)| (*s, *d))
    }

    /// Whether no stat changes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Stat, i32)> for StatDeltas {
    fn from_iter<I: IntoIterator<Item = (Stat, i32)>>(iter: I) -> Self {
        let mut deltas = Self::new();
        for (stat, delta) in iter {
            deltas.add(stat, delta);
        }
        deltas
    }
}

/// The applied result of changing one stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatChange {
    /// Which stat changed.
    pub stat: Stat,
    /// Value before the change.
    pub before: i32,
    /// Value after clamping.
    pub after: i32,
}

impl StatChange {
    /// The effective delta after clamping.
    pub fn delta(&self) -> i32 {
        self.after - self.before
    }
}

impl std::fmt::Display for StatChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:+}", self.stat, self.delta())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_parse_and_display() {
        assert_eq!(Stat::parse("EMPATHY"), Some(Stat::Empathy));
        assert_eq!(Stat::parse(" composure "), Some(Stat::Composure));
        assert_eq!(Stat::parse("charisma"), None);
        assert_eq!(Stat::Insight.to_string(), "Insight");
    }

    #[test]
    fn bounds_clamp() {
        let b = StatBounds::default();
        assert_eq!(b.clamp(0), 1);
        assert_eq!(b.clamp(40), 15);
        assert_eq!(b.clamp(7), 7);
        assert!(b.contains(15));
        assert!(!b.contains(16));
    }

    #[test]
    fn bounds_never_inverted() {
        let b = StatBounds::new(5, 2);
        assert_eq!(b.max, 5);
    }

    #[test]
    fn deltas_cancel_out() {
        let mut d = StatDeltas::new().with(Stat::Patience, 2);
        d.add(Stat::Patience, -2);
        assert!(d.is_empty());
        assert_eq!(d.get(Stat::Patience), 0);
    }

    #[test]
    fn deltas_merge() {
        let mut a = StatDeltas::new().with(Stat::Empathy, 1);
        let b = StatDeltas::new()
            .with(Stat::Empathy, 2)
            .with(Stat::Composure, -1);
        a.merge(&b);
        assert_eq!(a.get(Stat::Empathy), 3);
        assert_eq!(a.get(Stat::Composure), -1);
    }

    #[test]
    fn deltas_deserialize_from_map() {
        let d: StatDeltas = serde_json::from_str(r#"{"patience": -2, "composure": 1}"#).unwrap();
        assert_eq!(d.get(Stat::Patience), -2);
        assert_eq!(d.get(Stat::Composure), 1);
    }

    #[test]
    fn stat_change_display() {
        let c = StatChange {
            stat: Stat::Patience,
            before: 5,
            after: 3,
        };
        assert_eq!(c.delta(), -2);
        assert_eq!(c.to_string(), "Patience -2");
    }
}
