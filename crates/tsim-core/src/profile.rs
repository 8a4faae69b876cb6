//! The therapist's mutable state for one run.
//!
//! Every stat mutation goes through [`StatProfile::adjust`], which clamps to
//! the profile's bounds. Nothing else writes to the stat block.

use serde::{Deserialize, Serialize};

use crate::catalog::{ClassDefinition, ItemDefinition};
use crate::error::{CoreError, CoreResult};
use crate::flags::Flags;
use crate::inventory::{Inventory, ItemUse};
use crate::stat::{Stat, StatBlock, StatBounds, StatChange, StatDeltas};

/// Starting reputation for a fresh therapist.
pub const STARTING_REPUTATION: u32 = 10;

/// Stats, inventory, progress counters, and narrative flags of a therapist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatProfile {
    /// The chosen class.
    pub class_id: String,
    /// The class's special ability.
    pub ability: String,
    stats: StatBlock,
    bounds: StatBounds,
    /// Experience points.
    pub xp: u32,
    /// Professional reputation.
    pub reputation: u32,
    /// Number of level-ups applied.
    pub level: u32,
    /// Item uses.
    pub inventory: Inventory,
    /// Narrative counters.
    pub flags: Flags,
}

impl StatProfile {
    /// Create a profile with explicit stats, clamped to `bounds`.
    pub fn new(class_id: impl Into<String>, stats: StatBlock, bounds: StatBounds) -> Self {
        let mut clamped = stats;
        for stat in Stat::ALL {
            *clamped.get_mut(stat) = bounds.clamp(stats.get(stat));
        }
        Self {
            class_id: class_id.into(),
            ability: String::new(),
            stats: clamped,
            bounds,
            xp: 0,
            reputation: STARTING_REPUTATION,
            level: 0,
            inventory: Inventory::new(),
            flags: Flags::new(),
        }
    }

    /// Create a fresh profile for a class.
    pub fn for_class(class: &ClassDefinition, bounds: StatBounds) -> Self {
        let mut profile = Self::new(class.id.clone(), class.base_stats, bounds);
        profile.ability = class.ability.clone();
        profile
    }

    /// Current value of a stat.
    pub fn stat(&self, stat: Stat) -> i32 {
        self.stats.get(stat)
    }

    /// All four stats.
    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    /// The bounds stats are clamped to.
    pub fn bounds(&self) -> StatBounds {
        self.bounds
    }

    /// Change a stat by `delta`, clamped to the bounds.
    pub fn adjust(&mut self, stat: Stat, delta: i32) -> StatChange {
        let before = self.stats.get(stat);
        let after = self.bounds.clamp(before.saturating_add(delta));
        *self.stats.get_mut(stat) = after;
        debug_assert!(
            self.verify_bounds().is_ok(),
            "stat {stat} escaped bounds after adjust"
        );
        StatChange { stat, before, after }
    }

    /// Apply a delta set, returning only the changes that moved a stat.
    pub fn apply_deltas(&mut self, deltas: &StatDeltas) -> Vec<StatChange> {
        deltas
            .iter()
            .map(|(stat, delta)| self.adjust(stat, delta))
            .filter(|change| change.delta() != 0)
            .collect()
    }

    /// Whether any stat is at or below `threshold`.
    pub fn any_stat_at_or_below(&self, threshold: i32) -> bool {
        self.stats.iter().any(|(_, v)| v <= threshold)
    }

    /// Add experience.
    pub fn gain_xp(&mut self, amount: u32) {
        self.xp = self.xp.saturating_add(amount);
    }

    /// Change reputation, saturating at zero.
    pub fn adjust_reputation(&mut self, delta: i32) {
        self.reputation = self.reputation.saturating_add_signed(delta);
    }

    /// Spend one use of an item and restore its stat.
    ///
    /// Fails with [`CoreError::EmptyInventory`] and leaves the profile
    /// untouched when no use is left.
    pub fn use_item(&mut self, item: &ItemDefinition) -> CoreResult<ItemUse> {
        let remaining = self.inventory.consume(&item.id)?;
        let change = self.adjust(item.restores, item.amount);
        Ok(ItemUse {
            item_id: item.id.clone(),
            change,
            remaining,
        })
    }

    /// Check every stat against the bounds.
    pub fn verify_bounds(&self) -> CoreResult<()> {
        for (stat, value) in self.stats.iter() {
            if !self.bounds.contains(value) {
                return Err(CoreError::StateBoundsViolation {
                    stat,
                    value,
                    min: self.bounds.min,
                    max: self.bounds.max,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coffee() -> ItemDefinition {
        ItemDefinition {
            id: "coffee".to_string(),
            name: "Coffee".to_string(),
            description: String::new(),
            restores: Stat::Patience,
            amount: 2,
            max_uses: 2,
        }
    }

    fn profile() -> StatProfile {
        StatProfile::new("burnout", StatBlock::new(8, 4, 3, 4), StatBounds::default())
    }

    #[test]
    fn new_clamps_initial_stats() {
        let p = StatProfile::new("x", StatBlock::new(0, 30, 5, 5), StatBounds::default());
        assert_eq!(p.stat(Stat::Patience), 1);
        assert_eq!(p.stat(Stat::Empathy), 15);
        assert_eq!(p.reputation, STARTING_REPUTATION);
    }

    #[test]
    fn adjust_reports_clamped_change() {
        let mut p = profile();
        let change = p.adjust(Stat::Composure, -10);
        assert_eq!(change.before, 4);
        assert_eq!(change.after, 1);
        assert_eq!(change.delta(), -3);
    }

    #[test]
    fn apply_deltas_skips_noops() {
        let mut p = profile();
        p.adjust(Stat::Patience, 20);
        let deltas = StatDeltas::new()
            .with(Stat::Patience, 1)
            .with(Stat::Empathy, 1);
        let changes = p.apply_deltas(&deltas);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].stat, Stat::Empathy);
    }

    #[test]
    fn reputation_saturates_at_zero() {
        let mut p = profile();
        p.adjust_reputation(-50);
        assert_eq!(p.reputation, 0);
        p.adjust_reputation(3);
        assert_eq!(p.reputation, 3);
    }

    #[test]
    fn use_item_restores_and_counts_down() {
        let mut p = profile();
        p.inventory.grant("coffee", 2);
        let used = p.use_item(&coffee()).unwrap();
        assert_eq!(used.change.delta(), 2);
        assert_eq!(used.remaining, 1);
        assert_eq!(p.stat(Stat::Patience), 10);
    }

    #[test]
    fn use_item_on_empty_inventory_changes_nothing() {
        let mut p = profile();
        let before = p.clone();
        let err = p.use_item(&coffee()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyInventory(id) if id == "coffee"));
        assert_eq!(p, before);
        assert_eq!(p.inventory.uses("coffee"), 0);
    }

    #[test]
    fn use_item_caps_at_max() {
        let mut p = profile();
        p.adjust(Stat::Patience, 20);
        p.inventory.grant("coffee", 1);
        let used = p.use_item(&coffee()).unwrap();
        assert_eq!(used.change.delta(), 0);
        assert_eq!(p.stat(Stat::Patience), 15);
    }

    #[test]
    fn zero_bounds_allow_zero_composure() {
        let p = StatProfile::new("x", StatBlock::new(5, 5, 5, 0), StatBounds::new(0, 15));
        assert_eq!(p.stat(Stat::Composure), 0);
        assert!(p.verify_bounds().is_ok());
    }

    fn any_stat() -> impl Strategy<Value = Stat> {
        prop_oneof![
            Just(Stat::Patience),
            Just(Stat::Empathy),
            Just(Stat::Insight),
            Just(Stat::Composure),
        ]
    }

    proptest! {
        #[test]
        fn stats_stay_in_bounds(ops in proptest::collection::vec((any_stat(), -20i32..20), 0..64)) {
            let mut p = profile();
            for (stat, delta) in ops {
                let change = p.adjust(stat, delta);
                prop_assert!(p.bounds().contains(change.after));
                prop_assert!(p.verify_bounds().is_ok());
            }
        }

        #[test]
        fn zero_net_deltas_leave_profile_unchanged(deltas in proptest::collection::vec((any_stat(), 0i32..3), 0..3)) {
            // Apply then undo in reverse order; starting from mid-range
            // values nothing hits a bound, so the profile is restored.
            let mut p = StatProfile::new("x", StatBlock::new(8, 8, 8, 8), StatBounds::default());
            let before = p.clone();
            for (stat, delta) in &deltas {
                p.adjust(*stat, *delta);
            }
            for (stat, delta) in deltas.iter().rev() {
                p.adjust(*stat, -*delta);
            }
            prop_assert_eq!(p, before);
        }
    }
}
