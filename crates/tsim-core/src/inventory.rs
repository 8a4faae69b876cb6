//! Limited-use therapeutic items carried by the therapist.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::stat::StatChange;

/// Remaining uses per item id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<String, u32>);

impl Inventory {
    /// An empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining uses of `item_id` (0 if never held).
    pub fn uses(&self, item_id: &str) -> u32 {
        self.0.get(item_id).copied().unwrap_or(0)
    }

    /// Add `uses` uses of `item_id`.
    pub fn grant(&mut self, item_id: &str, uses: u32) {
        let entry = self.0.entry(item_id.to_string()).or_insert(0);
        *entry = entry.saturating_add(uses);
    }

    /// Spend one use of `item_id`, returning the uses left.
    ///
    /// Fails with [`CoreError::EmptyInventory`] and changes nothing when no
    /// use remains.
    pub fn consume(&mut self, item_id: &str) -> CoreResult<u32> {
        match self.0.get_mut(item_id) {
            Some(left) if *left > 0 => {
                *left -= 1;
                Ok(*left)
            }
            _ => Err(CoreError::EmptyInventory(item_id.to_string())),
        }
    }

    /// Items with at least one use left, in id order.
    pub fn available(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0
            .iter()
            .filter(|(_, uses)| **uses > 0)
            .map(|(id, uses)| (id.as_str(), *uses))
    }

    /// Whether no item has a use left.
    pub fn is_empty(&self) -> bool {
        self.available().next().is_none()
    }
}

/// The outcome of using one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUse {
    /// Which item was used.
    pub item_id: String,
    /// The stat change it caused (may be zero when already at the cap).
    pub change: StatChange,
    /// Uses left after this one.
    pub remaining: u32,
}
