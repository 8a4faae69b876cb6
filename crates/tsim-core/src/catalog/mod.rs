//! Immutable content definitions: classes, locations, clients, items, endings.

pub mod dialogue;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::approach::ApproachType;
use crate::ending::EndingRule;
use crate::error::{CoreError, CoreResult};
use crate::stat::{Stat, StatBlock, StatDeltas};
use crate::validate::{ValidationIssue, validate_catalog};

pub use dialogue::{Choice, DialogueNode, DialogueTree, NodeIndex};

/// A playable therapist class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefinition {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Starting stats.
    pub base_stats: StatBlock,
    /// Special ability name.
    #[serde(default)]
    pub ability: String,
    /// Stat increments applied on each level-up.
    #[serde(default)]
    pub level_up: StatDeltas,
}

/// One-time rewards for reaching a location.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageBonus {
    /// Bonus experience.
    #[serde(default)]
    pub xp: u32,
    /// Bonus reputation.
    #[serde(default)]
    pub reputation: u32,
    /// Added to every stat.
    #[serde(default)]
    pub all_stats: i32,
    /// Item ids granted one use each.
    #[serde(default)]
    pub items: Vec<String>,
}

impl StageBonus {
    /// Whether the bonus grants nothing.
    pub fn is_empty(&self) -> bool {
        self.xp == 0 && self.reputation == 0 && self.all_stats == 0 && self.items.is_empty()
    }
}

/// A stage of the career, hosting a pool of clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Position in the career; lower comes first.
    pub order: u32,
    /// Client ids, in the order they are seen.
    pub clients: Vec<String>,
    /// Sessions needed to unlock the next location.
    pub clients_required: u32,
    /// Added to client absurdity, resistance, and counter-attacks.
    #[serde(default)]
    pub difficulty_modifier: i32,
    /// Extra primary-stat gain per approach while working here.
    #[serde(default)]
    pub effect_bonuses: BTreeMap<ApproachType, i32>,
    /// Applied once when this location is reached.
    #[serde(default)]
    pub stage_bonus: StageBonus,
}

impl Location {
    /// The effect bonus for an approach (0 if none).
    pub fn effect_bonus(&self, approach: ApproachType) -> i32 {
        self.effect_bonuses.get(&approach).copied().unwrap_or(0)
    }
}

/// A client with a problem and a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Location the client belongs to.
    pub location: String,
    /// Starting absurdity.
    pub absurdity: u32,
    /// How hard the client pushes back in combat.
    pub resistance: u32,
    /// The conversation.
    pub dialogue: DialogueTree,
    /// Shown when the client breaks down into combat.
    #[serde(default)]
    pub combat_flavor: String,
}

/// A limited-use item that restores a stat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Stat restored on use.
    pub restores: Stat,
    /// Amount restored.
    pub amount: i32,
    /// Uses held at run start, and the most a starting inventory may grant.
    pub max_uses: u32,
}

/// Everything a run needs, loaded once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentCatalog {
    /// Playable classes.
    pub classes: Vec<ClassDefinition>,
    /// Locations; played in `order`.
    pub locations: Vec<Location>,
    /// All clients.
    pub clients: Vec<Client>,
    /// All items.
    pub items: Vec<ItemDefinition>,
    /// Ending rule table.
    pub endings: Vec<EndingRule>,
    /// Item id to uses granted at run start. Empty means every item at
    /// its `max_uses`.
    #[serde(default)]
    pub starting_inventory: BTreeMap<String, u32>,
}

impl ContentCatalog {
    /// Parse a catalog from JSON.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Return the catalog if validation reports no errors.
    ///
    /// Warnings are allowed. The first error becomes a [`CoreError::Content`].
    pub fn validated(self) -> CoreResult<Self> {
        let issues = validate_catalog(&self);
        match issues.iter().find(|i| i.is_error) {
            Some(issue) => Err(CoreError::content(issue.to_string())),
            None => Ok(self),
        }
    }

    /// Run the validator.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        validate_catalog(self)
    }

    /// Class by id.
    pub fn class(&self, id: &str) -> CoreResult<&ClassDefinition> {
        self.classes
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::content(format!("unknown class '{id}'")))
    }

    /// Location by id.
    pub fn location(&self, id: &str) -> CoreResult<&Location> {
        self.locations
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| CoreError::content(format!("unknown location '{id}'")))
    }

    /// Client by id.
    pub fn client(&self, id: &str) -> CoreResult<&Client> {
        self.clients
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::content(format!("unknown client '{id}'")))
    }

    /// Item by id.
    pub fn item(&self, id: &str) -> CoreResult<&ItemDefinition> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| CoreError::content(format!("unknown item '{id}'")))
    }

    /// Item by id or display name, ignoring case.
    pub fn find_item(&self, name: &str) -> Option<&ItemDefinition> {
        let needle = name.trim().to_lowercase();
        self.items
            .iter()
            .find(|i| i.id.to_lowercase() == needle || i.name.to_lowercase() == needle)
    }

    /// Uses of each item the therapist starts with.
    pub fn starting_uses(&self) -> BTreeMap<String, u32> {
        if !self.starting_inventory.is_empty() {
            return self.starting_inventory.clone();
        }
        self.items
            .iter()
            .filter(|i| i.max_uses > 0)
            .map(|i| (i.id.clone(), i.max_uses))
            .collect()
    }

    /// Locations sorted by `order`.
    pub fn locations_in_order(&self) -> Vec<&Location> {
        let mut locs: Vec<&Location> = self.locations.iter().collect();
        locs.sort_by_key(|l| l.order);
        locs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_report_content_errors() {
        let catalog = ContentCatalog::default();
        assert!(matches!(catalog.class("empath"), Err(CoreError::Content(_))));
        assert!(matches!(catalog.item("coffee"), Err(CoreError::Content(_))));
    }

    #[test]
    fn find_item_by_name() {
        let catalog = ContentCatalog {
            items: vec![ItemDefinition {
                id: "energy_drink".to_string(),
                name: "Energy Drink".to_string(),
                description: String::new(),
                restores: Stat::Composure,
                amount: 2,
                max_uses: 1,
            }],
            ..ContentCatalog::default()
        };
        assert!(catalog.find_item("energy drink").is_some());
        assert!(catalog.find_item("ENERGY_DRINK").is_some());
        assert!(catalog.find_item("coffee").is_none());
    }

    #[test]
    fn starting_uses_default_to_max_uses() {
        let item = |id: &str, max_uses| ItemDefinition {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            restores: Stat::Patience,
            amount: 2,
            max_uses,
        };
        let mut catalog = ContentCatalog {
            items: vec![item("coffee", 2), item("notepad", 1), item("broken_pen", 0)],
            ..ContentCatalog::default()
        };
        let uses = catalog.starting_uses();
        assert_eq!(uses.get("coffee"), Some(&2));
        assert_eq!(uses.get("notepad"), Some(&1));
        assert!(!uses.contains_key("broken_pen"));

        catalog.starting_inventory.insert("notepad".to_string(), 1);
        let uses = catalog.starting_uses();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses.get("notepad"), Some(&1));
    }

    #[test]
    fn locations_sorted_by_order() {
        let loc = |id: &str, order| Location {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            order,
            clients: Vec::new(),
            clients_required: 1,
            difficulty_modifier: 0,
            effect_bonuses: BTreeMap::new(),
            stage_bonus: StageBonus::default(),
        };
        let catalog = ContentCatalog {
            locations: vec![loc("b", 2), loc("a", 1)],
            ..ContentCatalog::default()
        };
        let ids: Vec<_> = catalog.locations_in_order().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn empty_catalog_fails_validation() {
        assert!(ContentCatalog::default().validated().is_err());
    }
}
