//! Stage progression, session rewards, and leveling.
//!
//! [`Progression`] tracks which location the career is at, how many clients
//! have been completed there, and which clients have been seen. Reward and
//! level-up rules are free functions over a [`StatProfile`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tsim_core::flags::LIFE_CHANGING_BREAKTHROUGHS;
use tsim_core::{
    ClassDefinition, Client, ContentCatalog, ItemDefinition, Location, Stat, StatChange,
    StatDeltas, StatProfile,
};
use tsim_mechanics::Roller;

use crate::config::ProgressionRules;
use crate::error::{SessionError, SessionResult};

/// Where the career stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    order: Vec<String>,
    stage: usize,
    completed: BTreeMap<String, u32>,
    visited: BTreeSet<String>,
    bonuses_applied: BTreeSet<String>,
    finished: bool,
}

/// A move to the next location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageAdvance {
    /// Location left behind.
    pub from: String,
    /// Location id arrived at.
    pub to: String,
    /// Display name of the new location.
    pub to_name: String,
    /// Stat changes from the stage bonus.
    pub changes: Vec<StatChange>,
    /// XP granted.
    pub xp: u32,
    /// Reputation granted.
    pub reputation: u32,
    /// Item ids granted.
    pub items: Vec<String>,
}

/// The progress readout shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Current location name.
    pub location: String,
    /// Clients completed here.
    pub clients_completed: u32,
    /// Clients required to move on.
    pub clients_required: u32,
    /// Clients still required.
    pub remaining: u32,
    /// Name of the next location, or "final location".
    pub next_unlock: String,
}

impl std::fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}/{} clients ({} remaining), next: {}",
            self.location,
            self.clients_completed,
            self.clients_required,
            self.remaining,
            self.next_unlock
        )
    }
}

impl Progression {
    /// Start at the first location in order.
    pub fn new(catalog: &ContentCatalog) -> SessionResult<Self> {
        let order: Vec<String> = catalog
            .locations_in_order()
            .into_iter()
            .map(|l| l.id.clone())
            .collect();
        if order.is_empty() {
            return Err(SessionError::Content("catalog has no locations".to_string()));
        }
        Ok(Self {
            order,
            stage: 0,
            completed: BTreeMap::new(),
            visited: BTreeSet::new(),
            bonuses_applied: BTreeSet::new(),
            finished: false,
        })
    }

    /// Id of the current location.
    pub fn location_id(&self) -> &str {
        self.order.get(self.stage).map(String::as_str).unwrap_or_default()
    }

    /// The current location.
    pub fn current_location<'c>(&self, catalog: &'c ContentCatalog) -> SessionResult<&'c Location> {
        Ok(catalog.location(self.location_id())?)
    }

    /// Zero-based stage index.
    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Clients completed at `location_id`.
    pub fn completed_at(&self, location_id: &str) -> u32 {
        self.completed.get(location_id).copied().unwrap_or(0)
    }

    /// Whether the last location's requirement has been met.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether `client_id` has already been seen.
    pub fn has_visited(&self, client_id: &str) -> bool {
        self.visited.contains(client_id)
    }

    /// The next unseen client of the current pool, in pool order.
    pub fn next_client<'c>(&self, catalog: &'c ContentCatalog) -> Option<&'c Client> {
        let location = self.current_location(catalog).ok()?;
        location
            .clients
            .iter()
            .filter(|id| !self.visited.contains(id.as_str()))
            .find_map(|id| catalog.client(id).ok())
    }

    /// Record that a client has been seen, whether or not the session completed.
    pub fn mark_visited(&mut self, client_id: &str) {
        self.visited.insert(client_id.to_string());
    }

    /// Count a completed client at the current location, advancing when the
    /// requirement is met.
    pub fn complete_client(
        &mut self,
        catalog: &ContentCatalog,
        profile: &mut StatProfile,
    ) -> SessionResult<Option<StageAdvance>> {
        let location = self.current_location(catalog)?;
        let count = self.completed.entry(location.id.clone()).or_insert(0);
        *count += 1;
        debug!(location = %location.id, completed = *count, required = location.clients_required, "client completed");
        if *count < location.clients_required {
            return Ok(None);
        }
        let from = location.id.clone();
        let Some(next_id) = self.order.get(self.stage + 1).cloned() else {
            info!(location = %from, "final location complete");
            self.finished = true;
            return Ok(None);
        };
        self.stage += 1;
        let next = catalog.location(&next_id)?;
        info!(from = %from, to = %next.id, "advanced to next location");
        Ok(Some(self.apply_stage_bonus(next, from, catalog, profile)))
    }

    fn apply_stage_bonus(
        &mut self,
        location: &Location,
        from: String,
        catalog: &ContentCatalog,
        profile: &mut StatProfile,
    ) -> StageAdvance {
        let mut advance = StageAdvance {
            from,
            to: location.id.clone(),
            to_name: location.name.clone(),
            changes: Vec::new(),
            xp: 0,
            reputation: 0,
            items: Vec::new(),
        };
        if !self.bonuses_applied.insert(location.id.clone()) {
            return advance;
        }
        let bonus = &location.stage_bonus;
        let all: StatDeltas = Stat::ALL.iter().map(|&s| (s, bonus.all_stats)).collect();
        advance.changes = profile.apply_deltas(&all);
        profile.gain_xp(bonus.xp);
        profile.adjust_reputation(i32::try_from(bonus.reputation).unwrap_or(i32::MAX));
        advance.xp = bonus.xp;
        advance.reputation = bonus.reputation;
        for item in bonus.items.iter().filter(|id| catalog.item(id).is_ok()) {
            profile.inventory.grant(item, 1);
            advance.items.push(item.clone());
        }
        advance
    }

    /// The progress readout.
    pub fn summary(&self, catalog: &ContentCatalog) -> SessionResult<ProgressSummary> {
        let location = self.current_location(catalog)?;
        let completed = self.completed_at(&location.id);
        let next_unlock = match self.order.get(self.stage + 1) {
            Some(id) => catalog.location(id)?.name.clone(),
            None => "final location".to_string(),
        };
        Ok(ProgressSummary {
            location: location.name.clone(),
            clients_completed: completed,
            clients_required: location.clients_required,
            remaining: location.clients_required.saturating_sub(completed),
            next_unlock,
        })
    }
}

/// How a session went, as far as rewards care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRecord {
    /// A choice marked as a life-changing breakthrough was taken.
    pub life_changing: bool,
    /// A Challenging choice was taken.
    pub challenged: bool,
    /// The client's absurdity when the session ended.
    pub final_absurdity: u32,
}

/// Rewards granted for finishing a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRewards {
    /// Total XP granted.
    pub xp: u32,
    /// Net reputation change.
    pub reputation: i32,
    /// A life-changing breakthrough was recorded.
    pub life_changing: bool,
    /// Good progress bonus applied.
    pub good_progress: bool,
    /// Composure recovery, if any happened.
    pub composure: Option<StatChange>,
    /// Item found, if any.
    pub item_found: Option<String>,
}

/// Apply the session-completion rewards to `profile`.
pub fn award_session<R: Roller + ?Sized>(
    rules: &ProgressionRules,
    record: SessionRecord,
    profile: &mut StatProfile,
    items: &[ItemDefinition],
    roller: &mut R,
) -> SessionRewards {
    let mut xp = rules.base_xp;
    let mut reputation = 0i32;
    let mut good_progress = false;

    if record.life_changing {
        xp += rules.life_changing_xp;
        reputation += i32::try_from(rules.life_changing_rep).unwrap_or(0);
        profile.flags.increment(LIFE_CHANGING_BREAKTHROUGHS);
    } else if record.final_absurdity <= rules.good_progress_absurdity {
        xp += rules.good_progress_xp;
        good_progress = true;
    }
    if record.challenged {
        reputation -= i32::try_from(rules.challenge_rep_penalty).unwrap_or(0);
    }

    let recovered = record.final_absurdity <= rules.recovery_absurdity;
    let composure = recovered
        .then(|| profile.adjust(Stat::Composure, rules.recovery_composure))
        .filter(|c| c.delta() != 0);

    profile.gain_xp(xp);
    profile.adjust_reputation(reputation);

    let find_pct = rules.item_find_pct + if recovered { rules.item_find_bonus_pct } else { 0 };
    let item_found = if roller.chance(find_pct) {
        roller.pick(items.len()).and_then(|i| items.get(i)).map(|item| {
            profile.inventory.grant(&item.id, 1);
            item.id.clone()
        })
    } else {
        None
    };

    SessionRewards {
        xp,
        reputation,
        life_changing: record.life_changing,
        good_progress,
        composure,
        item_found,
    }
}

/// One level gained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    /// The new level.
    pub level: u32,
    /// Stat changes from the class's level-up increments.
    pub changes: Vec<StatChange>,
}

/// Apply every level-up the profile's XP has earned but not yet received.
pub fn apply_level_ups(
    rules: &ProgressionRules,
    class: &ClassDefinition,
    profile: &mut StatProfile,
) -> Vec<LevelUp> {
    if rules.xp_per_level == 0 {
        return Vec::new();
    }
    let earned = profile.xp / rules.xp_per_level;
    let mut gained = Vec::new();
    while profile.level < earned {
        profile.level += 1;
        let changes = profile.apply_deltas(&class.level_up);
        info!(level = profile.level, class = %class.id, "level up");
        gained.push(LevelUp {
            level: profile.level,
            changes,
        });
    }
    gained
}
