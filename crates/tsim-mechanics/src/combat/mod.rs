//! Turn-based "psychological combat" between the therapist and a client.
//!
//! A session starts when dialogue escalates, and runs until the client's
//! chaos or the therapist's sanity hits 0. Restarting after a defeat is the
//! caller's job: it builds a fresh session with the next attempt number.

pub mod action;

pub use action::{CombatAction, CombatEvent};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tsim_core::{CoreError, Encounter, ItemDefinition, Stat, StatProfile};

use crate::dice::{Die, Roller};
use crate::error::{MechError, MechResult};
use crate::meter::Meter;

/// Tunable combat numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// Sanity on top of composure at the start of a fight.
    pub sanity_bonus: u32,
    /// Sanity cap.
    pub max_sanity: u32,
    /// Percent of a counter-attack absorbed after patient listening.
    pub defend_reduction_pct: u32,
    /// Defeats against one client before the therapist melts down.
    pub max_defeats: u32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            sanity_bonus: 5,
            max_sanity: 20,
            defend_reduction_pct: 50,
            max_defeats: 3,
        }
    }
}

impl CombatRules {
    /// Set the starting sanity bonus.
    pub fn with_sanity_bonus(mut self, bonus: u32) -> Self {
        self.sanity_bonus = bonus;
        self
    }

    /// Set the sanity cap.
    pub fn with_max_sanity(mut self, max: u32) -> Self {
        self.max_sanity = max;
        self
    }

    /// Set the defend reduction, capped at 100%.
    pub fn with_defend_reduction(mut self, pct: u32) -> Self {
        self.defend_reduction_pct = pct.min(100);
        self
    }

    /// Set the meltdown threshold (at least 1).
    pub fn with_max_defeats(mut self, defeats: u32) -> Self {
        self.max_defeats = defeats.max(1);
        self
    }
}

/// Where a combat session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatOutcome {
    /// Still fighting.
    Ongoing,
    /// The client's chaos is gone.
    Victory,
    /// The therapist's sanity is gone.
    Defeat,
}

/// Everything a turn may touch outside the combat session itself.
pub struct CombatContext<'a> {
    /// The therapist.
    pub profile: &'a mut StatProfile,
    /// The client's session state.
    pub encounter: &'a mut Encounter,
    /// Item definitions for `UseItem`.
    pub items: &'a [ItemDefinition],
}

/// One fight against one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatSession {
    client_id: String,
    client_name: String,
    sanity: Meter,
    chaos: Meter,
    turn: u32,
    attempt: u32,
    defended: bool,
    difficulty: i32,
    outcome: CombatOutcome,
    rules: CombatRules,
    /// Every event so far.
    pub log: Vec<CombatEvent>,
}

fn non_negative(v: i32) -> u32 {
    u32::try_from(v).unwrap_or(0)
}

impl CombatSession {
    /// Start a fight. Sanity is composure plus the bonus, capped; chaos is
    /// the client's absurdity plus resistance.
    pub fn start(
        profile: &StatProfile,
        encounter: &Encounter,
        attempt: u32,
        rules: CombatRules,
    ) -> Self {
        let sanity = Meter::new(
            non_negative(profile.stat(Stat::Composure)).saturating_add(rules.sanity_bonus),
            rules.max_sanity,
        );
        let chaos = Meter::full(encounter.absurdity.saturating_add(encounter.resistance));
        info!(
            client = %encounter.client_id,
            attempt,
            sanity = sanity.current(),
            chaos = chaos.current(),
            "combat started"
        );
        let log = vec![CombatEvent::Began {
            client: encounter.client_name.clone(),
            attempt,
            sanity: sanity.current(),
            chaos: chaos.current(),
        }];
        Self {
            client_id: encounter.client_id.clone(),
            client_name: encounter.client_name.clone(),
            sanity,
            chaos,
            turn: 0,
            attempt,
            defended: false,
            difficulty: encounter.difficulty,
            outcome: CombatOutcome::Ongoing,
            rules,
            log,
        }
    }

    /// Client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Client display name.
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Therapist sanity.
    pub fn sanity(&self) -> Meter {
        self.sanity
    }

    /// Client chaos.
    pub fn chaos(&self) -> Meter {
        self.chaos
    }

    /// Turns taken.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Attempt number against this client (1-based).
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Whether the next counter-attack is softened.
    pub fn is_defended(&self) -> bool {
        self.defended
    }

    /// Current state.
    pub fn outcome(&self) -> CombatOutcome {
        self.outcome
    }

    /// The rules this fight runs under.
    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    /// Resolve one therapist action and the client's response.
    ///
    /// Returns the events of this turn. An item the therapist cannot use
    /// (unknown or out of uses) is an error and costs nothing: no turn
    /// passes and the client does not strike.
    pub fn act<R: Roller + ?Sized>(
        &mut self,
        action: &CombatAction,
        ctx: &mut CombatContext<'_>,
        roller: &mut R,
    ) -> MechResult<Vec<CombatEvent>> {
        if self.outcome != CombatOutcome::Ongoing {
            return Err(MechError::CombatOver);
        }

        // Items are checked before anything changes.
        let item = match action {
            CombatAction::UseItem(id) => {
                let item = ctx
                    .items
                    .iter()
                    .find(|i| &i.id == id)
                    .ok_or_else(|| CoreError::content(format!("unknown item '{id}'")))?;
                Some(ctx.profile.use_item(item).map(|used| (item, used))?)
            }
            _ => None,
        };

        self.turn += 1;
        let turn = self.turn;
        let mut events = Vec::new();

        match action {
            CombatAction::EmpathySupport | CombatAction::LogicAnalysis => {
                let stat = if *action == CombatAction::EmpathySupport {
                    Stat::Empathy
                } else {
                    Stat::Insight
                };
                let roll = roller.roll(Die::D6);
                let damage = non_negative(ctx.profile.stat(stat)).saturating_add(roll);
                self.chaos.drain(damage);
                events.push(CombatEvent::Struck {
                    turn,
                    action: action.clone(),
                    die: Die::D6,
                    roll,
                    damage,
                });
            }
            CombatAction::PatientListening => {
                let roll = roller.roll(Die::D4);
                let healed = self
                    .sanity
                    .fill(non_negative(ctx.profile.stat(Stat::Patience)).saturating_add(roll));
                self.defended = true;
                events.push(CombatEvent::Listened { turn, roll, healed });
            }
            CombatAction::UseItem(_) => {
                if let Some((def, used)) = item {
                    let sanity_restored = if def.restores == Stat::Composure {
                        self.sanity.fill(non_negative(def.amount))
                    } else {
                        0
                    };
                    events.push(CombatEvent::ItemUsed {
                        turn,
                        item: used.item_id,
                        change: used.change,
                        sanity_restored,
                    });
                }
            }
        }

        if self.chaos.is_empty() {
            self.outcome = CombatOutcome::Victory;
            ctx.profile.adjust(Stat::Empathy, 1);
            ctx.encounter.absurdity = 0;
            events.push(CombatEvent::Victory { turn });
            info!(client = %self.client_id, turn, "combat won");
        } else {
            let roll = roller.roll(Die::D6);
            let raw = non_negative(self.difficulty).saturating_add(roll);
            let mitigated = std::mem::take(&mut self.defended);
            let damage = if mitigated {
                raw - raw * self.rules.defend_reduction_pct.min(100) / 100
            } else {
                raw
            };
            let lost = self.sanity.drain(damage);
            events.push(CombatEvent::CounterAttack {
                turn,
                roll,
                raw,
                damage: lost,
                mitigated,
            });

            if self.sanity.is_empty() {
                self.outcome = CombatOutcome::Defeat;
                ctx.profile.adjust(Stat::Composure, -1);
                ctx.encounter.shift_absurdity(1);
                events.push(CombatEvent::Defeat { turn });
                info!(client = %self.client_id, turn, attempt = self.attempt, "combat lost");
            }
        }

        debug!(
            client = %self.client_id,
            turn,
            action = %action,
            sanity = self.sanity.current(),
            chaos = self.chaos.current(),
            "combat turn"
        );
        self.log.extend(events.iter().cloned());
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedRolls;
    use tsim_core::{StatBlock, StatBounds};

    fn profile() -> StatProfile {
        // Burnout-like: patience 8, empathy 4, insight 3, composure 4.
        StatProfile::new("burnout", StatBlock::new(8, 4, 3, 4), StatBounds::default())
    }

    fn encounter(absurdity: u32, resistance: u32, difficulty: i32) -> Encounter {
        Encounter {
            client_id: "toaster".to_string(),
            client_name: "Toaster Guy".to_string(),
            location_id: "community_center".to_string(),
            absurdity,
            resistance,
            difficulty,
        }
    }

    fn items() -> Vec<ItemDefinition> {
        vec![ItemDefinition {
            id: "energy_drink".to_string(),
            name: "Energy Drink".to_string(),
            description: String::new(),
            restores: Stat::Composure,
            amount: 2,
            max_uses: 1,
        }]
    }

    #[test]
    fn start_values() {
        let p = profile();
        let e = encounter(6, 4, 0);
        let c = CombatSession::start(&p, &e, 1, CombatRules::default());
        assert_eq!(c.sanity().current(), 9);
        assert_eq!(c.sanity().max(), 20);
        assert_eq!(c.chaos().current(), 10);
        assert_eq!(c.outcome(), CombatOutcome::Ongoing);
        assert_eq!(c.log.len(), 1);
    }

    #[test]
    fn sanity_capped_at_max() {
        let mut p = profile();
        p.adjust(Stat::Composure, 20);
        let c = CombatSession::start(&p, &encounter(1, 1, 0), 1, CombatRules::default());
        assert_eq!(c.sanity().current(), 20);
    }

    #[test]
    fn empathy_knockout_is_victory() {
        let mut p = profile();
        let mut e = encounter(2, 3, 0);
        let mut c = CombatSession::start(&p, &e, 1, CombatRules::default());
        assert_eq!(c.chaos().current(), 5);
        let items = items();
        let mut ctx = CombatContext {
            profile: &mut p,
            encounter: &mut e,
            items: &items,
        };
        let events = c
            .act(&CombatAction::EmpathySupport, &mut ctx, &mut ScriptedRolls::new([3]))
            .unwrap();
        assert!(matches!(events[0], CombatEvent::Struck { damage: 7, roll: 3, .. }));
        assert_eq!(c.outcome(), CombatOutcome::Victory);
        assert_eq!(c.chaos().current(), 0);
        assert_eq!(c.turn(), 1);
        assert_eq!(p.stat(Stat::Empathy), 5);
        assert_eq!(e.absurdity, 0);
    }

    #[test]
    fn no_actions_after_victory() {
        let mut p = profile();
        let mut e = encounter(1, 1, 0);
        let mut c = CombatSession::start(&p, &e, 1, CombatRules::default());
        let mut ctx = CombatContext {
            profile: &mut p,
            encounter: &mut e,
            items: &[],
        };
        c.act(&CombatAction::LogicAnalysis, &mut ctx, &mut ScriptedRolls::new([6]))
            .unwrap();
        let err = c
            .act(&CombatAction::LogicAnalysis, &mut ctx, &mut ScriptedRolls::new([6]))
            .unwrap_err();
        assert!(matches!(err, MechError::CombatOver));
    }

    #[test]
    fn counter_attack_and_defeat() {
        let mut p = profile();
        p.adjust(Stat::Composure, -3); // composure 1, sanity 6
        let mut e = encounter(10, 10, 2);
        let mut c = CombatSession::start(&p, &e, 1, CombatRules::default());
        assert_eq!(c.sanity().current(), 6);
        let mut ctx = CombatContext {
            profile: &mut p,
            encounter: &mut e,
            items: &[],
        };
        // Strike for 3 + 1, client hits back 2 + 6 = 8.
        let events = c
            .act(&CombatAction::LogicAnalysis, &mut ctx, &mut ScriptedRolls::new([1, 6]))
            .unwrap();
        assert_eq!(c.outcome(), CombatOutcome::Defeat);
        assert!(matches!(events.last(), Some(CombatEvent::Defeat { turn: 1 })));
        assert_eq!(c.sanity().current(), 0);
        assert_eq!(p.stat(Stat::Composure), 1, "composure floors at the lower bound");
        assert_eq!(e.absurdity, 11);
    }

    #[test]
    fn patient_listening_heals_and_halves_next_counter() {
        let mut p = profile();
        let mut e = encounter(10, 10, 1);
        let mut c = CombatSession::start(&p, &e, 1, CombatRules::default());
        // sanity 9; listen heals 8 + 2 = 10 -> 19; counter 1 + 5 = 6, halved to 3.
        let mut ctx = CombatContext {
            profile: &mut p,
            encounter: &mut e,
            items: &[],
        };
        let events = c
            .act(&CombatAction::PatientListening, &mut ctx, &mut ScriptedRolls::new([2, 5]))
            .unwrap();
        assert!(matches!(events[0], CombatEvent::Listened { healed: 10, .. }));
        assert!(matches!(
            events[1],
            CombatEvent::CounterAttack { raw: 6, damage: 3, mitigated: true, .. }
        ));
        assert_eq!(c.sanity().current(), 16);
        assert!(!c.is_defended());

        // The next counter hits at full strength.
        let events = c
            .act(&CombatAction::LogicAnalysis, &mut ctx, &mut ScriptedRolls::new([1, 5]))
            .unwrap();
        assert!(matches!(
            events[1],
            CombatEvent::CounterAttack { damage: 6, mitigated: false, .. }
        ));
    }

    #[test]
    fn odd_counter_reduction_rounds_down() {
        let mut p = profile();
        let mut e = encounter(10, 10, 0);
        let mut c = CombatSession::start(&p, &e, 1, CombatRules::default());
        let mut ctx = CombatContext {
            profile: &mut p,
            encounter: &mut e,
            items: &[],
        };
        let events = c
            .act(&CombatAction::PatientListening, &mut ctx, &mut ScriptedRolls::new([1, 5]))
            .unwrap();
        // 5 * 50% = 2.5, reduction rounds down to 2, damage 3.
        assert!(matches!(events[1], CombatEvent::CounterAttack { damage: 3, .. }));
    }

    #[test]
    fn composure_item_restores_sanity_and_costs_a_turn() {
        let mut p = profile();
        p.inventory.grant("energy_drink", 1);
        let mut e = encounter(10, 10, 0);
        let mut c = CombatSession::start(&p, &e, 1, CombatRules::default());
        let items = items();
        let mut ctx = CombatContext {
            profile: &mut p,
            encounter: &mut e,
            items: &items,
        };
        let events = c
            .act(
                &CombatAction::UseItem("energy_drink".to_string()),
                &mut ctx,
                &mut ScriptedRolls::new([1]),
            )
            .unwrap();
        assert!(matches!(
            events[0],
            CombatEvent::ItemUsed { sanity_restored: 2, .. }
        ));
        assert_eq!(c.turn(), 1);
        // 9 + 2 - 1
        assert_eq!(c.sanity().current(), 10);
        assert_eq!(p.stat(Stat::Composure), 6);
        assert_eq!(p.inventory.uses("energy_drink"), 0);
    }

    #[test]
    fn empty_item_costs_nothing() {
        let mut p = profile();
        let mut e = encounter(10, 10, 0);
        let mut c = CombatSession::start(&p, &e, 1, CombatRules::default());
        let before = c.clone();
        let items = items();
        let mut ctx = CombatContext {
            profile: &mut p,
            encounter: &mut e,
            items: &items,
        };
        let err = c
            .act(
                &CombatAction::UseItem("energy_drink".to_string()),
                &mut ctx,
                &mut ScriptedRolls::new([6]),
            )
            .unwrap_err();
        assert!(matches!(err, MechError::Core(CoreError::EmptyInventory(_))));
        assert_eq!(c, before);

        let err = c
            .act(
                &CombatAction::UseItem("crystal".to_string()),
                &mut ctx,
                &mut ScriptedRolls::new([6]),
            )
            .unwrap_err();
        assert!(matches!(err, MechError::Core(CoreError::Content(_))));
        assert_eq!(c, before);
    }

    #[test]
    fn rules_builders_clamp() {
        let rules = CombatRules::default()
            .with_defend_reduction(150)
            .with_max_defeats(0);
        assert_eq!(rules.defend_reduction_pct, 100);
        assert_eq!(rules.max_defeats, 1);
    }

    #[test]
    fn partial_rules_fill_defaults() {
        let rules: CombatRules = serde_json::from_str(r#"{"max_defeats": 5}"#).unwrap();
        assert_eq!(rules, CombatRules::default().with_max_defeats(5));
    }
}
