//! A single playthrough.
//!
//! [`Run`] is the explicit session context: it owns the catalog, the
//! therapist's profile, progression, the journal, and the dice. The
//! presentation layer drives it through [`Run::submit_choice`],
//! [`Run::combat_action`], and [`Run::use_item`], and reads
//! [`Run::current_view`] after each step.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use tsim_core::flags::MELTED_DOWN;
use tsim_core::{
    ApproachType, ClassDefinition, ContentCatalog, Encounter, Ending, EndingProgress, EndingResolver,
    ItemUse, StatProfile,
    validate_catalog_with,
};
use tsim_dialogue::{ChoiceContext, DialogueEngine, SessionStatus, Transition};
use tsim_mechanics::{CombatAction, CombatContext, CombatEvent, CombatOutcome, CombatSession, Roller};

use crate::config::RunConfig;
use crate::error::{InvalidAction, SessionError, SessionResult};
use crate::journal::{EndReason, Journal, JournalEntry};
use crate::progression::{
    LevelUp, ProgressSummary, Progression, SessionRecord, apply_level_ups, award_session,
};
use crate::view::{ChoiceReport, CombatReport, ItemReport, SessionClose, View};

/// Unique id of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct OpenSession {
    engine: DialogueEngine,
    encounter: Encounter,
    location_name: String,
}

#[derive(Debug)]
struct Fight {
    session: OpenSession,
    combat: CombatSession,
    defeats: u32,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Dialogue(Box<OpenSession>),
    Combat(Box<Fight>),
    Finished(Ending),
}

/// An in-memory playthrough.
#[derive(Debug)]
pub struct Run<R: Roller = StdRng> {
    id: RunId,
    started_at: DateTime<Utc>,
    catalog: ContentCatalog,
    config: RunConfig,
    class: ClassDefinition,
    profile: StatProfile,
    progression: Progression,
    journal: Journal,
    roller: R,
    phase: Phase,
    end_reason: Option<EndReason>,
}

impl Run<StdRng> {
    /// Start a run rolling with an RNG seeded from `config.seed`.
    pub fn start(catalog: ContentCatalog, class_id: &str, config: RunConfig) -> SessionResult<Self> {
        let rng = StdRng::seed_from_u64(config.seed);
        Self::with_roller(catalog, class_id, config, rng)
    }
}

impl<R: Roller> Run<R> {
    /// Start a run with an explicit dice source.
    ///
    /// Refuses catalogs with validation errors and unknown classes.
    pub fn with_roller(
        catalog: ContentCatalog,
        class_id: &str,
        config: RunConfig,
        roller: R,
    ) -> SessionResult<Self> {
        let issues = validate_catalog_with(&catalog, config.bounds);
        if let Some(issue) = issues.iter().find(|i| i.is_error) {
            return Err(SessionError::Content(issue.to_string()));
        }
        for issue in &issues {
            debug!(%issue, "content warning");
        }

        let class = catalog.class(class_id)?.clone();
        let mut profile = StatProfile::for_class(&class, config.bounds);
        for (item, uses) in catalog.starting_uses() {
            profile.inventory.grant(&item, uses);
        }
        let progression = Progression::new(&catalog)?;

        let id = RunId::new();
        let mut journal = Journal::new();
        journal.append(JournalEntry::RunStarted {
            run_id: id.to_string(),
            class: class.id.clone(),
            seed: config.seed,
            timestamp: Utc::now(),
        });
        info!(run = %id, class = %class.id, seed = config.seed, "run started");

        let mut run = Self {
            id,
            started_at: Utc::now(),
            catalog,
            config,
            class,
            profile,
            progression,
            journal,
            roller,
            phase: Phase::Idle,
            end_reason: None,
        };
        run.open_next_session()?;
        Ok(run)
    }

    /// Run id.
    pub fn id(&self) -> RunId {
        self.id
    }

    /// When the run began.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The content the run plays.
    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    /// The run's configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The therapist.
    pub fn profile(&self) -> &StatProfile {
        &self.profile
    }

    /// The journal so far.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Career progress.
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// The ending, once resolved.
    pub fn ending(&self) -> Option<&Ending> {
        match &self.phase {
            Phase::Finished(ending) => Some(ending),
            _ => None,
        }
    }

    /// Why the run ended, once it has.
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Whether the run has its ending.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    /// The current screen.
    pub fn current_view(&self) -> View {
        match &self.phase {
            Phase::Idle => View::Idle,
            Phase::Dialogue(session) => {
                let node = session.engine.node();
                View::Dialogue {
                    client: session.encounter.client_name.clone(),
                    location: session.location_name.clone(),
                    text: node.map(|n| n.text.clone()).unwrap_or_default(),
                    reply: node.and_then(|n| n.reply.clone()),
                    choices: session
                        .engine
                        .choice_labels()
                        .into_iter()
                        .map(String::from)
                        .collect(),
                    absurdity: session.encounter.absurdity,
                }
            }
            Phase::Combat(fight) => View::Combat {
                client: fight.combat.client_name().to_string(),
                flavor: fight.session.engine.client().combat_flavor.clone(),
                sanity: fight.combat.sanity(),
                chaos: fight.combat.chaos(),
                turn: fight.combat.turn(),
                attempt: fight.combat.attempt(),
            },
            Phase::Finished(ending) => View::Finished(ending.clone()),
        }
    }

    /// Approaches of the current node's choices, in index order. Empty
    /// outside dialogue.
    pub fn choice_approaches(&self) -> Vec<ApproachType> {
        match &self.phase {
            Phase::Dialogue(session) => session
                .engine
                .node()
                .map(|n| n.choices.iter().map(|c| c.approach).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Career progress readout.
    pub fn progress_summary(&self) -> SessionResult<ProgressSummary> {
        self.progression.summary(&self.catalog)
    }

    /// Where the therapist stands against each ending threshold.
    pub fn ending_progress(&self) -> Vec<EndingProgress> {
        EndingResolver::new(&self.catalog.endings).progress(&self.profile)
    }

    /// Resolve dialogue choice `index`.
    pub fn submit_choice(&mut self, index: usize) -> SessionResult<ChoiceReport> {
        let session = match &mut self.phase {
            Phase::Dialogue(session) => session,
            Phase::Combat(_) => return Err(InvalidAction::InCombat.into()),
            Phase::Finished(_) => return Err(InvalidAction::RunFinished.into()),
            Phase::Idle => return Err(InvalidAction::NoActiveSession.into()),
        };
        let location = self.catalog.location(&session.encounter.location_id)?;
        let mut ctx = ChoiceContext {
            profile: &mut self.profile,
            encounter: &mut session.encounter,
            location,
            policy: &self.config.dialogue,
        };
        let outcome = session.engine.choose(index, &mut ctx)?;
        let status = session.engine.status();
        let client = session.encounter.client_name.clone();

        let now = Utc::now();
        self.journal.append(JournalEntry::ChoiceMade {
            client: client.clone(),
            choice: outcome.label.clone(),
            approach: outcome.approach.to_string(),
            changes: outcome.changes.iter().map(ToString::to_string).collect(),
            absurdity: outcome.absurdity_after,
            timestamp: now,
        });
        if let Some(complication) = &outcome.complication {
            self.journal.append(JournalEntry::Complication {
                description: complication.to_string(),
                timestamp: now,
            });
        }
        if outcome.breakthrough {
            self.journal.append(JournalEntry::Breakthrough {
                client,
                timestamp: now,
            });
        }
        let level_ups = self.level_up();

        let mut report = ChoiceReport {
            outcome,
            level_ups,
            session: None,
            content_error: None,
            next: View::Idle,
        };
        match (&report.outcome.transition, status) {
            (Transition::Combat, _) => {
                if let Phase::Dialogue(session) = self.take_phase() {
                    self.begin_combat(*session, 1, 0);
                }
            }
            (Transition::Aborted(message), _) => {
                warn!(%message, "session aborted on missing content");
                self.journal.content_fault(message.clone());
                report.content_error = Some(message.clone());
                self.take_phase();
                self.open_next_session()?;
            }
            (_, SessionStatus::Ended) => {
                if let Phase::Dialogue(session) = self.take_phase() {
                    report.session = Some(self.close_session(*session)?);
                }
                self.open_next_session()?;
            }
            _ => {}
        }
        self.check_bounds()?;
        report.next = self.current_view();
        Ok(report)
    }

    /// Resolve one combat action.
    pub fn combat_action(&mut self, action: CombatAction) -> SessionResult<CombatReport> {
        let fight = match &mut self.phase {
            Phase::Combat(fight) => fight,
            Phase::Finished(_) => return Err(InvalidAction::RunFinished.into()),
            _ => return Err(InvalidAction::NotInCombat.into()),
        };
        let mut ctx = CombatContext {
            profile: &mut self.profile,
            encounter: &mut fight.session.encounter,
            items: &self.catalog.items,
        };
        let events = fight.combat.act(&action, &mut ctx, &mut self.roller)?;
        let client = fight.combat.client_name().to_string();
        let attempt = fight.combat.attempt();
        let outcome = fight.combat.outcome();
        let (sanity, chaos) = (fight.combat.sanity(), fight.combat.chaos());

        let now = Utc::now();
        for event in &events {
            self.journal.append(JournalEntry::CombatTurn {
                client: client.clone(),
                text: event.to_string(),
                timestamp: now,
            });
            if let CombatEvent::ItemUsed { item, change, .. } = event {
                self.journal.append(JournalEntry::ItemUsed {
                    item: item.clone(),
                    change: change.to_string(),
                    remaining: self.profile.inventory.uses(item),
                    timestamp: now,
                });
            }
        }

        let mut report = CombatReport {
            events,
            sanity,
            chaos,
            outcome,
            restarted: false,
            session: None,
            next: View::Idle,
        };
        match outcome {
            CombatOutcome::Ongoing => {}
            CombatOutcome::Victory => {
                self.journal.append(JournalEntry::CombatResolved {
                    client,
                    victory: true,
                    attempt,
                    timestamp: now,
                });
                if let Phase::Combat(fight) = self.take_phase() {
                    let mut session = fight.session;
                    session.engine.finish();
                    report.session = Some(self.close_session(session)?);
                }
                self.open_next_session()?;
            }
            CombatOutcome::Defeat => {
                self.journal.append(JournalEntry::CombatResolved {
                    client,
                    victory: false,
                    attempt,
                    timestamp: now,
                });
                if let Phase::Combat(fight) = self.take_phase() {
                    let defeats = fight.defeats + 1;
                    if defeats >= self.config.combat.max_defeats.max(1) {
                        warn!(client = %fight.session.encounter.client_id, defeats, "therapist melted down");
                        self.profile.flags.set(MELTED_DOWN);
                        self.finish(EndReason::Meltdown);
                    } else {
                        self.begin_combat(fight.session, attempt + 1, defeats);
                        report.restarted = true;
                    }
                }
            }
        }
        self.check_bounds()?;
        report.next = self.current_view();
        Ok(report)
    }

    /// Use an inventory item.
    ///
    /// Outside combat this costs nothing. In combat it is the `UseItem`
    /// action and the client gets its turn.
    pub fn use_item(&mut self, item_id: &str) -> SessionResult<ItemReport> {
        if self.is_finished() {
            return Err(InvalidAction::RunFinished.into());
        }
        let item = self.catalog.item(item_id)?.clone();
        if !matches!(self.phase, Phase::Combat(_)) {
            let used = self.profile.use_item(&item)?;
            self.journal.append(JournalEntry::ItemUsed {
                item: used.item_id.clone(),
                change: used.change.to_string(),
                remaining: used.remaining,
                timestamp: Utc::now(),
            });
            debug!(item = %used.item_id, remaining = used.remaining, "item used");
            self.check_bounds()?;
            return Ok(ItemReport { used, combat: None });
        }

        let report = self.combat_action(CombatAction::UseItem(item.id.clone()))?;
        let used = report
            .events
            .iter()
            .find_map(|event| match event {
                CombatEvent::ItemUsed { item, change, .. } => Some(ItemUse {
                    item_id: item.clone(),
                    change: *change,
                    remaining: self.profile.inventory.uses(item),
                }),
                _ => None,
            })
            .ok_or_else(|| SessionError::Content(format!("item '{}' had no effect", item.id)))?;
        Ok(ItemReport {
            used,
            combat: Some(report),
        })
    }

    /// End the run now and resolve the ending on the current state.
    ///
    /// An unfinished session is abandoned without rewards. Calling this on
    /// a finished run returns the existing ending.
    pub fn request_ending_now(&mut self) -> Ending {
        if let Some(ending) = self.ending() {
            return ending.clone();
        }
        self.finish(EndReason::Requested)
    }

    fn check_bounds(&self) -> SessionResult<()> {
        let checked = self.profile.verify_bounds();
        debug_assert!(checked.is_ok(), "profile out of bounds: {checked:?}");
        checked.map_err(SessionError::from)
    }

    fn take_phase(&mut self) -> Phase {
        std::mem::replace(&mut self.phase, Phase::Idle)
    }

    fn level_up(&mut self) -> Vec<LevelUp> {
        let ups = apply_level_ups(&self.config.progression, &self.class, &mut self.profile);
        for up in &ups {
            self.journal.append(JournalEntry::LevelUp {
                level: up.level,
                changes: up.changes.iter().map(ToString::to_string).collect(),
                timestamp: Utc::now(),
            });
        }
        ups
    }

    fn begin_combat(&mut self, session: OpenSession, attempt: u32, defeats: u32) {
        let combat = CombatSession::start(
            &self.profile,
            &session.encounter,
            attempt,
            self.config.combat.clone(),
        );
        for event in &combat.log {
            self.journal.append(JournalEntry::CombatTurn {
                client: session.encounter.client_name.clone(),
                text: event.to_string(),
                timestamp: Utc::now(),
            });
        }
        self.phase = Phase::Combat(Box::new(Fight {
            session,
            combat,
            defeats,
        }));
    }

    fn close_session(&mut self, session: OpenSession) -> SessionResult<SessionClose> {
        let record = SessionRecord {
            life_changing: session.engine.had_life_changing_breakthrough(),
            challenged: session.engine.was_challenged(),
            final_absurdity: session.encounter.absurdity,
        };
        let rewards = award_session(
            &self.config.progression,
            record,
            &mut self.profile,
            &self.catalog.items,
            &mut self.roller,
        );
        self.journal.append(JournalEntry::SessionCompleted {
            client: session.encounter.client_name.clone(),
            xp: rewards.xp,
            reputation: rewards.reputation,
            item_found: rewards.item_found.clone(),
            timestamp: Utc::now(),
        });
        info!(client = %session.encounter.client_id, xp = rewards.xp, "session completed");

        let advance = self
            .progression
            .complete_client(&self.catalog, &mut self.profile)?;
        if let Some(adv) = &advance {
            let mut bonus: Vec<String> = Vec::new();
            if adv.xp > 0 {
                bonus.push(format!("XP +{}", adv.xp));
            }
            if adv.reputation > 0 {
                bonus.push(format!("Reputation +{}", adv.reputation));
            }
            bonus.extend(adv.changes.iter().map(ToString::to_string));
            bonus.extend(adv.items.iter().cloned());
            self.journal.append(JournalEntry::LocationAdvanced {
                location: adv.to_name.clone(),
                bonus: bonus.join(", "),
                timestamp: Utc::now(),
            });
        }
        let level_ups = self.level_up();

        Ok(SessionClose {
            client_id: session.encounter.client_id,
            rewards,
            level_ups,
            advance,
        })
    }

    /// Open the next client's session, or end the run when the career is
    /// complete or the pool is empty. Clients with broken trees are skipped.
    fn open_next_session(&mut self) -> SessionResult<()> {
        loop {
            if self.progression.is_finished() {
                self.finish(EndReason::CareerComplete);
                return Ok(());
            }
            let Some(client) = self.progression.next_client(&self.catalog).cloned() else {
                self.finish(EndReason::ContentExhausted);
                return Ok(());
            };
            self.progression.mark_visited(&client.id);
            let location = self.progression.current_location(&self.catalog)?;

            let engine = match DialogueEngine::enter(&client) {
                Ok(engine) => engine,
                Err(err) => {
                    warn!(client = %client.id, error = %err, "skipping client");
                    self.journal.content_fault(err.to_string());
                    continue;
                }
            };
            let encounter = Encounter::new(&client, location);
            self.journal.append(JournalEntry::SessionStarted {
                client: client.name.clone(),
                location: location.name.clone(),
                absurdity: encounter.absurdity,
                timestamp: Utc::now(),
            });
            let session = OpenSession {
                engine,
                encounter,
                location_name: location.name.clone(),
            };
            if session.engine.is_active() {
                self.phase = Phase::Dialogue(Box::new(session));
                return Ok(());
            }
            self.close_session(session)?;
        }
    }

    fn finish(&mut self, reason: EndReason) -> Ending {
        let ending = EndingResolver::new(&self.catalog.endings).resolve(&self.profile);
        info!(run = %self.id, ending = %ending.id, %reason, "run ended");
        self.journal.append(JournalEntry::RunEnded {
            ending: ending.to_string(),
            reason,
            timestamp: Utc::now(),
        });
        self.end_reason = Some(reason);
        self.phase = Phase::Finished(ending.clone());
        ending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsim_core::flags::{BREAKTHROUGHS, HEATED_ARGUMENTS};
    use tsim_core::{
        Choice, Client, Condition, DialogueNode, DialogueTree, EndingRule,
        EndingTier, ItemDefinition, Location, Stat, StageBonus, StatBlock, StatDeltas,
    };
    use tsim_mechanics::{CombatRules, ScriptedRolls};

    use crate::config::ProgressionRules;

    fn location(id: &str, name: &str, order: u32, clients: &[&str], required: u32) -> Location {
        Location {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            order,
            clients: clients.iter().map(|c| c.to_string()).collect(),
            clients_required: required,
            difficulty_modifier: 0,
            effect_bonuses: Default::default(),
            stage_bonus: StageBonus::default(),
        }
    }

    fn client(id: &str, location: &str, absurdity: u32, resistance: u32, tree: DialogueTree) -> Client {
        Client {
            id: id.to_string(),
            name: id.to_uppercase(),
            location: location.to_string(),
            absurdity,
            resistance,
            dialogue: tree,
            combat_flavor: "The appliances unionize.".to_string(),
        }
    }

    fn catalog() -> ContentCatalog {
        let toaster = DialogueTree::new("start").with_node(
            DialogueNode::new("start", "The toaster speaks.")
                .as_combat_trigger()
                .with_choice(Choice::new("That's concerning", ApproachType::Empathetic)),
        );
        let mime = DialogueTree::new("start")
            .with_node(
                DialogueNode::new("start", "She mimes a box.")
                    .with_choice(Choice::new("Wait it out", ApproachType::Patient).with_next("end")),
            )
            .with_node(DialogueNode::new("end", "She bows.").as_terminal());
        let oracle = DialogueTree::new("start").with_node(
            DialogueNode::new("start", "The oracle stares.")
                .with_choice(Choice::new("Nod", ApproachType::Dismissive)),
        );
        let mut tower = location("tower", "Tower", 1, &["oracle"], 1);
        tower.stage_bonus.xp = 1;

        ContentCatalog {
            classes: vec![ClassDefinition {
                id: "counselor".to_string(),
                name: "Counselor".to_string(),
                description: String::new(),
                base_stats: StatBlock::new(5, 8, 3, 6),
                ability: "fake_sincerity".to_string(),
                level_up: StatDeltas::new().with(Stat::Empathy, 1).with(Stat::Composure, 1),
            }],
            locations: vec![location("clinic", "Clinic", 0, &["toaster", "mime"], 2), tower],
            clients: vec![
                client("toaster", "clinic", 3, 1, toaster),
                client("mime", "clinic", 6, 2, mime),
                client("oracle", "tower", 2, 1, oracle),
            ],
            items: vec![ItemDefinition {
                id: "coffee".to_string(),
                name: "Coffee".to_string(),
                description: String::new(),
                restores: Stat::Composure,
                amount: 2,
                max_uses: 1,
            }],
            endings: vec![EndingRule {
                id: "breakdown".to_string(),
                title: "Mental Breakdown".to_string(),
                summary: "It was too much.".to_string(),
                flavor: String::new(),
                tier: EndingTier::Catastrophic,
                condition: Condition::FlagSet {
                    flag: MELTED_DOWN.to_string(),
                },
            }],
            starting_inventory: [("coffee".to_string(), 1)].into_iter().collect(),
        }
    }

    fn config() -> RunConfig {
        RunConfig::default().with_progression(ProgressionRules::default().with_item_find(0, 0))
    }

    fn run_with(rolls: ScriptedRolls, config: RunConfig) -> Run<ScriptedRolls> {
        Run::with_roller(catalog(), "counselor", config, rolls).unwrap()
    }

    /// Toaster session: one choice into combat, one strike to win.
    fn win_first_fight(run: &mut Run<ScriptedRolls>) -> CombatReport {
        run.submit_choice(0).unwrap();
        run.combat_action(CombatAction::EmpathySupport).unwrap()
    }

    #[test]
    fn run_opens_first_client() {
        let run = run_with(ScriptedRolls::new([]), config());
        match run.current_view() {
            View::Dialogue {
                client,
                location,
                choices,
                absurdity,
                ..
            } => {
                assert_eq!(client, "TOASTER");
                assert_eq!(location, "Clinic");
                assert_eq!(choices, vec!["That's concerning".to_string()]);
                assert_eq!(absurdity, 3);
            }
            other => panic!("expected dialogue, got {other:?}"),
        }
        assert_eq!(run.profile().inventory.uses("coffee"), 1);
        assert_eq!(run.profile().ability, "fake_sincerity");
    }

    #[test]
    fn combat_trigger_then_victory_completes_session() {
        let mut run = run_with(ScriptedRolls::new([3]), config());

        let report = run.submit_choice(0).unwrap();
        assert!(report.outcome.breakthrough);
        assert_eq!(run.profile().flags.count(BREAKTHROUGHS), 1);
        match &report.next {
            View::Combat { sanity, chaos, attempt, .. } => {
                assert_eq!(sanity.current(), 11);
                assert_eq!(chaos.current(), 2);
                assert_eq!(*attempt, 1);
            }
            other => panic!("expected combat, got {other:?}"),
        }

        let report = run.combat_action(CombatAction::EmpathySupport).unwrap();
        assert_eq!(report.outcome, CombatOutcome::Victory);
        let closed = report.session.unwrap();
        assert_eq!(closed.client_id, "toaster");
        assert_eq!(closed.rewards.xp, 4);
        assert_eq!(closed.level_ups.len(), 1);
        // empathy 8 +1 choice +1 victory +1 level
        assert_eq!(run.profile().stat(Stat::Empathy), 11);
        // composure 6 +1 recovery +1 level
        assert_eq!(run.profile().stat(Stat::Composure), 8);
        assert_eq!(run.profile().xp, 6);
        assert!(matches!(report.next, View::Dialogue { ref client, .. } if client == "MIME"));
    }

    #[test]
    fn full_career_reaches_the_end() {
        let mut run = run_with(ScriptedRolls::new([3]), config());
        win_first_fight(&mut run);

        let report = run.submit_choice(0).unwrap();
        let closed = report.session.unwrap();
        let advance = closed.advance.unwrap();
        assert_eq!(advance.to, "tower");
        assert_eq!(advance.xp, 1);
        assert_eq!(run.profile().xp, 11);
        assert_eq!(run.profile().level, 2);
        assert!(matches!(report.next, View::Dialogue { ref location, .. } if location == "Tower"));

        let report = run.submit_choice(0).unwrap();
        assert!(report.next.is_finished());
        assert_eq!(run.end_reason(), Some(EndReason::CareerComplete));
        assert_eq!(run.ending().map(|e| e.id.as_str()), Some("quiet_exit"));
        assert!(matches!(
            run.submit_choice(0),
            Err(SessionError::InvalidAction(InvalidAction::RunFinished))
        ));
    }

    #[test]
    fn repeated_defeats_melt_the_therapist_down() {
        let rules = CombatRules::default().with_max_sanity(1);
        let mut run = run_with(
            ScriptedRolls::new([1, 6, 1, 6, 1, 6]),
            config().with_combat(rules),
        );
        run.submit_choice(0).unwrap();

        let report = run.combat_action(CombatAction::PatientListening).unwrap();
        assert_eq!(report.outcome, CombatOutcome::Defeat);
        assert!(report.restarted);
        assert_eq!(run.profile().stat(Stat::Composure), 5);
        match &report.next {
            View::Combat { attempt, chaos, .. } => {
                assert_eq!(*attempt, 2);
                // absurdity 1 + 1 after defeat, resistance 1
                assert_eq!(chaos.current(), 3);
            }
            other => panic!("expected combat, got {other:?}"),
        }

        run.combat_action(CombatAction::PatientListening).unwrap();
        let report = run.combat_action(CombatAction::PatientListening).unwrap();
        assert!(!report.restarted);
        assert!(run.profile().flags.is_set(MELTED_DOWN));
        assert_eq!(run.profile().stat(Stat::Composure), 3);
        assert_eq!(run.end_reason(), Some(EndReason::Meltdown));
        assert_eq!(run.ending().map(|e| e.title.as_str()), Some("Mental Breakdown"));
    }

    #[test]
    fn wrong_phase_actions_are_rejected() {
        let mut run = run_with(ScriptedRolls::new([]), config());
        assert!(matches!(
            run.combat_action(CombatAction::EmpathySupport),
            Err(SessionError::InvalidAction(InvalidAction::NotInCombat))
        ));
        run.submit_choice(0).unwrap();
        assert!(matches!(
            run.submit_choice(0),
            Err(SessionError::InvalidAction(InvalidAction::InCombat))
        ));
    }

    #[test]
    fn invalid_choice_changes_nothing() {
        let mut run = run_with(ScriptedRolls::new([]), config());
        let before = run.profile().clone();
        assert!(matches!(
            run.submit_choice(3),
            Err(SessionError::InvalidAction(InvalidAction::InvalidChoice { index: 3, count: 1 }))
        ));
        assert_eq!(run.profile(), &before);
    }

    #[test]
    fn item_outside_combat_is_free_and_runs_out() {
        let mut run = run_with(ScriptedRolls::new([]), config());
        let report = run.use_item("coffee").unwrap();
        assert_eq!(report.used.change.after, 8);
        assert_eq!(report.used.remaining, 0);
        assert!(report.combat.is_none());

        let err = run.use_item("coffee").unwrap_err();
        assert!(matches!(err, SessionError::EmptyInventory(ref id) if id == "coffee"));
        assert_eq!(run.profile().inventory.uses("coffee"), 0);
        assert_eq!(run.profile().stat(Stat::Composure), 8);
        assert!(matches!(run.use_item("ghost"), Err(SessionError::Content(_))));
    }

    #[test]
    fn item_in_combat_takes_a_turn() {
        let mut run = run_with(ScriptedRolls::new([2]), config());
        run.submit_choice(0).unwrap();

        let report = run.use_item("coffee").unwrap();
        let combat = report.combat.unwrap();
        assert_eq!(combat.outcome, CombatOutcome::Ongoing);
        assert!(combat
            .events
            .iter()
            .any(|e| matches!(e, CombatEvent::CounterAttack { .. })));
        // 11 + 2 restored - 2 counter
        assert_eq!(combat.sanity.current(), 11);
        assert_eq!(report.used.remaining, 0);
    }

    #[test]
    fn challenge_costs_reputation_at_session_end() {
        let mut catalog = catalog();
        catalog.clients[0].dialogue.nodes[0].triggers_combat = false;
        catalog.clients[0].dialogue.nodes[0].choices[0].approach = ApproachType::Challenging;
        let mut run = Run::with_roller(catalog, "counselor", config(), ScriptedRolls::new([])).unwrap();

        let report = run.submit_choice(0).unwrap();
        let closed = report.session.unwrap();
        assert_eq!(closed.rewards.reputation, -1);
        assert_eq!(run.profile().flags.count(HEATED_ARGUMENTS), 1);
        assert_eq!(run.profile().reputation, 9);
    }

    #[test]
    fn broken_client_is_skipped() {
        let mut run = run_with(ScriptedRolls::new([3]), config());
        run.catalog.clients[1].dialogue.root = "missing".to_string();

        let report = win_first_fight(&mut run);
        assert!(report.next.is_finished());
        assert_eq!(run.end_reason(), Some(EndReason::ContentExhausted));
        assert!(
            run.journal()
                .entries()
                .iter()
                .any(|e| matches!(e, JournalEntry::ContentFault { .. }))
        );
        assert_eq!(run.progression().completed_at("clinic"), 1);
    }

    #[test]
    fn dangling_choice_ends_session_but_keeps_deltas() {
        let mut run = run_with(ScriptedRolls::new([3]), config());
        run.catalog.clients[1].dialogue.nodes[0].choices[0].next = Some("void".to_string());
        win_first_fight(&mut run);
        let patience = run.profile().stat(Stat::Patience);

        let report = run.submit_choice(0).unwrap();
        assert!(report.content_error.is_some());
        assert!(report.session.is_none());
        assert_eq!(run.profile().stat(Stat::Patience), patience + 1);
        assert_eq!(run.progression().completed_at("clinic"), 1);
        assert_eq!(run.end_reason(), Some(EndReason::ContentExhausted));
    }

    #[test]
    fn request_ending_closes_the_run() {
        let mut run = run_with(ScriptedRolls::new([]), config());
        let ending = run.request_ending_now();
        assert_eq!(ending.id, "quiet_exit");
        assert_eq!(run.end_reason(), Some(EndReason::Requested));
        assert_eq!(run.request_ending_now(), ending);
        assert!(matches!(
            run.use_item("coffee"),
            Err(SessionError::InvalidAction(InvalidAction::RunFinished))
        ));
    }

    #[test]
    fn finished_run_rejects_unknown_items_as_finished() {
        let mut run = run_with(ScriptedRolls::new([]), config());
        assert!(matches!(run.use_item("kazoo"), Err(SessionError::Content(_))));
        run.request_ending_now();
        assert!(matches!(
            run.use_item("kazoo"),
            Err(SessionError::InvalidAction(InvalidAction::RunFinished))
        ));
    }

    #[test]
    fn starting_inventory_defaults_to_max_uses() {
        let mut content = catalog();
        content.starting_inventory.clear();
        content.items[0].max_uses = 3;
        let run = Run::with_roller(content, "counselor", config(), ScriptedRolls::new([])).unwrap();
        assert_eq!(run.profile().inventory.uses("coffee"), 3);
    }

    #[test]
    fn refuses_broken_catalogs_and_unknown_classes() {
        let mut broken = catalog();
        broken.clients[0].dialogue.root = "missing".to_string();
        assert!(matches!(
            Run::start(broken, "counselor", RunConfig::default()),
            Err(SessionError::Content(_))
        ));
        assert!(matches!(
            Run::start(catalog(), "wizard", RunConfig::default()),
            Err(SessionError::Content(_))
        ));
    }

    #[test]
    fn ending_progress_follows_the_profile() {
        let mut content = catalog();
        content.endings.push(EndingRule {
            id: "celebrity".to_string(),
            title: "Celebrity".to_string(),
            summary: String::new(),
            flavor: String::new(),
            tier: EndingTier::Success,
            condition: Condition::ReputationAtLeast { value: 16 },
        });
        let mut run =
            Run::with_roller(content, "counselor", config(), ScriptedRolls::new([3])).unwrap();
        let before = run.ending_progress();
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].to_string(), "Reputation: 10/16 (Celebrity)");

        win_first_fight(&mut run);
        let after = run.ending_progress();
        assert_eq!(after[0].current, i64::from(run.profile().reputation));
        assert!(!after[0].reached());
    }

    #[test]
    fn progress_summary_tracks_clinic() {
        let mut run = run_with(ScriptedRolls::new([3]), config());
        win_first_fight(&mut run);
        let summary = run.progress_summary().unwrap();
        assert_eq!(summary.location, "Clinic");
        assert_eq!(summary.clients_completed, 1);
        assert_eq!(summary.remaining, 1);
        assert_eq!(summary.next_unlock, "Tower");
    }
}
