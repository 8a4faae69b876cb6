//! The dialogue-tree walker.
//!
//! A [`DialogueEngine`] holds the cursor into one client's tree. Each call to
//! [`DialogueEngine::choose`] resolves a choice in a fixed order: stat deltas,
//! absurdity, flags, crisis, breakthrough, then the transition.

use tracing::{debug, info, warn};

use tsim_core::flags::BREAKTHROUGHS;
use tsim_core::{
    ApproachType, Choice, Client, CoreError, DialogueNode, Encounter, Location, NodeIndex,
    StatChange, StatProfile,
};

use crate::effect::ApproachEffect;
use crate::error::{DialogueError, DialogueResult};
use crate::policy::{Complication, DialoguePolicy};

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Waiting for a choice.
    Active,
    /// The conversation broke down into combat.
    Escalated,
    /// The conversation is over.
    Ended,
}

/// What happens after a choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved to the named node; the session continues.
    Node(String),
    /// The session ended normally.
    SessionEnd,
    /// The client broke down; combat begins.
    Combat,
    /// The choice pointed at a node that does not exist. The session ended.
    Aborted(String),
}

/// Mutable state a choice acts on.
pub struct ChoiceContext<'a> {
    /// The therapist.
    pub profile: &'a mut StatProfile,
    /// The client's live state.
    pub encounter: &'a mut Encounter,
    /// Where the session takes place.
    pub location: &'a Location,
    /// Tuning.
    pub policy: &'a DialoguePolicy,
}

/// Everything one choice did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOutcome {
    /// The chosen label.
    pub label: String,
    /// The chosen approach.
    pub approach: ApproachType,
    /// Stat changes that actually happened.
    pub changes: Vec<StatChange>,
    /// Absurdity before the choice.
    pub absurdity_before: u32,
    /// Absurdity after the choice.
    pub absurdity_after: u32,
    /// The crisis complication, if one fired.
    pub complication: Option<Complication>,
    /// Whether absurdity crossed the breakthrough threshold.
    pub breakthrough: bool,
    /// The client's reply.
    pub reply: Option<String>,
    /// Where the conversation goes next.
    pub transition: Transition,
}

/// Cursor into one client's dialogue tree.
#[derive(Debug, Clone)]
pub struct DialogueEngine {
    client: Client,
    cursor: NodeIndex,
    visited: Vec<NodeIndex>,
    status: SessionStatus,
    life_changing: bool,
    challenged: bool,
}

impl DialogueEngine {
    /// Start a session at the root of `client`'s tree.
    pub fn enter(client: &Client) -> DialogueResult<Self> {
        let root = client.dialogue.root_index().ok_or_else(|| {
            CoreError::content(format!(
                "client '{}': dialogue root '{}' not found",
                client.id, client.dialogue.root
            ))
        })?;
        let mut engine = Self {
            client: client.clone(),
            cursor: root,
            visited: vec![root],
            status: SessionStatus::Active,
            life_changing: false,
            challenged: false,
        };
        if engine.node().is_some_and(DialogueNode::ends_session) {
            engine.status = SessionStatus::Ended;
        }
        info!(client = %client.id, "dialogue session started");
        Ok(engine)
    }

    /// The client being seen.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The current node.
    pub fn node(&self) -> Option<&DialogueNode> {
        self.client.dialogue.get(self.cursor)
    }

    /// Session status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether choices are accepted.
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Whether a life-changing breakthrough happened this session.
    pub fn had_life_changing_breakthrough(&self) -> bool {
        self.life_changing
    }

    /// Whether any Challenging choice was made this session.
    pub fn was_challenged(&self) -> bool {
        self.challenged
    }

    /// Ids of the nodes visited, in order.
    pub fn path(&self) -> Vec<&str> {
        self.visited
            .iter()
            .filter_map(|&idx| self.client.dialogue.get(idx))
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Labels of the choices at the current node.
    pub fn choice_labels(&self) -> Vec<&str> {
        self.node()
            .map(|n| n.choices.iter().map(|c| c.label.as_str()).collect())
            .unwrap_or_default()
    }

    /// Resolve choice `index` at the current node.
    pub fn choose(
        &mut self,
        index: usize,
        ctx: &mut ChoiceContext<'_>,
    ) -> DialogueResult<ChoiceOutcome> {
        if !self.is_active() {
            return Err(DialogueError::SessionInactive);
        }
        let node = self.node().ok_or(DialogueError::SessionInactive)?;
        let node_combat = node.triggers_combat;
        let choice: Choice = node
            .choices
            .get(index)
            .cloned()
            .ok_or(DialogueError::InvalidChoice {
                index,
                count: node.choices.len(),
            })?;
        let approach = choice.approach;
        let effect = ApproachEffect::of(approach);

        // 1. stats
        let mut deltas = effect.deltas.clone();
        deltas.merge(&choice.stat_deltas);
        let bonus = ctx.location.effect_bonus(approach);
        if bonus != 0 {
            deltas.add(approach.primary_stat(), bonus);
        }
        let changes = ctx.profile.apply_deltas(&deltas);
        if let Some(flag) = effect.flag {
            ctx.profile.flags.increment(flag);
        }
        if approach == ApproachType::Challenging {
            self.challenged = true;
        }

        // 2. absurdity
        let absurdity_before = ctx.encounter.absurdity;
        let reduction = approach
            .mastery_stat()
            .filter(|_| effect.reduces_absurdity)
            .map(|stat| ctx.policy.reduction(ctx.profile.stat(stat)))
            .unwrap_or(0);
        let shift = choice.absurdity_delta - i32::try_from(reduction).unwrap_or(i32::MAX);
        ctx.encounter.shift_absurdity(shift);

        // 3. flags
        if let Some(flag) = &choice.flag {
            ctx.profile.flags.apply(flag);
        }
        if choice.breakthrough {
            self.life_changing = true;
        }

        // 4. crisis
        let mut reply = choice.reply.clone();
        let complication = ctx
            .profile
            .any_stat_at_or_below(ctx.policy.crisis_threshold)
            .then(|| ctx.policy.complication.clone());
        match &complication {
            Some(Complication::ExtraAbsurdity(n)) => {
                ctx.encounter
                    .shift_absurdity(i32::try_from(*n).unwrap_or(i32::MAX));
            }
            Some(Complication::ForcedNegativeReply) => {
                reply = Some(ctx.policy.negative_reply.clone());
            }
            None => {}
        }

        // 5. breakthrough
        let absurdity_after = ctx.encounter.absurdity;
        let threshold = ctx.policy.breakthrough_threshold;
        let breakthrough = absurdity_before > threshold && absurdity_after <= threshold;
        if breakthrough {
            ctx.profile.flags.increment(BREAKTHROUGHS);
            ctx.profile.gain_xp(ctx.policy.breakthrough_xp);
            ctx.profile
                .adjust_reputation(i32::try_from(ctx.policy.breakthrough_rep).unwrap_or(0));
            info!(client = %self.client.id, absurdity = absurdity_after, "breakthrough");
        }

        debug!(
            client = %self.client.id,
            choice = %choice.label,
            %approach,
            absurdity_before,
            absurdity_after,
            changes = changes.len(),
            "choice resolved"
        );

        // 6. transition
        let transition = if node_combat || choice.triggers_combat {
            self.status = SessionStatus::Escalated;
            info!(client = %self.client.id, "client broke down, entering combat");
            Transition::Combat
        } else {
            self.follow(choice.next.as_deref())
        };

        Ok(ChoiceOutcome {
            label: choice.label,
            approach,
            changes,
            absurdity_before,
            absurdity_after,
            complication,
            breakthrough,
            reply,
            transition,
        })
    }

    /// Close the session, e.g. after combat resolves.
    pub fn finish(&mut self) {
        self.status = SessionStatus::Ended;
    }

    fn follow(&mut self, next: Option<&str>) -> Transition {
        let Some(next) = next else {
            self.status = SessionStatus::Ended;
            return Transition::SessionEnd;
        };
        let Some(idx) = self.client.dialogue.resolve(next) else {
            warn!(client = %self.client.id, next, "choice points at a missing node");
            self.status = SessionStatus::Ended;
            return Transition::Aborted(format!(
                "client '{}': node '{next}' not found",
                self.client.id
            ));
        };
        self.cursor = idx;
        self.visited.push(idx);
        if self.node().is_some_and(DialogueNode::ends_session) {
            self.status = SessionStatus::Ended;
        }
        Transition::Node(next.to_string())
    }
}
