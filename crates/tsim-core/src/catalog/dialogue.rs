//! Dialogue trees stored as arenas of nodes addressed by index.

use serde::{Deserialize, Serialize};

use crate::approach::ApproachType;
use crate::flags::FlagEffect;
use crate::stat::StatDeltas;

/// Position of a node within its tree's node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(pub usize);

/// One selectable response at a dialogue node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown to the player.
    pub label: String,
    /// The therapeutic tone of the response.
    pub approach: ApproachType,
    /// Authored stat changes on top of the approach's own.
    #[serde(default)]
    pub stat_deltas: StatDeltas,
    /// Authored change to the client's absurdity.
    #[serde(default)]
    pub absurdity_delta: i32,
    /// Node to go to next; `None` ends the session.
    #[serde(default)]
    pub next: Option<String>,
    /// The client's answer to this choice.
    #[serde(default)]
    pub reply: Option<String>,
    /// Optional narrative flag mutation.
    #[serde(default)]
    pub flag: Option<FlagEffect>,
    /// Marks a life-changing breakthrough.
    #[serde(default)]
    pub breakthrough: bool,
    /// Escalates straight into combat.
    #[serde(default)]
    pub triggers_combat: bool,
}

impl Choice {
    /// A choice with no effects beyond its approach, ending the session.
    pub fn new(label: impl Into<String>, approach: ApproachType) -> Self {
        Self {
            label: label.into(),
            approach,
            stat_deltas: StatDeltas::new(),
            absurdity_delta: 0,
            next: None,
            reply: None,
            flag: None,
            breakthrough: false,
            triggers_combat: false,
        }
    }

    /// Set the node this choice leads to.
    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    /// Set the authored stat deltas.
    pub fn with_deltas(mut self, deltas: StatDeltas) -> Self {
        self.stat_deltas = deltas;
        self
    }

    /// Set the authored absurdity change.
    pub fn with_absurdity(mut self, delta: i32) -> Self {
        self.absurdity_delta = delta;
        self
    }

    /// Set the client's reply.
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }

    /// Attach a flag effect.
    pub fn with_flag(mut self, flag: FlagEffect) -> Self {
        self.flag = Some(flag);
        self
    }

    /// Mark as a life-changing breakthrough.
    pub fn as_breakthrough(mut self) -> Self {
        self.breakthrough = true;
        self
    }

    /// Mark as escalating into combat.
    pub fn as_combat_trigger(mut self) -> Self {
        self.triggers_combat = true;
        self
    }
}

/// A single beat of a client conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueNode {
    /// Unique id within the tree.
    pub id: String,
    /// What the client says or does.
    pub text: String,
    /// An optional extra line of client reply.
    #[serde(default)]
    pub reply: Option<String>,
    /// Responses available to the therapist.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Ends the session on arrival.
    #[serde(default)]
    pub terminal: bool,
    /// Any choice taken here escalates into combat.
    #[serde(default)]
    pub triggers_combat: bool,
}

impl DialogueNode {
    /// A node with text and no choices.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            reply: None,
            choices: Vec::new(),
            terminal: false,
            triggers_combat: false,
        }
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Mark as terminal.
    pub fn as_terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// Mark as a combat trigger.
    pub fn as_combat_trigger(mut self) -> Self {
        self.triggers_combat = true;
        self
    }

    /// Whether arriving here ends the session.
    pub fn ends_session(&self) -> bool {
        self.terminal || self.choices.is_empty()
    }
}

/// A client's conversation graph. Edges are node ids, so loops and shared
/// successors need no special handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueTree {
    /// Id of the entry node.
    pub root: String,
    /// The node table.
    pub nodes: Vec<DialogueNode>,
}

impl DialogueTree {
    /// A tree with the given root id and no nodes yet.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            nodes: Vec::new(),
        }
    }

    /// Add a node.
    pub fn with_node(mut self, node: DialogueNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Look up a node's index by id.
    pub fn resolve(&self, id: &str) -> Option<NodeIndex> {
        self.nodes.iter().position(|n| n.id == id).map(NodeIndex)
    }

    /// The root's index, if the root id exists.
    pub fn root_index(&self) -> Option<NodeIndex> {
        self.resolve(&self.root)
    }

    /// The node at `index`.
    pub fn get(&self, index: NodeIndex) -> Option<&DialogueNode> {
        self.nodes.get(index.0)
    }

    /// Ids of every node reachable from the root.
    pub fn reachable(&self) -> Vec<&str> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack: Vec<NodeIndex> = self.root_index().into_iter().collect();
        while let Some(idx) = stack.pop() {
            if seen[idx.0] {
                continue;
            }
            seen[idx.0] = true;
            if let Some(node) = self.get(idx) {
                for choice in &node.choices {
                    if let Some(next) = choice.next.as_deref().and_then(|id| self.resolve(id)) {
                        stack.push(next);
                    }
                }
            }
        }
        self.nodes
            .iter()
            .zip(seen)
            .filter(|(_, s)| *s)
            .map(|(n, _)| n.id.as_str())
            .collect()
    }
}
