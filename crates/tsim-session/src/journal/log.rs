//! Journal storage and export.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::entry::JournalEntry;

/// A chronological log of run events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn append(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
    }

    /// Append a content fault stamped now.
    pub fn content_fault(&mut self, message: impl Into<String>) {
        self.append(JournalEntry::ContentFault {
            message: message.into(),
            timestamp: Utc::now(),
        });
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export the journal as markdown.
    pub fn export_markdown(&self) -> String {
        let mut out = String::from("# Therapy Run Journal\n\n");
        for entry in &self.entries {
            match entry {
                JournalEntry::RunStarted { class, seed, .. } => {
                    out.push_str(&format!("**Run started** as {class} (seed {seed})\n\n"));
                }
                JournalEntry::SessionStarted {
                    client,
                    location,
                    absurdity,
                    ..
                } => {
                    out.push_str(&format!(
                        "## {client} at {location}\n\nAbsurdity: {absurdity}\n\n"
                    ));
                }
                JournalEntry::ChoiceMade {
                    choice,
                    approach,
                    changes,
                    absurdity,
                    ..
                } => {
                    let changes = if changes.is_empty() {
                        "no stat change".to_string()
                    } else {
                        changes.join(", ")
                    };
                    out.push_str(&format!(
                        "- *{approach}* \"{choice}\": {changes}; absurdity {absurdity}\n"
                    ));
                }
                JournalEntry::Complication { description, .. } => {
                    out.push_str(&format!("- Complication: {description}\n"));
                }
                JournalEntry::Breakthrough { client, .. } => {
                    out.push_str(&format!("- **Breakthrough** with {client}\n"));
                }
                JournalEntry::CombatTurn { text, .. } => {
                    out.push_str(&format!("- Combat: {text}\n"));
                }
                JournalEntry::CombatResolved {
                    victory, attempt, ..
                } => {
                    let result = if *victory { "won" } else { "lost" };
                    out.push_str(&format!("- Combat {result} (attempt {attempt})\n"));
                }
                JournalEntry::ItemUsed {
                    item,
                    change,
                    remaining,
                    ..
                } => {
                    out.push_str(&format!("- Used {item}: {change} ({remaining} left)\n"));
                }
                JournalEntry::SessionCompleted {
                    client,
                    xp,
                    reputation,
                    item_found,
                    ..
                } => {
                    out.push_str(&format!(
                        "\n**Session with {client} complete**: +{xp} XP, reputation {reputation:+}\n"
                    ));
                    if let Some(item) = item_found {
                        out.push_str(&format!("Found: {item}\n"));
                    }
                    out.push('\n');
                }
                JournalEntry::ContentFault { message, .. } => {
                    out.push_str(&format!("> Content fault: {message}\n\n"));
                }
                JournalEntry::LevelUp { level, changes, .. } => {
                    out.push_str(&format!("**Level {level}**: {}\n\n", changes.join(", ")));
                }
                JournalEntry::LocationAdvanced {
                    location, bonus, ..
                } => {
                    out.push_str(&format!("## Arrived at {location}\n\n"));
                    if !bonus.is_empty() {
                        out.push_str(&format!("Bonus: {bonus}\n\n"));
                    }
                }
                JournalEntry::RunEnded { ending, reason, .. } => {
                    out.push_str(&format!("**Run ended** ({reason}): {ending}\n"));
                }
            }
        }
        out
    }
}
