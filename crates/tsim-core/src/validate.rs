//! Structural validation of a content catalog.
//!
//! Errors make a catalog unplayable; warnings flag content that will play
//! but probably not as the author meant.

use std::collections::BTreeSet;

use crate::catalog::{Client, ContentCatalog};
use crate::stat::StatBounds;

/// A warning or error found in a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// What the issue is about, e.g. `client 'toaster'`.
    pub subject: String,
    /// Human-readable description.
    pub message: String,
    /// Error (true) or warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    fn error(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            is_error: true,
        }
    }

    fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            is_error: false,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.subject, self.message)
    }
}

/// Validate a catalog against the default stat bounds.
pub fn validate_catalog(catalog: &ContentCatalog) -> Vec<ValidationIssue> {
    validate_catalog_with(catalog, StatBounds::default())
}

/// Validate a catalog, checking class stats against `bounds`.
pub fn validate_catalog_with(catalog: &ContentCatalog, bounds: StatBounds) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if catalog.classes.is_empty() {
        issues.push(ValidationIssue::error("catalog", "no classes defined"));
    }
    if catalog.locations.is_empty() {
        issues.push(ValidationIssue::error("catalog", "no locations defined"));
    }
    if catalog.endings.is_empty() {
        issues.push(ValidationIssue::warning(
            "catalog",
            "no endings defined; every run ends in the default",
        ));
    }

    check_duplicates("class", catalog.classes.iter().map(|c| c.id.as_str()), &mut issues);
    check_duplicates("location", catalog.locations.iter().map(|l| l.id.as_str()), &mut issues);
    check_duplicates("client", catalog.clients.iter().map(|c| c.id.as_str()), &mut issues);
    check_duplicates("item", catalog.items.iter().map(|i| i.id.as_str()), &mut issues);
    check_duplicates("ending", catalog.endings.iter().map(|e| e.id.as_str()), &mut issues);

    for class in &catalog.classes {
        for (stat, value) in class.base_stats.iter() {
            if !bounds.contains(value) {
                issues.push(ValidationIssue::error(
                    format!("class '{}'", class.id),
                    format!(
                        "base {stat} {value} outside [{}, {}]",
                        bounds.min, bounds.max
                    ),
                ));
            }
        }
    }

    let item_known = |id: &str| catalog.items.iter().any(|i| i.id == id);

    for location in &catalog.locations {
        let subject = format!("location '{}'", location.id);
        for client in &location.clients {
            if catalog.client(client).is_err() {
                issues.push(ValidationIssue::error(
                    &subject,
                    format!("pool names unknown client '{client}'"),
                ));
            }
        }
        for item in &location.stage_bonus.items {
            if !item_known(item) {
                issues.push(ValidationIssue::error(
                    &subject,
                    format!("stage bonus names unknown item '{item}'"),
                ));
            }
        }
        if location.clients_required as usize > location.clients.len() {
            issues.push(ValidationIssue::warning(
                &subject,
                format!(
                    "requires {} clients but its pool has {}",
                    location.clients_required,
                    location.clients.len()
                ),
            ));
        }
    }

    for (item, &uses) in &catalog.starting_inventory {
        match catalog.item(item) {
            Err(_) => issues.push(ValidationIssue::error(
                "starting inventory",
                format!("unknown item '{item}'"),
            )),
            Ok(def) if uses > def.max_uses => issues.push(ValidationIssue::error(
                "starting inventory",
                format!("{uses} uses of '{item}' exceed its max_uses {}", def.max_uses),
            )),
            Ok(_) => {}
        }
    }

    for client in &catalog.clients {
        if catalog.location(&client.location).is_err() {
            issues.push(ValidationIssue::warning(
                format!("client '{}'", client.id),
                format!("belongs to unknown location '{}'", client.location),
            ));
        }
        validate_dialogue(client, &mut issues);
    }

    issues
}

fn check_duplicates<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            issues.push(ValidationIssue::error(
                format!("{kind} '{id}'"),
                "duplicate id",
            ));
        }
    }
}

fn validate_dialogue(client: &Client, issues: &mut Vec<ValidationIssue>) {
    let tree = &client.dialogue;
    let subject = format!("client '{}'", client.id);

    if tree.root_index().is_none() {
        issues.push(ValidationIssue::error(
            &subject,
            format!("dialogue root '{}' not found", tree.root),
        ));
    }

    check_duplicates(
        &format!("{subject} node"),
        tree.nodes.iter().map(|n| n.id.as_str()),
        issues,
    );

    for node in &tree.nodes {
        if node.choices.is_empty() && !node.terminal {
            issues.push(ValidationIssue::warning(
                &subject,
                format!("node '{}' has no choices but is not marked terminal", node.id),
            ));
        }
        for choice in &node.choices {
            let dangling = choice
                .next
                .as_deref()
                .filter(|next| tree.resolve(next).is_none());
            if let Some(next) = dangling {
                issues.push(ValidationIssue::error(
                    &subject,
                    format!(
                        "choice '{}' in node '{}' leads to unknown node '{next}'",
                        choice.label, node.id
                    ),
                ));
            }
        }
    }

    if tree.root_index().is_some() {
        let reachable: BTreeSet<&str> = tree.reachable().into_iter().collect();
        for node in &tree.nodes {
            if !reachable.contains(node.id.as_str()) {
                issues.push(ValidationIssue::warning(
                    &subject,
                    format!("node '{}' is unreachable", node.id),
                ));
            }
        }
    }
}
