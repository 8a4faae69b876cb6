pub mod check;
pub mod classes;
pub mod endings;
pub mod play;
pub mod simulate;

use std::path::Path;

use colored::Colorize;
use strsim::jaro_winkler;
use tracing::debug;

use tsim_core::preset::therapy_1987;
use tsim_core::{ContentCatalog, ItemDefinition, Stat, StatProfile};
use tsim_session::{RunConfig, View};

/// Minimum similarity for fuzzy item names (0.0-1.0).
const FUZZY_THRESHOLD: f64 = 0.8;

/// Load a content pack, or the bundled one. Unvalidated: callers decide.
fn load_catalog_unchecked(content: Option<&Path>) -> Result<ContentCatalog, String> {
    match content {
        Some(path) => {
            debug!(path = %path.display(), "loading content pack");
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            ContentCatalog::from_json_str(&json).map_err(|e| e.to_string())
        }
        None => therapy_1987().map_err(|e| e.to_string()),
    }
}

/// Load and validate a content pack.
fn load_catalog(content: Option<&Path>) -> Result<ContentCatalog, String> {
    load_catalog_unchecked(content)?
        .validated()
        .map_err(|e| e.to_string())
}

/// Load a run config file, then apply the seed override.
fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<RunConfig, String> {
    let config = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading run config");
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            RunConfig::from_json_str(&json).map_err(|e| format!("invalid config: {e}"))?
        }
        None => RunConfig::default(),
    };
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

/// Resolve an item by id, name, or a close-enough name.
fn resolve_item<'c>(catalog: &'c ContentCatalog, input: &str) -> Option<&'c ItemDefinition> {
    if let Some(item) = catalog.find_item(input) {
        return Some(item);
    }
    let needle = input.trim().to_lowercase();
    catalog
        .items
        .iter()
        .map(|item| {
            let by_name = jaro_winkler(&needle, &item.name.to_lowercase());
            let by_id = jaro_winkler(&needle, &item.id.to_lowercase());
            (item, by_name.max(by_id))
        })
        .filter(|(_, score)| *score >= FUZZY_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(item, _)| item)
}

fn print_view(view: &View) {
    match view {
        View::Dialogue {
            client,
            location,
            text,
            reply,
            choices,
            absurdity,
        } => {
            println!(
                "  {} {}",
                client.bold(),
                format!("({location}, absurdity {absurdity})").dimmed()
            );
            println!("  {text}");
            if let Some(reply) = reply {
                println!("  {}", format!("\"{reply}\"").italic());
            }
            println!();
            for (i, label) in choices.iter().enumerate() {
                println!("  {}. {label}", i + 1);
            }
        }
        View::Combat {
            client,
            flavor,
            sanity,
            chaos,
            turn,
            attempt,
        } => {
            println!("  {} {}", "BREAKDOWN:".red().bold(), client.bold());
            if !flavor.is_empty() {
                println!("  {}", flavor.dimmed());
            }
            println!(
                "  Sanity {sanity} | Chaos {chaos} | Turn {turn} | Attempt {attempt}"
            );
            println!("  empathy | logic | patience | item <name>");
        }
        View::Finished(ending) => {
            println!("  {} {}", "ENDING:".bold(), ending.title.green().bold());
            println!("  {}", ending.summary);
            if !ending.flavor.is_empty() {
                println!("  {}", ending.flavor.dimmed());
            }
        }
        View::Idle => println!("  {}", "(between sessions)".dimmed()),
    }
}

fn print_profile(profile: &StatProfile) {
    let stats: Vec<String> = Stat::ALL
        .iter()
        .map(|s| format!("{s} {}", profile.stat(*s)))
        .collect();
    println!("  {}", stats.join(" | "));
    println!(
        "  Level {} | XP {} | Reputation {}",
        profile.level, profile.xp, profile.reputation
    );
    let items: Vec<String> = profile
        .inventory
        .available()
        .map(|(id, uses)| format!("{id} x{uses}"))
        .collect();
    if items.is_empty() {
        println!("  Inventory: {}", "empty".dimmed());
    } else {
        println!("  Inventory: {}", items.join(", "));
    }
}
