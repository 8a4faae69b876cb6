use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use tsim_mechanics::CombatAction;
use tsim_session::{ChoiceReport, CombatReport, ItemReport, Run, SessionClose};

const HELP: &str = "\
  <number>           pick a dialogue choice
  empathy | logic | patience
                     combat actions
  item <name>        use an item
  stats              show your stats and inventory
  progress           show career and ending progress
  journal            print the run journal
  end                end the run now and see your ending
  quit               leave without an ending";

pub fn run(
    class: &str,
    seed: Option<u64>,
    content: Option<&Path>,
    config: Option<&Path>,
) -> Result<(), String> {
    let catalog = super::load_catalog(content)?;
    let config = super::load_config(config, seed)?;
    let seed = config.seed;

    let mut run =
        Run::start(catalog, class, config).map_err(|e| format!("failed to start run: {e}"))?;

    println!("  {} Therapy Simulator 1987", "Starting".bold());
    println!("  Class: {class} | Seed: {seed}");
    println!("  Type 'help' for commands, 'quit' to exit.\n");
    super::print_view(&run.current_view());
    println!();

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    while !run.is_finished() {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            break;
        }

        if let Err(e) = handle(&mut run, input) {
            println!("{}\n", e.yellow());
        }
    }

    Ok(())
}

/// Apply one line of input. Errors are shown and play continues.
fn handle(run: &mut Run, input: &str) -> Result<(), String> {
    let (command, rest) = input.split_once(' ').unwrap_or((input, ""));
    match command.to_lowercase().as_str() {
        "help" | "?" => println!("{HELP}\n"),
        "stats" => {
            super::print_profile(run.profile());
            println!();
        }
        "progress" => {
            let summary = run.progress_summary().map_err(|e| e.to_string())?;
            println!("  {summary}\n");
            let endings = run.ending_progress();
            if !endings.is_empty() {
                println!("  {}", "Ending progress:".bold());
                for goal in &endings {
                    if goal.reached() {
                        println!("  {}", goal.to_string().green());
                    } else {
                        println!("  {goal}");
                    }
                }
                println!();
            }
        }
        "journal" => println!("{}", run.journal().export_markdown()),
        "end" => {
            run.request_ending_now();
            super::print_view(&run.current_view());
        }
        "item" => {
            let name = rest.trim();
            if name.is_empty() {
                return Err("usage: item <name>".to_string());
            }
            let id = super::resolve_item(run.catalog(), name)
                .map(|item| item.id.clone())
                .ok_or_else(|| format!("no item matches '{name}'"))?;
            let report = run.use_item(&id).map_err(|e| e.to_string())?;
            print_item(&report);
            print_next(run);
        }
        _ => {
            if let Ok(n) = command.parse::<usize>() {
                let index = n.checked_sub(1).ok_or("choices start at 1")?;
                let report = run.submit_choice(index).map_err(|e| e.to_string())?;
                print_choice(&report);
                print_next(run);
            } else if let Some(action) = CombatAction::parse(command) {
                let report = run.combat_action(action).map_err(|e| e.to_string())?;
                print_combat(&report);
                print_next(run);
            } else {
                return Err(format!("unknown command '{command}' (try 'help')"));
            }
        }
    }
    Ok(())
}

fn print_next(run: &Run) {
    println!();
    super::print_view(&run.current_view());
    println!();
}

fn print_choice(report: &ChoiceReport) {
    let outcome = &report.outcome;
    let changes: Vec<String> = outcome.changes.iter().map(ToString::to_string).collect();
    println!(
        "  {} {}",
        format!("[{}]", outcome.approach).cyan(),
        if changes.is_empty() {
            "no stat change".dimmed().to_string()
        } else {
            changes.join(", ")
        }
    );
    println!(
        "  Absurdity {} -> {}",
        outcome.absurdity_before, outcome.absurdity_after
    );
    if let Some(complication) = &outcome.complication {
        println!("  {} {complication}", "Complication:".red());
    }
    if let Some(reply) = &outcome.reply {
        println!("  {}", format!("\"{reply}\"").italic());
    }
    if outcome.breakthrough {
        println!("  {}", "Breakthrough!".green().bold());
    }
    for up in &report.level_ups {
        print_level(up.level, &up.changes);
    }
    if let Some(error) = &report.content_error {
        println!("  {} {error}", "The session fell apart:".yellow());
    }
    if let Some(session) = &report.session {
        print_session(session);
    }
}

fn print_combat(report: &CombatReport) {
    for event in &report.events {
        println!("  {event}");
    }
    println!("  Sanity {} | Chaos {}", report.sanity, report.chaos);
    if report.restarted {
        println!("  {}", "You pull yourself together and try again.".yellow());
    }
    if let Some(session) = &report.session {
        print_session(session);
    }
}

fn print_item(report: &ItemReport) {
    match &report.combat {
        Some(combat) => print_combat(combat),
        None => println!(
            "  Used {}: {} ({} left)",
            report.used.item_id, report.used.change, report.used.remaining
        ),
    }
}

fn print_session(close: &SessionClose) {
    let rewards = &close.rewards;
    println!();
    println!(
        "  {} +{} XP, reputation {:+}",
        "Session complete:".bold(),
        rewards.xp,
        rewards.reputation
    );
    if rewards.life_changing {
        println!("  {}", "A life-changing breakthrough!".green());
    } else if rewards.good_progress {
        println!("  Good progress.");
    }
    if let Some(change) = &rewards.composure {
        println!("  You feel steadier: {change}");
    }
    if let Some(item) = &rewards.item_found {
        println!("  Found: {item}");
    }
    for up in &close.level_ups {
        print_level(up.level, &up.changes);
    }
    if let Some(advance) = &close.advance {
        println!("  {} {}", "Moving on to".bold(), advance.to_name.bold());
    }
}

fn print_level(level: u32, changes: &[tsim_core::StatChange]) {
    let changes: Vec<String> = changes.iter().map(ToString::to_string).collect();
    println!(
        "  {} {}",
        format!("Level {level}!").green().bold(),
        changes.join(", ")
    );
}
