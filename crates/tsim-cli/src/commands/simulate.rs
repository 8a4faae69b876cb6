use std::path::Path;

use clap::ValueEnum;
use colored::Colorize;

use tsim_session::{Run, Strategy, autoplay};

/// Actions before a simulated run is ended by request.
const MAX_STEPS: usize = 1_000;

/// `--strategy` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Always the first choice; always strike with empathy
    First,
    /// Prefer empathetic choices; listen when sanity is low
    Empathetic,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::First => Strategy::First,
            StrategyArg::Empathetic => Strategy::Empathetic,
        }
    }
}

pub fn run(
    class: &str,
    seed: Option<u64>,
    strategy: Strategy,
    journal: bool,
    content: Option<&Path>,
    config: Option<&Path>,
) -> Result<(), String> {
    let catalog = super::load_catalog(content)?;
    let config = super::load_config(config, seed)?;
    let seed = config.seed;

    let mut run =
        Run::start(catalog, class, config).map_err(|e| format!("failed to start run: {e}"))?;
    let ending = autoplay(&mut run, strategy, MAX_STEPS).map_err(|e| e.to_string())?;

    println!(
        "  {} {} {}",
        "Simulation".bold(),
        class,
        format!("(seed={seed}, strategy={strategy})").dimmed()
    );
    if let Some(reason) = run.end_reason() {
        println!("  Run ended: {reason}");
    }
    let progress = run.progress_summary().map_err(|e| e.to_string())?;
    println!("  {progress}");
    println!();
    super::print_profile(run.profile());
    println!();

    if journal {
        println!("{}", run.journal().export_markdown());
    }

    println!("  {} {}", "ENDING:".bold(), ending.title.green().bold());
    println!("  {}", ending.summary);

    Ok(())
}
