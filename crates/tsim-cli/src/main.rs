//! CLI frontend for the therapy simulator.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::simulate::StrategyArg;

#[derive(Parser)]
#[command(
    name = "tsim",
    about = "Therapy Simulator 1987: talk absurd clients down, or melt down trying",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List playable classes
    Classes {
        /// Content pack JSON (default: bundled pack)
        #[arg(long)]
        content: Option<PathBuf>,
    },

    /// List ending rules in priority order
    Endings {
        /// Content pack JSON (default: bundled pack)
        #[arg(long)]
        content: Option<PathBuf>,
    },

    /// Validate a content pack
    Check {
        /// Content pack JSON (default: bundled pack)
        #[arg(long)]
        content: Option<PathBuf>,
    },

    /// Play interactively on stdin
    Play {
        /// Class id (e.g. empath, counselor, burnout)
        #[arg(short, long)]
        class: String,

        /// RNG seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Content pack JSON (default: bundled pack)
        #[arg(long)]
        content: Option<PathBuf>,

        /// Run configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Play a run automatically to its ending
    Simulate {
        /// Class id (e.g. empath, counselor, burnout)
        #[arg(short, long)]
        class: String,

        /// RNG seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// How choices and combat actions are picked
        #[arg(long, value_enum, default_value_t = StrategyArg::First)]
        strategy: StrategyArg,

        /// Print the full journal
        #[arg(short, long)]
        journal: bool,

        /// Content pack JSON (default: bundled pack)
        #[arg(long)]
        content: Option<PathBuf>,

        /// Run configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Classes { content } => commands::classes::run(content.as_deref()),
        Commands::Endings { content } => commands::endings::run(content.as_deref()),
        Commands::Check { content } => commands::check::run(content.as_deref()),
        Commands::Play {
            class,
            seed,
            content,
            config,
        } => commands::play::run(&class, seed, content.as_deref(), config.as_deref()),
        Commands::Simulate {
            class,
            seed,
            strategy,
            journal,
            content,
            config,
        } => commands::simulate::run(
            &class,
            seed,
            strategy.into(),
            journal,
            content.as_deref(),
            config.as_deref(),
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
