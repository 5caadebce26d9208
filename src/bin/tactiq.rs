//! tactiq CLI - Self-play Q-learning for Tic-Tac-Toe
//!
//! This CLI provides:
//! - Training the agent against the rule-based expert
//! - Evaluating the learned policy against fixed opponents
//! - Playing against the agent on the console
//!
//! Set `RUST_LOG=info` (or `debug`) to see training progress in the log.

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tactiq")]
#[command(version, about = "Tabular Q-learning for Tic-Tac-Toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent by self-play
    Train(tactiq::cli::commands::train::TrainArgs),

    /// Train, then evaluate against an opponent
    Evaluate(tactiq::cli::commands::evaluate::EvaluateArgs),

    /// Train, then play against the agent
    Play(tactiq::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => tactiq::cli::commands::train::execute(args),
        Commands::Evaluate(args) => tactiq::cli::commands::evaluate::execute(args),
        Commands::Play(args) => tactiq::cli::commands::play::execute(args),
    }
}
