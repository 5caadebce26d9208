//! Evaluate command - Train, then measure the greedy policy against an opponent

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::{
    cli::{
        commands::train::{build_trainer, run_training},
        output::{format_number, format_rate, print_kv, print_section, print_training_summary},
    },
    pipeline::OpponentType,
    q_learning::{AGENT_PLAYER, OPPONENT_PLAYER},
    tictactoe::Player,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FirstPlayerArg {
    /// The agent opens, as in training
    Agent,
    /// The opponent opens
    Opponent,
}

impl From<FirstPlayerArg> for Player {
    fn from(arg: FirstPlayerArg) -> Self {
        match arg {
            FirstPlayerArg::Agent => AGENT_PLAYER,
            FirstPlayerArg::Opponent => OPPONENT_PLAYER,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OpponentArg {
    /// Rule-based expert (block, win, positional priority)
    Expert,
    /// Uniform random legal moves
    Random,
}

impl From<OpponentArg> for OpponentType {
    fn from(arg: OpponentArg) -> Self {
        match arg {
            OpponentArg::Expert => OpponentType::Expert,
            OpponentArg::Random => OpponentType::Random,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the agent, then evaluate it against an opponent")]
pub struct EvaluateArgs {
    /// Number of training episodes before evaluation
    #[arg(long, short = 'e', default_value_t = 10_000)]
    pub episodes: usize,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Opponent to evaluate against
    #[arg(long, short = 'o', value_enum, default_value = "expert")]
    pub opponent: OpponentArg,

    /// Which side opens each evaluation game
    #[arg(long, value_enum, default_value = "agent")]
    pub first_player: FirstPlayerArg,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML file overriding hyperparameters, rewards and schedule
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let mut trainer = build_trainer(args.config.as_deref(), args.seed)?;

    println!("Training for {} episodes", args.episodes);
    let summary = run_training(&mut trainer, args.episodes, !args.no_progress)?;
    print_training_summary(&summary);

    let opponent_type = OpponentType::from(args.opponent);
    let mut opponent = opponent_type.build();
    log::info!(
        "evaluating over {} games against {}",
        args.games,
        opponent_type.label()
    );
    let result = trainer.evaluate_with_first_player(
        opponent.as_mut(),
        args.games,
        args.first_player.into(),
    )?;

    print_section(&format!("Evaluation vs {}", result.opponent));
    print_kv("Games", &format_number(result.games));
    print_kv("First player", &result.first_player.to_string());
    print_kv(
        "Wins",
        &format!("{} ({})", result.wins, format_rate(result.win_rate())),
    );
    print_kv(
        "Draws",
        &format!("{} ({})", result.draws, format_rate(result.draw_rate())),
    );
    print_kv(
        "Losses",
        &format!("{} ({})", result.losses, format_rate(result.loss_rate())),
    );
    print_kv(
        "Informed moves",
        &format!("{} of {}", result.informed_moves, result.agent_moves),
    );

    Ok(())
}
