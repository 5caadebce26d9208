//! Play command - A console game against the trained agent
//!
//! The human plays X and moves first; the agent answers as O.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::Parser;

use crate::{
    Error,
    cli::{
        commands::train::{build_trainer, run_training},
        output::render_board,
    },
    pipeline::Trainer,
    q_learning::{AGENT_PLAYER, OPPONENT_PLAYER},
    tactics,
    tictactoe::GameOutcome,
};

#[derive(Parser, Debug)]
#[command(about = "Train the agent, then play against it on the console")]
pub struct PlayArgs {
    /// Number of training episodes before the game
    #[arg(long, short = 'e', default_value_t = 10_000)]
    pub episodes: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML file overriding hyperparameters, rewards and schedule
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let mut trainer = build_trainer(args.config.as_deref(), args.seed)?;
    println!("Training for {} episodes...", args.episodes);
    run_training(&mut trainer, args.episodes, true)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    play_session(&mut trainer, stdin.lock(), &mut stdout)?;
    Ok(())
}

/// Run one game reading the human's cells from `input`.
///
/// Returns `None` if the input ends before the game does.
pub fn play_session<R: BufRead, W: Write>(
    trainer: &mut Trainer,
    mut input: R,
    output: &mut W,
) -> Result<Option<GameOutcome>> {
    trainer.reset();
    writeln!(output, "You are {OPPONENT_PLAYER}. Enter a cell 0-8.")?;

    loop {
        write!(output, "{}", render_board(trainer.board()))?;
        if let Some(cell) = tactics::winning_move(trainer.board(), OPPONENT_PLAYER) {
            writeln!(output, "Hint: cell {cell} wins")?;
        } else if let Some(cell) = tactics::double_threat_move(trainer.board(), OPPONENT_PLAYER) {
            writeln!(output, "Hint: cell {cell} creates two threats")?;
        }
        write!(output, "Your move: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(None);
        }
        let position = match line.trim().parse::<usize>() {
            Ok(position) => position,
            Err(_) => {
                writeln!(output, "'{}' is not a cell number", line.trim())?;
                continue;
            }
        };

        match trainer.play(position, OPPONENT_PLAYER) {
            Ok(()) => {}
            Err(err @ (Error::InvalidMove { .. } | Error::InvalidPosition { .. })) => {
                writeln!(output, "{err}")?;
                continue;
            }
            Err(err) => return Err(err.into()),
        }
        if let Some(outcome) = trainer.outcome() {
            return finish(trainer, outcome, output);
        }

        let board = *trainer.board();
        let action = trainer.choose_action(&board)?;
        trainer.play(action, AGENT_PLAYER)?;
        writeln!(output, "Agent plays {action}")?;
        if let Some(outcome) = trainer.outcome() {
            return finish(trainer, outcome, output);
        }
    }
}

fn finish<W: Write>(
    trainer: &Trainer,
    outcome: GameOutcome,
    output: &mut W,
) -> Result<Option<GameOutcome>> {
    write!(output, "{}", render_board(trainer.board()))?;
    match outcome {
        GameOutcome::Win(player) if player == OPPONENT_PLAYER => writeln!(output, "You win!")?,
        GameOutcome::Win(_) => writeln!(output, "The agent wins.")?,
        GameOutcome::Draw => writeln!(output, "Draw.")?,
    }
    Ok(Some(outcome))
}
