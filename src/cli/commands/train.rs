//! Train command - Self-play training against the rule-based expert

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    cli::output::print_training_summary,
    config::TrainerConfig,
    pipeline::{ProgressObserver, Trainer, TrainingSummary},
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingSummary,
    config: &'a TrainerConfig,
}

pub(crate) fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separators or a missing file name mean a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Build a trainer from an optional TOML file, with `seed` taking precedence
pub(crate) fn build_trainer(config_path: Option<&Path>, seed: Option<u64>) -> Result<Trainer> {
    let mut config = match config_path {
        Some(path) => {
            log::info!("loading configuration from {}", path.display());
            TrainerConfig::load(path)?
        }
        None => TrainerConfig::default(),
    };
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    Ok(Trainer::new(config)?)
}

/// Train the agent and report per-interval progress through the log
pub(crate) fn run_training(
    trainer: &mut Trainer,
    episodes: usize,
    progress: bool,
) -> Result<TrainingSummary> {
    if progress {
        trainer.add_observer(Box::new(ProgressObserver::new()));
    }

    let mut log_progress = |episode: usize, mean_reward: f64, win_rate: f64| {
        log::info!("episode {episode}: mean reward {mean_reward:.2}, win rate {win_rate:.1}%");
    };
    let (_, summary) = trainer.train_with_summary(episodes, Some(&mut log_progress))?;
    Ok(summary)
}

#[derive(Parser, Debug)]
#[command(about = "Train the agent by self-play against the expert")]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 10_000)]
    pub episodes: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML file overriding hyperparameters, rewards and schedule
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let mut trainer = build_trainer(args.config.as_deref(), args.seed)?;

    println!("Training for {} episodes", args.episodes);
    let summary = run_training(&mut trainer, args.episodes, !args.no_progress)?;
    print_training_summary(&summary);

    if let Some(raw) = &args.summary {
        let summary_path = sanitize_summary_path(raw);
        if summary_path != *raw {
            println!("\nNormalizing summary path to {}", summary_path.display());
        }
        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&summary_path)?;
        to_writer_pretty(
            file,
            &TrainingSummaryFile {
                training: &summary,
                config: trainer.config(),
            },
        )?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}
