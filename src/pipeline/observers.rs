//! Observer adapters for the training loop
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Observer, ProgressReport},
    q_learning::AGENT_PLAYER,
    tictactoe::GameOutcome,
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
    mean_reward: f64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
            mean_reward: 0.0,
        }
    }

    fn message(&self) -> String {
        format!(
            "W:{} D:{} L:{} reward {:.2}",
            self.wins, self.draws, self.losses, self.mean_reward
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, outcome: GameOutcome, _reward: f64) -> Result<()> {
        if outcome.is_win_for(AGENT_PLAYER) {
            self.wins += 1;
        } else if outcome.is_loss_for(AGENT_PLAYER) {
            self.losses += 1;
        } else {
            self.draws += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
        }
        Ok(())
    }

    fn on_progress(&mut self, report: &ProgressReport) -> Result<()> {
        self.mean_reward = report.mean_reward;
        if let Some(pb) = &self.progress_bar {
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks outcome counts and rewards
#[derive(Debug, Default)]
pub struct MetricsObserver {
    wins: usize,
    draws: usize,
    losses: usize,
    total_episodes: usize,
    total_reward: f64,
    last_report: Option<ProgressReport>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    fn rate(&self, count: usize) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            count as f64 / self.total_episodes as f64
        }
    }

    /// Get current win rate
    pub fn win_rate(&self) -> f64 {
        self.rate(self.wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }

    /// Mean reward over every observed episode
    pub fn mean_reward(&self) -> f64 {
        if self.total_episodes == 0 {
            0.0
        } else {
            self.total_reward / self.total_episodes as f64
        }
    }

    /// Most recent periodic report, if any
    pub fn last_report(&self) -> Option<&ProgressReport> {
        self.last_report.as_ref()
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_episodes: self.total_episodes,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            win_rate: self.win_rate(),
            draw_rate: self.draw_rate(),
            loss_rate: self.loss_rate(),
            mean_reward: self.mean_reward(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    pub mean_reward: f64,
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode: usize, outcome: GameOutcome, reward: f64) -> Result<()> {
        self.total_episodes += 1;
        self.total_reward += reward;
        if outcome.is_win_for(AGENT_PLAYER) {
            self.wins += 1;
        } else if outcome.is_loss_for(AGENT_PLAYER) {
            self.losses += 1;
        } else {
            self.draws += 1;
        }
        Ok(())
    }

    fn on_progress(&mut self, report: &ProgressReport) -> Result<()> {
        self.last_report = Some(*report);
        Ok(())
    }
}
