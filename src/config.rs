//! Trainer configuration
//!
//! Every section deserializes with defaults, so a TOML file only needs the
//! keys it overrides:
//!
//! ```toml
//! seed = 42
//!
//! [hyperparameters]
//! learning_rate = 0.4
//!
//! [rewards]
//! block = 10.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Learning and exploration rates with their decay schedules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Initial learning rate α
    pub learning_rate: f64,
    /// Multiplicative α decay applied every `ScheduleConfig::learning_rate_decay_interval` episodes
    pub learning_rate_decay: f64,
    pub min_learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Initial exploration rate ε
    pub epsilon: f64,
    /// Multiplicative ε decay applied on every unforced agent decision
    pub epsilon_decay: f64,
    pub min_epsilon: f64,
    /// Standard deviation of the tie-breaking noise added to Q-values
    pub jitter_std_dev: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            learning_rate_decay: 0.999,
            min_learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon: 0.3,
            epsilon_decay: 0.99995,
            min_epsilon: 0.05,
            jitter_std_dev: 0.01,
        }
    }
}

/// Shaped reward magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub win: f64,
    pub loss: f64,
    /// Bonus for filling a cell the opponent needed to complete a line
    pub block: f64,
    pub draw: f64,
    pub neutral: f64,
    /// Extra update applied to the agent's last move when the opponent wins
    pub opponent_win_penalty: f64,
    /// Q-values are clamped to `[-value_bound, value_bound]`
    pub value_bound: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            win: 50.0,
            loss: -50.0,
            block: 20.0,
            draw: 1.0,
            neutral: 0.0,
            opponent_win_penalty: -15.0,
            value_bound: 50.0,
        }
    }
}

/// Largest accepted trailing statistics window
pub const MAX_STATS_WINDOW: usize = 1_000_000;

/// Episode-level cadence of decay and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub learning_rate_decay_interval: usize,
    pub progress_interval: usize,
    /// Trailing window used for the reported mean reward and win rate
    pub stats_window: usize,
    /// Win count in the window is divided by this to give the reported percentage
    pub win_rate_divisor: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            learning_rate_decay_interval: 100,
            progress_interval: 50,
            stats_window: 1000,
            win_rate_divisor: 10,
        }
    }
}

/// Complete trainer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub hyperparameters: Hyperparameters,
    pub rewards: RewardConfig,
    pub schedule: ScheduleConfig,
    /// Seed for the trainer's random source; `None` draws from the OS
    pub seed: Option<u64>,
}

impl TrainerConfig {
    /// Load and validate a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config '{}'", path.display()),
            source,
        })?;
        let config: TrainerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        let h = &self.hyperparameters;
        check_unit("hyperparameters.learning_rate", h.learning_rate)?;
        check_unit("hyperparameters.learning_rate_decay", h.learning_rate_decay)?;
        check_unit("hyperparameters.min_learning_rate", h.min_learning_rate)?;
        check_unit("hyperparameters.discount_factor", h.discount_factor)?;
        check_unit("hyperparameters.epsilon", h.epsilon)?;
        check_unit("hyperparameters.epsilon_decay", h.epsilon_decay)?;
        check_unit("hyperparameters.min_epsilon", h.min_epsilon)?;
        if !(h.jitter_std_dev.is_finite() && h.jitter_std_dev >= 0.0) {
            return Err(invalid("hyperparameters.jitter_std_dev must be finite and >= 0"));
        }
        if !(self.rewards.value_bound.is_finite() && self.rewards.value_bound > 0.0) {
            return Err(invalid("rewards.value_bound must be finite and > 0"));
        }

        let s = &self.schedule;
        if s.learning_rate_decay_interval == 0 {
            return Err(invalid("schedule.learning_rate_decay_interval must be > 0"));
        }
        if s.progress_interval == 0 {
            return Err(invalid("schedule.progress_interval must be > 0"));
        }
        if s.stats_window == 0 || s.stats_window > MAX_STATS_WINDOW {
            return Err(invalid(&format!(
                "schedule.stats_window must be in 1..={MAX_STATS_WINDOW}, got {}",
                s.stats_window
            )));
        }
        if s.win_rate_divisor == 0 {
            return Err(invalid("schedule.win_rate_divisor must be > 0"));
        }
        Ok(())
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be in [0, 1], got {value}")))
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidConfiguration {
        message: message.to_string(),
    }
}
