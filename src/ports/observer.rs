//! Observer port - abstraction for training observation
//!
//! This port defines the interface for observing training events,
//! allowing progress display and metrics collection without coupling the
//! training loop to a particular output.

use serde::{Deserialize, Serialize};

use crate::{Result, tictactoe::GameOutcome};

/// Periodic snapshot of training progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Number of episodes completed (1-based)
    pub episode: usize,
    /// Mean episode reward over the trailing window
    pub mean_reward: f64,
    /// Agent wins in the trailing window divided by the configured divisor
    pub win_rate_percent: f64,
    /// Current learning rate α
    pub learning_rate: f64,
    /// Current exploration rate ε
    pub epsilon: f64,
    /// States stored in the Q-table
    pub states_seen: usize,
}

/// Observer trait for monitoring training
///
/// Observers are strictly observational: they never see the trainer itself,
/// only the events it emits.
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_end(episode, outcome, reward)`
///    - `on_progress(report)` - Every progress interval
/// 3. `on_training_end()` - Once at the end, also after a cooperative stop
///
/// # Examples
///
/// ```no_run
/// use tactiq::{ports::Observer, tictactoe::GameOutcome};
///
/// struct EpisodeCounter {
///     episodes: usize,
/// }
///
/// impl Observer for EpisodeCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         _outcome: GameOutcome,
///         _reward: f64,
///     ) -> tactiq::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode with its outcome and summed reward.
    ///
    /// `episode` is 0-based.
    fn on_episode_end(&mut self, _episode: usize, _outcome: GameOutcome, _reward: f64) -> Result<()> {
        Ok(())
    }

    /// Called at every progress interval.
    fn on_progress(&mut self, _report: &ProgressReport) -> Result<()> {
        Ok(())
    }

    /// Called when training completes or is stopped.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
