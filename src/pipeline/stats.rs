//! Trailing-window episode statistics

use std::collections::VecDeque;

const PREALLOCATED_EPISODES: usize = 4096;

/// Rewards and win flags of the most recent episodes
#[derive(Debug, Clone)]
pub struct RollingStats {
    window: usize,
    episodes: VecDeque<(f64, bool)>,
}

impl RollingStats {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            episodes: VecDeque::with_capacity(window.min(PREALLOCATED_EPISODES)),
        }
    }

    /// Record one finished episode, evicting the oldest beyond the window
    pub fn record(&mut self, reward: f64, won: bool) {
        if self.episodes.len() == self.window {
            self.episodes.pop_front();
        }
        self.episodes.push_back((reward, won));
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Mean reward over the episodes currently in the window
    pub fn mean_reward(&self) -> f64 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        let total: f64 = self.episodes.iter().map(|&(reward, _)| reward).sum();
        total / self.episodes.len() as f64
    }

    /// Wins in the window
    pub fn wins(&self) -> usize {
        self.episodes.iter().filter(|&&(_, won)| won).count()
    }

    /// Wins divided by `divisor`.
    ///
    /// With a divisor of window/100 this is a percentage of a full window;
    /// it understates the rate until the window has filled.
    pub fn win_rate_percent(&self, divisor: usize) -> f64 {
        self.wins() as f64 / divisor as f64
    }
}
