//! Reward shaping for the agent's moves

use serde::{Deserialize, Serialize};

use crate::{
    config::RewardConfig,
    tictactoe::{BoardState, CELL_COUNT, LineAnalyzer, Player},
};

/// Category of a post-move board from the mover's perspective.
///
/// Exactly one applies; win is checked before loss, loss before block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardKind {
    Win,
    Loss,
    Block,
    Draw,
    Neutral,
}

/// Converts the board produced by a move into a scalar reward
#[derive(Debug, Clone, Copy, Default)]
pub struct RewardShaper {
    config: RewardConfig,
}

impl RewardShaper {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Classify `state`, reached by `player` placing at `action`.
    ///
    /// A block is credited when some line through `action` has its other two
    /// cells held by the opponent, i.e. the opponent would have won there.
    pub fn classify(&self, state: &BoardState, player: Player, action: usize) -> RewardKind {
        if state.has_won(player) {
            return RewardKind::Win;
        }
        if state.has_won(player.opponent()) {
            return RewardKind::Loss;
        }

        let placed = action < CELL_COUNT && state.get(action) == player.to_cell();
        if placed && LineAnalyzer::completes_line(&state.cells, action, player.opponent()) {
            return RewardKind::Block;
        }

        if state.is_full() {
            RewardKind::Draw
        } else {
            RewardKind::Neutral
        }
    }

    /// Scalar reward for `player` after placing at `action`
    pub fn reward(&self, state: &BoardState, player: Player, action: usize) -> f64 {
        self.value_of(self.classify(state, player, action))
    }

    pub fn value_of(&self, kind: RewardKind) -> f64 {
        match kind {
            RewardKind::Win => self.config.win,
            RewardKind::Loss => self.config.loss,
            RewardKind::Block => self.config.block,
            RewardKind::Draw => self.config.draw,
            RewardKind::Neutral => self.config.neutral,
        }
    }

    /// Terminal penalty credited to the agent's last move when the opponent wins
    pub fn opponent_win_penalty(&self) -> f64 {
        self.config.opponent_win_penalty
    }
}
