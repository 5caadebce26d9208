//! Game outcomes

use serde::{Deserialize, Serialize};

use super::board::{BoardState, Player};

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Outcome of `state`, or `None` while the game is still running
    pub fn of(state: &BoardState) -> Option<Self> {
        if let Some(winner) = state.winner() {
            Some(GameOutcome::Win(winner))
        } else if state.is_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    pub fn is_win_for(self, player: Player) -> bool {
        self == GameOutcome::Win(player)
    }

    pub fn is_loss_for(self, player: Player) -> bool {
        self == GameOutcome::Win(player.opponent())
    }
}
