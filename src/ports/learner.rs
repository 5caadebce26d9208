//! Learner port - abstraction for move-selection policies
//!
//! Evaluation pits the trained agent against any policy behind this trait:
//! the rule-based expert, a uniform random player, or a custom adapter.

use rand::RngCore;

use crate::{
    Result,
    tictactoe::{BoardState, Player},
};

/// Move-selection policy for one side of a game
pub trait Learner: Send {
    /// Select a move for `player` on the given board state.
    ///
    /// Randomness must come from `rng` so seeded runs stay reproducible.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid moves are available (terminal state).
    fn select_move(
        &mut self,
        state: &BoardState,
        player: Player,
        rng: &mut dyn RngCore,
    ) -> Result<usize>;

    /// Get the learner's name.
    ///
    /// Used for identification in evaluation summaries.
    fn name(&self) -> &str;
}
