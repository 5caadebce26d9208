//! Opponent policies for evaluation

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::Learner,
    tactics,
    tictactoe::{BoardState, Player},
};

/// Built-in opponent types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpponentType {
    /// Rule-based expert (block, win, positional priority)
    Expert,
    /// Uniform random legal move
    Random,
}

impl OpponentType {
    /// Get short label
    pub fn label(&self) -> &'static str {
        match self {
            OpponentType::Expert => "expert",
            OpponentType::Random => "random",
        }
    }

    /// Build the corresponding learner
    pub fn build(self) -> Box<dyn Learner> {
        match self {
            OpponentType::Expert => Box::new(ExpertLearner::new()),
            OpponentType::Random => Box::new(RandomLearner::new()),
        }
    }
}

/// The rule-based expert used as the self-play opponent
#[derive(Debug, Clone, Default)]
pub struct ExpertLearner;

impl ExpertLearner {
    pub fn new() -> Self {
        Self
    }
}

impl Learner for ExpertLearner {
    fn select_move(
        &mut self,
        state: &BoardState,
        player: Player,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        tactics::expert_move(state, player, rng)
    }

    fn name(&self) -> &str {
        "Expert"
    }
}

/// Random learner - plays a uniformly random legal move
#[derive(Debug, Clone, Default)]
pub struct RandomLearner;

impl RandomLearner {
    pub fn new() -> Self {
        Self
    }
}

impl Learner for RandomLearner {
    fn select_move(
        &mut self,
        state: &BoardState,
        _player: Player,
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        let moves = state.legal_actions();
        if moves.is_empty() {
            return Err(crate::Error::EmptyActionSet);
        }
        let index = rng.random_range(0..moves.len());
        Ok(moves[index])
    }

    fn name(&self) -> &str {
        "Random"
    }
}
