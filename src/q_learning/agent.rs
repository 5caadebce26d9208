//! Tactical Q-learning agent
//!
//! Move selection layers three rules: block any immediate opponent threat,
//! otherwise explore with the expert policy with probability ε, otherwise
//! exploit the Q-table with a small Gaussian jitter to break ties.

use rand::{Rng, seq::IndexedRandom};
use rand_distr::{Distribution, Normal};

use crate::{
    Error, Result,
    config::Hyperparameters,
    q_learning::q_table::QTable,
    tactics,
    tictactoe::{BoardState, Player},
};

/// Mark played by the learning agent
pub const AGENT_PLAYER: Player = Player::O;

/// Mark played by the human or the training opponent
pub const OPPONENT_PLAYER: Player = Player::X;

/// Q-learning agent with a heuristic safety net
#[derive(Debug, Clone)]
pub struct QAgent {
    q_table: QTable,
    hyperparameters: Hyperparameters,
    learning_rate: f64,
    epsilon: f64,
    jitter: Normal<f64>,
}

impl QAgent {
    /// Create a new agent
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the jitter deviation is not
    /// a valid normal standard deviation.
    pub fn new(hyperparameters: Hyperparameters, value_bound: f64) -> Result<Self> {
        let jitter = Normal::new(0.0, hyperparameters.jitter_std_dev).map_err(|e| {
            Error::InvalidConfiguration {
                message: format!("jitter_std_dev: {e}"),
            }
        })?;

        Ok(Self {
            q_table: QTable::new(hyperparameters.discount_factor, value_bound),
            hyperparameters,
            learning_rate: hyperparameters.learning_rate,
            epsilon: hyperparameters.epsilon,
            jitter,
        })
    }

    /// Pick the agent's move for `state`, decaying ε when no threat forces it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyActionSet`] if the board has no empty cell.
    pub fn choose_action<R: Rng + ?Sized>(&mut self, state: &BoardState, rng: &mut R) -> Result<usize> {
        let legal = state.legal_actions();
        if legal.is_empty() {
            return Err(Error::EmptyActionSet);
        }

        if let Some(block) = Self::forced_block(state, rng) {
            return Ok(block);
        }

        self.decay_epsilon();
        if rng.random::<f64>() < self.epsilon {
            return tactics::expert_move(state, AGENT_PLAYER, rng);
        }

        self.exploit(state, &legal, rng)
    }

    /// Threat override followed by exploitation; no exploration, ε untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyActionSet`] if the board has no empty cell.
    pub fn greedy_action<R: Rng + ?Sized>(&mut self, state: &BoardState, rng: &mut R) -> Result<usize> {
        let legal = state.legal_actions();
        if legal.is_empty() {
            return Err(Error::EmptyActionSet);
        }

        if let Some(block) = Self::forced_block(state, rng) {
            return Ok(block);
        }

        self.exploit(state, &legal, rng)
    }

    /// Apply one TD update with the current learning rate
    pub fn learn(
        &mut self,
        state: BoardState,
        action: usize,
        next_state: &BoardState,
        reward: f64,
    ) -> Result<f64> {
        self.q_table
            .update(state, action, next_state, reward, self.learning_rate)
    }

    /// Multiplicative α decay with floor
    pub fn decay_learning_rate(&mut self) {
        self.learning_rate = (self.learning_rate * self.hyperparameters.learning_rate_decay)
            .max(self.hyperparameters.min_learning_rate);
    }

    /// Multiplicative ε decay with floor
    fn decay_epsilon(&mut self) {
        self.epsilon =
            (self.epsilon * self.hyperparameters.epsilon_decay).max(self.hyperparameters.min_epsilon);
    }

    fn forced_block<R: Rng + ?Sized>(state: &BoardState, rng: &mut R) -> Option<usize> {
        tactics::immediate_threats(state, OPPONENT_PLAYER)
            .choose(rng)
            .copied()
    }

    fn exploit<R: Rng + ?Sized>(
        &mut self,
        state: &BoardState,
        legal: &[usize],
        rng: &mut R,
    ) -> Result<usize> {
        let values = *self.q_table.entry(*state);
        let scored: Vec<(usize, f64)> = legal
            .iter()
            .map(|&action| (action, values[action] + self.jitter.sample(rng)))
            .collect();

        let best = scored
            .iter()
            .map(|&(_, q)| q)
            .fold(f64::NEG_INFINITY, f64::max);
        let ties: Vec<usize> = scored
            .iter()
            .filter(|&&(_, q)| q == best)
            .map(|&(action, _)| action)
            .collect();

        ties.choose(rng).copied().ok_or(Error::EmptyActionSet)
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Forget everything learned and restore the initial rates
    pub fn reset(&mut self) {
        self.q_table.clear();
        self.learning_rate = self.hyperparameters.learning_rate;
        self.epsilon = self.hyperparameters.epsilon;
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn agent() -> QAgent {
        QAgent::new(Hyperparameters::default(), 50.0).unwrap()
    }

    fn board(s: &str) -> BoardState {
        BoardState::from_string(s).unwrap()
    }

    #[test]
    fn test_threat_override_skips_epsilon_decay() {
        let mut agent = agent();
        let mut rng = StdRng::seed_from_u64(1);
        let action = agent.choose_action(&board("XX..O...."), &mut rng).unwrap();
        assert_eq!(action, 2);
        assert_eq!(agent.epsilon(), Hyperparameters::default().epsilon);
    }

    #[test]
    fn test_unforced_choice_decays_epsilon() {
        let mut agent = agent();
        let mut rng = StdRng::seed_from_u64(1);
        let action = agent.choose_action(&BoardState::new(), &mut rng).unwrap();
        assert!(action < 9);
        assert!(agent.epsilon() < Hyperparameters::default().epsilon);
    }

    #[test]
    fn test_epsilon_floor() {
        let mut agent = QAgent::new(
            Hyperparameters {
                epsilon: 0.06,
                epsilon_decay: 0.5,
                ..Hyperparameters::default()
            },
            50.0,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..5 {
            agent.choose_action(&BoardState::new(), &mut rng).unwrap();
        }
        assert_eq!(agent.epsilon(), 0.05);
    }

    #[test]
    fn test_exploitation_prefers_highest_value() {
        let mut agent = QAgent::new(
            Hyperparameters {
                epsilon: 0.0,
                min_epsilon: 0.0,
                ..Hyperparameters::default()
            },
            50.0,
        )
        .unwrap();
        let state = board("X........");
        let next_state = state.apply_move(8, AGENT_PLAYER).unwrap();
        for _ in 0..20 {
            agent.learn(state, 8, &next_state, 10.0).unwrap();
        }

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10 {
            assert_eq!(agent.choose_action(&state, &mut rng).unwrap(), 8);
        }
    }

    #[test]
    fn test_exploitation_materializes_state() {
        let mut agent = agent();
        let mut rng = StdRng::seed_from_u64(5);
        agent.greedy_action(&BoardState::new(), &mut rng).unwrap();
        assert!(agent.q_table().get(&BoardState::new()).is_some());
    }

    #[test]
    fn test_full_board_is_an_error() {
        let mut agent = agent();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            agent.choose_action(&board("XOXXOOOXX"), &mut rng),
            Err(Error::EmptyActionSet)
        ));
    }

    #[test]
    fn test_learning_rate_decay_floor() {
        let mut agent = agent();
        agent.decay_learning_rate();
        assert!((agent.learning_rate() - 0.4995).abs() < 1e-12);
        for _ in 0..10_000 {
            agent.decay_learning_rate();
        }
        assert_eq!(agent.learning_rate(), 0.1);
    }

    #[test]
    fn test_reset_restores_rates() {
        let mut agent = agent();
        let mut rng = StdRng::seed_from_u64(1);
        agent.choose_action(&BoardState::new(), &mut rng).unwrap();
        agent.decay_learning_rate();
        agent.reset();
        assert!(agent.q_table().is_empty());
        assert_eq!(agent.learning_rate(), 0.5);
        assert_eq!(agent.epsilon(), 0.3);
    }
}
