//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use crate::{
    Error, Result,
    tictactoe::{BoardState, CELL_COUNT},
};

/// Value estimates for every cell index of one state
pub type ActionValues = [f64; CELL_COUNT];

/// Q-table mapping board states to per-action value estimates
///
/// States are keyed by their raw cells (no symmetry reduction). Entries are
/// created on demand and never evicted.
#[derive(Debug, Clone)]
pub struct QTable {
    q_values: HashMap<BoardState, ActionValues>,
    /// Discount factor γ
    discount_factor: f64,
    /// Stored values are clamped to `[-value_bound, value_bound]`
    value_bound: f64,
}

impl QTable {
    /// Create a new Q-table
    pub fn new(discount_factor: f64, value_bound: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            discount_factor,
            value_bound,
        }
    }

    /// Stored values for `state`, if it has been seen
    pub fn get(&self, state: &BoardState) -> Option<&ActionValues> {
        self.q_values.get(state)
    }

    /// Q-value for a state-action pair, zero when unseen
    pub fn value(&self, state: &BoardState, action: usize) -> f64 {
        self.get(state)
            .and_then(|values| values.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Values for `state`, inserting an all-zero row on first access.
    ///
    /// This is a read that may grow the table.
    pub fn entry(&mut self, state: BoardState) -> &mut ActionValues {
        self.q_values
            .entry(state)
            .or_insert([0.0; CELL_COUNT])
    }

    /// Maximum over all stored values of `state`; zero for an unseen state
    pub fn max_value(&self, state: &BoardState) -> f64 {
        self.get(state)
            .map(|values| values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .unwrap_or(0.0)
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← clamp(Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)])
    ///
    /// Returns the stored value.
    pub fn update(
        &mut self,
        state: BoardState,
        action: usize,
        next_state: &BoardState,
        reward: f64,
        learning_rate: f64,
    ) -> Result<f64> {
        if action >= CELL_COUNT {
            return Err(Error::InvalidPosition { position: action });
        }

        let max_next_q = self.max_value(next_state);
        let discount_factor = self.discount_factor;
        let bound = self.value_bound;

        let slot = &mut self.entry(state)[action];
        let current_q = *slot;
        let td_target = reward + discount_factor * max_next_q;
        let new_q = (current_q + learning_rate * (td_target - current_q)).clamp(-bound, bound);
        *slot = new_q;
        Ok(new_q)
    }

    /// Iterate over every stored state and its values
    pub fn iter(&self) -> impl Iterator<Item = (&BoardState, &ActionValues)> {
        self.q_values.iter()
    }

    /// Reset all Q-values
    pub fn clear(&mut self) {
        self.q_values.clear();
    }

    /// Number of states stored
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }
}
