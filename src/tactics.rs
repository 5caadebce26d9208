//! Tactical heuristics over a board state
//!
//! Pure functions that spot open threats and winning cells, plus the
//! rule-based expert policy used as the self-play opponent and as the
//! agent's exploration move.

use rand::{Rng, seq::IndexedRandom};

use crate::{
    Error, Result,
    tictactoe::{BoardState, LineAnalyzer, Player},
};

/// Positional fallback ranking: center, corners, edges
pub const PRIORITY_ORDER: [usize; 9] = [4, 0, 2, 6, 8, 1, 3, 5, 7];

/// Empty cells where `opponent` would complete a line on their next move.
///
/// Uses the per-cell line index; the result is ascending with no duplicates.
pub fn immediate_threats(state: &BoardState, opponent: Player) -> Vec<usize> {
    state
        .legal_actions()
        .into_iter()
        .filter(|&pos| LineAnalyzer::completes_line(&state.cells, pos, opponent))
        .collect()
}

/// First legal cell (ascending) that wins outright for `player`
pub fn winning_move(state: &BoardState, player: Player) -> Option<usize> {
    state.legal_actions().into_iter().find(|&pos| {
        state
            .apply_move(pos, player)
            .is_ok_and(|next| next.has_won(player))
    })
}

/// First legal cell (ascending) that leaves `player` with two or more
/// distinct winning cells.
pub fn double_threat_move(state: &BoardState, player: Player) -> Option<usize> {
    state.legal_actions().into_iter().find(|&pos| {
        state
            .apply_move(pos, player)
            .is_ok_and(|next| LineAnalyzer::winning_moves(&next.cells, player).len() >= 2)
    })
}

/// Rule-based move for `player`.
///
/// In order: block an opponent threat (uniform among them), take a win,
/// take the highest-ranked free cell from [`PRIORITY_ORDER`], else any
/// legal cell at random.
///
/// # Errors
///
/// Returns [`Error::EmptyActionSet`] if the board is full.
pub fn expert_move<R: Rng + ?Sized>(state: &BoardState, player: Player, rng: &mut R) -> Result<usize> {
    let available = state.legal_actions();
    if available.is_empty() {
        return Err(Error::EmptyActionSet);
    }

    // Line scan rather than the per-cell index used by `immediate_threats`.
    let threats = LineAnalyzer::winning_moves(&state.cells, player.opponent());
    if let Some(&block) = threats.choose(rng) {
        return Ok(block);
    }

    if let Some(win) = winning_move(state, player) {
        return Ok(win);
    }

    if let Some(&pos) = PRIORITY_ORDER.iter().find(|&&pos| state.is_empty(pos)) {
        return Ok(pos);
    }

    available.choose(rng).copied().ok_or(Error::EmptyActionSet)
}
