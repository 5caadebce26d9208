//! Common test utilities for the tactiq test suite.

use std::collections::HashSet;

use tactiq::tictactoe::{BoardState, Player};

/// Every board reachable by alternating legal moves, with either side
/// opening, stopping at terminal positions.
///
/// Sorted by encoding so iteration order is stable.
pub fn reachable_boards() -> Vec<BoardState> {
    let mut seen = HashSet::new();
    for first in [Player::X, Player::O] {
        visit(BoardState::new(), first, &mut seen);
    }
    let unique: HashSet<BoardState> = seen.into_iter().map(|(state, _)| state).collect();
    let mut boards: Vec<_> = unique.into_iter().collect();
    boards.sort_by_key(|board| board.encode());
    boards
}

fn visit(state: BoardState, to_move: Player, seen: &mut HashSet<(BoardState, Player)>) {
    if !seen.insert((state, to_move)) || state.is_terminal() {
        return;
    }
    for pos in state.legal_actions() {
        if let Ok(next) = state.apply_move(pos, to_move) {
            visit(next, to_move.opponent(), seen);
        }
    }
}
