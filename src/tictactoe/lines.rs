//! Winning line analysis for Tic-Tac-Toe

use super::{Cell, Player};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// For each cell, the indices into [`WINNING_LINES`] of the lines through it
pub const POSITION_LINES: [&[usize]; 9] = [
    &[0, 3, 6],
    &[0, 4],
    &[0, 5, 7],
    &[1, 3],
    &[1, 4, 6, 7],
    &[1, 5],
    &[2, 3, 7],
    &[2, 4],
    &[2, 5, 6],
];

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if a player has won by having three in a row
    pub fn has_won(cells: &[Cell; 9], player: Player) -> bool {
        let target = player.to_cell();
        WINNING_LINES
            .iter()
            .any(|line| line.iter().all(|&idx| cells[idx] == target))
    }

    /// Winning lines passing through `pos`; none for a position off the board
    pub fn lines_through(pos: usize) -> impl Iterator<Item = [usize; 3]> {
        let index: &'static [&'static [usize]; 9] = &POSITION_LINES;
        index
            .get(pos)
            .copied()
            .into_iter()
            .flatten()
            .map(|&line| WINNING_LINES[line])
    }

    /// True if some line through `pos` has its other two cells held by `player`.
    ///
    /// The content of `pos` itself is not inspected.
    pub fn completes_line(cells: &[Cell; 9], pos: usize, player: Player) -> bool {
        let target = player.to_cell();
        Self::lines_through(pos).any(|line| {
            line.iter()
                .filter(|&&idx| idx != pos)
                .all(|&idx| cells[idx] == target)
        })
    }

    /// Empty cells that would complete a line for `player`, scanning every
    /// line for two `player` marks and one gap. Sorted, no duplicates.
    pub fn winning_moves(cells: &[Cell; 9], player: Player) -> Vec<usize> {
        let mut moves: Vec<usize> = WINNING_LINES
            .iter()
            .filter_map(|line| Self::winning_move_in_line(cells, player, line))
            .collect();
        moves.sort_unstable();
        moves.dedup();
        moves
    }

    /// Find the winning move position in a specific line, if one exists
    fn winning_move_in_line(cells: &[Cell; 9], player: Player, line: &[usize; 3]) -> Option<usize> {
        let target = player.to_cell();
        let mut count = 0;
        let mut empty_pos = None;

        for &idx in line {
            match cells[idx] {
                Cell::Empty => {
                    if empty_pos.is_some() {
                        return None;
                    }
                    empty_pos = Some(idx);
                }
                c if c == target => count += 1,
                _ => return None,
            }
        }

        if count == 2 { empty_pos } else { None }
    }
}
