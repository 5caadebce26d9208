//! Board state representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;

/// Number of cells on the board
pub const CELL_COUNT: usize = 9;

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A player in the game
///
/// `X` is the human side and always opens a live game; `O` is the
/// trained agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// Snapshot of the nine cells.
///
/// Two boards with identical cells are the same state; rotations and
/// reflections are distinct. The type is `Copy` and hashable so it doubles
/// as the Q-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    pub cells: [Cell; CELL_COUNT],
}

impl BoardState {
    /// Create a new empty board
    pub fn new() -> Self {
        BoardState {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Create a board from a string representation.
    ///
    /// Whitespace is ignored; exactly nine cell characters (`.`, `_`, `X`,
    /// `O`) must remain.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the cell count is
    /// wrong or a character is not a cell.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != CELL_COUNT {
            return Err(crate::Error::InvalidConfiguration {
                message: format!(
                    "board '{s}' has {} cells, expected {CELL_COUNT}",
                    chars.len()
                ),
            });
        }

        let mut cells = [Cell::Empty; CELL_COUNT];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidConfiguration {
                message: format!("invalid character '{c}' at position {i} in '{s}'"),
            })?;
        }

        Ok(BoardState { cells })
    }

    /// Get cell at position (0-8)
    ///
    /// # Panics
    ///
    /// Panics if `pos` is 9 or more.
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is on the board and empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells.get(pos) == Some(&Cell::Empty)
    }

    /// Indices of every empty cell, ascending
    pub fn legal_actions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Place `player`'s mark and return the new board state
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidPosition`] for an index outside 0-8 and
    /// [`crate::Error::InvalidMove`] for an occupied cell.
    #[must_use = "apply_move returns a new board state; the original is unchanged"]
    pub fn apply_move(&self, pos: usize, player: Player) -> Result<BoardState, crate::Error> {
        if pos >= CELL_COUNT {
            return Err(crate::Error::InvalidPosition { position: pos });
        }

        if !self.is_empty(pos) {
            return Err(crate::Error::InvalidMove { position: pos });
        }

        let mut new_state = *self;
        new_state.cells[pos] = player.to_cell();
        Ok(new_state)
    }

    /// Check if a player has three in a row
    pub fn has_won(&self, player: Player) -> bool {
        LineAnalyzer::has_won(&self.cells, player)
    }

    /// Check if no empty cell remains
    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Check if the position is a draw (all cells filled, no winner)
    pub fn is_draw(&self) -> bool {
        self.is_full() && self.winner().is_none()
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        if self.has_won(Player::X) {
            Some(Player::X)
        } else if self.has_won(Player::O) {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Compact string encoding, e.g. `XO.......`
    pub fn encode(&self) -> String {
        self.cells.iter().map(|&c| c.to_char()).collect()
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            let line: Vec<String> = (0..3)
                .map(|col| {
                    let pos = row * 3 + col;
                    match self.cells[pos] {
                        Cell::Empty => pos.to_string(),
                        cell => cell.to_char().to_string(),
                    }
                })
                .collect();
            writeln!(f, " {} ", line.join(" | "))?;
            if row < 2 {
                writeln!(f, "---+---+---")?;
            }
        }
        Ok(())
    }
}
