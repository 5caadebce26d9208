//! Tic-Tac-Toe game implementation

pub mod board;
pub mod game;
pub mod lines;

pub use board::{BoardState, CELL_COUNT, Cell, Player};
pub use game::GameOutcome;
pub use lines::{LineAnalyzer, POSITION_LINES, WINNING_LINES};
