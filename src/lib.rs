//! A computer opponent for the board game 'Connect 4'
//!
//! The computer picks its moves with a depth-limited minimax search with
//! alpha-beta pruning, scoring cut-off positions with a heuristic that
//! favours central cells and open lines.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_minimax::{best_move, apply_move, board::{Board, Player}};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // both players hold three on the bottom row, player one to move
//! let board = Board::from_moves("041526")?;
//! let result = best_move(&board, Player::One, 3)?;
//!
//! assert_eq!(result.column, Some(3));
//! assert!(result.is_forced_win());
//! let board = apply_move(&board, 3, Player::One)?;
//! assert!(connect4_minimax::is_terminal(&board));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod alignment;

pub mod board;

pub mod error;

pub mod evaluation;

pub mod solver;

pub mod difficulty;

pub mod config;

pub mod game;

pub mod benchmark;

mod test;

use board::{Board, Player};
use error::{InvalidMove, SearchError};
use solver::{SearchResult, Solver};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// a move string digit per column
const_assert!(WIDTH <= 10);
const_assert!(HEIGHT >= alignment::CONNECT && WIDTH >= alignment::CONNECT);

/// Finds `player`'s best column, searching `depth` plies ahead with pruning
pub fn best_move(board: &Board, player: Player, depth: usize) -> Result<SearchResult, SearchError> {
    Solver::new(*board, player).search(depth)
}

/// Returns a copy of `board` with `player`'s piece dropped into `column`
pub fn apply_move(board: &Board, column: usize, player: Player) -> Result<Board, InvalidMove> {
    board.drop_piece(column, player)
}

/// Whether the game on `board` is over
pub fn is_terminal(board: &Board) -> bool {
    alignment::is_terminal(board)
}

/// The player with a 4-in-a-row on `board`, if any
pub fn winner(board: &Board) -> Option<Player> {
    alignment::winner(board)
}

/// Playable columns in ascending order
pub fn legal_columns(board: &Board) -> Vec<usize> {
    board.legal_columns()
}
