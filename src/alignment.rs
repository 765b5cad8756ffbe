//! Straight-line windows over the board and 4-in-a-row detection
//!
//! A window is a run of consecutive cells in one of the four directions a
//! line can take on the grid. Win detection scans every 4-cell window on the
//! whole board; the evaluator reuses the same enumeration for 2- and 3-cell
//! windows.

use crate::{
    board::{Board, Player},
    HEIGHT, WIDTH,
};

/// The number of pieces in a row needed to win
pub const CONNECT: usize = 4;

/// The direction a window extends in from its starting cell
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Direction {
    Horizontal,
    Vertical,
    /// bottom-left to top-right
    RisingDiagonal,
    /// top-left to bottom-right
    FallingDiagonal,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::RisingDiagonal,
        Direction::FallingDiagonal,
    ];

    /// (row step, column step)
    fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::RisingDiagonal => (1, 1),
            Direction::FallingDiagonal => (-1, 1),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Window {
    pub row: usize,
    pub column: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Window {
    /// The (row, column) coordinates covered by this window
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        let (dy, dx) = self.direction.step();
        (0..self.length as isize).map(move |i| {
            (
                (self.row as isize + dy * i) as usize,
                (self.column as isize + dx * i) as usize,
            )
        })
    }

    /// Counts (own, opponent) pieces in the window from `player`'s view
    pub fn occupancy(self, board: &Board, player: Player) -> (usize, usize) {
        let (own_cell, opp_cell) = (player.cell(), player.other().cell());
        self.cells().fold((0, 0), |(own, opp), (row, column)| {
            match board.get(row, column) {
                cell if cell == own_cell => (own + 1, opp),
                cell if cell == opp_cell => (own, opp + 1),
                _ => (own, opp),
            }
        })
    }
}

/// Every in-bounds window of `length` cells, in all four directions
pub fn windows(length: usize) -> impl Iterator<Item = Window> {
    Direction::ALL.into_iter().flat_map(move |direction| {
        (0..HEIGHT).flat_map(move |row| {
            (0..WIDTH).filter_map(move |column| {
                let window = Window {
                    row,
                    column,
                    direction,
                    length,
                };
                if length > 0 && in_bounds(window) {
                    Some(window)
                } else {
                    None
                }
            })
        })
    })
}

fn in_bounds(window: Window) -> bool {
    let (dy, dx) = window.direction.step();
    let span = window.length as isize - 1;
    let end_row = window.row as isize + dy * span;
    let end_column = window.column as isize + dx * span;
    (0..HEIGHT as isize).contains(&end_row) && (0..WIDTH as isize).contains(&end_column)
}

/// The number of windows of `length` cells on the board
pub const fn window_count(length: usize) -> usize {
    if length == 0 {
        return 0;
    }
    // start positions along each axis, zero once the window no longer fits
    let rows = if length <= HEIGHT { HEIGHT - length + 1 } else { 0 };
    let columns = if length <= WIDTH { WIDTH - length + 1 } else { 0 };
    // horizontal + vertical + both diagonals
    HEIGHT * columns + rows * WIDTH + 2 * rows * columns
}

/// Whether `player` holds any 4-in-a-row anywhere on the board
pub fn check_win(board: &Board, player: Player) -> bool {
    let cell = player.cell();
    windows(CONNECT).any(|window| {
        window
            .cells()
            .all(|(row, column)| board.get(row, column) == cell)
    })
}

/// The player holding a 4-in-a-row, if any
///
/// `Player::One` is reported first on (unreachable in play) boards where both
/// players have an alignment.
pub fn winner(board: &Board) -> Option<Player> {
    [Player::One, Player::Two]
        .into_iter()
        .find(|&player| check_win(board, player))
}

/// A board is terminal once either player has won or the grid is full
pub fn is_terminal(board: &Board) -> bool {
    board.is_full() || winner(board).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_enumeration_matches_count() {
        for length in 0..=WIDTH + 1 {
            assert_eq!(windows(length).count(), window_count(length));
        }
        assert_eq!(window_count(CONNECT), 69);
    }

    #[test]
    fn windows_stay_on_the_board() {
        for window in windows(3) {
            for (row, column) in window.cells() {
                assert!(row < HEIGHT && column < WIDTH);
            }
        }
    }
}
