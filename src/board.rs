use anyhow::{anyhow, Result};

use std::fmt;

use crate::{error::InvalidMove, HEIGHT, WIDTH};

/// One of the two sides of a game
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The opponent of this player
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "Player 1"),
            Player::Two => write!(f, "Player 2"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The player owning this cell, if any
    pub fn player(&self) -> Option<Player> {
        match self {
            Cell::PlayerOne => Some(Player::One),
            Cell::PlayerTwo => Some(Player::Two),
            Cell::Empty => None,
        }
    }

    fn symbol(&self) -> char {
        match self {
            Cell::PlayerOne => 'X',
            Cell::PlayerTwo => 'O',
            Cell::Empty => '.',
        }
    }
}

/// A 7x6 Connect 4 grid
///
/// Row 0 is the bottom of the board. Every method that adds a piece keeps the
/// gravity invariant: a cell is only occupied if every cell below it in the
/// same column is occupied as well.
///
/// `Board` is a small `Copy` value, so search code takes private snapshots
/// instead of sharing one board between branches.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    cells: [[Cell; WIDTH]; HEIGHT], // cells[row][column], bottom-to-top
    heights: [usize; WIDTH],
    num_moves: usize,
}

impl Board {
    /// Creates an empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; WIDTH]; HEIGHT],
            heights: [0; WIDTH],
            num_moves: 0,
        }
    }

    /// Builds a board from a string of column digits (`0`-`6`), played
    /// alternately starting with `Player::One`
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();
        let mut player = Player::One;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column) => {
                    board = board.drop_piece(column, player)?;
                    player = player.other();
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    /// Builds a board from a row-major picture, top row first
    ///
    /// `.` is an empty cell, `X` belongs to `Player::One` and `O` to
    /// `Player::Two`. Floating pieces are rejected.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        if rows.len() != HEIGHT {
            return Err(anyhow!("expected {} rows, found {}", HEIGHT, rows.len()));
        }
        let mut cells = [[Cell::Empty; WIDTH]; HEIGHT];

        for (top_index, line) in rows.iter().enumerate() {
            let row = HEIGHT - 1 - top_index;
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != WIDTH {
                return Err(anyhow!(
                    "row {} has {} cells, expected {}",
                    row,
                    symbols.len(),
                    WIDTH
                ));
            }
            for (column, symbol) in symbols.into_iter().enumerate() {
                cells[row][column] = match symbol {
                    '.' => Cell::Empty,
                    'X' | 'x' => Cell::PlayerOne,
                    'O' | 'o' => Cell::PlayerTwo,
                    other => return Err(anyhow!("could not parse '{}' as a cell", other)),
                };
            }
        }

        let mut board = Self::new();
        for column in 0..WIDTH {
            for row in 0..HEIGHT {
                if let Some(player) = cells[row][column].player() {
                    board = board.place(row, column, player)?;
                }
            }
        }
        Ok(board)
    }

    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[row][column]
    }

    /// The number of pieces on the board
    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    /// A column is legal while its top cell is empty
    pub fn is_legal(&self, column: usize) -> bool {
        column < WIDTH && self.heights[column] < HEIGHT
    }

    /// The row a piece dropped into `column` lands on
    ///
    /// # Panics
    /// Panics if the column is out of range or full.
    pub fn next_free_row(&self, column: usize) -> usize {
        assert!(
            self.is_legal(column),
            "no free row in column {}, the column is full or out of range",
            column
        );
        self.heights[column]
    }

    /// Returns a copy of the board with `player`'s piece at (`row`, `column`)
    ///
    /// The receiver is never modified. Fails if the cell is occupied, out of
    /// range, or would float above an empty cell.
    pub fn place(&self, row: usize, column: usize, player: Player) -> Result<Self, InvalidMove> {
        if column >= WIDTH {
            return Err(InvalidMove::ColumnOutOfRange { column });
        }
        if row >= HEIGHT {
            return Err(InvalidMove::RowOutOfRange { row });
        }
        if !self.cells[row][column].is_empty() {
            return Err(InvalidMove::CellOccupied { row, column });
        }
        if row != self.heights[column] {
            return Err(InvalidMove::Unsupported { row, column });
        }

        let mut next = *self;
        next.cells[row][column] = player.cell();
        next.heights[column] += 1;
        next.num_moves += 1;
        Ok(next)
    }

    /// Returns a copy of the board with `player`'s piece dropped into `column`
    pub fn drop_piece(&self, column: usize, player: Player) -> Result<Self, InvalidMove> {
        if column >= WIDTH {
            return Err(InvalidMove::ColumnOutOfRange { column });
        }
        if !self.is_legal(column) {
            return Err(InvalidMove::ColumnFull { column });
        }
        self.place(self.heights[column], column, player)
    }

    /// Drops a piece without the legality checks of `drop_piece`, for search
    /// code that only plays columns taken from `legal_columns`
    ///
    /// # Panics
    /// Panics if the column is out of range or full.
    pub(crate) fn play(&self, column: usize, player: Player) -> Self {
        let row = self.next_free_row(column);
        let mut next = *self;
        next.cells[row][column] = player.cell();
        next.heights[column] += 1;
        next.num_moves += 1;
        next
    }

    /// Playable columns in ascending order
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..WIDTH).filter(|&column| self.is_legal(column)).collect()
    }

    pub fn is_full(&self) -> bool {
        self.num_moves == WIDTH * HEIGHT
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..HEIGHT).rev() {
            let line: String = self.cells[row].iter().map(Cell::symbol).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
