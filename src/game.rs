//! A game between a human and the computer, held as an explicit value

use crate::{
    alignment::check_win,
    board::{Board, Player},
    error::{InvalidMove, SearchError},
    solver::{SearchConfig, SearchResult, Solver},
};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    Won(Player),
    Draw,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameState::Playing)
    }
}

#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Player,
    state: GameState,
    history: Vec<usize>,
    first: Player,
    computer: Player,
    depth: usize,
    search: SearchConfig,
}

impl Game {
    /// Starts a game on an empty board
    pub fn new(first: Player, computer: Player, depth: usize) -> Self {
        Self {
            board: Board::new(),
            to_move: first,
            state: GameState::Playing,
            history: Vec::new(),
            first,
            computer,
            depth,
            search: SearchConfig::default(),
        }
    }

    /// Replaces the settings used for computer moves
    pub fn with_search_config(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn computer(&self) -> Player {
        self.computer
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The settings used for computer moves
    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }

    /// Columns played so far, in order
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    pub fn is_computer_turn(&self) -> bool {
        !self.state.is_over() && self.to_move == self.computer
    }

    /// Plays `column` for the player to move
    ///
    /// The game is left untouched if the move is rejected.
    pub fn play(&mut self, column: usize) -> Result<GameState, InvalidMove> {
        if self.state.is_over() {
            return Err(InvalidMove::GameOver);
        }
        let board = self.board.drop_piece(column, self.to_move)?;

        self.state = if check_win(&board, self.to_move) {
            GameState::Won(self.to_move)
        } else if board.is_full() {
            GameState::Draw
        } else {
            GameState::Playing
        };
        self.board = board;
        self.history.push(column);
        self.to_move = self.to_move.other();

        Ok(self.state)
    }

    /// Searches the computer's move without playing it
    ///
    /// Takes `&self` so the caller can run it on a snapshot off its main thread
    /// and apply the column with `play` once it returns.
    pub fn computer_move(&self) -> Result<SearchResult, SearchError> {
        Solver::new(self.board, self.computer)
            .with_config(self.search)
            .search(self.depth)
    }

    /// Changes the search depth of the computer
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    /// Starts a new game with the same players and depth
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.to_move = self.first;
        self.state = GameState::Playing;
        self.history.clear();
    }
}
