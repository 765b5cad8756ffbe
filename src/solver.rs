//! An agent to choose Connect 4 moves by depth-limited game tree search

use log::{debug, warn};

use std::time::{Duration, Instant};

use crate::{
    alignment::{check_win, is_terminal},
    board::{Board, Player},
    error::SearchError,
    evaluation::EvaluatorProfile,
};

/// The score of a position the maximizing player has already won
///
/// Larger in magnitude than any heuristic score, see
/// [`EvaluatorProfile::max_magnitude`].
pub const WIN_SCORE: i32 = 1_000_000;

// how often (in nodes) the clock is read when a time limit is set
const CLOCK_INTERVAL: usize = 1024;

/// The column chosen by a search and the minimax score behind it
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SearchResult {
    /// `None` when the position has no legal move or is already decided
    pub column: Option<usize>,
    pub score: i32,
}

impl SearchResult {
    /// Whether the score proves a forced win for the searching player
    pub fn is_forced_win(&self) -> bool {
        self.score >= WIN_SCORE
    }

    /// Whether the score proves a forced loss for the searching player
    pub fn is_forced_loss(&self) -> bool {
        self.score <= -WIN_SCORE
    }
}

/// Settings for one `Solver`
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SearchConfig {
    /// Alpha-beta pruning; never changes the result, only the node count
    pub pruning: bool,
    pub profile: EvaluatorProfile,
    /// Extra magnitude added to lost positions, 0 keeps terminal scores symmetric
    pub loss_bias: i32,
    pub node_budget: Option<usize>,
    pub time_limit: Option<Duration>,
}

impl SearchConfig {
    pub fn without_pruning(mut self) -> Self {
        self.pruning = false;
        self
    }

    pub fn with_profile(mut self, profile: EvaluatorProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_loss_bias(mut self, loss_bias: i32) -> Self {
        self.loss_bias = loss_bias;
        self
    }

    pub fn with_node_budget(mut self, nodes: usize) -> Self {
        self.node_budget = Some(nodes);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Clears the node budget and time limit, keeping everything else
    pub fn without_limits(mut self) -> Self {
        self.node_budget = None;
        self.time_limit = None;
        self
    }

    fn loss_score(&self) -> i32 {
        -(WIN_SCORE.saturating_add(self.loss_bias))
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pruning: true,
            profile: EvaluatorProfile::STANDARD,
            loss_bias: 0,
            node_budget: None,
            time_limit: None,
        }
    }
}

/// An agent to pick moves in Connect 4 positions
///
/// # Notes
/// This agent runs a minimax search with alpha-beta pruning to a fixed depth,
/// scoring decided positions with `±WIN_SCORE` and cut-off positions with the
/// configured [`EvaluatorProfile`]. Columns are always tried in ascending
/// order and only a strictly better score replaces the current best move, so
/// the result for a given position and depth is fully reproducible.
///
/// Each node works on its own copy of the board.
#[derive(Clone, Debug)]
pub struct Solver {
    board: Board,
    player: Player,
    config: SearchConfig,

    /// The number of nodes searched by the last call to `search` (for diagnostics only)
    pub node_count: usize,
    deadline: Option<Instant>,
}

impl Solver {
    /// Creates a new `Solver` searching for `player`'s best move on `board`
    pub fn new(board: Board, player: Player) -> Self {
        Self {
            board,
            player,
            config: SearchConfig::default(),
            node_count: 0,
            deadline: None,
        }
    }

    /// Replaces the search settings of an existing `Solver`
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Searches `depth` plies ahead and returns the best column and its score
    ///
    /// The root is always expanded, so a depth of 0 behaves like a depth of 1
    /// and picks the column with the best immediate evaluation. A board that
    /// is already won, lost or full returns no column with its terminal score.
    ///
    /// Every forced win scores `WIN_SCORE` however far away it is, so a
    /// column that wins on the spot is taken before anything is searched.
    pub fn search(&mut self, depth: usize) -> Result<SearchResult, SearchError> {
        let start = Instant::now();
        self.node_count = 0;
        self.deadline = self.config.time_limit.map(|limit| start + limit);

        let result = match self.immediate_win() {
            Some(column) => {
                self.node_count = 1;
                Ok((Some(column), WIN_SCORE))
            }
            None => self.minimax(self.board, depth.max(1), i32::MIN, i32::MAX, true),
        };
        let elapsed = start.elapsed();

        match result {
            Ok((column, score)) => {
                debug!(
                    "{} searched {} plies: column {:?}, score {}, {} nodes in {:.3}ms (pruning: {})",
                    self.player,
                    depth.max(1),
                    column,
                    score,
                    self.node_count,
                    elapsed.as_secs_f64() * 1000.0,
                    self.config.pruning
                );
                Ok(SearchResult { column, score })
            }
            Err(err) => {
                warn!("search aborted at depth {}: {}", depth, err);
                Err(err)
            }
        }
    }

    /// Performs game tree search
    ///
    /// Returns the best column (if the node was expanded) and the minimax
    /// score of `board` from the searching player's point of view.
    fn minimax(
        &mut self,
        board: Board,
        ply: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> Result<(Option<usize>, i32), SearchError> {
        self.node_count += 1;
        self.check_budget()?;

        // decided positions come before the depth cut-off
        if check_win(&board, self.player) {
            return Ok((None, WIN_SCORE));
        }
        if check_win(&board, self.player.other()) {
            return Ok((None, self.config.loss_score()));
        }
        if board.is_full() {
            return Ok((None, 0));
        }
        if ply == 0 {
            return Ok((None, self.config.profile.score(&board, self.player)));
        }

        let columns = board.legal_columns();
        let mover = if maximizing {
            self.player
        } else {
            self.player.other()
        };

        // start from the first legal column so ties keep the leftmost move
        let mut best_column = columns.first().copied();
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for column in columns {
            let child = board.play(column, mover);
            let (_, score) = self.minimax(child, ply - 1, alpha, beta, !maximizing)?;

            if maximizing {
                if score > best {
                    best = score;
                    best_column = Some(column);
                }
                alpha = alpha.max(best);
            } else {
                if score < best {
                    best = score;
                    best_column = Some(column);
                }
                beta = beta.min(best);
            }

            // the opponent will never allow this line, skip the remaining columns
            if self.config.pruning && alpha >= beta {
                break;
            }
        }

        Ok((best_column, best))
    }

    /// The lowest column that completes a 4-in-a-row for the searching player
    fn immediate_win(&self) -> Option<usize> {
        if is_terminal(&self.board) {
            return None;
        }
        self.board
            .legal_columns()
            .into_iter()
            .find(|&column| check_win(&self.board.play(column, self.player), self.player))
    }

    fn check_budget(&self) -> Result<(), SearchError> {
        if let Some(budget) = self.config.node_budget {
            if self.node_count > budget {
                return Err(SearchError::BudgetExhausted {
                    nodes: self.node_count,
                });
            }
        }
        if let (Some(deadline), Some(limit)) = (self.deadline, self.config.time_limit) {
            if self.node_count % CLOCK_INTERVAL == 0 && Instant::now() >= deadline {
                return Err(SearchError::DeadlineExceeded {
                    limit_ms: limit.as_millis(),
                    nodes: self.node_count,
                });
            }
        }
        Ok(())
    }
}
