//! Heuristic scoring of non-terminal positions
//!
//! # Scoring
//! A position is scored from the point of view of one player (the maximizer)
//! as the sum of two terms:
//!
//! - a positional term: every cell carries a weight, higher towards the
//!   centre of the board where more lines pass. The maximizer's weights are
//!   added and the opponent's subtracted.
//! - a line-potential term: every 2- and 3-cell window filled entirely by one
//!   player is an *open line* for that player, a run the opponent has not
//!   broken. Open lines are counted per player and weighted, with the
//!   opponent's open 3-windows weighing more than the maximizer's own.

use static_assertions::const_assert;

use crate::{
    alignment::{window_count, windows},
    board::{Board, Player},
    error::ConfigError,
    solver::WIN_SCORE,
    HEIGHT, WIDTH,
};

/// Cell weights, row 0 is the bottom of the board
pub const POSITIONAL_WEIGHTS: [[i32; WIDTH]; HEIGHT] = [
    [3, 4, 5, 7, 5, 4, 3],
    [4, 6, 8, 10, 8, 6, 4],
    [5, 8, 10, 13, 10, 8, 5],
    [5, 8, 10, 13, 10, 8, 5],
    [4, 6, 8, 10, 8, 6, 4],
    [3, 4, 5, 7, 5, 4, 3],
];

/// A named, versioned set of evaluator coefficients
///
/// Opponent weights are stored as magnitudes and subtracted from the score.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct EvaluatorProfile {
    pub name: &'static str,
    pub version: u32,
    pub positional: [[i32; WIDTH]; HEIGHT],
    pub own_three: i32,
    pub opponent_three: i32,
    pub own_two: i32,
    pub opponent_two: i32,
}

impl EvaluatorProfile {
    /// The canonical profile used unless configured otherwise
    pub const STANDARD: Self = Self {
        name: "standard",
        version: 1,
        positional: POSITIONAL_WEIGHTS,
        own_three: 40,
        opponent_three: 50,
        own_two: 8,
        opponent_two: 8,
    };

    /// Cell weights only, no line potential
    pub const POSITIONAL: Self = Self {
        name: "positional",
        version: 1,
        positional: POSITIONAL_WEIGHTS,
        own_three: 0,
        opponent_three: 0,
        own_two: 0,
        opponent_two: 0,
    };

    pub const ALL: [Self; 2] = [Self::STANDARD, Self::POSITIONAL];

    /// Looks up a built-in profile by (case-insensitive) name
    pub fn by_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .iter()
            .find(|profile| profile.name.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))
    }

    /// An upper bound on the magnitude of any score this profile produces
    pub const fn max_magnitude(&self) -> i32 {
        let mut positional = 0;
        let mut row = 0;
        while row < HEIGHT {
            let mut column = 0;
            while column < WIDTH {
                let weight = self.positional[row][column];
                positional += if weight < 0 { -weight } else { weight };
                column += 1;
            }
            row += 1;
        }
        let three = max_abs(self.own_three, self.opponent_three);
        let two = max_abs(self.own_two, self.opponent_two);
        positional + three * window_count(3) as i32 + two * window_count(2) as i32
    }

    /// Checks the profile keeps its defensive bias and stays below `WIN_SCORE`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            self.own_three,
            self.opponent_three,
            self.own_two,
            self.opponent_two,
        ];
        if weights.iter().any(|&weight| weight < 0) {
            return Err(ConfigError::Validation(format!(
                "profile '{}': line weights must be >= 0",
                self.name
            )));
        }
        if self.opponent_three < self.own_three {
            return Err(ConfigError::Validation(format!(
                "profile '{}': opponent three weight must be >= own three weight",
                self.name
            )));
        }
        if self.own_two > self.own_three || self.opponent_two > self.opponent_three {
            return Err(ConfigError::Validation(format!(
                "profile '{}': two-window weights must not exceed three-window weights",
                self.name
            )));
        }
        for row in 0..HEIGHT {
            for column in 0..WIDTH {
                let weight = self.positional[row][column];
                if weight != self.positional[HEIGHT - 1 - row][column]
                    || weight != self.positional[row][WIDTH - 1 - column]
                {
                    return Err(ConfigError::Validation(format!(
                        "profile '{}': positional weights must be symmetric",
                        self.name
                    )));
                }
            }
        }
        if self.max_magnitude() >= WIN_SCORE {
            return Err(ConfigError::Validation(format!(
                "profile '{}': heuristic bound {} reaches the win score {}",
                self.name,
                self.max_magnitude(),
                WIN_SCORE
            )));
        }
        Ok(())
    }

    /// Scores `board` from `player`'s point of view
    pub fn score(&self, board: &Board, player: Player) -> i32 {
        let mut score = 0;

        for row in 0..HEIGHT {
            for column in 0..WIDTH {
                match board.get(row, column).player() {
                    Some(owner) if owner == player => score += self.positional[row][column],
                    Some(_) => score -= self.positional[row][column],
                    None => {}
                }
            }
        }

        let threes = OpenLines::count(board, player, 3);
        let twos = OpenLines::count(board, player, 2);

        score += threes.own as i32 * self.own_three - threes.opponent as i32 * self.opponent_three;
        score += twos.own as i32 * self.own_two - twos.opponent as i32 * self.opponent_two;
        score
    }
}

impl Default for EvaluatorProfile {
    fn default() -> Self {
        Self::STANDARD
    }
}

// the canonical profile can never be mistaken for a decided game
const_assert!(EvaluatorProfile::STANDARD.max_magnitude() < WIN_SCORE);
const_assert!(EvaluatorProfile::POSITIONAL.max_magnitude() < WIN_SCORE);

const fn max_abs(a: i32, b: i32) -> i32 {
    let a = if a < 0 { -a } else { a };
    let b = if b < 0 { -b } else { b };
    if a > b {
        a
    } else {
        b
    }
}

/// Open line counts for both players over windows of one length
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct OpenLines {
    pub own: usize,
    pub opponent: usize,
}

impl OpenLines {
    /// Counts windows of `length` cells filled entirely by one player
    pub fn count(board: &Board, player: Player, length: usize) -> Self {
        windows(length).fold(Self::default(), |mut lines, window| {
            match window.occupancy(board, player) {
                (own, _) if own == length => lines.own += 1,
                (_, opponent) if opponent == length => lines.opponent += 1,
                _ => {}
            }
            lines
        })
    }
}

/// Scores `board` for `player` with the standard profile
pub fn score(board: &Board, player: Player) -> i32 {
    EvaluatorProfile::STANDARD.score(board, player)
}
