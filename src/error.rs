//! Error types shared across the library

use std::path::PathBuf;

use crate::{HEIGHT, WIDTH};

/// A move that cannot be played on the current board
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMove {
    #[error("column {column} out of range, columns must be between 0 and {max}", max = WIDTH - 1)]
    ColumnOutOfRange { column: usize },

    #[error("row {row} out of range, rows must be between 0 and {max}", max = HEIGHT - 1)]
    RowOutOfRange { row: usize },

    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("cell at row {row}, column {column} is already occupied")]
    CellOccupied { row: usize, column: usize },

    #[error("cell at row {row}, column {column} has no piece beneath it")]
    Unsupported { row: usize, column: usize },

    #[error("the game is already over")]
    GameOver,
}

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("unknown difficulty tier '{0}'")]
    UnknownTier(String),

    #[error("unknown evaluator profile '{0}'")]
    UnknownProfile(String),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors raised by a bounded search
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search budget exhausted after {nodes} nodes")]
    BudgetExhausted { nodes: usize },

    #[error("search time limit of {limit_ms}ms exceeded after {nodes} nodes")]
    DeadlineExceeded { limit_ms: u128, nodes: usize },
}
