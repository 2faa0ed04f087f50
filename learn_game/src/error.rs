use crate::board::Mark;
use std::path::PathBuf;

/// A move the controller refused. The board is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMove {
    #[error("cell {0} is outside the board (expected 0-8)")]
    OutOfRange(usize),

    #[error("cell {0} is already taken")]
    Occupied(usize),

    #[error("it is not {}'s turn", .0.as_char())]
    OutOfTurn(Mark),

    #[error("the game is already over")]
    GameOver,
}

/// A board layout string that is not nine of `X`, `O` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid board layout {0:?}: expected nine of 'X', 'O' or '-'")]
pub struct ParseStateError(pub String);

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors that end an interactive session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("frontend I/O error: {0}")]
    Input(#[from] std::io::Error),
}
