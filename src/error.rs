// Error types for the game engine
//
// Every failure the core can report is synchronous and local. Callers branch
// on `GameError::kind()` when they only care about the category.

use std::path::PathBuf;

use crate::types::{GameStatus, PlayerId};

/// Broad category of a `GameError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A column index outside the board
    Range,
    /// The operation is not allowed in the current state
    InvalidState,
    /// The caller supplied an inconsistent set of arguments
    Argument,
    /// A background task failed before producing a result
    Internal,
}

/// Errors raised by board, state and orchestrator operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("column {column} is out of range")]
    ColumnOutOfRange { column: usize },

    #[error("column {column} is full")]
    ColumnFull { column: usize },

    #[error("column {column} is not a playable move")]
    InvalidMove { column: usize },

    #[error("game is already over ({status:?})")]
    GameOver { status: GameStatus },

    #[error("no AI strategy is configured for this game")]
    NoAiConfigured,

    #[error("it is not the AI's turn (player {player:?} to move)")]
    NotAiTurn { player: PlayerId },

    #[error("an AI opponent requires a difficulty")]
    MissingDifficulty,

    #[error("AI move task failed: {0}")]
    AiTaskFailed(String),
}

impl GameError {
    /// Returns the taxonomy bucket for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::ColumnOutOfRange { .. } => ErrorKind::Range,
            GameError::ColumnFull { .. }
            | GameError::InvalidMove { .. }
            | GameError::GameOver { .. }
            | GameError::NoAiConfigured
            | GameError::NotAiTurn { .. } => ErrorKind::InvalidState,
            GameError::MissingDifficulty => ErrorKind::Argument,
            GameError::AiTaskFailed(_) => ErrorKind::Internal,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
