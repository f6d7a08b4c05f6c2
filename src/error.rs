use std::path::PathBuf;

use crate::game::Player;

/// Errors raised by board construction and direct cell access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board must be at least 4x4 tiles, got {width}x{height}")]
    TooSmall { width: usize, height: usize },

    #[error("({x},{y}) is already set to {owner}")]
    CellOccupied { x: usize, y: usize, owner: Player },
}

/// Reasons a move event is rejected by the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("game is already over")]
    GameOver,

    #[error("it is {expected}'s turn, not {got}'s")]
    NotYourTurn { expected: Player, got: Player },

    #[error("column {column} is outside the board (width {width})")]
    InvalidColumn { column: usize, width: usize },

    #[error("column {0} is full")]
    ColumnFull(usize),
}

/// Errors raised when binding a player to its algorithm.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to load algorithm '{algorithm}' for player '{player}': no such algorithm (known: {known:?})")]
    UnknownAlgorithm {
        player: String,
        algorithm: String,
        known: Vec<&'static str>,
    },

    #[error("player '{0}' is not computer-controlled")]
    NotComputer(String),
}

/// Errors that stop the turn dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("move provider unavailable: {0}")]
    Registry(#[from] RegistryError),
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

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
}
