//! Core game logic: board, players, win detection and the per-session game
//! state with turn order and statistics.

mod board;
mod outcome;
mod player;
mod state;

pub use board::{Board, MIN_SIZE, WIN_LENGTH};
pub use outcome::{detect_outcome, GameOutcome};
pub use player::{Controller, PerformanceCounters, Player, PlayerInfo};
pub use state::GameState;
