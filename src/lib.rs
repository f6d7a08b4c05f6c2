//! # Drop Four
//!
//! Two-player connect four on a board of any size (at least 4x4). Each seat
//! is either a human, feeding moves through an input queue, or a computer
//! player bound by name to an algorithm from a registry.
//!
//! ## Modules
//!
//! - [`game`]: board, win detection, players and game state
//! - [`ai`]: the move provider trait, built-in algorithms and their registry
//! - [`session`]: turn dispatcher, human input queue, observation pause
//! - [`ui`]: terminal UI
//! - [`config`]: TOML configuration loading and validation
//! - [`logging`]: tracing subscriber setup
//! - [`error`]: structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod session;
pub mod ui;
