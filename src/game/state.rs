use std::collections::HashMap;

use rand::Rng;

use super::outcome::detect_outcome;
use super::{Board, GameOutcome, Player, PlayerInfo};
use crate::error::MoveError;

/// Board, player pair, turn order and cumulative statistics for a session.
///
/// The same state is reused across games: `start_new_game` clears the board but
/// keeps the win and game counters.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    board: Board,
    players: [PlayerInfo; 2],
    current: usize,
    game_count: usize,
    win_counts: HashMap<Player, usize>,
}

impl GameState {
    /// Create a state where `red` is the first player and moves first.
    pub fn new(board: Board, red: PlayerInfo, yellow: PlayerInfo) -> Self {
        GameState {
            board,
            players: [red, yellow],
            current: 0,
            game_count: 0,
            win_counts: Player::ALL.iter().map(|&p| (p, 0)).collect(),
        }
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn players(&self) -> &[PlayerInfo; 2] {
        &self.players
    }

    pub fn player(&self, player: Player) -> &PlayerInfo {
        &self.players[player.index()]
    }

    pub fn player_mut(&mut self, player: Player) -> &mut PlayerInfo {
        &mut self.players[player.index()]
    }

    pub fn only_computer_players(&self) -> bool {
        self.players.iter().all(PlayerInfo::is_computer)
    }

    /// Number of finished games.
    pub fn game_count(&self) -> usize {
        self.game_count
    }

    pub fn win_counts(&self) -> &HashMap<Player, usize> {
        &self.win_counts
    }

    pub fn wins(&self, player: Player) -> usize {
        self.win_counts.get(&player).copied().unwrap_or(0)
    }

    pub fn draw_count(&self) -> usize {
        self.game_count - self.win_counts.values().sum::<usize>()
    }

    /// Clear the board and pick the starting player at random.
    pub fn start_new_game(&mut self) {
        self.start_new_game_with(&mut rand::rng());
    }

    pub fn start_new_game_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.board.clear();
        self.current = rng.random_range(0..self.players.len());
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        Player::ALL[self.current]
    }

    pub fn current_player_info(&self) -> &PlayerInfo {
        &self.players[self.current]
    }

    /// The player that moves after the current one.
    pub fn next_player(&self) -> Player {
        self.current_player().other()
    }

    pub fn advance_to_next_player(&mut self) {
        self.current = self.next_player().index();
    }

    /// Terminal outcome of the current board, if any.
    pub fn outcome(&self) -> Option<GameOutcome> {
        detect_outcome(&self.board)
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Update statistics after a tile has been placed. Must be called once per
    /// move; a terminal board counts as a finished game.
    pub fn move_finished(&mut self) {
        if let Some(outcome) = self.outcome() {
            self.game_count += 1;
            if let GameOutcome::Win(winner) = outcome {
                *self.win_counts.entry(winner).or_insert(0) += 1;
            }
        }
    }

    /// Drop a tile for `player` and do the per-move bookkeeping. The turn
    /// passes to the other player unless the move ended the game.
    pub fn apply_move(&mut self, player: Player, column: usize) -> Result<usize, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let expected = self.current_player();
        if player != expected {
            return Err(MoveError::NotYourTurn {
                expected,
                got: player,
            });
        }
        if column >= self.board.width() {
            return Err(MoveError::InvalidColumn {
                column,
                width: self.board.width(),
            });
        }

        let row = self
            .board
            .drop_tile(column, player)
            .ok_or(MoveError::ColumnFull(column))?;

        self.move_finished();
        if !self.is_game_over() {
            self.advance_to_next_player();
        }
        Ok(row)
    }
}
