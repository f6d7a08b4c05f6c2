use crate::game::{GameState, Player};

/// Something that happened on an input channel: a move, or a control event
/// that affects the session rather than the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Move { player: Player, column: usize },
    NewGame,
    /// Turn autoplay on for computer-only matches.
    Start,
    /// Turn autoplay off.
    Stop,
    /// Player settings changed; every algorithm instance must be recreated.
    PlayerMetadataChanged,
}

impl InputEvent {
    pub fn is_control(&self) -> bool {
        !matches!(self, InputEvent::Move { .. })
    }
}

/// Source of moves and control events for a game.
///
/// Human-backed providers surface whatever the user entered since the last
/// call; computer-backed providers compute a move for the current player and
/// may block while doing so.
pub trait MoveProvider {
    /// Next event for this game state, or `None` if nothing happened.
    fn read(&mut self, state: &GameState) -> Option<InputEvent>;

    /// Discard buffered input. Nothing to do for computer players.
    fn clear_queue(&mut self) {}

    /// Positions examined since the last call. Used for speed statistics.
    fn take_moves_analyzed(&mut self) -> u64 {
        0
    }
}

impl<P: MoveProvider + ?Sized> MoveProvider for Box<P> {
    fn read(&mut self, state: &GameState) -> Option<InputEvent> {
        (**self).read(state)
    }

    fn clear_queue(&mut self) {
        (**self).clear_queue();
    }

    fn take_moves_analyzed(&mut self) -> u64 {
        (**self).take_moves_analyzed()
    }
}
