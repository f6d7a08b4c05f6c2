use crate::game::GameState;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use super::provider::{InputEvent, MoveProvider};

/// A computer player that drops into a uniformly random non-full column.
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub const NAME: &'static str = "random";

    pub fn new() -> Self {
        RandomPlayer {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomPlayer {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveProvider for RandomPlayer {
    fn read(&mut self, state: &GameState) -> Option<InputEvent> {
        let columns = state.board().legal_columns();
        let column = *columns.choose(&mut self.rng)?;
        Some(InputEvent::Move {
            player: state.current_player(),
            column,
        })
    }
}
