use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::ai::{AlgorithmRegistry, InputEvent, MoveProvider};
use crate::error::DispatchError;
use crate::game::{GameState, Player};

/// Where a session stands from the dispatcher's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// The game is over and a human has to ask for the next one.
    AwaitingControl,
    HumanTurn,
    ComputerTurn,
    /// Computer-only match waiting for a `Start` event.
    AutoplayPaused,
    /// The game is over and the next one starts automatically.
    GameOver,
}

/// Result of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// Nothing to do this cycle.
    Idle,
    Event(InputEvent),
    /// Handle `event` after the driver has waited for `delay`.
    Delayed { delay: Duration, event: InputEvent },
}

impl From<Option<InputEvent>> for Poll {
    fn from(event: Option<InputEvent>) -> Self {
        event.map_or(Poll::Idle, Poll::Event)
    }
}

/// Routes each poll to the human input channel or to the current computer
/// player's provider, and handles session control events on the way.
///
/// The human channel doubles as the global control surface: in a match
/// between two computer players it is still polled for `Start`, `Stop`,
/// `NewGame` and reload requests.
pub struct TurnDispatcher<H> {
    human: H,
    registry: AlgorithmRegistry,
    autoplay: bool,
    observation_pause: Duration,
}

impl<H: MoveProvider> TurnDispatcher<H> {
    pub const DEFAULT_OBSERVATION_PAUSE: Duration = Duration::from_secs(3);

    pub fn new(human: H, mut registry: AlgorithmRegistry) -> Self {
        // A session always starts with fresh algorithm instances
        registry.invalidate_all();
        TurnDispatcher {
            human,
            registry,
            autoplay: false,
            observation_pause: Self::DEFAULT_OBSERVATION_PAUSE,
        }
    }

    /// How long players get to look at a finished board before the next game
    /// when a human takes part.
    pub fn with_observation_pause(mut self, pause: Duration) -> Self {
        self.observation_pause = pause;
        self
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn set_autoplay(&mut self, on: bool) {
        if self.autoplay != on {
            info!("auto-play is now {}", if on { "ON" } else { "OFF" });
        }
        self.autoplay = on;
    }

    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut AlgorithmRegistry {
        &mut self.registry
    }

    pub fn human_mut(&mut self) -> &mut H {
        &mut self.human
    }

    /// Forget every algorithm instance; they are recreated on their next turn.
    pub fn reload_algorithms(&mut self) {
        info!("algorithm implementations will be reloaded");
        self.registry.invalidate_all();
    }

    /// Discard pending human input.
    pub fn clear_queue(&mut self) {
        self.human.clear_queue();
    }

    pub fn turn_state(&self, game: &GameState) -> TurnState {
        let current_is_computer = game.current_player_info().is_computer();
        if game.is_game_over() {
            if current_is_computer {
                TurnState::GameOver
            } else {
                TurnState::AwaitingControl
            }
        } else if game.only_computer_players() && !self.autoplay {
            TurnState::AutoplayPaused
        } else if current_is_computer {
            TurnState::ComputerTurn
        } else {
            TurnState::HumanTurn
        }
    }

    /// Run one poll cycle. Blocks while a computer player thinks.
    pub fn poll(&mut self, game: &mut GameState) -> Result<Poll, DispatchError> {
        let only_computers = game.only_computer_players();

        if only_computers {
            let event = self.human.read(game);
            if let Some(InputEvent::NewGame) = self.filter_control(event) {
                return Ok(Poll::Event(InputEvent::NewGame));
            }
        }

        let current = game.current_player();
        if !game.player(current).is_computer() {
            let event = self.human.read(game);
            return Ok(self.filter_control(event).into());
        }

        if game.is_game_over() {
            if only_computers {
                return Ok(Poll::Event(InputEvent::NewGame));
            }
            return Ok(Poll::Delayed {
                delay: self.observation_pause,
                event: InputEvent::NewGame,
            });
        }

        if only_computers && !self.autoplay {
            return Ok(Poll::Idle);
        }

        self.computer_move(game, current).map(Poll::from)
    }

    /// Handle control events from the human channel. Returns the events that
    /// are not consumed here.
    fn filter_control(&mut self, event: Option<InputEvent>) -> Option<InputEvent> {
        match event? {
            InputEvent::Stop => {
                self.set_autoplay(false);
                None
            }
            InputEvent::Start => {
                self.set_autoplay(true);
                None
            }
            InputEvent::PlayerMetadataChanged => {
                self.reload_algorithms();
                None
            }
            other => Some(other),
        }
    }

    fn computer_move(
        &mut self,
        game: &mut GameState,
        seat: Player,
    ) -> Result<Option<InputEvent>, DispatchError> {
        let provider = match self.registry.resolve(seat, game.player_mut(seat)) {
            Ok(provider) => provider,
            Err(err) => {
                error!(%err, "cannot continue with this player");
                return Err(err.into());
            }
        };

        let info = game.player(seat);
        info!(
            player = %info.name,
            depth = info.think_depth,
            "thinking"
        );
        let started = Instant::now();
        let event = provider.read(game);
        let elapsed = started.elapsed();
        let analyzed = provider.take_moves_analyzed();

        let info = game.player_mut(seat);
        info.counters.record(analyzed, elapsed);
        debug!(
            player = %info.name,
            ?elapsed,
            analyzed,
            moves_per_sec = info.counters.moves_per_second(),
            "done thinking"
        );
        Ok(event)
    }
}
