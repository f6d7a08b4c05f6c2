use std::time::Duration;

use tracing::{info, warn};

use super::dispatcher::{Poll, TurnDispatcher, TurnState};
use crate::ai::{InputEvent, MoveProvider};
use crate::error::{DispatchError, MoveError};
use crate::game::{GameOutcome, GameState, Player};

/// What a session step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Idle,
    Moved {
        player: Player,
        column: usize,
        row: usize,
        outcome: Option<GameOutcome>,
    },
    /// A move event that did not fit the game; play goes on unchanged.
    Rejected { event: InputEvent, reason: MoveError },
    NewGame { starting: Player },
    /// The driver should wait for `delay` (or less, if it wants to shut down)
    /// and then hand `then` to [`Session::apply`].
    Pause { delay: Duration, then: InputEvent },
    /// A control event that reached the session, already acted upon.
    Control(InputEvent),
}

/// A running game session: the game state plus the dispatcher that decides
/// who moves next. Drivers call [`Session::step`] in a loop.
pub struct Session<H> {
    game: GameState,
    dispatcher: TurnDispatcher<H>,
}

impl<H: MoveProvider> Session<H> {
    pub fn new(game: GameState, dispatcher: TurnDispatcher<H>) -> Self {
        Session { game, dispatcher }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Mutable access, e.g. to edit player settings before sending
    /// `PlayerMetadataChanged`.
    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    pub fn dispatcher(&self) -> &TurnDispatcher<H> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut TurnDispatcher<H> {
        &mut self.dispatcher
    }

    pub fn turn_state(&self) -> TurnState {
        self.dispatcher.turn_state(&self.game)
    }

    /// Poll once and apply whatever came back.
    pub fn step(&mut self) -> Result<Step, DispatchError> {
        let step = match self.dispatcher.poll(&mut self.game)? {
            Poll::Idle => Step::Idle,
            Poll::Event(event) => self.apply(event),
            Poll::Delayed { delay, event } => Step::Pause { delay, then: event },
        };
        Ok(step)
    }

    pub fn start_new_game(&mut self) -> Step {
        self.apply(InputEvent::NewGame)
    }

    /// Apply an event to the game.
    pub fn apply(&mut self, event: InputEvent) -> Step {
        match event {
            InputEvent::Move { player, column } => self.apply_move(event, player, column),
            InputEvent::NewGame => {
                self.game.start_new_game();
                self.dispatcher.clear_queue();
                let starting = self.game.current_player();
                info!(
                    game = self.game.game_count() + 1,
                    starting = %self.game.player(starting).name,
                    "new game"
                );
                Step::NewGame { starting }
            }
            InputEvent::Start => {
                self.dispatcher.set_autoplay(true);
                Step::Control(event)
            }
            InputEvent::Stop => {
                self.dispatcher.set_autoplay(false);
                Step::Control(event)
            }
            InputEvent::PlayerMetadataChanged => {
                self.dispatcher.reload_algorithms();
                Step::Control(event)
            }
        }
    }

    fn apply_move(&mut self, event: InputEvent, player: Player, column: usize) -> Step {
        match self.game.apply_move(player, column) {
            Ok(row) => {
                let outcome = self.game.outcome();
                if let Some(outcome) = outcome {
                    let game = &self.game;
                    info!(
                        %outcome,
                        games = game.game_count(),
                        red_wins = game.wins(Player::Red),
                        yellow_wins = game.wins(Player::Yellow),
                        draws = game.draw_count(),
                        "game over\n{}",
                        game.board()
                    );
                }
                Step::Moved {
                    player,
                    column,
                    row,
                    outcome,
                }
            }
            Err(reason) => {
                warn!(%reason, ?event, "move rejected");
                Step::Rejected { event, reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AlgorithmFactory, AlgorithmRegistry};
    use crate::game::{Board, PlayerInfo};
    use crate::session::input::{InputSender, QueuedInput};

    /// Plays the rightmost free column.
    struct Rightmost;

    impl MoveProvider for Rightmost {
        fn read(&mut self, state: &GameState) -> Option<InputEvent> {
            let column = *state.board().legal_columns().last()?;
            Some(InputEvent::Move {
                player: state.current_player(),
                column,
            })
        }
    }

    fn make_rightmost(_player: &PlayerInfo) -> Box<dyn MoveProvider> {
        Box::new(Rightmost)
    }

    fn session(red: PlayerInfo, yellow: PlayerInfo) -> (Session<QueuedInput>, InputSender) {
        let registry = AlgorithmRegistry::with_factories(vec![AlgorithmFactory {
            name: "rightmost",
            summary: "rightmost free column",
            make: make_rightmost,
        }]);
        let (input, sender) = QueuedInput::new();
        let dispatcher =
            TurnDispatcher::new(input, registry).with_observation_pause(Duration::from_millis(10));
        let game = GameState::new(Board::standard(), red, yellow);
        (Session::new(game, dispatcher), sender)
    }

    #[test]
    fn human_and_computer_take_turns() {
        let (mut session, sender) = session(
            PlayerInfo::human("Alice"),
            PlayerInfo::computer("Bot", "rightmost"),
        );

        assert_eq!(session.step(), Ok(Step::Idle));
        sender.send(InputEvent::Move {
            player: Player::Red,
            column: 2,
        });
        assert_eq!(
            session.step(),
            Ok(Step::Moved {
                player: Player::Red,
                column: 2,
                row: 5,
                outcome: None
            })
        );
        assert_eq!(session.turn_state(), TurnState::ComputerTurn);
        assert_eq!(
            session.step(),
            Ok(Step::Moved {
                player: Player::Yellow,
                column: 6,
                row: 5,
                outcome: None
            })
        );
        assert_eq!(session.turn_state(), TurnState::HumanTurn);
    }

    #[test]
    fn illegal_moves_are_rejected() {
        let (mut session, sender) = session(
            PlayerInfo::human("Alice"),
            PlayerInfo::human("Bob"),
        );

        let wrong_turn = InputEvent::Move {
            player: Player::Yellow,
            column: 0,
        };
        sender.send(wrong_turn);
        assert_eq!(
            session.step(),
            Ok(Step::Rejected {
                event: wrong_turn,
                reason: MoveError::NotYourTurn {
                    expected: Player::Red,
                    got: Player::Yellow
                }
            })
        );

        let off_board = InputEvent::Move {
            player: Player::Red,
            column: 9,
        };
        sender.send(off_board);
        assert!(matches!(
            session.step(),
            Ok(Step::Rejected {
                reason: MoveError::InvalidColumn { .. },
                ..
            })
        ));
        assert!(session.game().board().is_empty());
    }

    #[test]
    fn finished_mixed_game_pauses_then_restarts() {
        let (mut session, sender) = session(
            PlayerInfo::computer("Bot", "rightmost"),
            PlayerInfo::human("Alice"),
        );

        // Bot stacks column 6, Alice keeps dropping into column 0
        loop {
            match session.step().unwrap() {
                Step::Moved {
                    outcome: Some(outcome),
                    ..
                } => {
                    assert_eq!(outcome, GameOutcome::Win(Player::Red));
                    break;
                }
                Step::Moved { player: Player::Red, .. } => {
                    sender.send(InputEvent::Move {
                        player: Player::Yellow,
                        column: 0,
                    });
                }
                other => assert!(matches!(other, Step::Moved { .. }), "unexpected {other:?}"),
            }
        }

        // The winner stays current, so the computer branch offers a new game
        assert_eq!(
            session.step(),
            Ok(Step::Pause {
                delay: Duration::from_millis(10),
                then: InputEvent::NewGame
            })
        );
        assert_eq!(session.game().game_count(), 1);

        let Step::NewGame { starting } = session.apply(InputEvent::NewGame) else {
            panic!("expected a new game");
        };
        assert_eq!(session.game().current_player(), starting);
        assert!(session.game().board().is_empty());
        assert_eq!(session.game().wins(Player::Red), 1);
    }

    #[test]
    fn computer_only_session_plays_whole_games() {
        let (mut session, sender) = session(
            PlayerInfo::computer("A", "rightmost"),
            PlayerInfo::computer("B", "rightmost"),
        );
        session.start_new_game();
        assert_eq!(session.step(), Ok(Step::Idle));

        sender.send(InputEvent::Start);
        let mut steps = 0;
        while session.game().game_count() < 3 {
            session.step().unwrap();
            steps += 1;
            assert!(steps < 1000, "session did not make progress");
        }
        assert_eq!(session.game().game_count(), 3);
        let game = session.game();
        assert_eq!(
            game.wins(Player::Red) + game.wins(Player::Yellow) + game.draw_count(),
            3
        );
    }

    #[test]
    fn control_events_from_apply_reach_dispatcher() {
        let (mut session, _sender) = session(
            PlayerInfo::computer("A", "rightmost"),
            PlayerInfo::computer("B", "rightmost"),
        );
        assert_eq!(
            session.apply(InputEvent::Start),
            Step::Control(InputEvent::Start)
        );
        assert!(session.dispatcher().autoplay());
        session.apply(InputEvent::Stop);
        assert!(!session.dispatcher().autoplay());
    }

    #[test]
    fn rejected_step_keeps_its_reason_when_copied() {
        let (mut session, sender) = session(
            PlayerInfo::human("Alice"),
            PlayerInfo::human("Bob"),
        );
        sender.send(InputEvent::Move {
            player: Player::Red,
            column: 7,
        });
        let step = session.step().unwrap();
        let copy = step;
        assert_eq!(step, copy);
        assert!(matches!(
            copy,
            Step::Rejected {
                reason: MoveError::InvalidColumn { column: 7, width: 7 },
                ..
            }
        ));
    }

    #[test]
    fn new_game_discards_queued_input() {
        let (mut session, sender) = session(
            PlayerInfo::human("Alice"),
            PlayerInfo::human("Bob"),
        );
        sender.send(InputEvent::Move {
            player: Player::Red,
            column: 1,
        });
        session.start_new_game();
        assert_eq!(session.step(), Ok(Step::Idle));
    }
}
