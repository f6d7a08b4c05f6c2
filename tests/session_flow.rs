use std::sync::Once;
use std::time::Duration;

use drop_four::ai::{AlgorithmFactory, AlgorithmRegistry, InputEvent, MoveProvider};
use drop_four::config::AppConfig;
use drop_four::game::{Controller, GameOutcome, GameState, Player, PlayerInfo};
use drop_four::session::{QueuedInput, Session, Step, TurnDispatcher, TurnState};
use tracing_subscriber::EnvFilter;

static LOGGING: Once = Once::new();

fn init_logging() {
    LOGGING.call_once(|| {
        let filter = std::env::var("TEST_LOG")
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Always plays the first free column from the left.
struct Stubborn;

impl MoveProvider for Stubborn {
    fn read(&mut self, state: &GameState) -> Option<InputEvent> {
        let column = *state.board().legal_columns().first()?;
        Some(InputEvent::Move {
            player: state.current_player(),
            column,
        })
    }

    fn take_moves_analyzed(&mut self) -> u64 {
        1
    }
}

fn make_stubborn(_player: &PlayerInfo) -> Box<dyn MoveProvider> {
    Box::new(Stubborn)
}

const STUBBORN: AlgorithmFactory = AlgorithmFactory {
    name: "stubborn",
    summary: "first free column",
    make: make_stubborn,
};

fn config_from(toml_str: &str) -> AppConfig {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drop-four.toml");
    std::fs::write(&path, toml_str).unwrap();
    AppConfig::load(&path).unwrap()
}

#[test]
fn computer_match_from_config_file() {
    init_logging();
    let config = config_from(
        r#"
[board]
width = 5
height = 4

[red]
name = "Randy"
computer = true
algorithm = "random"

[yellow]
name = "Max"
computer = true
algorithm = "negamax"
think_depth = 2
"#,
    );

    let registry = AlgorithmRegistry::new();
    let game = config.build_game_state().unwrap();
    for player in game.players() {
        registry.validate(player).unwrap();
    }

    let (input, sender) = QueuedInput::new();
    let dispatcher = TurnDispatcher::new(input, registry)
        .with_observation_pause(config.session.observation_pause());
    let mut session = Session::new(game, dispatcher);
    session.start_new_game();
    assert_eq!(session.turn_state(), TurnState::AutoplayPaused);

    sender.send(InputEvent::Start);
    let mut outcomes = Vec::new();
    for _ in 0..10_000 {
        if session.game().game_count() == 5 {
            break;
        }
        match session.step().unwrap() {
            Step::Moved {
                outcome: Some(outcome),
                ..
            } => outcomes.push(outcome),
            Step::Pause { .. } => panic!("computer-only matches do not pause"),
            _ => {}
        }
    }

    assert_eq!(outcomes.len(), 5);
    let game = session.game();
    let wins: usize = Player::ALL.iter().map(|&p| game.wins(p)).sum();
    assert_eq!(wins + game.draw_count(), 5);
    assert_eq!(
        outcomes.iter().filter(|o| **o == GameOutcome::Draw).count(),
        game.draw_count()
    );
    assert!(game.player(Player::Yellow).counters.moves_analyzed > 0);
}

#[test]
fn human_against_registered_algorithm() {
    init_logging();
    let mut registry = AlgorithmRegistry::new();
    registry.register(STUBBORN);

    let (input, sender) = QueuedInput::new();
    let dispatcher =
        TurnDispatcher::new(input, registry).with_observation_pause(Duration::from_millis(5));
    let game = GameState::new(
        drop_four::game::Board::standard(),
        PlayerInfo::human("Alice"),
        PlayerInfo::computer("Mule", "stubborn"),
    );
    let mut session = Session::new(game, dispatcher);

    // Alice builds a horizontal line on the bottom row while Mule stacks
    // column 0 and then column 1.
    let mut step = 0;
    for column in [3, 4, 5, 6] {
        sender.send(InputEvent::Move {
            player: Player::Red,
            column,
        });
        assert!(matches!(session.step().unwrap(), Step::Moved { player: Player::Red, .. }));
        if session.game().is_game_over() {
            break;
        }
        assert!(matches!(
            session.step().unwrap(),
            Step::Moved {
                player: Player::Yellow,
                ..
            }
        ));
        step += 1;
    }
    assert_eq!(step, 3);
    assert_eq!(session.game().outcome(), Some(GameOutcome::Win(Player::Red)));
    assert_eq!(session.turn_state(), TurnState::AwaitingControl);

    // Moves after the end are rejected; a new game is a control event
    sender.send(InputEvent::Move {
        player: Player::Red,
        column: 0,
    });
    assert!(matches!(session.step().unwrap(), Step::Rejected { .. }));
    sender.send(InputEvent::NewGame);
    assert!(matches!(session.step().unwrap(), Step::NewGame { .. }));
    assert_eq!(session.game().wins(Player::Red), 1);
    assert!(session.game().board().is_empty());
}

#[test]
fn reload_rebinds_changed_algorithm() {
    init_logging();
    let mut registry = AlgorithmRegistry::new();
    registry.register(STUBBORN);

    let (input, sender) = QueuedInput::new();
    let dispatcher = TurnDispatcher::new(input, registry);
    let game = GameState::new(
        drop_four::game::Board::standard(),
        PlayerInfo::computer("Bot", "stubborn"),
        PlayerInfo::human("Alice"),
    );
    let mut session = Session::new(game, dispatcher);

    assert!(matches!(session.step().unwrap(), Step::Moved { column: 0, .. }));
    assert_eq!(session.game().player(Player::Red).counters.moves_analyzed, 1);

    // Swap Bot to negamax and tell the dispatcher
    session.game_mut().player_mut(Player::Red).controller = Controller::Computer {
        algorithm: "negamax".into(),
    };
    session.game_mut().player_mut(Player::Red).think_depth = 1;
    sender.send(InputEvent::PlayerMetadataChanged);
    sender.send(InputEvent::Move {
        player: Player::Yellow,
        column: 6,
    });
    // Alice's turn: the reload is consumed first, then her move
    assert_eq!(session.step().unwrap(), Step::Idle);
    assert!(!session.dispatcher().registry().is_cached(Player::Red));
    assert!(matches!(
        session.step().unwrap(),
        Step::Moved {
            player: Player::Yellow,
            column: 6,
            ..
        }
    ));

    assert!(matches!(
        session.step().unwrap(),
        Step::Moved {
            player: Player::Red,
            ..
        }
    ));
    // negamax at depth 1 looks at every legal column
    assert_eq!(session.game().player(Player::Red).counters.moves_analyzed, 7);
}

#[test]
fn unknown_algorithm_is_reported() {
    init_logging();
    let (input, _sender) = QueuedInput::new();
    let dispatcher = TurnDispatcher::new(input, AlgorithmRegistry::new());
    let game = GameState::new(
        drop_four::game::Board::standard(),
        PlayerInfo::computer("Ghost", "alphazero"),
        PlayerInfo::human("Alice"),
    );
    let mut session = Session::new(game, dispatcher);

    let err = session.step().unwrap_err();
    assert!(err.to_string().contains("alphazero"));
    assert!(session.game().board().is_empty());
}
