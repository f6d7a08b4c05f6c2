use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use drop_four::ai::{AlgorithmRegistry, InputEvent};
use drop_four::config::AppConfig;
use drop_four::game::{GameState, Player};
use drop_four::logging::{self, LogTarget};
use drop_four::session::{QueuedInput, Session, TurnDispatcher};
use drop_four::ui::App;

/// Play connect four in the terminal, against people or computer players.
#[derive(Parser)]
#[command(name = "drop-four", about = "Connect four with pluggable computer players")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "drop-four.toml")]
    config: PathBuf,

    /// Override the board width
    #[arg(long)]
    width: Option<usize>,

    /// Override the board height
    #[arg(long)]
    height: Option<usize>,

    /// Play computer against computer without the terminal UI
    #[arg(long)]
    headless: bool,

    /// Number of games to play in headless mode
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Write logs here while the terminal UI is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_filter: String,

    /// Print a config file with every default value and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let target = match (&cli.log_file, cli.headless) {
        (_, true) => LogTarget::Stderr,
        (Some(path), false) => LogTarget::File(path.clone()),
        (None, false) => LogTarget::Off,
    };
    logging::init(&cli.log_filter, target).context("setting up logging")?;

    // Load configuration
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(width) = cli.width {
        config.board.width = width;
    }
    if let Some(height) = cli.height {
        config.board.height = height;
    }
    config.validate().context("invalid configuration")?;

    let registry = AlgorithmRegistry::new();
    let game = config.build_game_state()?;
    for player in game.players() {
        registry
            .validate(player)
            .with_context(|| format!("checking player '{}'", player.name))?;
    }

    if cli.headless {
        run_headless(game, registry, cli.games)
    } else {
        run_tui(&config, game, registry, cli.config)
    }
}

fn run_tui(
    config: &AppConfig,
    game: GameState,
    registry: AlgorithmRegistry,
    config_path: PathBuf,
) -> Result<()> {
    let (input, sender) = QueuedInput::new();
    let mut dispatcher = TurnDispatcher::new(input, registry)
        .with_observation_pause(config.session.observation_pause());
    dispatcher.set_autoplay(config.session.autoplay);
    let mut session = Session::new(game, dispatcher);
    session.start_new_game();
    let mut app = App::new(session, sender, Some(config_path));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.context("terminal UI failed")
}

fn run_headless(game: GameState, registry: AlgorithmRegistry, games: usize) -> Result<()> {
    if !game.only_computer_players() {
        bail!("headless mode needs two computer players (set `computer = true` and `algorithm` for red and yellow)");
    }

    let (input, sender) = QueuedInput::new();
    let mut session = Session::new(game, TurnDispatcher::new(input, registry));
    session.start_new_game();
    sender.send(InputEvent::Start);

    // Computer-only matches never pause between games
    while session.game().game_count() < games {
        session.step().context("playing a move")?;
    }

    let game = session.game();
    for player in Player::ALL {
        let info = game.player(player);
        info!(
            player = %info.name,
            wins = game.wins(player),
            analyzed = info.counters.moves_analyzed,
            moves_per_sec = info.counters.moves_per_second(),
            "final statistics"
        );
    }
    println!(
        "{} games: {} {} wins, {} {} wins, {} draws",
        game.game_count(),
        game.player(Player::Red).name,
        game.wins(Player::Red),
        game.player(Player::Yellow).name,
        game.wins(Player::Yellow),
        game.draw_count()
    );
    Ok(())
}
