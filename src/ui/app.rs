use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::{info, warn};

use super::game_view::{self, StatusLine};
use crate::ai::InputEvent;
use crate::config::AppConfig;
use crate::game::{GameOutcome, Player};
use crate::session::{InputSender, QueuedInput, Session, Step, TurnState};

const FRAME: Duration = Duration::from_millis(100);

pub struct App {
    session: Session<QueuedInput>,
    input: InputSender,
    config_path: Option<PathBuf>,
    selected_column: usize,
    /// Event to apply once the observation pause runs out.
    pending: Option<(Instant, InputEvent)>,
    /// Set when the current computer player cannot be resolved; cleared by
    /// a reload or a new game.
    stalled: bool,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    /// `config_path` is re-read when the player presses `r`.
    pub fn new(
        session: Session<QueuedInput>,
        input: InputSender,
        config_path: Option<PathBuf>,
    ) -> Self {
        let selected_column = session.game().board().width() / 2;
        App {
            session,
            input,
            config_path,
            selected_column,
            pending: None,
            stalled: false,
            should_quit: false,
            message: None,
        }
    }

    pub fn session(&self) -> &Session<QueuedInput> {
        &self.session
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            terminal
                .draw(|f| self.render(f))
                .map_err(Into::<io::Error>::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
            if !self.should_quit {
                self.tick();
            }
        }
        Ok(())
    }

    fn poll_timeout(&self) -> Duration {
        if let Some((deadline, _)) = self.pending {
            return deadline.saturating_duration_since(Instant::now()).min(FRAME);
        }
        match self.session.turn_state() {
            TurnState::ComputerTurn | TurnState::GameOver if !self.stalled => Duration::ZERO,
            _ => FRAME,
        }
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(self.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Advance the session by one step, or wait out the pause.
    fn tick(&mut self) {
        if let Some((deadline, event)) = self.pending {
            if Instant::now() >= deadline {
                self.pending = None;
                let step = self.session.apply(event);
                self.show(step);
            }
            return;
        }
        if self.stalled {
            return;
        }
        match self.session.step() {
            Ok(step) => self.show(step),
            Err(err) => {
                self.stalled = true;
                self.message = Some(format!("{err}. Fix the config and press 'r'."));
            }
        }
    }

    fn show(&mut self, step: Step) {
        match step {
            Step::Idle => {}
            Step::Moved {
                player,
                outcome: Some(outcome),
                ..
            } => {
                let game = self.session.game();
                self.message = Some(match outcome {
                    GameOutcome::Win(_) => format!("{} wins!", game.player(player).name),
                    GameOutcome::Draw => "It's a draw!".to_string(),
                });
            }
            Step::Moved { .. } => {}
            Step::Rejected { reason, .. } => {
                self.message = Some(format!("Move rejected: {reason}"));
            }
            Step::NewGame { starting } => {
                let name = &self.session.game().player(starting).name;
                self.message = Some(format!("New game, {name} starts"));
                self.selected_column = self.session.game().board().width() / 2;
            }
            Step::Pause { delay, then } => {
                self.pending = Some((Instant::now() + delay, then));
            }
            Step::Control(event) => self.message = Some(describe_control(event)),
        }
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                let last = self.session.game().board().width() - 1;
                self.selected_column = (self.selected_column + 1).min(last);
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.drop_tile(),
            KeyCode::Char('n') => {
                self.stalled = false;
                if self.pending.take().is_some() {
                    let step = self.session.apply(InputEvent::NewGame);
                    self.show(step);
                } else {
                    self.send(InputEvent::NewGame);
                }
            }
            KeyCode::Char('s') => self.send(InputEvent::Start),
            KeyCode::Char('p') => self.send(InputEvent::Stop),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
    }

    fn drop_tile(&mut self) {
        match self.session.turn_state() {
            TurnState::HumanTurn => {
                let player = self.session.game().current_player();
                self.send(InputEvent::Move {
                    player,
                    column: self.selected_column,
                });
            }
            TurnState::AwaitingControl | TurnState::GameOver => {
                self.message = Some("Game over! Press 'n' for a new game.".to_string());
            }
            TurnState::ComputerTurn | TurnState::AutoplayPaused => {
                self.message = Some("Not your turn.".to_string());
            }
        }
    }

    /// Re-read the player settings and rebind their algorithms.
    fn reload(&mut self) {
        if let Some(path) = &self.config_path {
            match AppConfig::load_or_default(path) {
                Ok(config) => {
                    let game = self.session.game_mut();
                    config.red.apply_to(game.player_mut(Player::Red));
                    config.yellow.apply_to(game.player_mut(Player::Yellow));
                    info!(path = %path.display(), "player settings reloaded");
                }
                Err(err) => {
                    warn!(%err, "keeping current player settings");
                    self.message = Some(err.to_string());
                    return;
                }
            }
        }
        self.stalled = false;
        self.send(InputEvent::PlayerMetadataChanged);
    }

    fn send(&mut self, event: InputEvent) {
        if !self.input.send(event) {
            self.message = Some("Input channel closed".to_string());
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let status = StatusLine {
            turn: self.session.turn_state(),
            autoplay: self.session.dispatcher().autoplay(),
            pausing: self.pending.is_some(),
        };
        game_view::render(
            frame,
            self.session.game(),
            &status,
            self.selected_column,
            &self.message,
        );
    }
}

fn describe_control(event: InputEvent) -> String {
    match event {
        InputEvent::Start => "Auto-play on".to_string(),
        InputEvent::Stop => "Auto-play off".to_string(),
        InputEvent::PlayerMetadataChanged => "Algorithms reloaded".to_string(),
        other => format!("{other:?}"),
    }
}
