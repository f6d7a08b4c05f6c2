use crate::game::{Board, GameState, Player, PlayerInfo};
use crate::session::TurnState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Session flags shown in the header.
pub struct StatusLine {
    pub turn: TurnState,
    pub autoplay: bool,
    pub pausing: bool,
}

pub fn render(
    frame: &mut Frame,
    game_state: &GameState,
    status: &StatusLine,
    selected_column: usize,
    message: &Option<String>,
) {
    let board_height = game_state.board().height() as u16 + 4;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),         // Header
            Constraint::Min(board_height), // Board
            Constraint::Length(3),         // Message
            Constraint::Length(4),         // Controls
        ])
        .split(frame.area());

    render_header(frame, game_state, status, chunks[0]);
    render_board(frame, game_state, selected_column, chunks[1]);
    render_message(frame, message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn color(player: Player) -> Color {
    match player {
        Player::Red => Color::Red,
        Player::Yellow => Color::Yellow,
    }
}

fn player_line(game_state: &GameState, player: Player) -> Line<'static> {
    let info: &PlayerInfo = game_state.player(player);
    let controller = info.algorithm().unwrap_or("human");
    let marker = if game_state.current_player() == player { "▶ " } else { "  " };
    let mut spans = vec![
        Span::raw(marker),
        Span::styled(
            format!("{}: {}", player.name(), info.name),
            Style::default().fg(color(player)).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " ({controller})  wins {}",
            game_state.wins(player)
        )),
    ];
    if info.is_computer() {
        spans.push(Span::styled(
            format!(
                "  depth {}  analyzed {}  {:.0} moves/s",
                info.think_depth,
                info.counters.moves_analyzed,
                info.counters.moves_per_second()
            ),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

/// Number of the game on the board; a finished game is already counted.
fn game_number(game_state: &GameState) -> usize {
    if game_state.is_game_over() {
        game_state.game_count()
    } else {
        game_state.game_count() + 1
    }
}

fn render_header(frame: &mut Frame, game_state: &GameState, status: &StatusLine, area: Rect) {
    let state = match status.turn {
        TurnState::HumanTurn => "your move",
        TurnState::ComputerTurn => "thinking",
        TurnState::AutoplayPaused => "auto-play paused (s to start)",
        TurnState::AwaitingControl => "game over (n for a new game)",
        TurnState::GameOver if status.pausing => "game over, next game soon",
        TurnState::GameOver => "game over",
    };
    let summary = format!(
        "Game {}  |  draws {}  |  auto-play {}  |  {}",
        game_number(game_state),
        game_state.draw_count(),
        if status.autoplay { "on" } else { "off" },
        state
    );

    let lines = vec![
        player_line(game_state, Player::Red),
        player_line(game_state, Player::Yellow),
        Line::from(summary),
    ];
    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Connect Four"),
    );

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, game_state: &GameState, selected_column: usize, area: Rect) {
    let board: &Board = game_state.board();
    let game_over = game_state.is_game_over();
    let inner = "═".repeat(board.width() * 3 + 1);
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..board.width() {
        let label = format!("{:^3}", col + 1);
        if col == selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    lines.push(Line::from(format!("  ╔{inner}╗")));

    for y in 0..board.height() {
        let mut row_spans = vec![Span::raw("  ║")];

        for x in 0..board.width() {
            let span = match board.get(x, y) {
                None => Span::styled(" . ", Style::default().fg(Color::DarkGray)),
                Some(player) => {
                    let mut style = Style::default().fg(color(player));
                    if game_over && board.is_winning_tile(x, y) {
                        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                    }
                    Span::styled(" ● ", style)
                }
            };
            row_spans.push(span);
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from(format!("  ╚{inner}╝")));

    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..board.width() {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line1 = Line::from("←/→: Select  |  Enter/Space: Drop  |  N: New game  |  Q/Esc: Quit");
    let line2 = Line::from("S: Start auto-play  |  P: Stop auto-play  |  R: Reload players");

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
