//! Terminal UI: board, players and statistics, with keyboard control of the
//! session.

mod app;
mod game_view;

pub use app::App;
