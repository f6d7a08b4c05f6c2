use std::fmt;
use std::time::Duration;

/// Seat identity of one of the two players. Tiles on the board are owned by a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Red,
    Yellow,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::Red, Player::Yellow];

    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::Red => Player::Yellow,
            Player::Yellow => Player::Red,
        }
    }

    /// Position of this seat in the game's player pair.
    pub fn index(self) -> usize {
        match self {
            Player::Red => 0,
            Player::Yellow => 1,
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::Red => "Red",
            Player::Yellow => "Yellow",
        }
    }

    /// Single-character tile symbol used by the text rendering of a board.
    pub fn symbol(self) -> char {
        match self {
            Player::Red => 'R',
            Player::Yellow => 'Y',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who chooses a player's moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Controller {
    Human,
    Computer { algorithm: String },
}

/// Counters maintained while a computer player thinks. Reset whenever the
/// player's move provider is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceCounters {
    pub moves_analyzed: u64,
    pub think_time: Duration,
}

impl PerformanceCounters {
    /// Average search speed since the counters were last reset.
    pub fn moves_per_second(&self) -> f64 {
        let secs = self.think_time.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.moves_analyzed as f64 / secs
    }

    pub fn record(&mut self, moves_analyzed: u64, elapsed: Duration) {
        self.moves_analyzed += moves_analyzed;
        self.think_time += elapsed;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A configured participant: display name, controller and search settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub name: String,
    pub controller: Controller,
    /// Half-moves of look-ahead for search-based algorithms.
    pub think_depth: usize,
    pub counters: PerformanceCounters,
}

impl PlayerInfo {
    pub const DEFAULT_THINK_DEPTH: usize = 5;

    pub fn human(name: impl Into<String>) -> Self {
        PlayerInfo {
            name: name.into(),
            controller: Controller::Human,
            think_depth: Self::DEFAULT_THINK_DEPTH,
            counters: PerformanceCounters::default(),
        }
    }

    pub fn computer(name: impl Into<String>, algorithm: impl Into<String>) -> Self {
        PlayerInfo {
            name: name.into(),
            controller: Controller::Computer {
                algorithm: algorithm.into(),
            },
            think_depth: Self::DEFAULT_THINK_DEPTH,
            counters: PerformanceCounters::default(),
        }
    }

    pub fn with_think_depth(mut self, depth: usize) -> Self {
        self.think_depth = depth;
        self
    }

    pub fn is_computer(&self) -> bool {
        matches!(self.controller, Controller::Computer { .. })
    }

    /// Algorithm identifier bound to a computer player.
    pub fn algorithm(&self) -> Option<&str> {
        match &self.controller {
            Controller::Computer { algorithm } => Some(algorithm),
            Controller::Human => None,
        }
    }
}
