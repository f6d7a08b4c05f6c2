use std::path::Path;
use std::time::Duration;

use tracing::warn;

use crate::ai::NegamaxPlayer;
use crate::error::ConfigError;
use crate::game::{Board, Controller, GameState, PlayerInfo};

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub session: SessionConfig,
    pub red: PlayerConfig,
    pub yellow: PlayerConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Time to look at a finished board before the next game starts, when a
    /// human takes part.
    pub observation_pause_ms: u64,
    /// Whether computer-only matches start running without a `Start` event.
    pub autoplay: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub name: String,
    pub computer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    pub think_depth: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            board: BoardConfig::default(),
            session: SessionConfig::default(),
            red: PlayerConfig {
                name: "Red".into(),
                ..PlayerConfig::default()
            },
            yellow: PlayerConfig {
                name: "Yellow".into(),
                computer: true,
                algorithm: Some(NegamaxPlayer::NAME.into()),
                ..PlayerConfig::default()
            },
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            width: Board::STANDARD_WIDTH,
            height: Board::STANDARD_HEIGHT,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            observation_pause_ms: 3000,
            autoplay: false,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            name: "Player".into(),
            computer: false,
            algorithm: None,
            think_depth: PlayerInfo::DEFAULT_THINK_DEPTH,
        }
    }
}

impl PlayerConfig {
    pub fn to_player_info(&self) -> PlayerInfo {
        let controller = match (&self.algorithm, self.computer) {
            (Some(algorithm), true) => Controller::Computer {
                algorithm: algorithm.clone(),
            },
            _ => Controller::Human,
        };
        PlayerInfo {
            name: self.name.clone(),
            controller,
            think_depth: self.think_depth,
            counters: Default::default(),
        }
    }

    /// Copy the configured identity onto an existing player, keeping its
    /// counters.
    pub fn apply_to(&self, player: &mut PlayerInfo) {
        let fresh = self.to_player_info();
        player.name = fresh.name;
        player.controller = fresh.controller;
        player.think_depth = fresh.think_depth;
    }

    fn validate(&self, section: &str) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{section}.name must not be empty"
            )));
        }
        if self.computer && self.algorithm.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::Validation(format!(
                "{section}.algorithm is required for a computer player"
            )));
        }
        if self.think_depth == 0 {
            return Err(ConfigError::Validation(format!(
                "{section}.think_depth must be >= 1"
            )));
        }
        Ok(())
    }
}

impl SessionConfig {
    pub fn observation_pause(&self) -> Duration {
        Duration::from_millis(self.observation_pause_ms)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Board::new(self.board.width, self.board.height)?;
        self.red.validate("red")?;
        self.yellow.validate("yellow")?;
        if self.red.name == self.yellow.name {
            return Err(ConfigError::Validation(
                "red.name and yellow.name must differ".into(),
            ));
        }
        Ok(())
    }

    pub fn build_board(&self) -> Result<Board, ConfigError> {
        Ok(Board::new(self.board.width, self.board.height)?)
    }

    /// Fresh game state with the configured board and players.
    pub fn build_game_state(&self) -> Result<GameState, ConfigError> {
        Ok(GameState::new(
            self.build_board()?,
            self.red.to_player_info(),
            self.yellow.to_player_info(),
        ))
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
