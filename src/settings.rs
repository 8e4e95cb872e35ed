//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/stackfall/settings.toml (or platform equivalent)

use crate::bag::{PieceSource, Randomizer};
use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{GameConfig, PREVIEW_SIZE};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// All settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: BoardSettings,
    pub gameplay: GameplaySettings,
    pub driver: DriverSettings,
    pub records: RecordSettings,
}

/// Grid and preview frame sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: usize,
    pub height: usize,
    /// Side length of the hold/next preview frames
    pub preview_size: i32,
}

/// Piece generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// "uniform" or "bag"
    pub randomizer: Randomizer,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

/// Headless driver parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    /// Nominal length of one logical step
    pub tick_ms: u64,
    /// Step limit per game
    pub max_steps: u64,
    /// Games to play before exiting
    pub games: u32,
}

/// Results kept between runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSettings {
    pub best_score: u64,
    pub best_lines: u32,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            preview_size: PREVIEW_SIZE,
        }
    }
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            tick_ms: 60,
            max_steps: 20_000,
            games: 1,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "stackfall", "stackfall")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the platform config file, or use defaults
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from `path`. Missing or malformed files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!("No settings at {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match Self::parse(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse and validate TOML settings
    pub fn parse(contents: &str) -> Result<Self, String> {
        let settings: Settings =
            toml::from_str(contents).map_err(|e| format!("Failed to parse settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), String> {
        let board = &self.board;
        if board.width < 4 || board.height < 4 {
            return Err(format!(
                "Board must be at least 4x4, got {}x{}",
                board.width, board.height
            ));
        }
        if board.preview_size < 4 {
            return Err(format!(
                "Preview frame must be at least 4 cells, got {}",
                board.preview_size
            ));
        }
        Ok(())
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), String> {
        let Some(path) = Self::settings_path() else {
            return Err("Could not determine settings path".to_string());
        };
        self.save_to(&path)
    }

    /// Save settings to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(path, contents).map_err(|e| format!("Failed to write settings: {}", e))?;

        Ok(())
    }

    /// Fold a finished game into the records. Returns true if anything improved.
    pub fn record(&mut self, score: u64, lines: u32) -> bool {
        let records = &mut self.records;
        let improved = score > records.best_score || lines > records.best_lines;
        records.best_score = records.best_score.max(score);
        records.best_lines = records.best_lines.max(lines);
        improved
    }

    /// Session dimensions from the board section
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            width: self.board.width,
            height: self.board.height,
            preview_size: self.board.preview_size,
        }
    }

    /// Build the configured randomizer
    pub fn piece_source(&self) -> Box<dyn PieceSource> {
        self.gameplay.randomizer.build(self.gameplay.seed)
    }
}
