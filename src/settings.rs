//! Difficulty presets and host-supplied configuration
//!
//! Read once at episode start; nothing here changes mid-episode.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};
use crate::sim::{Cell, Direction, GridBounds};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Tick length and win threshold for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Milliseconds per logical tick
    pub tick_interval_ms: f64,
    /// Score that wins the episode
    pub target_score: u32,
}

impl DifficultySettings {
    pub const fn new(tick_interval_ms: f64, target_score: u32) -> Self {
        Self {
            tick_interval_ms,
            target_score,
        }
    }
}

/// Grid geometry, start position and difficulty table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Cell edge length in pixels
    pub box_size: u32,
    /// Head cell of the fresh snake
    pub start: Cell,
    /// Heading of the fresh snake
    pub start_direction: Direction,
    /// Item placement retry cap
    pub spawn_max_tries: u32,

    // === Difficulty table ===
    pub easy: DifficultySettings,
    pub medium: DifficultySettings,
    pub hard: DifficultySettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            box_size: BOX_SIZE,
            start: Cell::new(START_COL, START_ROW),
            start_direction: Direction::Right,
            spawn_max_tries: SPAWN_MAX_TRIES,

            easy: DifficultySettings::new(EASY_TICK_MS, EASY_TARGET),
            medium: DifficultySettings::new(MEDIUM_TICK_MS, MEDIUM_TARGET),
            hard: DifficultySettings::new(HARD_TICK_MS, HARD_TARGET),
        }
    }
}

impl GameConfig {
    /// Default table with custom canvas geometry
    pub fn with_canvas(canvas_width: u32, canvas_height: u32, box_size: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            box_size,
            ..Default::default()
        }
    }

    /// Parse a JSON document; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn difficulty(&self, difficulty: Difficulty) -> DifficultySettings {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// Grid bounds derived from the canvas geometry
    pub fn bounds(&self) -> Result<GridBounds> {
        GridBounds::from_canvas(self.canvas_width, self.canvas_height, self.box_size)
    }

    /// Check everything an episode at `difficulty` depends on
    pub fn validate(&self, difficulty: Difficulty) -> Result<(GridBounds, DifficultySettings)> {
        let bounds = self.bounds()?;
        if !bounds.contains(self.start) {
            return Err(GameError::StartOutOfBounds {
                col: self.start.col,
                row: self.start.row,
            });
        }

        let settings = self.difficulty(difficulty);
        if !settings.tick_interval_ms.is_finite() || settings.tick_interval_ms <= 0.0 {
            return Err(GameError::InvalidTickInterval {
                difficulty,
                tick_interval_ms: settings.tick_interval_ms,
            });
        }
        if settings.target_score == 0 {
            return Err(GameError::ZeroTargetScore { difficulty });
        }

        Ok((bounds, settings))
    }
}
