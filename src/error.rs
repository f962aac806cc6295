//! Configuration errors
//!
//! Everything here is fatal at `start()`; nothing is retried.

use thiserror::Error;

use crate::settings::Difficulty;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("tick interval for {difficulty:?} must be positive, got {tick_interval_ms} ms")]
    InvalidTickInterval {
        difficulty: Difficulty,
        tick_interval_ms: f64,
    },
    #[error("target score for {difficulty:?} must be at least 1")]
    ZeroTargetScore { difficulty: Difficulty },
    #[error("grid is empty: {canvas_width}x{canvas_height} px with {box_size} px cells")]
    EmptyGrid {
        canvas_width: u32,
        canvas_height: u32,
        box_size: u32,
    },
    #[error("start cell ({col}, {row}) lies outside the grid")]
    StartOutOfBounds { col: i32, row: i32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, GameError>;
