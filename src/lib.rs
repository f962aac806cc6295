//! Drip Snake - grid snake game simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, collisions, spawning, fixed-timestep scheduler)
//! - `controller`: Episode state machine and host notifications
//! - `settings`: Difficulty table and host-supplied configuration
//! - `error`: Configuration errors
//! - `web`: wasm-bindgen adapter for a JavaScript host (wasm32 only)

pub mod controller;
pub mod error;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use controller::{GameController, GameHooks};
pub use error::{GameError, Result};
pub use settings::{Difficulty, DifficultySettings, GameConfig};
pub use sim::{Cell, Direction, GamePhase, RenderFrame};

/// Game configuration constants
pub mod consts {
    /// Cell edge length in pixels
    pub const BOX_SIZE: u32 = 20;
    /// Default canvas dimensions in pixels
    pub const CANVAS_WIDTH: u32 = 400;
    pub const CANVAS_HEIGHT: u32 = 400;

    /// Snake head cell at episode start
    pub const START_COL: i32 = 5;
    pub const START_ROW: i32 = 5;

    /// Item placement gives up after this many draws and accepts the last one
    pub const SPAWN_MAX_TRIES: u32 = 1000;

    /// Difficulty table: (tick interval ms, target score)
    pub const EASY_TICK_MS: f64 = 300.0;
    pub const EASY_TARGET: u32 = 5;
    pub const MEDIUM_TICK_MS: f64 = 220.0;
    pub const MEDIUM_TARGET: u32 = 10;
    pub const HARD_TICK_MS: f64 = 140.0;
    pub const HARD_TARGET: u32 = 15;
}
