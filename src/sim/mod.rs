//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Whole-cell movement, one cell per tick
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod render;
pub mod scheduler;
pub mod spawn;
pub mod step;

pub use collision::{Collision, FatalCause, classify};
pub use grid::{Cell, Direction, GamePhase, GridBounds, GridModel};
pub use render::RenderFrame;
pub use scheduler::{FrameTiming, TickControl, TickScheduler};
pub use spawn::{Spawn, SpawnPlanner};
pub use step::{StepOutcome, StepReport, step};
