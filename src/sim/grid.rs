//! Grid model: cells, headings, bounds and per-episode state
//!
//! The model is only mutated by the step engine; everything else reads it.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::spawn::SpawnPlanner;
use crate::error::{GameError, Result};

/// Episode phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No episode; waiting for a start request
    #[default]
    Idle,
    /// Episode in progress, scheduler ticking
    Running,
    /// Target score reached
    Won,
    /// Snake hit a wall or itself
    Lost,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// A grid cell (column, row), row 0 at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    #[inline]
    pub fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.col, self.row)
    }

    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }

    /// Neighbouring cell one step in `direction`
    #[inline]
    pub fn offset(self, direction: Direction) -> Self {
        let p = self.as_ivec2() + direction.delta();
        Self::new(p.x, p.y)
    }
}

/// Snake heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step in grid space (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    /// Map a host key name (arrow keys or WASD) to a heading
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "s" | "S" => Some(Direction::Down),
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Playfield geometry
///
/// Bounds are checked in pixel space: a cell is inside iff its top-left
/// corner lies within the canvas. Item placement uses the whole-cell
/// column/row counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    canvas_width: u32,
    canvas_height: u32,
    box_size: u32,
}

impl GridBounds {
    pub fn from_canvas(canvas_width: u32, canvas_height: u32, box_size: u32) -> Result<Self> {
        if box_size == 0 || canvas_width / box_size == 0 || canvas_height / box_size == 0 {
            return Err(GameError::EmptyGrid {
                canvas_width,
                canvas_height,
                box_size,
            });
        }
        Ok(Self {
            canvas_width,
            canvas_height,
            box_size,
        })
    }

    /// Whole columns on the canvas
    #[inline]
    pub fn cols(&self) -> i32 {
        (self.canvas_width / self.box_size) as i32
    }

    /// Whole rows on the canvas
    #[inline]
    pub fn rows(&self) -> i32 {
        (self.canvas_height / self.box_size) as i32
    }

    #[inline]
    pub fn box_size(&self) -> u32 {
        self.box_size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        let b = i64::from(self.box_size);
        let x = i64::from(cell.col) * b;
        let y = i64::from(cell.row) * b;
        x >= 0 && x < i64::from(self.canvas_width) && y >= 0 && y < i64::from(self.canvas_height)
    }

    /// Top-left pixel of a cell
    pub fn cell_origin(&self, cell: Cell) -> IVec2 {
        cell.as_ivec2() * self.box_size as i32
    }
}

/// State of one episode
#[derive(Debug, Clone)]
pub struct GridModel {
    pub(crate) bounds: GridBounds,
    /// Head first, tail last
    pub(crate) body: Vec<Cell>,
    pub(crate) direction: Direction,
    /// Single-slot input buffer, consumed at the start of the next step
    pub(crate) pending_direction: Option<Direction>,
    pub(crate) item: Option<Cell>,
    pub(crate) score: u32,
    pub(crate) target_score: u32,
    /// Logical ticks taken this episode
    pub(crate) ticks: u64,
    /// Spawns that hit the retry cap
    pub(crate) near_fill_spawns: u32,
    pub(crate) planner: SpawnPlanner,
    pub(crate) rng: Pcg32,
}

impl GridModel {
    /// Fresh episode: one-segment snake at `start`, first item placed
    pub fn new(
        bounds: GridBounds,
        start: Cell,
        direction: Direction,
        target_score: u32,
        planner: SpawnPlanner,
        seed: u64,
    ) -> Self {
        let mut model = Self {
            bounds,
            body: vec![start],
            direction,
            pending_direction: None,
            item: None,
            score: 0,
            target_score,
            ticks: 0,
            near_fill_spawns: 0,
            planner,
            rng: Pcg32::seed_from_u64(seed),
        };
        model.respawn_item();
        model
    }

    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; the snake never has fewer than one segment
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn item(&self) -> Option<Cell> {
        self.item
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn near_fill_spawns(&self) -> u32 {
        self.near_fill_spawns
    }

    /// Buffer a heading change; the latest request wins.
    /// Reversals are filtered when the buffer is consumed, not here.
    pub fn queue_direction(&mut self, direction: Direction) {
        self.pending_direction = Some(direction);
    }

    /// Consume the input buffer, ignoring a reversal of the current heading
    pub(crate) fn apply_pending_direction(&mut self) {
        if let Some(next) = self.pending_direction.take() {
            if next == self.direction.opposite() {
                log::debug!("Ignoring reversal {:?} -> {:?}", self.direction, next);
            } else {
                self.direction = next;
            }
        }
    }

    /// Place a new item away from the snake
    pub(crate) fn respawn_item(&mut self) -> Cell {
        let spawn = self.planner.place(&self.body, &self.bounds, &mut self.rng);
        if spawn.exhausted {
            self.near_fill_spawns += 1;
            log::warn!(
                "Item placement hit retry cap ({} tries, snake length {}); accepting {:?}",
                spawn.attempts,
                self.body.len(),
                spawn.cell
            );
        }
        self.item = Some(spawn.cell);
        spawn.cell
    }
}
