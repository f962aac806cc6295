//! Item placement by bounded rejection sampling

use rand::Rng;

use super::grid::{Cell, GridBounds};
use crate::consts::SPAWN_MAX_TRIES;

/// Result of one placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub cell: Cell,
    /// Draws taken, 1..=max_tries
    pub attempts: u32,
    /// Retry cap reached; `cell` may overlap the snake
    pub exhausted: bool,
}

/// Picks item cells one cell in from every edge, off the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPlanner {
    max_tries: u32,
}

impl Default for SpawnPlanner {
    fn default() -> Self {
        Self::new(SPAWN_MAX_TRIES)
    }
}

impl SpawnPlanner {
    pub fn new(max_tries: u32) -> Self {
        Self {
            max_tries: max_tries.max(1),
        }
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    /// Inclusive column and row ranges for placement.
    /// Each range keeps at least one value on tiny grids.
    pub fn placement_ranges(bounds: &GridBounds) -> ((i32, i32), (i32, i32)) {
        let max_col = (bounds.cols() - 2).max(1);
        let max_row = (bounds.rows() - 2).max(1);
        ((1, max_col), (1, max_row))
    }

    /// Draw until an unoccupied cell turns up or the cap is hit
    pub fn place<R: Rng>(&self, snake: &[Cell], bounds: &GridBounds, rng: &mut R) -> Spawn {
        let ((min_col, max_col), (min_row, max_row)) = Self::placement_ranges(bounds);

        let mut cell = Cell::new(min_col, min_row);
        for attempt in 1..=self.max_tries {
            cell = Cell::new(
                rng.random_range(min_col..=max_col),
                rng.random_range(min_row..=max_row),
            );
            if !snake.contains(&cell) {
                return Spawn {
                    cell,
                    attempts: attempt,
                    exhausted: false,
                };
            }
        }

        Spawn {
            cell,
            attempts: self.max_tries,
            exhausted: true,
        }
    }
}
