//! Classification of the cell the head is about to enter

use super::grid::{Cell, GridBounds};

/// What killed the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalCause {
    Wall,
    SelfCollision,
}

/// Classification of a candidate head cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Fatal(FatalCause),
    Scoring,
    Ordinary,
}

/// Classify `candidate` against the body as it was *before* this tick.
///
/// The current tail counts as occupied even though an ordinary step
/// would vacate it.
pub fn classify(candidate: Cell, body: &[Cell], item: Option<Cell>, bounds: &GridBounds) -> Collision {
    if !bounds.contains(candidate) {
        return Collision::Fatal(FatalCause::Wall);
    }
    if body.contains(&candidate) {
        return Collision::Fatal(FatalCause::SelfCollision);
    }
    if item == Some(candidate) {
        return Collision::Scoring;
    }
    Collision::Ordinary
}
