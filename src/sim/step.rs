//! One logical tick of the snake

use super::collision::{Collision, FatalCause, classify};
use super::grid::{Cell, GridModel};

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved one cell, length unchanged
    Continue,
    /// Ate the item and grew; a new item is at `item`
    Scored { item: Cell },
    /// Ate the item that reached the target score
    Won,
    /// Hit a wall or the body; body left as it was
    Lost(FatalCause),
}

impl StepOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepOutcome::Won | StepOutcome::Lost(_))
    }
}

/// Outcome plus the body as it was before the tick (for interpolation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub previous_body: Vec<Cell>,
    pub outcome: StepOutcome,
}

/// Advance the model by exactly one tick.
///
/// The buffered heading is applied first, then the candidate head cell is
/// classified against the pre-tick body.
pub fn step(model: &mut GridModel) -> StepReport {
    model.apply_pending_direction();
    model.ticks += 1;

    let previous_body = model.body.clone();
    let candidate = model.head().offset(model.direction);

    let outcome = match classify(candidate, &model.body, model.item, &model.bounds) {
        Collision::Fatal(cause) => {
            model.item = None;
            StepOutcome::Lost(cause)
        }
        Collision::Scoring => {
            model.score += 1;
            if model.score >= model.target_score {
                model.item = None;
                StepOutcome::Won
            } else {
                // Grow first so the new item cannot land on the new head
                model.body.insert(0, candidate);
                let item = model.respawn_item();
                StepOutcome::Scored { item }
            }
        }
        Collision::Ordinary => {
            model.body.insert(0, candidate);
            model.body.pop();
            StepOutcome::Continue
        }
    };

    log::trace!(
        "tick {} head {:?} -> {:?}: {:?}",
        model.ticks,
        previous_body[0],
        candidate,
        outcome
    );

    StepReport {
        previous_body,
        outcome,
    }
}
