//! Per-frame render data handed to the host
//!
//! Borrowed for the duration of the callback only.

use glam::Vec2;

use super::grid::Cell;

#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    /// Body before the most recent tick
    pub previous: &'a [Cell],
    /// Body now
    pub current: &'a [Cell],
    /// Progress from `previous` to `current`, in [0, 1]
    pub interpolation: f32,
    pub item: Option<Cell>,
}

impl RenderFrame<'_> {
    /// Interpolated position of segment `index` in cell units.
    ///
    /// A segment that did not exist last tick (growth) starts from the old tail.
    pub fn segment_position(&self, index: usize) -> Option<Vec2> {
        let to = self.current.get(index)?.as_vec2();
        let from = self
            .previous
            .get(index)
            .or(self.previous.last())
            .map_or(to, |c| c.as_vec2());
        Some(from.lerp(to, self.interpolation))
    }

    /// All segment positions, head first
    pub fn segment_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.current.len()).filter_map(|i| self.segment_position(i))
    }
}
