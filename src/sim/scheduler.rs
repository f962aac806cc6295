//! Fixed timestep driver
//!
//! Host frames arrive at an arbitrary cadence. Each frame runs however many
//! whole ticks have elapsed since the last one and reports how far into the
//! next tick the frame falls. The tick clock advances by whole intervals only,
//! so the fractional remainder carries over and cadence does not drift.
//!
//! There is no substep cap: a long gap (backgrounded tab) is caught up tick
//! by tick rather than skipped.

use crate::consts::MEDIUM_TICK_MS;
use crate::error::{GameError, Result};
use crate::settings::Difficulty;

/// Whether the scheduler should keep stepping this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    /// Terminal outcome; stop the scheduler now
    Halt,
}

/// Timing of one processed frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Ticks actually run this frame
    pub steps: u64,
    /// Progress into the next tick, in [0, 1]
    pub interpolation: f32,
    /// A tick asked to halt
    pub halted: bool,
}

#[derive(Debug, Clone)]
pub struct TickScheduler {
    tick_interval_ms: f64,
    /// Time of the last whole tick; `None` until the first frame after start
    last_tick_ms: Option<f64>,
    running: bool,
    /// Bumped on every start and stop so stale frame callbacks can be told apart
    generation: u64,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self {
            tick_interval_ms: MEDIUM_TICK_MS,
            last_tick_ms: None,
            running: false,
            generation: 0,
        }
    }
}

impl TickScheduler {
    pub fn new(difficulty: Difficulty, tick_interval_ms: f64) -> Result<Self> {
        let mut scheduler = Self::default();
        scheduler.set_interval(difficulty, tick_interval_ms)?;
        Ok(scheduler)
    }

    /// Change the tick length; only allowed while stopped
    pub fn set_interval(&mut self, difficulty: Difficulty, tick_interval_ms: f64) -> Result<()> {
        if !tick_interval_ms.is_finite() || tick_interval_ms <= 0.0 {
            return Err(GameError::InvalidTickInterval {
                difficulty,
                tick_interval_ms,
            });
        }
        debug_assert!(!self.running, "tick interval changed mid-episode");
        self.tick_interval_ms = tick_interval_ms;
        Ok(())
    }

    pub fn tick_interval_ms(&self) -> f64 {
        self.tick_interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Arm the scheduler; the next frame anchors the tick clock
    pub fn start(&mut self) -> u64 {
        self.generation += 1;
        self.running = true;
        self.last_tick_ms = None;
        self.generation
    }

    /// Stop ticking. Safe to call any number of times.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.generation += 1;
        }
    }

    /// Process one host frame, invoking `tick` once per elapsed interval.
    ///
    /// Returns `None` if the scheduler is stopped or the timestamp is not
    /// finite; nothing is invoked then and the clock is left untouched.
    pub fn on_frame<F>(&mut self, timestamp_ms: f64, mut tick: F) -> Option<FrameTiming>
    where
        F: FnMut() -> TickControl,
    {
        if !self.running {
            return None;
        }
        if !timestamp_ms.is_finite() {
            log::warn!("Ignoring frame with non-finite timestamp {}", timestamp_ms);
            return None;
        }

        let last = *self.last_tick_ms.get_or_insert(timestamp_ms);
        let elapsed = (timestamp_ms - last).max(0.0);
        let due = (elapsed / self.tick_interval_ms).floor() as u64;

        let mut steps = 0;
        let mut halted = false;
        while steps < due {
            steps += 1;
            if tick() == TickControl::Halt {
                halted = true;
                break;
            }
        }

        let last = last + steps as f64 * self.tick_interval_ms;
        self.last_tick_ms = Some(last);
        if halted {
            self.stop();
        }

        let interpolation = ((timestamp_ms - last) / self.tick_interval_ms).clamp(0.0, 1.0) as f32;
        Some(FrameTiming {
            steps,
            interpolation,
            halted,
        })
    }
}
