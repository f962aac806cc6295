//! Episode state machine
//!
//! Idle -> Running -> {Won, Lost}; Won/Lost return to Idle only through
//! `reset`/`restart`. A start request in any phase other than Idle is ignored.
//! All state lives on the controller so independent games never interfere.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::Result;
use crate::settings::{Difficulty, GameConfig};
use crate::sim::{
    Cell, Direction, GamePhase, GridModel, RenderFrame, SpawnPlanner, StepOutcome, TickControl,
    TickScheduler, step,
};

/// Notifications sent to the host. Every method defaults to a no-op.
pub trait GameHooks {
    fn on_score_changed(&mut self, _score: u32, _target: u32) {}
    fn on_item_spawned(&mut self, _cell: Cell) {}
    /// Sent exactly once per episode, with `Won` or `Lost`
    fn on_episode_ended(&mut self, _phase: GamePhase, _final_score: u32) {}
    fn on_render(&mut self, _frame: &RenderFrame<'_>) {}
}

impl GameHooks for () {}

pub struct GameController<H: GameHooks = ()> {
    config: GameConfig,
    hooks: H,
    phase: GamePhase,
    difficulty: Difficulty,
    model: Option<GridModel>,
    /// Body before the most recent tick, for interpolation
    previous_body: Vec<Cell>,
    scheduler: TickScheduler,
    /// Draws one seed per episode
    rng: Pcg32,
    episodes: u32,
    final_score: Option<u32>,
}

impl<H: GameHooks> GameController<H> {
    pub fn new(config: GameConfig, hooks: H) -> Self {
        Self::with_seed(config, hooks, rand::random())
    }

    /// Reproducible controller: same seed, same item placements
    pub fn with_seed(config: GameConfig, hooks: H, seed: u64) -> Self {
        Self {
            config,
            hooks,
            phase: GamePhase::Idle,
            difficulty: Difficulty::default(),
            model: None,
            previous_body: Vec::new(),
            scheduler: TickScheduler::default(),
            rng: Pcg32::seed_from_u64(seed),
            episodes: 0,
            final_score: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Difficulty of the current (or last) episode
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Current episode state; kept after Won/Lost until reset
    pub fn model(&self) -> Option<&GridModel> {
        self.model.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.model.as_ref().map_or(0, GridModel::score)
    }

    /// Score the last episode ended with
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    /// Token for the scheduled frame callback; changes whenever ticking starts or stops
    pub fn frame_token(&self) -> u64 {
        self.scheduler.generation()
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Begin an episode. Returns `Ok(false)` if not Idle.
    pub fn start(&mut self, difficulty: Difficulty) -> Result<bool> {
        if self.phase != GamePhase::Idle {
            log::debug!("Ignoring start({:?}) while {:?}", difficulty, self.phase);
            return Ok(false);
        }

        let (bounds, settings) = self
            .config
            .validate(difficulty)
            .inspect_err(|e| log::warn!("Cannot start episode: {e}"))?;
        self.scheduler.set_interval(difficulty, settings.tick_interval_ms)?;

        let model = GridModel::new(
            bounds,
            self.config.start,
            self.config.start_direction,
            settings.target_score,
            SpawnPlanner::new(self.config.spawn_max_tries),
            self.rng.random(),
        );
        let item = model.item();
        self.previous_body = model.body().to_vec();
        self.model = Some(model);
        self.difficulty = difficulty;
        self.final_score = None;
        self.episodes += 1;
        self.phase = GamePhase::Running;
        self.scheduler.start();

        log::info!(
            "Episode {} started: {} ({} ms/tick, target {})",
            self.episodes,
            difficulty.as_str(),
            settings.tick_interval_ms,
            settings.target_score
        );

        self.hooks.on_score_changed(0, settings.target_score);
        if let Some(item) = item {
            self.hooks.on_item_spawned(item);
        }
        Ok(true)
    }

    /// Won/Lost -> Idle. No-op in other phases.
    pub fn reset(&mut self) {
        if self.phase.is_terminal() {
            self.phase = GamePhase::Idle;
            self.model = None;
            self.previous_body.clear();
        }
    }

    /// Won/Lost -> Idle -> Running in one call; from Idle this is `start`
    pub fn restart(&mut self, difficulty: Difficulty) -> Result<bool> {
        self.reset();
        self.start(difficulty)
    }

    /// Abandon a running episode (back to Idle, no end notification).
    /// Any later or repeated call is a no-op.
    pub fn stop(&mut self) {
        self.scheduler.stop();
        if self.phase == GamePhase::Running {
            log::info!("Episode {} abandoned", self.episodes);
            self.phase = GamePhase::Idle;
            self.model = None;
            self.previous_body.clear();
        }
    }

    /// Buffer a heading change for the next tick; ignored unless Running
    pub fn set_direction(&mut self, direction: Direction) {
        if self.phase != GamePhase::Running {
            return;
        }
        if let Some(model) = self.model.as_mut() {
            model.queue_direction(direction);
        }
    }

    /// Frame callback that was scheduled under `token`; stale tokens are ignored
    pub fn on_frame_for(&mut self, token: u64, timestamp_ms: f64) {
        if token != self.scheduler.generation() {
            log::debug!("Dropping stale frame callback (token {token})");
            return;
        }
        self.on_frame(timestamp_ms);
    }

    /// Host animation frame: run due ticks, then render
    pub fn on_frame(&mut self, timestamp_ms: f64) {
        if self.phase != GamePhase::Running {
            return;
        }
        let Some(model) = self.model.as_mut() else {
            return;
        };
        let hooks = &mut self.hooks;
        let previous_body = &mut self.previous_body;
        let mut ended = None;

        let timing = self.scheduler.on_frame(timestamp_ms, || {
            let report = step(model);
            *previous_body = report.previous_body;
            match report.outcome {
                StepOutcome::Continue => TickControl::Continue,
                StepOutcome::Scored { item } => {
                    hooks.on_score_changed(model.score(), model.target_score());
                    hooks.on_item_spawned(item);
                    TickControl::Continue
                }
                StepOutcome::Won => {
                    hooks.on_score_changed(model.score(), model.target_score());
                    ended = Some(GamePhase::Won);
                    TickControl::Halt
                }
                StepOutcome::Lost(cause) => {
                    log::debug!("Snake died: {:?}", cause);
                    ended = Some(GamePhase::Lost);
                    TickControl::Halt
                }
            }
        });
        let Some(timing) = timing else {
            return;
        };

        hooks.on_render(&RenderFrame {
            previous: previous_body.as_slice(),
            current: model.body(),
            interpolation: timing.interpolation,
            item: model.item(),
        });

        if let Some(phase) = ended {
            let final_score = model.score();
            self.finish(phase, final_score);
        }
    }

    fn finish(&mut self, phase: GamePhase, final_score: u32) {
        self.scheduler.stop();
        self.phase = phase;
        self.final_score = Some(final_score);
        log::info!(
            "Episode {} ended: {:?} with score {}",
            self.episodes,
            phase,
            final_score
        );
        self.hooks.on_episode_ended(phase, final_score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameError;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Score(u32, u32),
        Item(Cell),
        Ended(GamePhase, u32),
        Render { len: usize, interpolation: f32 },
    }

    #[derive(Debug, Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl GameHooks for Recorder {
        fn on_score_changed(&mut self, score: u32, target: u32) {
            self.events.push(Event::Score(score, target));
        }
        fn on_item_spawned(&mut self, cell: Cell) {
            self.events.push(Event::Item(cell));
        }
        fn on_episode_ended(&mut self, phase: GamePhase, final_score: u32) {
            self.events.push(Event::Ended(phase, final_score));
        }
        fn on_render(&mut self, frame: &RenderFrame<'_>) {
            self.events.push(Event::Render {
                len: frame.current.len(),
                interpolation: frame.interpolation,
            });
        }
    }

    fn controller() -> GameController<Recorder> {
        GameController::with_seed(GameConfig::default(), Recorder::default(), 42)
    }

    fn model_mut(c: &mut GameController<Recorder>) -> &mut GridModel {
        c.model.as_mut().unwrap()
    }

    #[test]
    fn test_start_emits_initial_state() {
        let mut c = controller();
        assert_eq!(c.phase(), GamePhase::Idle);
        assert!(c.start(Difficulty::Easy).unwrap());
        assert_eq!(c.phase(), GamePhase::Running);

        let model = c.model().unwrap();
        assert_eq!(model.body(), &[Cell::new(5, 5)]);
        assert_eq!(model.direction(), Direction::Right);
        let item = model.item().unwrap();
        assert_eq!(
            c.hooks().events,
            vec![Event::Score(0, 5), Event::Item(item)]
        );
    }

    #[test]
    fn test_one_tick_then_winning_bite() {
        let mut c = controller();
        c.start(Difficulty::Easy).unwrap();
        model_mut(&mut c).item = Some(Cell::new(12, 12));

        c.on_frame(0.0);
        c.on_frame(300.0);
        let model = c.model().unwrap();
        assert_eq!(model.head(), Cell::new(6, 5));
        assert_eq!(model.len(), 1);

        // Item right in front, one short of the Easy target
        let m = model_mut(&mut c);
        m.item = Some(Cell::new(7, 5));
        m.score = 4;
        c.hooks_mut().events.clear();

        c.on_frame(600.0);
        assert_eq!(c.phase(), GamePhase::Won);
        assert_eq!(c.final_score(), Some(5));
        assert_eq!(
            c.hooks().events,
            vec![
                Event::Score(5, 5),
                Event::Render { len: 1, interpolation: 0.0 },
                Event::Ended(GamePhase::Won, 5),
            ]
        );
    }

    #[test]
    fn test_win_exactly_at_target_on_hard() {
        let mut c = controller();
        c.start(Difficulty::Hard).unwrap();
        c.on_frame(0.0);

        let mut t = 0.0;
        while c.phase() == GamePhase::Running {
            let m = model_mut(&mut c);
            let mut next = m.head().offset(m.direction());
            if !m.bounds().contains(next) {
                m.queue_direction(Direction::Down);
                next = m.head().offset(Direction::Down);
            }
            m.item = Some(next);
            t += 140.0;
            c.on_frame(t);
        }

        assert_eq!(c.phase(), GamePhase::Won);
        let scores: Vec<u32> = c
            .hooks()
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Score(s, 15) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(scores, (0..=15).collect::<Vec<_>>());
        let ends = c
            .hooks()
            .events
            .iter()
            .filter(|e| matches!(e, Event::Ended(..)))
            .count();
        assert_eq!(ends, 1);
    }

    #[test]
    fn test_multi_step_frame() {
        let mut c = controller();
        c.start(Difficulty::Easy).unwrap();
        model_mut(&mut c).item = Some(Cell::new(12, 12));
        c.on_frame(0.0);
        c.on_frame(1050.0);

        let model = c.model().unwrap();
        assert_eq!(model.ticks(), 3);
        assert_eq!(model.head(), Cell::new(8, 5));
        assert_eq!(c.previous_body, vec![Cell::new(7, 5)]);
        assert!(matches!(
            c.hooks().events.last(),
            Some(Event::Render { interpolation, .. }) if (*interpolation - 0.5).abs() < 1e-6
        ));
    }

    #[test]
    fn test_wall_loss_and_silence_afterwards() {
        let mut c = controller();
        c.start(Difficulty::Medium).unwrap();
        model_mut(&mut c).item = Some(Cell::new(1, 1));
        c.on_frame(0.0);
        // 15 ticks reach column 20, which is off the grid
        c.on_frame(15.0 * 220.0 + 10.0);
        assert_eq!(c.phase(), GamePhase::Lost);
        assert_eq!(c.final_score(), Some(0));
        assert_eq!(c.model().unwrap().ticks(), 15);

        let recorded = c.hooks().events.len();
        c.on_frame(10_000.0);
        c.on_frame(20_000.0);
        c.set_direction(Direction::Up);
        assert_eq!(c.hooks().events.len(), recorded);
        assert_eq!(c.model().unwrap().ticks(), 15);
    }

    #[test]
    fn test_start_while_running_is_ignored() {
        let mut c = controller();
        c.start(Difficulty::Easy).unwrap();
        c.on_frame(0.0);
        c.on_frame(300.0);
        assert!(!c.start(Difficulty::Hard).unwrap());
        assert_eq!(c.difficulty(), Difficulty::Easy);
        assert_eq!(c.model().unwrap().ticks(), 1);
    }

    #[test]
    fn test_restart_after_loss() {
        let mut c = controller();
        c.start(Difficulty::Easy).unwrap();
        model_mut(&mut c).item = Some(Cell::new(1, 1));
        c.set_direction(Direction::Up);
        c.on_frame(0.0);
        c.on_frame(300.0 * 6.0);
        assert_eq!(c.phase(), GamePhase::Lost);

        // start alone does not leave a terminal phase
        assert!(!c.start(Difficulty::Easy).unwrap());
        assert_eq!(c.phase(), GamePhase::Lost);

        assert!(c.restart(Difficulty::Hard).unwrap());
        assert_eq!(c.phase(), GamePhase::Running);
        assert_eq!(c.score(), 0);
        assert_eq!(c.final_score(), None);
        assert_eq!(c.model().unwrap().body(), &[Cell::new(5, 5)]);
        assert_eq!(c.model().unwrap().target_score(), 15);
    }

    #[test]
    fn test_stop_is_idempotent_and_cancels_frames() {
        let mut c = controller();
        c.start(Difficulty::Easy).unwrap();
        let token = c.frame_token();
        c.on_frame_for(token, 0.0);

        c.stop();
        c.stop();
        assert_eq!(c.phase(), GamePhase::Idle);
        assert!(c.model().is_none());

        let recorded = c.hooks().events.len();
        c.on_frame_for(token, 3000.0);
        c.on_frame(3000.0);
        assert_eq!(c.hooks().events.len(), recorded);
    }

    #[test]
    fn test_stale_token_after_restart() {
        let mut c = controller();
        c.start(Difficulty::Easy).unwrap();
        let old = c.frame_token();
        c.stop();
        c.start(Difficulty::Easy).unwrap();
        let new = c.frame_token();
        assert_ne!(old, new);

        c.on_frame_for(new, 0.0);
        c.on_frame_for(old, 900.0);
        assert_eq!(c.model().unwrap().ticks(), 0);
        c.on_frame_for(new, 900.0);
        assert_eq!(c.model().unwrap().ticks(), 3);
    }

    #[test]
    fn test_token_from_lost_episode_is_dropped_after_restart() {
        let mut c = controller();
        c.start(Difficulty::Easy).unwrap();
        model_mut(&mut c).item = Some(Cell::new(1, 1));
        c.set_direction(Direction::Up);
        // Tokens cross the JS boundary as plain numbers
        let old = c.frame_token() as f64;
        c.on_frame_for(old as u64, 0.0);
        c.on_frame_for(old as u64, 300.0 * 6.0);
        assert_eq!(c.phase(), GamePhase::Lost);

        assert!(c.restart(Difficulty::Easy).unwrap());
        let new = c.frame_token() as f64;
        assert_ne!(old, new);

        c.on_frame_for(new as u64, 10_000.0);
        let recorded = c.hooks().events.len();
        c.on_frame_for(old as u64, 10_900.0);
        assert_eq!(c.hooks().events.len(), recorded);
        assert_eq!(c.model().unwrap().ticks(), 0);

        c.on_frame_for(new as u64, 10_900.0);
        assert_eq!(c.model().unwrap().ticks(), 3);
    }

    #[test]
    fn test_direction_applied_at_next_tick() {
        let mut c = controller();
        c.start(Difficulty::Easy).unwrap();
        model_mut(&mut c).item = Some(Cell::new(12, 12));
        c.on_frame(0.0);

        // Reversal then a legal turn before the tick: last one wins
        c.set_direction(Direction::Left);
        c.set_direction(Direction::Up);
        assert_eq!(c.model().unwrap().direction(), Direction::Right);

        c.on_frame(300.0);
        assert_eq!(c.model().unwrap().head(), Cell::new(5, 4));

        // Reversal alone is dropped
        c.set_direction(Direction::Down);
        c.on_frame(600.0);
        assert_eq!(c.model().unwrap().head(), Cell::new(5, 3));
    }

    #[test]
    fn test_config_error_keeps_idle() {
        let mut config = GameConfig::default();
        config.easy.tick_interval_ms = -1.0;
        let mut c = GameController::with_seed(config, Recorder::default(), 1);
        assert!(matches!(
            c.start(Difficulty::Easy),
            Err(GameError::InvalidTickInterval { .. })
        ));
        assert_eq!(c.phase(), GamePhase::Idle);
        assert!(c.hooks().events.is_empty());

        // Other difficulties still start
        assert!(c.start(Difficulty::Medium).unwrap());
    }

    #[test]
    fn test_same_seed_same_items() {
        let mut a = controller();
        let mut b = controller();
        a.start(Difficulty::Medium).unwrap();
        b.start(Difficulty::Medium).unwrap();
        assert_eq!(a.model().unwrap().item(), b.model().unwrap().item());
    }
}
