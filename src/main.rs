//! Drip Snake entry point
//!
//! The browser build is driven from JavaScript through `drip_snake::web`.
//! Natively this runs a headless autopilot episode against a simulated
//! 60 Hz frame clock and logs what the host would see.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use drip_snake::sim::GridModel;
    use drip_snake::{
        Cell, Difficulty, Direction, GameConfig, GameController, GameHooks, GamePhase, RenderFrame,
    };

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Logs notifications the way a page would update its HUD
    #[derive(Default)]
    struct LogHooks {
        frames: u32,
        ended: Option<(GamePhase, u32)>,
    }

    impl GameHooks for LogHooks {
        fn on_score_changed(&mut self, score: u32, target: u32) {
            log::info!("Score: {}/{}", score, target);
        }

        fn on_item_spawned(&mut self, cell: Cell) {
            log::debug!("Item at ({}, {})", cell.col, cell.row);
        }

        fn on_episode_ended(&mut self, phase: GamePhase, final_score: u32) {
            self.ended = Some((phase, final_score));
        }

        fn on_render(&mut self, frame: &RenderFrame<'_>) {
            self.frames += 1;
            if let Some(head) = frame.segment_position(0) {
                log::trace!("frame {}: head at {:.2}, {:.2}", self.frames, head.x, head.y);
            }
        }
    }

    /// Greedy steering: head for the item, never into a wall or the body
    fn choose_direction(model: &GridModel) -> Option<Direction> {
        let item = model.item()?;
        let head = model.head();
        let safe = |d: Direction| {
            let next = head.offset(d);
            d != model.direction().opposite()
                && model.bounds().contains(next)
                && !model.body().contains(&next)
        };

        let mut preferred = Vec::with_capacity(4);
        if item.col > head.col {
            preferred.push(Direction::Right);
        } else if item.col < head.col {
            preferred.push(Direction::Left);
        }
        if item.row > head.row {
            preferred.push(Direction::Down);
        } else if item.row < head.row {
            preferred.push(Direction::Up);
        }
        preferred.extend([model.direction(), Direction::Up, Direction::Right, Direction::Down, Direction::Left]);

        preferred.into_iter().find(|&d| safe(d))
    }

    pub fn run() {
        let difficulty = std::env::args()
            .nth(1)
            .and_then(|s| Difficulty::from_str(&s))
            .unwrap_or_default();

        let mut game = GameController::new(GameConfig::default(), LogHooks::default());
        if let Err(e) = game.start(difficulty) {
            log::error!("Failed to start: {e}");
            return;
        }

        let mut now = 0.0;
        for _ in 0..MAX_FRAMES {
            if game.phase() != GamePhase::Running {
                break;
            }
            if let Some(direction) = game.model().and_then(choose_direction) {
                game.set_direction(direction);
            }
            game.on_frame(now);
            now += FRAME_MS;
        }

        let ended = game.hooks().ended;
        match ended {
            Some((phase, score)) => log::info!(
                "{:?} on {} with score {} after {} frames",
                phase,
                difficulty.as_str(),
                score,
                game.hooks().frames
            ),
            None => {
                game.stop();
                log::warn!("Episode still running after {} frames, stopped", MAX_FRAMES);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Drip Snake (native) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is drip_snake::web, this is just to satisfy the compiler
}
