//! Browser host adapter
//!
//! Exposes the controller to JavaScript. The page owns the canvas, the
//! buttons and `requestAnimationFrame`; it forwards key presses and frame
//! timestamps here and receives notifications through registered callbacks.

use js_sys::{Array, Function, Int32Array};
use wasm_bindgen::prelude::*;

use crate::controller::{GameController, GameHooks};
use crate::settings::{Difficulty, GameConfig};
use crate::sim::{Cell, Direction, GamePhase, RenderFrame};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
}

/// JS callbacks; unset ones are skipped
#[derive(Default)]
struct JsHooks {
    score_changed: Option<Function>,
    item_spawned: Option<Function>,
    episode_ended: Option<Function>,
    render: Option<Function>,
}

fn flatten(cells: &[Cell]) -> Int32Array {
    let flat: Vec<i32> = cells.iter().flat_map(|c| [c.col, c.row]).collect();
    Int32Array::from(flat.as_slice())
}

fn phase_name(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Idle => "idle",
        GamePhase::Running => "running",
        GamePhase::Won => "won",
        GamePhase::Lost => "lost",
    }
}

fn report(result: Result<JsValue, JsValue>) {
    if let Err(e) = result {
        log::error!("Host callback threw: {:?}", e);
    }
}

impl GameHooks for JsHooks {
    fn on_score_changed(&mut self, score: u32, target: u32) {
        if let Some(f) = &self.score_changed {
            report(f.call2(&JsValue::NULL, &score.into(), &target.into()));
        }
    }

    fn on_item_spawned(&mut self, cell: Cell) {
        if let Some(f) = &self.item_spawned {
            report(f.call2(&JsValue::NULL, &cell.col.into(), &cell.row.into()));
        }
    }

    fn on_episode_ended(&mut self, phase: GamePhase, final_score: u32) {
        if let Some(f) = &self.episode_ended {
            report(f.call2(
                &JsValue::NULL,
                &JsValue::from_str(phase_name(phase)),
                &final_score.into(),
            ));
        }
    }

    /// render(previous, current, interpolation, itemCol, itemRow); item is -1 when absent
    fn on_render(&mut self, frame: &RenderFrame<'_>) {
        if let Some(f) = &self.render {
            let (col, row) = frame.item.map_or((-1, -1), |c| (c.col, c.row));
            let args = Array::of5(
                &flatten(frame.previous),
                &flatten(frame.current),
                &JsValue::from_f64(f64::from(frame.interpolation)),
                &col.into(),
                &row.into(),
            );
            report(f.apply(&JsValue::NULL, &args));
        }
    }
}

#[wasm_bindgen]
pub struct WebGame {
    inner: GameController<JsHooks>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_width: u32, canvas_height: u32, box_size: u32) -> WebGame {
        let config = GameConfig::with_canvas(canvas_width, canvas_height, box_size);
        let seed = js_sys::Date::now() as u64;
        log::info!("Snake core ready ({}x{} px, seed {})", canvas_width, canvas_height, seed);
        WebGame {
            inner: GameController::with_seed(config, JsHooks::default(), seed),
        }
    }

    /// Build from a JSON `GameConfig`
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<WebGame, JsValue> {
        let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let seed = js_sys::Date::now() as u64;
        Ok(WebGame {
            inner: GameController::with_seed(config, JsHooks::default(), seed),
        })
    }

    #[wasm_bindgen(js_name = onScoreChanged)]
    pub fn on_score_changed(&mut self, f: Function) {
        self.inner.hooks_mut().score_changed = Some(f);
    }

    #[wasm_bindgen(js_name = onItemSpawned)]
    pub fn on_item_spawned(&mut self, f: Function) {
        self.inner.hooks_mut().item_spawned = Some(f);
    }

    #[wasm_bindgen(js_name = onEpisodeEnded)]
    pub fn on_episode_ended(&mut self, f: Function) {
        self.inner.hooks_mut().episode_ended = Some(f);
    }

    #[wasm_bindgen(js_name = onRender)]
    pub fn on_render(&mut self, f: Function) {
        self.inner.hooks_mut().render = Some(f);
    }

    /// Start with "easy" | "medium" | "hard"; false if an episode is not Idle
    pub fn start(&mut self, difficulty: &str) -> Result<bool, JsValue> {
        let difficulty = parse_difficulty(difficulty)?;
        self.inner
            .start(difficulty)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn restart(&mut self, difficulty: &str) -> Result<bool, JsValue> {
        let difficulty = parse_difficulty(difficulty)?;
        self.inner
            .restart(difficulty)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }

    /// Forward a `KeyboardEvent.key`; returns true if it was a steering key
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) -> bool {
        match Direction::from_key(key) {
            Some(direction) => {
                self.inner.set_direction(direction);
                true
            }
            None => false,
        }
    }

    /// Per-frame callback; pass the `requestAnimationFrame` timestamp
    pub fn frame(&mut self, timestamp_ms: f64) {
        self.inner.on_frame(timestamp_ms);
    }

    /// Token for the current frame loop; changes on every start, stop and restart
    #[wasm_bindgen(js_name = frameToken)]
    pub fn frame_token(&self) -> f64 {
        self.inner.frame_token() as f64
    }

    /// Like `frame`, but dropped if `token` belongs to an earlier loop.
    /// Capture `frameToken()` when scheduling the first frame and pass it back on each one.
    #[wasm_bindgen(js_name = frameFor)]
    pub fn frame_for(&mut self, token: f64, timestamp_ms: f64) {
        self.inner.on_frame_for(token as u64, timestamp_ms);
    }

    /// "idle" | "running" | "won" | "lost"; stop scheduling frames when not running
    pub fn phase(&self) -> String {
        phase_name(self.inner.phase()).to_string()
    }

    pub fn score(&self) -> u32 {
        self.inner.score()
    }
}

fn parse_difficulty(s: &str) -> Result<Difficulty, JsValue> {
    Difficulty::from_str(s).ok_or_else(|| JsValue::from_str(&format!("unknown difficulty: {s}")))
}
