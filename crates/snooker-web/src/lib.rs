pub mod runner;

pub use runner::GameRunner;

#[cfg(feature = "physics")]
mod exports {
    use std::cell::RefCell;

    use snooker_engine::{
        ArrangementMode, GameConfig, InputEvent, Modifier, RapierWorld, SnookerGame,
    };
    use wasm_bindgen::prelude::*;

    use crate::GameRunner;

    thread_local! {
        static RUNNER: RefCell<Option<GameRunner<RapierWorld>>> = const { RefCell::new(None) };
    }

    fn with_runner<R>(f: impl FnOnce(&mut GameRunner<RapierWorld>) -> R) -> Option<R> {
        RUNNER.with(|cell| {
            let mut borrow = cell.borrow_mut();
            match borrow.as_mut() {
                Some(runner) => Some(f(runner)),
                None => {
                    log::warn!("game not initialized, call game_init() first");
                    None
                }
            }
        })
    }

    fn push(event: InputEvent) {
        with_runner(|r| r.push_input(event));
    }

    /// Create the game. `config_json` may override any subset of the defaults.
    #[wasm_bindgen]
    pub fn game_init(config_json: Option<String>) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let config = match config_json {
            Some(json) => GameConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => GameConfig::default(),
        };
        let runner = GameRunner::new(SnookerGame::with_rapier(config));
        RUNNER.with(|cell| {
            *cell.borrow_mut() = Some(runner);
        });
        log::info!("snooker: initialized");
        Ok(())
    }

    #[wasm_bindgen]
    pub fn game_tick(dt: f32) {
        with_runner(|r| r.tick(dt));
    }

    #[wasm_bindgen]
    pub fn game_pointer_down(x: f32, y: f32) {
        push(InputEvent::PointerDown { x, y });
    }

    #[wasm_bindgen]
    pub fn game_pointer_up(x: f32, y: f32) {
        push(InputEvent::PointerUp { x, y });
    }

    #[wasm_bindgen]
    pub fn game_pointer_move(x: f32, y: f32) {
        push(InputEvent::PointerMove { x, y });
    }

    /// `key` is the DOM `KeyboardEvent.key`; only its first character is used.
    #[wasm_bindgen]
    pub fn game_key_down(key: &str) {
        if let Some(ch) = key.chars().next() {
            push(InputEvent::Key { ch });
        }
    }

    /// 0 ordered, 1 partial, 2 unordered.
    #[wasm_bindgen]
    pub fn game_select_arrangement(mode: u32) {
        let mode = match mode {
            0 => ArrangementMode::Ordered,
            1 => ArrangementMode::Partial,
            2 => ArrangementMode::Unordered,
            other => {
                log::warn!("unknown arrangement {}", other);
                return;
            }
        };
        push(InputEvent::SelectArrangement(mode));
    }

    #[wasm_bindgen]
    pub fn game_place_cue(x: f32, y: f32) {
        push(InputEvent::PlaceCue { x, y });
    }

    /// Modifier button by index: 0 jumbo cue, 1 shrink, 2 triple points, 3 to the pockets.
    #[wasm_bindgen]
    pub fn game_modifier(index: u32) {
        match Modifier::from_index(index) {
            Some(modifier) => push(InputEvent::Modifier(modifier)),
            None => log::warn!("unknown modifier index {}", index),
        }
    }

    #[wasm_bindgen]
    pub fn game_restart() {
        push(InputEvent::Restart);
    }

    // ---- Data accessors ----

    #[wasm_bindgen]
    pub fn snapshot_json() -> String {
        with_runner(|r| r.snapshot_json()).unwrap_or_default()
    }

    /// Packed ball instances, 8 floats per ball.
    #[wasm_bindgen]
    pub fn ball_instances() -> js_sys::Float32Array {
        with_runner(|r| js_sys::Float32Array::from(r.instance_floats()))
            .unwrap_or_else(|| js_sys::Float32Array::new_with_length(0))
    }

    #[wasm_bindgen]
    pub fn ball_instance_count() -> u32 {
        with_runner(|r| r.instance_count()).unwrap_or(0)
    }

    #[wasm_bindgen]
    pub fn get_alpha() -> f32 {
        with_runner(|r| r.alpha()).unwrap_or(0.0)
    }
}
