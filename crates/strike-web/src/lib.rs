pub mod runner;

pub use runner::EngineRunner;

use std::cell::RefCell;
use strike_engine::EngineConfig;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<EngineRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut EngineRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow
            .as_mut()
            .expect("Engine not initialized. Call engine_init() first.");
        f(runner)
    })
}

/// Build the engine with the default config. Call once before anything else.
#[wasm_bindgen]
pub fn engine_init(seed: u32) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = EngineRunner::new(EngineConfig::default(), seed as u64)
        .expect("default config is valid");
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("strike-web: initialized (seed {seed})");
}

#[wasm_bindgen]
pub fn engine_start() {
    with_runner(|r| r.start());
}

#[wasm_bindgen]
pub fn engine_pause() {
    with_runner(|r| r.pause());
}

#[wasm_bindgen]
pub fn engine_resume() {
    with_runner(|r| r.resume());
}

#[wasm_bindgen]
pub fn engine_reset() {
    with_runner(|r| r.reset());
}

/// Advance to the host's `performance.now()` timestamp.
#[wasm_bindgen]
pub fn engine_tick(now_ms: f64) {
    with_runner(|r| r.tick(now_ms));
}

/// Feed one pose frame: 17 keypoints as x, y, score triples.
#[wasm_bindgen]
pub fn engine_pose_frame(data: &[f32], captured_at_ms: f64) {
    with_runner(|r| r.pose_frame(data, captured_at_ms));
}

/// Apply a JSON config. Returns false (and keeps the prior config) when
/// the JSON does not parse or a field is out of range.
#[wasm_bindgen]
pub fn engine_set_config(json: &str) -> bool {
    with_runner(|r| r.apply_config_json(json))
}

/// Full engine state as JSON, for debugging overlays.
#[wasm_bindgen]
pub fn engine_snapshot_json() -> String {
    with_runner(|r| match r.snapshot_json() {
        Ok(json) => json,
        Err(err) => {
            log::error!("snapshot serialization failed: {err}");
            String::new()
        }
    })
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    with_runner(|r| r.buffer_ptr())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats())
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_targets() -> u32 {
    with_runner(|r| r.max_targets())
}

#[wasm_bindgen]
pub fn get_max_swipes() -> u32 {
    with_runner(|r| r.max_swipes())
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events())
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world_width())
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world_height())
}
