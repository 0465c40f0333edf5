pub mod runner;

pub use runner::GreetingRunner;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use jubilee_engine::GreetingConfig;

thread_local! {
    static RUNNER: RefCell<Option<GreetingRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut GreetingRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow
            .as_mut()
            .expect("Greeting not initialized. Call greeting_init() first.");
        f(runner)
    })
}

#[wasm_bindgen]
pub fn greeting_init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(GreetingRunner::new(GreetingConfig::default()));
    });
    log::info!("jubilee: initialized");
}

#[wasm_bindgen]
pub fn greeting_load_manifest(json: &str) {
    with_runner(|r| r.load_manifest(json));
}

#[wasm_bindgen]
pub fn greeting_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn greeting_start() {
    with_runner(|r| r.start());
}

#[wasm_bindgen]
pub fn greeting_reset() {
    with_runner(|r| r.reset());
}

#[wasm_bindgen]
pub fn greeting_set_personalization(name: &str) {
    with_runner(|r| r.set_personalization(name));
}

// ---- Geometry pushes (host-measured, layout coordinates) ----

#[wasm_bindgen]
pub fn set_stage_rect(l: f32, t: f32, w: f32, h: f32) {
    with_runner(|r| r.set_stage_rect(l, t, w, h));
}

#[wasm_bindgen]
pub fn set_actor_rect(l: f32, t: f32, w: f32, h: f32) {
    with_runner(|r| r.set_actor_rect(l, t, w, h));
}

#[wasm_bindgen]
pub fn set_target_rect(l: f32, t: f32, w: f32, h: f32) {
    with_runner(|r| r.set_target_rect(l, t, w, h));
}

#[wasm_bindgen]
pub fn set_boundary_rect(l: f32, t: f32, w: f32, h: f32) {
    with_runner(|r| r.set_boundary_rect(l, t, w, h));
}

#[wasm_bindgen]
pub fn set_surface_size(w: f32, h: f32) {
    with_runner(|r| r.set_surface_size(w, h));
}

// ---- Caption callbacks ----

#[wasm_bindgen]
pub fn caption_refit(natural_w: f32, natural_h: f32, region_w: f32, region_h: f32, boundary_top: f32) {
    with_runner(|r| r.caption_refit(natural_w, natural_h, region_w, region_h, boundary_top));
}

#[wasm_bindgen]
pub fn caption_spark_at(x: f32, y: f32) {
    with_runner(|r| r.caption_spark_at(x, y));
}

// ---- Glyph accessors ----

#[wasm_bindgen]
pub fn get_glyph_count() -> u32 {
    with_runner(|r| r.glyph_count())
}

#[wasm_bindgen]
pub fn get_glyph_text(index: u32) -> String {
    with_runner(|r| r.glyph_text(index))
}

#[wasm_bindgen]
pub fn get_glyph_is_cluster(index: u32) -> bool {
    with_runner(|r| r.glyph_is_cluster(index))
}

#[wasm_bindgen]
pub fn get_glyph_gap_before(index: u32) -> bool {
    with_runner(|r| r.glyph_gap_before(index))
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_draw_ptr() -> *const f32 {
    with_runner(|r| r.draw_ptr())
}

#[wasm_bindgen]
pub fn get_draw_count() -> u32 {
    with_runner(|r| r.draw_count())
}

#[wasm_bindgen]
pub fn get_events_ptr() -> *const f32 {
    with_runner(|r| r.events_ptr())
}

#[wasm_bindgen]
pub fn get_events_len() -> u32 {
    with_runner(|r| r.events_len())
}

#[wasm_bindgen]
pub fn get_sounds_ptr() -> *const u8 {
    with_runner(|r| r.sounds_ptr())
}

#[wasm_bindgen]
pub fn get_sounds_len() -> u32 {
    with_runner(|r| r.sounds_len())
}

#[wasm_bindgen]
pub fn get_actor_ptr() -> *const f32 {
    with_runner(|r| r.actor_ptr())
}

#[wasm_bindgen]
pub fn get_fit_ptr() -> *const f32 {
    with_runner(|r| r.fit_ptr())
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_draw_commands() -> u32 {
    with_runner(|r| r.max_draw_commands())
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events())
}

#[wasm_bindgen]
pub fn get_max_sounds() -> u32 {
    with_runner(|r| r.max_sounds())
}

// ---- Audio fallback ----

#[wasm_bindgen]
pub fn render_audio_fallback(sample_rate: u32) -> u32 {
    with_runner(|r| r.render_audio_fallback(sample_rate))
}

#[wasm_bindgen]
pub fn get_audio_ptr() -> *const f32 {
    with_runner(|r| r.audio_ptr())
}
