use glam::Vec2;

use jubilee_engine::{
    render_explosion_fallback, ActorPose, FitTransform, Greeting, GreetingConfig, ProtocolCaps,
    Rect, Rng, StageEvent,
};

/// Runner that wires the greeting core to flat buffers the JS host can
/// read straight out of WASM linear memory.
///
/// The host creates a `thread_local!` runner via the free functions in
/// `lib.rs`; wasm-bindgen cannot export a stateful struct with this
/// borrowing pattern directly.
pub struct GreetingRunner {
    greeting: Greeting,
    caps: ProtocolCaps,
    /// Events not yet handed to the host. One oversized frame delta
    /// (a tab resuming from the background) can cross more stage
    /// boundaries than the wire buffer holds; the excess waits here
    /// for the next frames instead of being dropped.
    pending_events: Vec<StageEvent>,
    /// Flat buffer of stage events for SharedArrayBuffer reads.
    event_buffer: Vec<f32>,
    /// Flat buffer of sound event IDs.
    sound_buffer: Vec<u8>,
    actor_buffer: [f32; ActorPose::FLOATS],
    fit_buffer: [f32; FitTransform::FLOATS],
    /// Synthesized explosion audio, rendered on first request.
    audio_buffer: Vec<f32>,
}

impl GreetingRunner {
    pub fn new(config: GreetingConfig) -> Self {
        let caps = ProtocolCaps::from_config(&config);
        let event_buffer = Vec::with_capacity(caps.max_events * StageEvent::FLOATS);
        let sound_buffer = Vec::with_capacity(caps.max_sounds);
        let mut runner = Self {
            greeting: Greeting::new(config),
            caps,
            pending_events: Vec::new(),
            event_buffer,
            sound_buffer,
            actor_buffer: [0.0; ActorPose::FLOATS],
            fit_buffer: [0.0; FitTransform::FLOATS],
            audio_buffer: Vec::new(),
        };
        runner.pack_outputs();
        runner
    }

    pub fn load_manifest(&mut self, json: &str) {
        match self.greeting.load_manifest(json) {
            Ok(()) => self.caps = ProtocolCaps::from_config(self.greeting.config()),
            Err(e) => log::error!("greeting: manifest rejected: {}", e),
        }
    }

    /// Run one frame tick and repack every output buffer.
    pub fn tick(&mut self, dt: f32) {
        self.greeting.clear_frame_data();
        self.greeting.tick(dt);
        self.pack_outputs();
    }

    pub fn start(&mut self) {
        self.greeting.clear_frame_data();
        self.greeting.start();
        self.pack_outputs();
    }

    pub fn reset(&mut self) {
        self.greeting.clear_frame_data();
        self.greeting.reset();
        // Undelivered events belong to the torn-down run.
        self.pending_events.clear();
        self.pack_outputs();
    }

    pub fn set_personalization(&mut self, name: &str) {
        let name = name.trim();
        self.greeting.set_personalization(if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        });
    }

    // ---- Geometry pushes ----

    pub fn set_stage_rect(&mut self, l: f32, t: f32, w: f32, h: f32) {
        self.greeting.set_stage_rect(Rect::new(l, t, w, h));
    }

    pub fn set_actor_rect(&mut self, l: f32, t: f32, w: f32, h: f32) {
        self.greeting.set_actor_rect(Rect::new(l, t, w, h));
    }

    pub fn set_target_rect(&mut self, l: f32, t: f32, w: f32, h: f32) {
        self.greeting.set_target_rect(Rect::new(l, t, w, h));
    }

    pub fn set_boundary_rect(&mut self, l: f32, t: f32, w: f32, h: f32) {
        self.greeting.set_boundary_rect(Rect::new(l, t, w, h));
    }

    pub fn set_surface_size(&mut self, w: f32, h: f32) {
        self.greeting.set_surface_size(Vec2::new(w, h));
    }

    // ---- Caption callbacks ----

    pub fn caption_refit(
        &mut self,
        natural_w: f32,
        natural_h: f32,
        region_w: f32,
        region_h: f32,
        boundary_top: f32,
    ) {
        self.greeting.clear_frame_data();
        self.greeting.refit(
            Vec2::new(natural_w, natural_h),
            Vec2::new(region_w, region_h),
            boundary_top,
        );
        self.pack_outputs();
    }

    pub fn caption_spark_at(&mut self, x: f32, y: f32) {
        self.greeting.spark_at(Vec2::new(x, y));
    }

    // ---- Glyph accessors (strings cross the boundary by value) ----

    pub fn glyph_count(&self) -> u32 {
        self.greeting.caption().map_or(0, |c| c.len() as u32)
    }

    pub fn glyph_text(&self, index: u32) -> String {
        self.greeting
            .caption()
            .and_then(|c| c.glyphs().get(index as usize))
            .map_or_else(String::new, |g| g.text.clone())
    }

    pub fn glyph_is_cluster(&self, index: u32) -> bool {
        self.greeting
            .caption()
            .and_then(|c| c.glyphs().get(index as usize))
            .is_some_and(|g| g.kind == jubilee_engine::GlyphKind::Cluster)
    }

    pub fn glyph_gap_before(&self, index: u32) -> bool {
        self.greeting
            .caption()
            .and_then(|c| c.glyphs().get(index as usize))
            .is_some_and(|g| g.gap_before)
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn draw_ptr(&self) -> *const f32 {
        self.greeting.frame().as_ptr()
    }

    pub fn draw_count(&self) -> u32 {
        self.greeting.frame().command_count() as u32
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.event_buffer.as_ptr()
    }

    pub fn events_len(&self) -> u32 {
        (self.event_buffer.len() / StageEvent::FLOATS) as u32
    }

    pub fn sounds_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sounds_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn actor_ptr(&self) -> *const f32 {
        self.actor_buffer.as_ptr()
    }

    pub fn fit_ptr(&self) -> *const f32 {
        self.fit_buffer.as_ptr()
    }

    // ---- Capacity accessors ----

    pub fn max_draw_commands(&self) -> u32 {
        self.caps.max_draw_commands as u32
    }

    pub fn max_events(&self) -> u32 {
        self.caps.max_events as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.caps.max_sounds as u32
    }

    // ---- Audio fallback ----

    /// Render (once) and expose the synthesized explosion sample buffer.
    pub fn render_audio_fallback(&mut self, sample_rate: u32) -> u32 {
        if self.audio_buffer.is_empty() {
            let mut rng = Rng::new(self.greeting.config().rng_seed);
            self.audio_buffer = render_explosion_fallback(sample_rate, &mut rng);
        }
        self.audio_buffer.len() as u32
    }

    pub fn audio_ptr(&self) -> *const f32 {
        self.audio_buffer.as_ptr()
    }

    /// Pack events, sounds, actor pose and fit into their flat buffers.
    /// Events beyond the wire capacity are queued, not dropped — glyph
    /// stage events are emitted exactly once and the host has no other
    /// way to learn about them.
    fn pack_outputs(&mut self) {
        self.pending_events.extend_from_slice(self.greeting.events());

        let deliver = self.pending_events.len().min(self.caps.max_events);
        self.event_buffer.clear();
        self.event_buffer
            .extend_from_slice(bytemuck::cast_slice(&self.pending_events[..deliver]));
        self.pending_events.drain(..deliver);

        self.sound_buffer.clear();
        for sound in self.greeting.sounds().iter().take(self.caps.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
        }

        self.greeting.actor_pose().write_to(&mut self.actor_buffer);

        let fit = self
            .greeting
            .caption()
            .map_or_else(FitTransform::identity, |c| c.fit());
        self.fit_buffer = [fit.scale, fit.translate_y];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> GreetingRunner {
        let mut r = GreetingRunner::new(GreetingConfig::default());
        r.set_stage_rect(0.0, 0.0, 800.0, 600.0);
        r.set_actor_rect(100.0, 400.0, 60.0, 60.0);
        r.set_target_rect(600.0, 380.0, 80.0, 80.0);
        r.set_boundary_rect(0.0, 380.0, 800.0, 220.0);
        r.set_surface_size(800.0, 600.0);
        r
    }

    #[test]
    fn initial_actor_buffer_is_resting() {
        let r = runner();
        assert_eq!(r.actor_buffer, [0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        assert_eq!(r.draw_count(), 0);
        assert_eq!(r.glyph_count(), 0);
    }

    #[test]
    fn start_packs_bg_sound() {
        let mut r = runner();
        r.start();
        assert_eq!(r.sounds_len(), 1);
        assert_eq!(r.sound_buffer[0], 1);
    }

    #[test]
    fn events_pack_four_floats_each() {
        let mut r = runner();
        r.start();
        r.reset();
        assert!(r.events_len() >= 1);
        assert_eq!(r.event_buffer.len() as u32, r.events_len() * 4);
    }

    #[test]
    fn glyph_accessors_follow_the_live_caption() {
        let mut r = runner();
        r.set_personalization("Ayşe");
        r.start();
        for _ in 0..600 {
            r.tick(16.0);
            if r.glyph_count() > 0 {
                break;
            }
        }
        assert!(r.glyph_count() > 0);
        assert_eq!(r.glyph_text(0), "C");
        assert!(!r.glyph_gap_before(0));
        let last = r.glyph_count() - 1;
        assert!(r.glyph_is_cluster(last));
        assert_eq!(r.glyph_text(last), "😊🥰");
    }

    fn appear_events(buffer: &[f32]) -> usize {
        buffer
            .chunks_exact(StageEvent::FLOATS)
            .filter(|e| e[0] == StageEvent::KIND_GLYPH_APPEAR)
            .count()
    }

    #[test]
    fn event_overflow_is_delivered_on_later_frames() {
        let mut r = runner();
        r.set_personalization("Abcdefghijklmnopqrstuvwxyz");
        r.start();
        for _ in 0..600 {
            r.tick(16.0);
            if r.glyph_count() > 0 {
                break;
            }
        }
        let total_glyphs = r.glyph_count() as usize;
        assert_eq!(total_glyphs, 41);

        // A tab resuming from the background hands the frame loop one
        // huge delta: every glyph stage fires inside a single tick, far
        // more events than one wire buffer holds.
        r.tick(1_000_000.0);
        assert_eq!(r.events_len(), r.max_events());
        let mut appears = appear_events(&r.event_buffer);
        for _ in 0..10 {
            r.tick(16.0);
            appears += appear_events(&r.event_buffer);
        }
        assert_eq!(appears, total_glyphs, "every appear event must reach the host");
    }

    #[test]
    fn reset_drops_undelivered_events() {
        let mut r = runner();
        r.start();
        for _ in 0..600 {
            r.tick(16.0);
            if r.glyph_count() > 0 {
                break;
            }
        }
        r.tick(1_000_000.0);
        r.reset();
        assert_eq!(appear_events(&r.event_buffer), 0);
        r.tick(16.0);
        assert_eq!(appear_events(&r.event_buffer), 0);
    }

    #[test]
    fn audio_fallback_rendered_once() {
        let mut r = runner();
        let len = r.render_audio_fallback(8000);
        assert_eq!(len, 4000);
        let ptr = r.audio_ptr();
        assert_eq!(r.render_audio_fallback(8000), len);
        assert_eq!(r.audio_ptr(), ptr);
    }

    #[test]
    fn fit_buffer_defaults_to_identity() {
        let mut r = runner();
        r.tick(16.0);
        assert_eq!(r.fit_buffer, [1.0, 0.0]);
    }
}
