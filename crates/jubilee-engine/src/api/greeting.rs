use glam::Vec2;

use crate::api::config::GreetingConfig;
use crate::api::types::{SoundEvent, StageEvent};
use crate::core::geometry::{stage_to_surface, Rect, StageGeometry};
use crate::core::sequence::{Phase, Sequence};
use crate::systems::burst::{BurstProfile, ParticleField};
use crate::systems::caption::Caption;
use crate::systems::leap::{ActorPose, Leap};
use crate::systems::surface::SurfaceFrame;

/// Arrival bounce cue for the target element, played by the host.
const BOUNCE_LIFT: f32 = 8.0;
const BOUNCE_SCALE: f32 = 1.04;
const BOUNCE_MS: f32 = 700.0;

/// The greeting core: one explicit session object owning all mutable
/// state — no ambient globals. The host pushes geometry and input in,
/// ticks once per rendered frame, and reads buffers and events out.
pub struct Greeting {
    config: GreetingConfig,
    geometry: StageGeometry,
    sequence: Sequence,
    field: ParticleField,
    frame: SurfaceFrame,
    leap: Option<Leap>,
    caption: Option<Caption>,
    /// Remembered name, substituted into the template at present time.
    personalization: Option<String>,
    actor: ActorPose,
    events: Vec<StageEvent>,
    sounds: Vec<SoundEvent>,
}

impl Greeting {
    pub fn new(config: GreetingConfig) -> Self {
        let field = ParticleField::new(config.rng_seed);
        let frame = SurfaceFrame::with_capacity(config.max_draw_commands);
        Self {
            config,
            geometry: StageGeometry::default(),
            sequence: Sequence::new(),
            field,
            frame,
            leap: None,
            caption: None,
            personalization: None,
            actor: ActorPose::resting(),
            events: Vec::new(),
            sounds: Vec::new(),
        }
    }

    pub fn config(&self) -> &GreetingConfig {
        &self.config
    }

    /// Replace the config from a JSON manifest. Buffer capacities are
    /// re-applied; a running sequence keeps its current timings.
    pub fn load_manifest(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let config = GreetingConfig::from_json(json)?;
        self.frame = SurfaceFrame::with_capacity(config.max_draw_commands);
        self.config = config;
        log::info!("greeting: manifest loaded");
        Ok(())
    }

    // -- Session state --

    /// Set or clear the remembered personalization. The collaborator
    /// boundary rejects empty input; blank strings are treated as clear.
    pub fn set_personalization(&mut self, name: Option<String>) {
        self.personalization = name.filter(|n| !n.trim().is_empty());
    }

    pub fn personalization(&self) -> Option<&str> {
        self.personalization.as_deref()
    }

    // -- Geometry pushes from the host --

    pub fn set_stage_rect(&mut self, rect: Rect) {
        self.geometry.stage = rect;
    }

    pub fn set_actor_rect(&mut self, rect: Rect) {
        self.geometry.actor = rect;
    }

    pub fn set_target_rect(&mut self, rect: Rect) {
        self.geometry.target = rect;
    }

    pub fn set_boundary_rect(&mut self, rect: Rect) {
        self.geometry.boundary = rect;
    }

    pub fn set_surface_size(&mut self, size: Vec2) {
        self.geometry.surface = size;
    }

    pub fn geometry(&self) -> &StageGeometry {
        &self.geometry
    }

    // -- Sequence control --

    /// Begin a run. No-op unless Idle. Anchor geometry is captured here,
    /// once — the leap ignores anchors that move mid-flight.
    pub fn start(&mut self) {
        if !self.sequence.begin() {
            return;
        }
        self.sounds.push(SoundEvent::BG_START);
        self.leap = Some(Leap::begin(
            &self.geometry,
            self.config.jump_duration_ms,
            self.config.jump_height,
        ));
        log::debug!("greeting: sequence started");
    }

    /// Fully reset to Idle from any phase. Drops the leap, the caption,
    /// and every live particle; restores the actor; stops the loop.
    pub fn reset(&mut self) {
        self.sequence.reset();
        self.leap = None;
        if self.caption.take().is_some() {
            self.events
                .push(StageEvent::new(StageEvent::KIND_CAPTION_DISMISSED, 0.0, 0.0, 0.0));
        }
        self.field.clear();
        self.frame.clear();
        self.actor = ActorPose::resting();
        self.sounds.push(SoundEvent::BG_STOP);
        self.events
            .push(StageEvent::new(StageEvent::KIND_IDLE, 0.0, 0.0, 0.0));
        log::debug!("greeting: reset to idle");
    }

    /// Clear per-frame transient data (events, sounds). The bridge
    /// calls this before each tick.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
        self.sounds.clear();
    }

    /// Advance everything by one frame of real time.
    pub fn tick(&mut self, dt_ms: f32) {
        self.field.tick(dt_ms);
        self.tick_leap(dt_ms);
        self.tick_phase(dt_ms);

        self.frame.clear();
        self.field.fill_frame(&mut self.frame);
    }

    fn tick_leap(&mut self, dt_ms: f32) {
        let Some(leap) = self.leap.as_mut() else {
            return;
        };
        let done = leap.tick(dt_ms);
        self.actor = leap.pose();
        if !done {
            return;
        }
        self.leap = None;
        self.events
            .push(StageEvent::new(StageEvent::KIND_ACTOR_HIDDEN, 0.0, 0.0, 0.0));
        self.events.push(StageEvent::new(
            StageEvent::KIND_TARGET_BOUNCE,
            BOUNCE_LIFT,
            BOUNCE_SCALE,
            BOUNCE_MS,
        ));

        // Arrival: burst at the target's center, mapped to surface space.
        let center = self.geometry.center_in_stage(self.geometry.target);
        let origin = stage_to_surface(center, self.geometry.stage, self.geometry.surface);
        self.sounds.push(SoundEvent::EXPLOSION);
        let burst = self
            .field
            .spawn(origin, &BurstProfile::explosion(self.config.explosion_particles));
        self.sequence.advance(Phase::Bursting { burst });
    }

    fn tick_phase(&mut self, dt_ms: f32) {
        match self.sequence.phase() {
            Phase::Bursting { burst } => {
                if self.field.burst_done(burst) {
                    self.sequence.advance(Phase::Clearing {
                        remaining_ms: self.config.burst_grace_ms,
                    });
                }
            }
            Phase::Clearing { remaining_ms } => {
                let remaining = remaining_ms - dt_ms;
                if remaining <= 0.0 {
                    self.field.clear();
                    self.sequence.advance(Phase::Settling {
                        remaining_ms: self.config.settle_ms,
                    });
                } else {
                    self.sequence.advance(Phase::Clearing {
                        remaining_ms: remaining,
                    });
                }
            }
            Phase::Settling { remaining_ms } => {
                let remaining = remaining_ms - dt_ms;
                if remaining <= 0.0 {
                    self.present_caption();
                } else {
                    self.sequence.advance(Phase::Settling {
                        remaining_ms: remaining,
                    });
                }
            }
            Phase::Revealing => {
                if let Some(caption) = self.caption.as_mut() {
                    caption.tick(dt_ms, &mut self.events);
                }
            }
            Phase::Idle | Phase::Leaping => {}
        }
    }

    fn present_caption(&mut self) {
        let text = self.config.resolve_message(self.personalization.as_deref());
        let caption = Caption::present(&text, self.config.glyph_delay_ms);
        self.events.push(StageEvent::new(
            StageEvent::KIND_CAPTION_PRESENTED,
            caption.len() as f32,
            0.0,
            0.0,
        ));
        self.caption = Some(caption);
        self.sequence.advance(Phase::Revealing);
        log::debug!("greeting: caption presented ({})", text);
    }

    // -- Host callbacks for the live caption --

    /// Spawn a glyph spark at a stage-space point. Ignored when no
    /// caption is live, which also rejects calls stale from before a
    /// reset.
    pub fn spark_at(&mut self, point: Vec2) {
        if self.caption.is_none() {
            return;
        }
        let origin = stage_to_surface(point, self.geometry.stage, self.geometry.surface);
        self.field.spawn(origin, &BurstProfile::glyph_spark());
    }

    /// Re-solve the caption fit from host-measured geometry. Ignored
    /// when no caption is live.
    pub fn refit(&mut self, natural: Vec2, region: Vec2, boundary_top: f32) {
        if let Some(caption) = self.caption.as_mut() {
            let fit = caption.refit(natural, region, boundary_top);
            self.events.push(StageEvent::new(
                StageEvent::KIND_FIT,
                fit.scale,
                fit.translate_y,
                0.0,
            ));
        }
    }

    // -- Frame outputs --

    pub fn frame(&self) -> &SurfaceFrame {
        &self.frame
    }

    pub fn actor_pose(&self) -> ActorPose {
        self.actor
    }

    pub fn caption(&self) -> Option<&Caption> {
        self.caption.as_ref()
    }

    pub fn events(&self) -> &[StageEvent] {
        &self.events
    }

    pub fn sounds(&self) -> &[SoundEvent] {
        &self.sounds
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn particle_count(&self) -> usize {
        self.field.len()
    }
}
