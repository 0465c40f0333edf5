//! Time-stepped particle simulation for burst effects.
//!
//! Two call sites share this system: one large explosion burst and many
//! short overlapping glyph sparks. All live particles, regardless of
//! which burst spawned them, sit in a single [`ParticleField`] that is
//! ticked once per frame and drawn in one clear-and-redraw pass — see
//! [`crate::systems::surface::SurfaceFrame`].

use std::f32::consts::TAU;

use glam::Vec2;

use crate::api::types::BurstId;
use crate::systems::surface::{SurfaceFrame, SHAPE_CIRCLE, SHAPE_RECT, SHAPE_SPARKLE};

/// Seedable pseudo-random number generator (xorshift64).
/// Deterministic, fast, no-std compatible.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random float in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Generate a random float in [lo, hi).
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

/// Particle shape variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleShape {
    Circle,
    /// Tumbles as it ages (rotation proportional to age/lifetime).
    Rect,
}

/// One ephemeral particle, in rendering-surface space.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub hue: f32,
    pub shape: ParticleShape,
    pub life_ms: f32,
    pub age_ms: f32,
    burst: BurstId,
}

impl Particle {
    /// Downward acceleration per 16 ms-normalized step.
    const GRAVITY: f32 = 0.02;

    /// Remaining-life opacity, always in [0, 1].
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age_ms / self.life_ms).max(0.0)
    }

    /// Tumble angle for rect particles: one full turn over the lifetime.
    pub fn spin(&self) -> f32 {
        (self.age_ms / self.life_ms) * TAU
    }

    /// Advance by `dt_ms` of real time. Returns false once expired.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        self.age_ms += dt_ms;
        if self.age_ms > self.life_ms {
            return false;
        }
        let step = dt_ms / 16.0;
        self.vel.y += Self::GRAVITY * step;
        self.pos += self.vel * step;
        true
    }
}

/// Per-burst randomization ranges. All ranges are sampled uniformly.
#[derive(Debug, Clone)]
pub struct BurstProfile {
    pub count: usize,
    /// Min/max radial speed.
    pub speed: (f32, f32),
    /// Min/max visual size.
    pub size: (f32, f32),
    /// Min/max lifetime in milliseconds.
    pub life_ms: (f32, f32),
    /// Min/max hue in degrees.
    pub hue: (f32, f32),
    /// Probability a particle is a tumbling rect instead of a circle.
    pub rect_chance: f32,
    /// Extra upward kick, up to this magnitude (glyph sparks drift up).
    pub rise: f32,
    /// Whether the cosmetic sparkle pass runs near this burst's origin.
    pub sparkle: bool,
}

impl BurstProfile {
    /// The big arrival explosion.
    pub fn explosion(count: usize) -> Self {
        Self {
            count,
            speed: (1.0, 7.0),
            size: (3.0, 13.0),
            life_ms: (1000.0, 2400.0),
            hue: (10.0, 330.0),
            rect_chance: 0.25,
            rise: 0.0,
            sparkle: true,
        }
    }

    /// The small per-glyph reveal burst.
    pub fn glyph_spark() -> Self {
        Self {
            count: 18,
            speed: (1.0, 5.0),
            size: (2.0, 6.0),
            life_ms: (280.0, 520.0),
            hue: (20.0, 340.0),
            rect_chance: 0.0,
            rise: 1.2,
            sparkle: false,
        }
    }

    /// Upper bound on how long this burst can stay live.
    pub fn max_life_ms(&self) -> f32 {
        self.life_ms.1
    }
}

/// Chance per frame of one cosmetic sparkle near the explosion origin.
const SPARKLE_CHANCE: f32 = 0.03;

/// The single consolidated particle set for all concurrent bursts.
pub struct ParticleField {
    particles: Vec<Particle>,
    rng: Rng,
    next_burst: u32,
    /// Origin of the live sparkle-enabled burst, if any.
    sparkle_origin: Option<(BurstId, Vec2)>,
}

impl ParticleField {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(256),
            rng: Rng::new(seed.wrapping_add(7919)),
            next_burst: 1,
            sparkle_origin: None,
        }
    }

    /// Spawn `profile.count` particles at `origin` (surface space) with
    /// velocity sampled at a uniform angle in [0, 2π) and uniform radial
    /// speed. Returns a handle for completion polling.
    pub fn spawn(&mut self, origin: Vec2, profile: &BurstProfile) -> BurstId {
        let id = BurstId(self.next_burst);
        self.next_burst += 1;

        for _ in 0..profile.count {
            let angle = self.rng.next_f32() * TAU;
            let speed = self.rng.range(profile.speed.0, profile.speed.1);
            let rise = self.rng.next_f32() * profile.rise;
            let shape = if self.rng.next_f32() < profile.rect_chance {
                ParticleShape::Rect
            } else {
                ParticleShape::Circle
            };
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - rise),
                size: self.rng.range(profile.size.0, profile.size.1),
                hue: self.rng.range(profile.hue.0, profile.hue.1),
                shape,
                life_ms: self.rng.range(profile.life_ms.0, profile.life_ms.1),
                age_ms: 0.0,
                burst: id,
            });
        }

        if profile.sparkle {
            self.sparkle_origin = Some((id, origin));
        }
        id
    }

    /// Advance every live particle by `dt_ms` and drop the expired ones.
    pub fn tick(&mut self, dt_ms: f32) {
        self.particles.retain_mut(|p| p.tick(dt_ms));
        if let Some((id, _)) = self.sparkle_origin {
            if self.burst_done(id) {
                self.sparkle_origin = None;
            }
        }
    }

    /// True once no particle from `id` remains.
    pub fn burst_done(&self, id: BurstId) -> bool {
        !self.particles.iter().any(|p| p.burst == id)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Drop everything, including the sparkle origin.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.sparkle_origin = None;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Rebuild the frame's draw commands from the current particle set.
    /// One pass for all bursts; the sparkle pass rides along at the end.
    pub fn fill_frame(&mut self, frame: &mut SurfaceFrame) {
        for p in &self.particles {
            match p.shape {
                ParticleShape::Circle => {
                    frame.push(SHAPE_CIRCLE, p.pos, p.size, p.hue, p.alpha(), 0.0);
                }
                ParticleShape::Rect => {
                    frame.push(SHAPE_RECT, p.pos, p.size, p.hue, p.alpha(), p.spin());
                }
            }
        }

        if let Some((_, origin)) = self.sparkle_origin {
            if self.rng.next_f32() < SPARKLE_CHANCE {
                let offset = Vec2::new(
                    (self.rng.next_f32() - 0.5) * 120.0,
                    (self.rng.next_f32() - 0.5) * 60.0,
                );
                let size = 1.0 + self.rng.next_f32() * 3.0;
                let brightness = self.rng.next_f32() * 0.75;
                frame.push(SHAPE_SPARKLE, origin + offset, size, 0.0, brightness, 0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> ParticleField {
        ParticleField::new(42)
    }

    #[test]
    fn spawn_creates_count_particles_at_origin() {
        let mut f = field();
        f.spawn(Vec2::new(50.0, 60.0), &BurstProfile::explosion(160));
        assert_eq!(f.len(), 160);
        for p in f.iter() {
            assert_eq!(p.pos, Vec2::new(50.0, 60.0));
        }
    }

    #[test]
    fn profile_ranges_are_respected() {
        let mut f = field();
        let profile = BurstProfile::explosion(200);
        f.spawn(Vec2::ZERO, &profile);
        for p in f.iter() {
            let speed = p.vel.length();
            assert!(speed >= profile.speed.0 - 1e-3 && speed <= profile.speed.1 + 1e-3);
            assert!(p.size >= profile.size.0 && p.size < profile.size.1);
            assert!(p.life_ms >= profile.life_ms.0 && p.life_ms < profile.life_ms.1);
            assert!(p.hue >= profile.hue.0 && p.hue < profile.hue.1);
        }
    }

    #[test]
    fn active_count_monotonically_non_increasing() {
        let mut f = field();
        f.spawn(Vec2::ZERO, &BurstProfile::glyph_spark());
        let mut prev = f.len();
        for _ in 0..60 {
            f.tick(16.0);
            assert!(f.len() <= prev, "count grew mid-burst");
            prev = f.len();
        }
    }

    #[test]
    fn burst_drains_within_max_lifetime() {
        let mut f = field();
        let profile = BurstProfile::explosion(160);
        let id = f.spawn(Vec2::ZERO, &profile);
        let mut elapsed = 0.0;
        while !f.burst_done(id) {
            f.tick(16.0);
            elapsed += 16.0;
            assert!(
                elapsed <= profile.max_life_ms() + 32.0,
                "burst outlived its lifetime range"
            );
        }
        assert!(f.is_empty());
    }

    #[test]
    fn alpha_stays_in_unit_range_and_decreases() {
        let mut f = field();
        f.spawn(Vec2::ZERO, &BurstProfile::glyph_spark());
        let mut last: Vec<f32> = f.iter().map(|p| p.alpha()).collect();
        // 10 × 16 ms stays under the minimum lifetime, so no particle is
        // removed and indices stay aligned across ticks.
        for _ in 0..10 {
            f.tick(16.0);
            let now: Vec<f32> = f.iter().map(|p| p.alpha()).collect();
            for (i, &a) in now.iter().enumerate() {
                assert!((0.0..=1.0).contains(&a));
                assert!(a < last[i], "alpha must strictly decrease with age");
            }
            last = now;
        }
    }

    #[test]
    fn gravity_pulls_velocity_down() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -2.0),
            size: 4.0,
            hue: 100.0,
            shape: ParticleShape::Circle,
            life_ms: 1000.0,
            age_ms: 0.0,
            burst: BurstId(1),
        };
        let vy0 = p.vel.y;
        assert!(p.tick(16.0));
        assert!(p.vel.y > vy0);
        // 16 ms step is exactly one normalized unit.
        assert!((p.vel.y - (vy0 + 0.02)).abs() < 1e-5);
    }

    #[test]
    fn concurrent_bursts_complete_independently() {
        let mut f = field();
        let long = f.spawn(Vec2::ZERO, &BurstProfile::explosion(40));
        let short = f.spawn(Vec2::new(10.0, 10.0), &BurstProfile::glyph_spark());
        // Drain the short burst.
        for _ in 0..40 {
            f.tick(16.0);
        }
        assert!(f.burst_done(short));
        assert!(!f.burst_done(long), "explosion should still be live");
    }

    #[test]
    fn fill_frame_emits_one_command_per_particle() {
        let mut f = field();
        f.spawn(Vec2::ZERO, &BurstProfile::glyph_spark());
        let mut frame = SurfaceFrame::with_capacity(64);
        frame.clear();
        f.fill_frame(&mut frame);
        assert_eq!(frame.command_count(), f.len());
    }

    #[test]
    fn clear_resets_everything() {
        let mut f = field();
        let id = f.spawn(Vec2::ZERO, &BurstProfile::explosion(100));
        f.clear();
        assert!(f.is_empty());
        assert!(f.burst_done(id));
    }

    #[test]
    fn rng_range_bounds() {
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            let v = rng.range(2.0, 5.0);
            assert!((2.0..5.0).contains(&v));
        }
    }
}
