//! Single-actor arc animation between two layout anchors.
//!
//! Anchors are captured once at begin time; the flight is a straight
//! line between the anchor centers with a parabolic vertical offset and
//! a small rotational lean. The sequence polls [`Leap::tick`] once per
//! rendered frame — there are no internal timers.

use glam::Vec2;

use crate::core::geometry::{Rect, StageGeometry};
use crate::extensions::easing::Easing;

/// Fade-out duration once the flight lands.
const FADE_MS: f32 = 220.0;
/// The leap reports complete this long after the fade starts, so the
/// last frame settles before the burst fires.
const LANDED_MS: f32 = 240.0;
/// Rotational lean at the extremes, degrees.
const LEAN_DEG: f32 = 12.0;
/// Slight enlargement for the whole flight.
const FLIGHT_SCALE: f32 = 1.02;

/// The actor's derived transform, applied by the host each frame.
/// Wire format: tx, ty, rot_deg, scale, opacity, interactive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorPose {
    pub tx: f32,
    pub ty: f32,
    pub rot_deg: f32,
    pub scale: f32,
    pub opacity: f32,
    pub interactive: bool,
}

impl ActorPose {
    pub const FLOATS: usize = 6;

    /// Resting pose: visible, untransformed, interactive.
    pub fn resting() -> Self {
        Self {
            tx: 0.0,
            ty: 0.0,
            rot_deg: 0.0,
            scale: 1.0,
            opacity: 1.0,
            interactive: true,
        }
    }

    pub fn write_to(&self, out: &mut [f32; Self::FLOATS]) {
        *out = [
            self.tx,
            self.ty,
            self.rot_deg,
            self.scale,
            self.opacity,
            if self.interactive { 1.0 } else { 0.0 },
        ];
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LeapPhase {
    Flight,
    /// Elapsed milliseconds since the flight landed.
    Fade(f32),
    Done,
}

/// One leap from the actor anchor to the target anchor.
pub struct Leap {
    /// Anchor centers in stage space, read once at begin time.
    start: Vec2,
    end: Vec2,
    /// The actor's untransformed top-left and size, for the CSS-style
    /// translate that moves its center onto the flight path.
    origin: Vec2,
    half_size: Vec2,
    duration_ms: f32,
    peak: f32,
    elapsed_ms: f32,
    phase: LeapPhase,
    pose: ActorPose,
}

impl Leap {
    /// Capture anchor geometry and start the flight. The anchors do not
    /// update mid-flight even if the target moves (accepted limitation).
    pub fn begin(geom: &StageGeometry, duration_ms: f32, peak: f32) -> Self {
        let start = geom.center_in_stage(geom.actor);
        let end = geom.center_in_stage(geom.target);
        let stage_origin = Vec2::new(geom.stage.left, geom.stage.top);
        let origin = Vec2::new(geom.actor.left, geom.actor.top) - stage_origin;

        let mut leap = Self {
            start,
            end,
            origin,
            half_size: geom.actor.size() / 2.0,
            duration_ms,
            peak,
            elapsed_ms: 0.0,
            phase: LeapPhase::Flight,
            pose: ActorPose::resting(),
        };
        leap.pose = leap.flight_pose(0.0);
        leap
    }

    /// Parabolic vertical offset: zero at both ends, `peak` at the
    /// eased midpoint.
    pub fn vertical_offset(&self, eased: f32) -> f32 {
        -4.0 * self.peak * (eased - 0.5) * (eased - 0.5) + self.peak
    }

    fn flight_pose(&self, t: f32) -> ActorPose {
        let eased = Easing::CubicInOut.apply(t);
        let arc = self.vertical_offset(eased);
        let current = Vec2::new(
            self.start.x + (self.end.x - self.start.x) * eased,
            self.start.y + (self.end.y - self.start.y) * eased - arc,
        );
        ActorPose {
            tx: current.x - self.half_size.x - self.origin.x,
            ty: current.y - self.half_size.y - self.origin.y,
            rot_deg: (eased - 0.5) * LEAN_DEG,
            scale: FLIGHT_SCALE,
            opacity: 1.0,
            interactive: false,
        }
    }

    /// Advance by one frame's real time. Returns true once complete
    /// (the actor is hidden and the landing has settled).
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        match self.phase {
            LeapPhase::Flight => {
                self.elapsed_ms += dt_ms;
                let t = (self.elapsed_ms / self.duration_ms).min(1.0);
                self.pose = self.flight_pose(t);
                if t >= 1.0 {
                    self.phase = LeapPhase::Fade(0.0);
                }
                false
            }
            LeapPhase::Fade(fade) => {
                let fade = fade + dt_ms;
                self.pose.opacity = (1.0 - fade / FADE_MS).clamp(0.0, 1.0);
                self.pose.interactive = false;
                if fade >= LANDED_MS {
                    self.phase = LeapPhase::Done;
                    self.pose.opacity = 0.0;
                    true
                } else {
                    self.phase = LeapPhase::Fade(fade);
                    false
                }
            }
            LeapPhase::Done => true,
        }
    }

    pub fn pose(&self) -> ActorPose {
        self.pose
    }

    pub fn is_done(&self) -> bool {
        self.phase == LeapPhase::Done
    }
}
