// extensions/easing.rs
//
// Pure easing functions for animation interpolation.
// No dependencies on the stage or sequence — just math.

use std::f32::consts::PI;

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Slow start.
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Accelerate first half, decelerate second half. C1-continuous at
    /// the midpoint — the leap arc depends on that.
    CubicInOut,
    /// Stronger slow end.
    CubicOut,
    /// Sine wave easing (smooth).
    SineOut,
    /// Overshoot then settle, for pop-in effects.
    BackOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t` in [0, 1].
    /// Returns the eased value, also typically in [0, 1] (BackOut overshoots).
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,

            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),

            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),

            Easing::SineOut => (t * PI / 2.0).sin(),

            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two Vec2 values.
#[inline]
pub fn lerp_vec2(a: glam::Vec2, b: glam::Vec2, t: f32) -> glam::Vec2 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

/// Interpolate Vec2 with easing.
#[inline]
pub fn ease_vec2(a: glam::Vec2, b: glam::Vec2, t: f32, easing: Easing) -> glam::Vec2 {
    lerp_vec2(a, b, easing.apply(t))
}
