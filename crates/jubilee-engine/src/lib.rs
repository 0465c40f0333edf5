pub mod api;
pub mod bridge;
pub mod core;
pub mod extensions;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::GreetingConfig;
pub use api::greeting::Greeting;
pub use api::types::{BurstId, SoundEvent, StageEvent};
pub use bridge::protocol::{
    ProtocolCaps, ACTOR_FLOATS, DRAW_COMMAND_FLOATS, EVENT_FLOATS, FIT_FLOATS, PROTOCOL_VERSION,
};
pub use crate::core::geometry::{stage_to_surface, Rect, StageGeometry};
pub use crate::core::sequence::{Phase, Sequence};
pub use systems::audio::render_explosion_fallback;
pub use systems::burst::{BurstProfile, Particle, ParticleField, ParticleShape, Rng};
pub use systems::caption::{solve_fit, Caption, FitTransform};
pub use systems::leap::{ActorPose, Leap};
pub use systems::surface::{SurfaceFrame, DRAW_FLOATS, SHAPE_CIRCLE, SHAPE_RECT, SHAPE_SPARKLE};
pub use systems::text::{glyphs, tokenize, Glyph, GlyphKind, Token};

// Extensions — decoupled optional systems
pub use extensions::{ease, ease_vec2, lerp, lerp_vec2, Easing};
