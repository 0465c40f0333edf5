//! Wire-format constants shared with the JS host.
//!
//! Every buffer crossing the WASM boundary is flat f32 data read
//! directly out of linear memory. The layouts here are load-bearing:
//! the JS glue hard-codes the same strides.

use crate::api::config::GreetingConfig;
use crate::api::types::StageEvent;
use crate::systems::caption::FitTransform;
use crate::systems::leap::ActorPose;
use crate::systems::surface::DRAW_FLOATS;

/// Bumped whenever any wire layout changes.
pub const PROTOCOL_VERSION: u32 = 1;

/// Floats per draw command (shape, x, y, size, hue, alpha, spin).
pub const DRAW_COMMAND_FLOATS: usize = DRAW_FLOATS;
/// Floats per stage event (kind, a, b, c).
pub const EVENT_FLOATS: usize = StageEvent::FLOATS;
/// Floats in the actor pose block.
pub const ACTOR_FLOATS: usize = ActorPose::FLOATS;
/// Floats in the caption fit block (scale, translate-y).
pub const FIT_FLOATS: usize = FitTransform::FLOATS;

/// Host-visible buffer capacities, derived from the active config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolCaps {
    pub max_draw_commands: usize,
    pub max_events: usize,
    pub max_sounds: usize,
}

impl ProtocolCaps {
    pub fn from_config(config: &GreetingConfig) -> Self {
        Self {
            max_draw_commands: config.max_draw_commands,
            max_events: config.max_events,
            max_sounds: config.max_sounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_match_wire_types() {
        assert_eq!(DRAW_COMMAND_FLOATS, 7);
        assert_eq!(EVENT_FLOATS, 4);
        assert_eq!(ACTOR_FLOATS, 6);
        assert_eq!(FIT_FLOATS, 2);
        assert_eq!(
            std::mem::size_of::<StageEvent>(),
            EVENT_FLOATS * std::mem::size_of::<f32>()
        );
    }

    #[test]
    fn caps_track_config() {
        let caps = ProtocolCaps::from_config(&GreetingConfig::default());
        assert_eq!(caps.max_draw_commands, 512);
        assert_eq!(caps.max_events, 64);
        assert_eq!(caps.max_sounds, 8);
    }
}
