use serde::{Deserialize, Serialize};

/// Greeting configuration, loadable from a JSON manifest at runtime.
/// Every field has a sensible default; a manifest only overrides what
/// it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingConfig {
    /// Leap flight time in milliseconds.
    pub jump_duration_ms: f32,
    /// Arc apex height in stage units.
    pub jump_height: f32,
    /// Particle count of the arrival explosion.
    pub explosion_particles: usize,
    /// Stagger between consecutive glyph reveals.
    pub glyph_delay_ms: f32,
    /// Grace after the explosion drains, before the surface clears.
    pub burst_grace_ms: f32,
    /// Settle between the cleared surface and the caption.
    pub settle_ms: f32,
    /// Fallback message when no personalization is set.
    pub default_text: String,
    /// Personalized message template; `{name}` is substituted once.
    pub template: String,
    /// Draw-command buffer capacity.
    pub max_draw_commands: usize,
    /// Stage-event buffer capacity per frame.
    pub max_events: usize,
    /// Sound-event buffer capacity per frame.
    pub max_sounds: usize,
    /// Particle RNG seed.
    pub rng_seed: u64,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            jump_duration_ms: 850.0,
            jump_height: 180.0,
            explosion_particles: 160,
            glyph_delay_ms: 90.0,
            burst_grace_ms: 260.0,
            settle_ms: 120.0,
            default_text: "Canım arkadaşım 💖✨".to_string(),
            template: "Canım Arkadaşım {name} 😊 🥰".to_string(),
            max_draw_commands: 512,
            max_events: 64,
            max_sounds: 8,
            rng_seed: 42,
        }
    }
}

impl GreetingConfig {
    /// Parse a config from a JSON string. Missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolve the message text exactly once, before presentation.
    /// Empty or whitespace-only personalization falls back to the
    /// default text.
    pub fn resolve_message(&self, personalization: Option<&str>) -> String {
        match personalization.map(str::trim) {
            Some(name) if !name.is_empty() => self.template.replace("{name}", name),
            _ => self.default_text.clone(),
        }
    }
}
