use bytemuck::{Pod, Zeroable};

/// Handle for one particle burst. Burst completion is polled by handle,
/// even though all live particles share a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BurstId(pub u32);

/// A sound event emitted by the core.
/// The numeric value maps to a host-defined sound in the JS audio glue.
/// Playback is fire-and-forget; the host may ignore any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

impl SoundEvent {
    /// One-shot explosion (file if set, synthesized fallback otherwise).
    pub const EXPLOSION: SoundEvent = SoundEvent(0);
    /// Start the background loop.
    pub const BG_START: SoundEvent = SoundEvent(1);
    /// Stop and rewind the background loop.
    pub const BG_STOP: SoundEvent = SoundEvent(2);
}

/// An event communicated from the core to the host each frame.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct StageEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl StageEvent {
    pub const FLOATS: usize = 4;

    /// The sequence returned to Idle (after a reset). No payload.
    pub const KIND_IDLE: f32 = 1.0;
    /// The actor finished its leap and is now hidden. No payload.
    pub const KIND_ACTOR_HIDDEN: f32 = 2.0;
    /// A caption was presented. `a` = glyph count.
    pub const KIND_CAPTION_PRESENTED: f32 = 3.0;
    /// The live caption was dismissed. No payload.
    pub const KIND_CAPTION_DISMISSED: f32 = 4.0;
    /// Glyph `a` entered its appear stage.
    pub const KIND_GLYPH_APPEAR: f32 = 5.0;
    /// Glyph `a` entered its spark stage.
    pub const KIND_GLYPH_SPARK: f32 = 6.0;
    /// Glyph `a` entered its float stage.
    pub const KIND_GLYPH_FLOAT: f32 = 7.0;
    /// The core wants fresh caption geometry; the host should measure
    /// and call refit. No payload.
    pub const KIND_MEASURE: f32 = 8.0;
    /// The caption fit transform changed. `a` = scale, `b` = translate-y.
    pub const KIND_FIT: f32 = 9.0;
    /// The target should play its arrival bounce. `a` = lift in stage
    /// units, `b` = scale, `c` = duration ms.
    pub const KIND_TARGET_BOUNCE: f32 = 10.0;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}
