//! The run/replay state machine.
//!
//! Observable states are Idle and Running; Running is refined into the
//! internal phases below. Every transition is driven from the single
//! frame tick — completions are polled from owned state, so a stale
//! completion can never resurrect visual state after a reset.

use crate::api::types::BurstId;

/// Internal phase of the greeting sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Actor visible, message absent, start armed.
    Idle,
    /// The actor is mid-arc (or fading out at the end of it).
    Leaping,
    /// The explosion burst is draining.
    Bursting { burst: BurstId },
    /// Post-burst grace so the final frame stays visible, then the
    /// surface clears.
    Clearing { remaining_ms: f32 },
    /// Short settle between the cleared surface and the caption.
    Settling { remaining_ms: f32 },
    /// The caption is live and revealing glyphs.
    Revealing,
}

/// Phase plus a generation counter bumped on every reset. Host calls
/// that arrive late (from before a reset) carry no generation and are
/// instead rejected by phase checks; the counter exists so the bridge
/// can correlate frames across a reset if it wants to.
pub struct Sequence {
    phase: Phase,
    generation: u32,
}

impl Sequence {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether a run may start.
    pub fn armed(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn running(&self) -> bool {
        !self.armed()
    }

    /// Disarm and enter the leap. Returns false (and does nothing) when
    /// already running — `start` mid-run is a no-op.
    pub fn begin(&mut self) -> bool {
        if !self.armed() {
            return false;
        }
        self.phase = Phase::Leaping;
        true
    }

    /// Move to the next phase. Only meaningful while running.
    pub fn advance(&mut self, phase: Phase) {
        debug_assert!(self.running(), "cannot advance an idle sequence");
        self.phase = phase;
    }

    /// Return to Idle from any phase and invalidate everything that
    /// belonged to the old run.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.phase = Phase::Idle;
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}
