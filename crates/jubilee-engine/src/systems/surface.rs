//! Draw-command buffer for the shared rendering surface.
//!
//! The surface is cleared and fully redrawn every frame: all concurrent
//! bursts write into this one buffer, so no tick loop ever stomps on
//! another's frame. The host reads `ptr`/`count`, clears the canvas,
//! and replays the commands in order.

use glam::Vec2;

/// Floats per draw command: shape, x, y, size, hue, alpha, spin
/// (wire format — never changes).
pub const DRAW_FLOATS: usize = 7;

/// Shape codes in the wire format.
pub const SHAPE_CIRCLE: f32 = 0.0;
/// Rects are filled as `size×1.6` by `size×1.1`, rotated by `spin`.
pub const SHAPE_RECT: f32 = 1.0;
/// Cosmetic white point; `alpha` carries its brightness, hue is unused.
pub const SHAPE_SPARKLE: f32 = 2.0;

/// One frame's worth of draw commands, rebuilt from scratch each tick.
pub struct SurfaceFrame {
    data: Vec<f32>,
    max_commands: usize,
}

impl SurfaceFrame {
    pub fn with_capacity(max_commands: usize) -> Self {
        Self {
            data: Vec::with_capacity(max_commands * DRAW_FLOATS),
            max_commands,
        }
    }

    /// Drop all commands. Call at the start of every frame rebuild.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Append one draw command. Commands past the capacity are dropped
    /// so the wire buffer never reallocates mid-read on the host side.
    pub fn push(&mut self, shape: f32, pos: Vec2, size: f32, hue: f32, alpha: f32, spin: f32) {
        if self.command_count() >= self.max_commands {
            return;
        }
        self.data
            .extend_from_slice(&[shape, pos.x, pos.y, size, hue, alpha, spin]);
    }

    pub fn command_count(&self) -> usize {
        self.data.len() / DRAW_FLOATS
    }

    pub fn max_commands(&self) -> usize {
        self.max_commands
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_count() {
        let mut frame = SurfaceFrame::with_capacity(8);
        frame.push(SHAPE_CIRCLE, Vec2::new(1.0, 2.0), 3.0, 120.0, 0.5, 0.0);
        assert_eq!(frame.command_count(), 1);
        assert_eq!(frame.as_slice(), &[0.0, 1.0, 2.0, 3.0, 120.0, 0.5, 0.0]);
    }

    #[test]
    fn clear_empties_frame() {
        let mut frame = SurfaceFrame::with_capacity(8);
        frame.push(SHAPE_RECT, Vec2::ZERO, 4.0, 30.0, 1.0, 1.5);
        frame.clear();
        assert!(frame.is_empty());
        assert_eq!(frame.command_count(), 0);
    }

    #[test]
    fn drops_commands_past_capacity() {
        let mut frame = SurfaceFrame::with_capacity(2);
        for _ in 0..5 {
            frame.push(SHAPE_CIRCLE, Vec2::ZERO, 1.0, 0.0, 1.0, 0.0);
        }
        assert_eq!(frame.command_count(), 2);
    }
}
