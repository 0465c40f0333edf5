//! Caption reveal timeline and responsive fit solving.
//!
//! The caption lives in a host-managed floating region matched to the
//! stage rectangle. The core owns the timing (staggered glyph reveals,
//! three visual stages per glyph, measure requests) and the fit math;
//! the host measures natural sizes and applies the resulting transform.

use glam::Vec2;

use crate::api::types::StageEvent;
use crate::systems::text::{glyphs, Glyph};

/// Horizontal padding inside the region, each side.
const PAD_X: f32 = 20.0;
/// Gap kept between the caption's bottom edge and the boundary top.
const MARGIN_ABOVE_BOUNDARY: f32 = 10.0;
/// Extra inset subtracted from the allowed bottom when computing the
/// available height.
const BOTTOM_INSET: f32 = 8.0;
/// Never report less room than this.
const MIN_ALLOWED_WIDTH: f32 = 40.0;
const MIN_AVAILABLE_HEIGHT: f32 = 24.0;
/// Scale floors — smaller on narrow viewports. Readability beats
/// containment: the caption may overflow rather than shrink below these.
const MIN_SCALE_NARROW: f32 = 0.45;
const MIN_SCALE_WIDE: f32 = 0.58;
const NARROW_REGION_WIDTH: f32 = 420.0;
/// Safety margin when shifting the caption up off the boundary.
const SHIFT_SAFETY: f32 = 4.0;
/// Minimal top inset the caption never rises above.
const MIN_TOP: f32 = 6.0;

/// Glyph stage offsets relative to its reveal time.
const SPARK_OFFSET_MS: f32 = 80.0;
const FLOAT_OFFSET_MS: f32 = 420.0;
/// Padding added after the last reveal before the first measure request.
const MEASURE_PAD_MS: f32 = 180.0;
const MEASURE_MIN_MS: f32 = 260.0;
/// The re-measure that catches late font/paint settling.
const REMEASURE_GAP_MS: f32 = 90.0;

/// The computed (scale, vertical translation) pair that keeps the
/// caption inside its region without crossing the boundary element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    pub scale: f32,
    /// Offset from the vertically centered placement, positive = down.
    pub translate_y: f32,
}

impl FitTransform {
    pub const FLOATS: usize = 2;

    pub fn identity() -> Self {
        Self { scale: 1.0, translate_y: 0.0 }
    }
}

/// Solve the caption fit for a natural (unscaled) block size inside a
/// region, keeping clear of a boundary whose top edge sits at
/// `boundary_top` in region coordinates.
///
/// Idempotent: same inputs, same output. Called on every geometry push.
pub fn solve_fit(natural: Vec2, region: Vec2, boundary_top: f32) -> FitTransform {
    let allowed_width = (region.x - PAD_X * 2.0).max(MIN_ALLOWED_WIDTH);
    let allowed_bottom = boundary_top - MARGIN_ABOVE_BOUNDARY;
    let available_height = (allowed_bottom - BOTTOM_INSET).max(MIN_AVAILABLE_HEIGHT);

    let width_fit = allowed_width / natural.x;
    let height_fit = available_height / natural.y;
    let floor = if region.x <= NARROW_REGION_WIDTH {
        MIN_SCALE_NARROW
    } else {
        MIN_SCALE_WIDE
    };
    let scale = width_fit.min(height_fit).min(1.0).max(floor);

    let scaled_height = natural.y * scale;
    let centered_top = region.y / 2.0 - scaled_height / 2.0;
    let top = if centered_top + scaled_height > allowed_bottom {
        (allowed_bottom - scaled_height - SHIFT_SAFETY).max(MIN_TOP)
    } else {
        centered_top
    };

    let baseline_top = region.y / 2.0 - natural.y / 2.0;
    FitTransform {
        scale,
        translate_y: top - baseline_top,
    }
}

/// The live caption: glyph sequence plus its reveal clock.
pub struct Caption {
    glyphs: Vec<Glyph>,
    delay_ms: f32,
    elapsed_ms: f32,
    fit: FitTransform,
}

impl Caption {
    /// Build the caption for an already-resolved message. Personalization
    /// substitution happens before this call, never inside it.
    pub fn present(text: &str, delay_ms: f32) -> Self {
        Self {
            glyphs: glyphs(text),
            delay_ms,
            elapsed_ms: 0.0,
            fit: FitTransform::identity(),
        }
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn fit(&self) -> FitTransform {
        self.fit
    }

    /// Reveal time of glyph `i`.
    fn reveal_at(&self, i: usize) -> f32 {
        i as f32 * self.delay_ms
    }

    /// When the host is first asked to measure and fit.
    fn first_measure_at(&self) -> f32 {
        (self.glyphs.len() as f32 * self.delay_ms + MEASURE_PAD_MS).max(MEASURE_MIN_MS)
    }

    /// Advance the reveal clock, emitting one event per stage boundary
    /// crossed during this step.
    pub fn tick(&mut self, dt_ms: f32, events: &mut Vec<StageEvent>) {
        let t0 = self.elapsed_ms;
        let t1 = t0 + dt_ms;
        self.elapsed_ms = t1;

        // Half-open windows partition the timeline, so each stage
        // boundary fires exactly once (including reveal time 0).
        let crossed = |at: f32| at >= t0 && at < t1;

        for i in 0..self.glyphs.len() {
            let reveal = self.reveal_at(i);
            if crossed(reveal) {
                events.push(StageEvent::new(StageEvent::KIND_GLYPH_APPEAR, i as f32, 0.0, 0.0));
            }
            if crossed(reveal + SPARK_OFFSET_MS) {
                events.push(StageEvent::new(StageEvent::KIND_GLYPH_SPARK, i as f32, 0.0, 0.0));
            }
            if crossed(reveal + FLOAT_OFFSET_MS) {
                events.push(StageEvent::new(StageEvent::KIND_GLYPH_FLOAT, i as f32, 0.0, 0.0));
            }
        }

        let measure = self.first_measure_at();
        for at in [measure, measure + REMEASURE_GAP_MS] {
            if crossed(at) {
                events.push(StageEvent::new(StageEvent::KIND_MEASURE, 0.0, 0.0, 0.0));
            }
        }
    }

    /// Recompute the fit from host-measured geometry. Returns the new
    /// transform; the caller decides whether to announce it.
    pub fn refit(&mut self, natural: Vec2, region: Vec2, boundary_top: f32) -> FitTransform {
        self.fit = solve_fit(natural, region, boundary_top);
        self.fit
    }

    /// Number of glyphs whose reveal time has passed.
    pub fn revealed(&self) -> usize {
        self.glyphs
            .iter()
            .enumerate()
            .take_while(|(i, _)| self.reveal_at(*i) <= self.elapsed_ms)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::StageEvent;

    fn kinds(events: &[StageEvent], kind: f32) -> Vec<u32> {
        events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.a as u32)
            .collect()
    }

    // ── fit solver ───────────────────────────────────────────────────

    #[test]
    fn wide_message_scales_down_to_width() {
        // Wide region so the 0.58 floor applies, natural fits height.
        let fit = solve_fit(Vec2::new(900.0, 60.0), Vec2::new(600.0, 400.0), 320.0);
        let expected = (600.0 - 40.0) / 900.0;
        assert!((fit.scale - expected).abs() < 1e-4);
    }

    #[test]
    fn narrow_region_floor_wins_over_width_fit() {
        // Region width 300: width fit would be 260/900 ≈ 0.29, but the
        // narrow floor holds the line at 0.45.
        let fit = solve_fit(Vec2::new(900.0, 60.0), Vec2::new(300.0, 400.0), 320.0);
        assert!((fit.scale - 0.45).abs() < 1e-5);
    }

    #[test]
    fn extreme_width_still_renders_at_floor() {
        let fit = solve_fit(Vec2::new(5000.0, 60.0), Vec2::new(300.0, 400.0), 320.0);
        assert!((fit.scale - 0.45).abs() < 1e-5, "floor must win, overflow accepted");
    }

    #[test]
    fn scale_never_exceeds_one() {
        let fit = solve_fit(Vec2::new(100.0, 30.0), Vec2::new(800.0, 600.0), 500.0);
        assert_eq!(fit.scale, 1.0);
    }

    #[test]
    fn centered_when_clear_of_boundary() {
        let fit = solve_fit(Vec2::new(100.0, 30.0), Vec2::new(800.0, 600.0), 500.0);
        assert!(fit.translate_y.abs() < 1e-4);
    }

    #[test]
    fn shifts_up_when_centered_bottom_crosses_boundary() {
        // Region 400 tall, boundary top at 220: allowed bottom is 210.
        // Centered 60-tall block spans 170..230 — must shift up.
        let fit = solve_fit(Vec2::new(100.0, 60.0), Vec2::new(800.0, 400.0), 220.0);
        assert!(fit.scale == 1.0);
        let top = 200.0 - 30.0 + fit.translate_y;
        assert!((top - (210.0 - 60.0 - 4.0)).abs() < 1e-3);
        assert!(top + 60.0 <= 210.0);
    }

    #[test]
    fn shift_is_floored_at_minimal_top_inset() {
        // Boundary so high the block cannot clear it: top pins at 6.
        let fit = solve_fit(Vec2::new(100.0, 200.0), Vec2::new(800.0, 400.0), 60.0);
        let top = 200.0 - 100.0 + fit.translate_y;
        assert!((top - 6.0).abs() < 1e-3);
    }

    #[test]
    fn solver_is_idempotent() {
        let a = solve_fit(Vec2::new(900.0, 60.0), Vec2::new(600.0, 400.0), 320.0);
        let b = solve_fit(Vec2::new(900.0, 60.0), Vec2::new(600.0, 400.0), 320.0);
        assert_eq!(a, b);
    }

    // ── reveal timeline ──────────────────────────────────────────────

    #[test]
    fn glyphs_reveal_in_staggered_order() {
        let mut caption = Caption::present("Hey", 90.0);
        let mut events = Vec::new();
        caption.tick(100.0, &mut events);
        let appeared = kinds(&events, StageEvent::KIND_GLYPH_APPEAR);
        assert_eq!(appeared, vec![0, 1], "reveals at 0 and 90 ms");
        caption.tick(100.0, &mut events);
        let appeared = kinds(&events, StageEvent::KIND_GLYPH_APPEAR);
        assert_eq!(appeared, vec![0, 1, 2]);
        assert_eq!(caption.revealed(), 3);
    }

    #[test]
    fn stages_fire_once_each() {
        let mut caption = Caption::present("ab", 90.0);
        let mut events = Vec::new();
        for _ in 0..80 {
            caption.tick(16.0, &mut events);
        }
        assert_eq!(kinds(&events, StageEvent::KIND_GLYPH_SPARK), vec![0, 1]);
        assert_eq!(kinds(&events, StageEvent::KIND_GLYPH_FLOAT), vec![0, 1]);
    }

    #[test]
    fn measure_requested_twice_after_reveals() {
        let mut caption = Caption::present("abc", 90.0);
        let mut events = Vec::new();
        for _ in 0..60 {
            caption.tick(16.0, &mut events);
        }
        let measures = events
            .iter()
            .filter(|e| e.kind == StageEvent::KIND_MEASURE)
            .count();
        assert_eq!(measures, 2);
    }

    #[test]
    fn short_captions_measure_no_earlier_than_minimum() {
        let caption = Caption::present("a", 90.0);
        assert!((caption.first_measure_at() - 270.0).abs() < 1e-3);
        let tiny = Caption::present("", 90.0);
        assert_eq!(tiny.first_measure_at(), 260.0);
    }

    #[test]
    fn refit_updates_stored_transform() {
        let mut caption = Caption::present("hello", 90.0);
        let fit = caption.refit(Vec2::new(900.0, 60.0), Vec2::new(300.0, 400.0), 320.0);
        assert_eq!(caption.fit(), fit);
        assert!((fit.scale - 0.45).abs() < 1e-5);
    }
}
