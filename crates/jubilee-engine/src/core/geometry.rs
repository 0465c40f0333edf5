use glam::Vec2;

/// An on-screen rectangle in stage (layout) coordinates.
/// The host measures live elements and pushes these across the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Latest host-measured geometry. Anchors are viewport rects; the stage
/// rect defines the coordinate space the anchors and captions live in.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageGeometry {
    /// The named positioning container.
    pub stage: Rect,
    /// The jumping element, in its resting position.
    pub actor: Rect,
    /// The leap destination and burst origin.
    pub target: Rect,
    /// The reference boundary the caption must clear.
    pub boundary: Rect,
    /// Rendering surface pixel buffer size (independent of on-screen size).
    pub surface: Vec2,
}

impl StageGeometry {
    /// Center of `rect` expressed in stage space (origin at the stage's
    /// top-left corner).
    pub fn center_in_stage(&self, rect: Rect) -> Vec2 {
        rect.center() - Vec2::new(self.stage.left, self.stage.top)
    }
}

/// Map a point in stage space to rendering-surface pixel space.
///
/// Scale factors are recomputed on every call — both the surface buffer
/// and the stage's on-screen size can change between calls (resize,
/// zoom). A zero-size stage is undefined behavior; the host must size
/// the surface before the first burst.
pub fn stage_to_surface(point: Vec2, stage: Rect, surface: Vec2) -> Vec2 {
    let scale_x = surface.x / stage.width;
    let scale_y = surface.y / stage.height;
    Vec2::new(point.x * scale_x, point.y * scale_y)
}
