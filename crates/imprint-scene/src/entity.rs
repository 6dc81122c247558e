use imprint_core::math::Vec2;
use imprint_core::{Color, Quad, Transform2D};
use tiny_skia::PixmapMut;

use crate::transform::EntityTransform;

/// The overlay variants the canvas knows how to compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Text,
    Image,
    Drawing,
}

impl EntityKind {
    /// Stable label reported to the host UI.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Text => "Text",
            EntityKind::Image => "Image",
            EntityKind::Drawing => "Drawing",
        }
    }
}

/// Per-frame paint adjustments supplied by the canvas.
///
/// `color` is a live-edit tint rendered for this frame only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintOverride {
    pub color: Option<Color>,
    pub opacity: f32,
}

impl PaintOverride {
    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            opacity: 1.0,
        }
    }

    pub fn opacity(opacity: f32) -> Self {
        Self {
            color: None,
            opacity,
        }
    }
}

impl Default for PaintOverride {
    fn default() -> Self {
        Self {
            color: None,
            opacity: 1.0,
        }
    }
}

/// Capability interface every overlay implements.
///
/// Width and height are the entity's raster size in buffer pixels (0 before
/// the first layout). `uniform_scale` maps buffer pixels to canvas pixels and
/// is applied before the user transform.
pub trait MotionEntity {
    fn kind(&self) -> EntityKind;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Untransformed corner quad in buffer-local coordinates.
    fn corners(&self) -> Quad;

    fn uniform_scale(&self) -> f32;

    fn transform(&self) -> &EntityTransform;

    fn transform_mut(&mut self) -> &mut EntityTransform;

    /// Paint the entity through `matrix` onto `surface`.
    fn paint(
        &mut self,
        surface: &mut PixmapMut<'_>,
        matrix: &Transform2D,
        override_paint: Option<&PaintOverride>,
    );

    /// Free any pixel memory held by the entity. Must be idempotent.
    fn release(&mut self);

    fn is_selected(&self) -> bool {
        self.transform().is_selected()
    }

    fn matrix(&self) -> Transform2D {
        self.transform()
            .matrix(self.width(), self.height(), self.uniform_scale())
    }

    fn absolute_center(&self) -> Vec2 {
        self.transform()
            .absolute_center(self.width(), self.height(), self.uniform_scale())
    }

    fn move_center_to(&mut self, target: Vec2) {
        let (width, height, scale) = (self.width(), self.height(), self.uniform_scale());
        self.transform_mut()
            .move_center_to(target, width, height, scale);
    }

    fn move_to_canvas_center(&mut self) {
        let (width, height, scale) = (self.width(), self.height(), self.uniform_scale());
        self.transform_mut()
            .move_to_canvas_center(width, height, scale);
    }

    /// Corner quad mapped onto the canvas.
    fn mapped_corners(&self) -> Quad {
        self.matrix().transform_quad(&self.corners())
    }

    /// Hit-test a canvas point against the mapped quad.
    fn contains_point(&self, point: Vec2) -> bool {
        self.width() > 0 && self.height() > 0 && self.mapped_corners().contains(point)
    }

    /// Paint through the entity's current matrix.
    fn paint_current(&mut self, surface: &mut PixmapMut<'_>, override_paint: Option<&PaintOverride>) {
        let matrix = self.matrix();
        tracing::trace!(kind = self.kind().label(), "painting entity");
        self.paint(surface, &matrix, override_paint);
    }
}
