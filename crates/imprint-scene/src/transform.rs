//! Per-entity placement state owned by the canvas.

use imprint_core::Size;
use imprint_core::Transform2D;
use imprint_core::math::Vec2;

/// Bounds for the user-applied scale of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLimits {
    pub initial: f32,
    pub min: f32,
    pub max: f32,
}

impl ScaleLimits {
    pub fn new(initial: f32, min: f32, max: f32) -> Self {
        Self { initial, min, max }
    }

    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min, self.max)
    }
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self {
            initial: 0.8,
            min: 0.2,
            max: 1.0,
        }
    }
}

/// Position, scale, rotation and selection of one entity on the canvas.
///
/// The position is the entity's top-left corner expressed as fractions of the
/// canvas size, so it survives canvas resizes. Rotation and user scale pivot
/// on the entity center; the entity's uniform base scale is applied first and
/// maps buffer pixels to canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTransform {
    canvas: Size<u32>,
    position: Vec2,
    scale: f32,
    rotation_degrees: f32,
    flipped: bool,
    selected: bool,
    limits: ScaleLimits,
}

impl EntityTransform {
    pub fn new(canvas: Size<u32>, limits: ScaleLimits) -> Self {
        Self {
            canvas,
            position: Vec2::ZERO,
            scale: limits.clamp(limits.initial),
            rotation_degrees: 0.0,
            flipped: false,
            selected: false,
            limits,
        }
    }

    pub fn canvas(&self) -> Size<u32> {
        self.canvas
    }

    /// Normalized top-left position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn limits(&self) -> ScaleLimits {
        self.limits
    }

    /// New canvas dimensions; the normalized position is kept.
    pub fn set_canvas(&mut self, canvas: Size<u32>) {
        self.canvas = canvas;
    }

    fn top_left(&self) -> Vec2 {
        Vec2::new(
            self.position.x * self.canvas.width as f32,
            self.position.y * self.canvas.height as f32,
        )
    }

    /// Center of the entity on the canvas before rotation and user scale.
    ///
    /// Rotation and user scale both pivot on this point, so it is also the
    /// visual center of the transformed entity.
    pub fn absolute_center(&self, width: u32, height: u32, base_scale: f32) -> Vec2 {
        self.top_left() + Vec2::new(width as f32, height as f32) * base_scale * 0.5
    }

    /// Full buffer-to-canvas matrix for an entity of the given buffer size.
    pub fn matrix(&self, width: u32, height: u32, base_scale: f32) -> Transform2D {
        let center = self.absolute_center(width, height, base_scale);
        let scale_x = if self.flipped { -self.scale } else { self.scale };

        Transform2D::scale(base_scale)
            .then_translate(self.top_left())
            .then(Transform2D::rotate_about(
                self.rotation_degrees.to_radians(),
                center,
            ))
            .then(Transform2D::scale_about(
                Vec2::new(scale_x, self.scale),
                center,
            ))
    }

    /// Translate by a delta in canvas pixels.
    pub fn move_by(&mut self, delta: Vec2) {
        if self.canvas.is_empty() {
            return;
        }
        self.position += Vec2::new(
            delta.x / self.canvas.width as f32,
            delta.y / self.canvas.height as f32,
        );
    }

    /// Translate so that [`absolute_center`](Self::absolute_center) lands on `target`.
    pub fn move_center_to(&mut self, target: Vec2, width: u32, height: u32, base_scale: f32) {
        let current = self.absolute_center(width, height, base_scale);
        self.move_by(target - current);
    }

    pub fn move_to_canvas_center(&mut self, width: u32, height: u32, base_scale: f32) {
        let target = Vec2::new(
            self.canvas.width as f32 * 0.5,
            self.canvas.height as f32 * 0.5,
        );
        self.move_center_to(target, width, height, base_scale);
    }

    /// Multiply the user scale, clamped to the limits. Returns the applied scale.
    pub fn scale_by(&mut self, factor: f32) -> f32 {
        self.scale = self.limits.clamp(self.scale * factor);
        self.scale
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        self.rotation_degrees = (self.rotation_degrees + degrees) % 360.0;
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }
}
