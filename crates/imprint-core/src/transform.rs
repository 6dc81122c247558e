//! Affine maps between buffer and canvas space.
//!
//! Entities are placed on the canvas by composing a base scale, a user scale
//! and a rotation about the entity center, then a translation.

use glam::{Mat3, Vec2};

use crate::geometry::Quad;

/// Affine map from buffer pixels to canvas pixels.
///
/// Composition reads left to right: `a.then(b)` applies `a` first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D(Mat3);

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Self = Self(Mat3::IDENTITY);

    pub fn translate(offset: Vec2) -> Self {
        Self(Mat3::from_translation(offset))
    }

    /// Rotation by `angle` radians about the origin.
    pub fn rotate(angle: f32) -> Self {
        Self(Mat3::from_angle(angle))
    }

    pub fn scale(factor: f32) -> Self {
        Self(Mat3::from_scale(Vec2::splat(factor)))
    }

    /// Rotation by `angle` radians around `pivot`.
    pub fn rotate_about(angle: f32, pivot: Vec2) -> Self {
        Self::about(Mat3::from_angle(angle), pivot)
    }

    /// Per-axis scale around `pivot`. A negative x factor mirrors.
    pub fn scale_about(scale: Vec2, pivot: Vec2) -> Self {
        Self::about(Mat3::from_scale(scale), pivot)
    }

    fn about(linear: Mat3, pivot: Vec2) -> Self {
        Self(Mat3::from_translation(pivot) * linear * Mat3::from_translation(-pivot))
    }

    pub fn then(self, next: Transform2D) -> Self {
        Self(next.0 * self.0)
    }

    pub fn then_translate(self, offset: Vec2) -> Self {
        self.then(Self::translate(offset))
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.0.transform_point2(point)
    }

    pub fn transform_quad(&self, quad: &Quad) -> Quad {
        Quad::from_points(quad.points().map(|p| self.transform_point(p)))
    }

    /// Coefficients `[a, b, c, d, tx, ty]` where `x' = a*x + c*y + tx` and
    /// `y' = b*x + d*y + ty`, the order `tiny_skia::Transform::from_row` takes.
    pub fn to_affine(&self) -> [f32; 6] {
        let Mat3 {
            x_axis,
            y_axis,
            z_axis,
        } = self.0;
        [x_axis.x, x_axis.y, y_axis.x, y_axis.y, z_axis.x, z_axis.y]
    }
}
