use std::ops::Mul;

use crate::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T> Rect<T> {
    pub fn new(x: T, y: T, width: T, height: T) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl Rect<f32> {
    /// Build a rect from left/top/right/bottom edges.
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Rect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Size { width, height }
    }

    pub fn cast<U: From<T>>(self) -> Size<U> {
        Size {
            width: U::from(self.width),
            height: U::from(self.height),
        }
    }
}

impl Size<u32> {
    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl<T: Mul + Copy> Mul<T> for Size<T> {
    type Output = Size<<T as Mul>::Output>;

    fn mul(self, rhs: T) -> Self::Output {
        Size {
            width: self.width * rhs,
            height: self.height * rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos<T> {
    pub x: T,
    pub y: T,
}

impl<T> Pos<T> {
    pub fn new(x: T, y: T) -> Self {
        Pos { x, y }
    }
}

/// Four corner points of an untransformed entity shape.
///
/// Points are ordered clockwise starting at the top-left corner. A quad is
/// always regenerated from a width and height, never edited point by point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quad {
    points: [Vec2; 4],
}

impl Quad {
    /// `[(0,0), (w,0), (w,h), (0,h)]`.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            points: [
                Vec2::new(0.0, 0.0),
                Vec2::new(width, 0.0),
                Vec2::new(width, height),
                Vec2::new(0.0, height),
            ],
        }
    }

    /// Build from already-mapped corners (e.g. after a transform).
    pub fn from_points(points: [Vec2; 4]) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec2; 4] {
        &self.points
    }

    pub fn top_left(&self) -> Vec2 {
        self.points[0]
    }

    pub fn top_right(&self) -> Vec2 {
        self.points[1]
    }

    pub fn bottom_right(&self) -> Vec2 {
        self.points[2]
    }

    pub fn bottom_left(&self) -> Vec2 {
        self.points[3]
    }

    /// Length of the top edge.
    pub fn width(&self) -> f32 {
        (self.points[1] - self.points[0]).length()
    }

    /// Length of the left edge.
    pub fn height(&self) -> f32 {
        (self.points[3] - self.points[0]).length()
    }

    pub fn center(&self) -> Vec2 {
        (self.points[0] + self.points[2]) * 0.5
    }

    /// Flattened `[x0, y0, x1, y1, x2, y2, x3, y3]`.
    pub fn to_array(&self) -> [f32; 8] {
        let [a, b, c, d] = self.points;
        [a.x, a.y, b.x, b.y, c.x, c.y, d.x, d.y]
    }

    /// Point-in-quad test for convex quads in either winding.
    pub fn contains(&self, point: Vec2) -> bool {
        let mut sign = 0.0_f32;
        for i in 0..4 {
            let a = self.points[i];
            let b = self.points[(i + 1) % 4];
            let cross = (b - a).perp_dot(point - a);
            if cross == 0.0 {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }
}
