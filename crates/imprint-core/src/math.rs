//! Math re-exports.
//!
//! All CPU-side vector and matrix math goes through [`glam`]. Other crates
//! import from here so the glam version is pinned in one place.
//!
//! ```
//! use imprint_core::math::Vec2;
//!
//! let center = Vec2::new(300.0, 50.0) * 0.5;
//! assert_eq!(center, Vec2::new(150.0, 25.0));
//! ```
//!
//! [`glam`]: https://docs.rs/glam
pub mod fast {
    pub use glam::*;
}

pub use fast::{Mat3, Vec2, Vec3};

/// Approximate float equality used by geometry comparisons.
#[inline]
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}
