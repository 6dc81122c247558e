//! Imprint Core
//!
//! Shared building blocks for the Imprint overlay renderer: logging and
//! profiling setup, math re-exports, and the small geometry vocabulary
//! (sizes, rects, quads, affine transforms, colors) every other crate speaks.

pub mod color;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
pub mod transform;

pub use color::Color;
pub use geometry::{Pos, Quad, Rect, Size};
pub use transform::Transform2D;
