use imprint_core::{Quad, Size};

/// Shape and base scale of a text entity, derived from its raster buffer.
///
/// Always regenerated from the buffer size; holds no state of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityGeometry {
    pub quad: Quad,
    /// `canvas_width / buffer_width`.
    pub uniform_scale: f32,
}

impl EntityGeometry {
    pub fn derive(buffer: Size<u32>, canvas_width: u32) -> Self {
        let uniform_scale = if buffer.width == 0 {
            1.0
        } else {
            canvas_width as f32 / buffer.width as f32
        };

        Self {
            quad: Quad::from_size(buffer.width as f32, buffer.height as f32),
            uniform_scale,
        }
    }

    /// Geometry of an entity that has not been laid out yet.
    pub fn empty() -> Self {
        Self {
            quad: Quad::default(),
            uniform_scale: 1.0,
        }
    }
}

impl Default for EntityGeometry {
    fn default() -> Self {
        Self::empty()
    }
}
