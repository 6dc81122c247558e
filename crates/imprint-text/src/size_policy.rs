use imprint_core::Size;

use crate::error::{TextError, TextResult};

/// Derives raster buffer dimensions from canvas size and measured text height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferSizePolicy {
    width_percent: u32,
    min_height_fraction: f32,
}

impl BufferSizePolicy {
    pub fn new(width_percent: u32, min_height_fraction: f32) -> Self {
        Self {
            width_percent,
            min_height_fraction,
        }
    }

    /// `floor(canvas_width * width_percent / 100)`; also the wrap width.
    pub fn width_budget(&self, canvas_width: u32) -> u32 {
        (canvas_width as u64 * self.width_percent as u64 / 100) as u32
    }

    /// The smallest buffer height allowed on a canvas of this height.
    pub fn min_height(&self, canvas_height: u32) -> u32 {
        ceil_px(canvas_height as f64 * self.min_height_fraction as f64).max(1)
    }

    /// Buffer size for text of `measured_height` pixels.
    ///
    /// Height is `max(canvas_height * min_fraction, measured_height)`, rounded
    /// up so neither the minimum nor the text is ever cut short.
    pub fn size_for(&self, measured_height: f32, canvas: Size<u32>) -> TextResult<Size<u32>> {
        if canvas.is_empty() {
            return Err(TextError::InvalidCanvas {
                width: canvas.width,
                height: canvas.height,
            });
        }

        let width = self.width_budget(canvas.width);
        if width == 0 {
            return Err(TextError::InvalidLayoutInput {
                width_budget: 0.0,
                font_size: 0.0,
            });
        }

        let height = self
            .min_height(canvas.height)
            .max(ceil_px(measured_height as f64));

        Ok(Size::new(width, height))
    }
}

/// Round up to whole pixels, treating values within float noise of an
/// integer as that integer.
fn ceil_px(value: f64) -> u32 {
    let nearest = value.round();
    let px = if (value - nearest).abs() < 1e-3 {
        nearest
    } else {
        value.ceil()
    };
    px.clamp(0.0, u32::MAX as f64) as u32
}
