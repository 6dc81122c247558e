//! Layout, buffer sizing, background and glyph painting in one pass.

use imprint_core::math::Vec2;
use imprint_core::profiling::{profile_function, profile_scope};
use imprint_core::{Color, Size};

use crate::buffer::{Acquisition, BufferAllocator, BufferSlot};
use crate::config::TextEntityConfig;
use crate::decoration::BackgroundDecorator;
use crate::error::{TextError, TextResult};
use crate::layer::TextLayer;
use crate::layout::{LayoutRequest, TextLayouter};
use crate::size_policy::BufferSizePolicy;

/// What a [`TextRasterizer::rasterize`] call produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOutcome {
    pub size: Size<u32>,
    pub acquisition: Acquisition,
    pub measured_height: f32,
    pub line_count: usize,
}

impl RasterOutcome {
    /// True when the buffer dimensions differ from the previous call.
    pub fn resized(&self) -> bool {
        match self.acquisition {
            Acquisition::Reused => false,
            Acquisition::Allocated { previous } => previous != Some(self.size),
        }
    }
}

/// Turns a [`TextLayer`] into pixels inside a [`BufferSlot`].
pub struct TextRasterizer<L, A> {
    layouter: L,
    allocator: A,
    policy: BufferSizePolicy,
    decorator: BackgroundDecorator,
    line_height: f32,
}

impl<L: TextLayouter, A: BufferAllocator> TextRasterizer<L, A> {
    pub fn new(layouter: L, allocator: A, config: &TextEntityConfig) -> Self {
        Self {
            layouter,
            allocator,
            policy: BufferSizePolicy::new(config.width_percent, config.min_height_fraction),
            decorator: BackgroundDecorator::new(config.background),
            line_height: config.line_height,
        }
    }

    pub fn layouter(&self) -> &L {
        &self.layouter
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.allocator
    }

    pub fn policy(&self) -> &BufferSizePolicy {
        &self.policy
    }

    /// Lay out `layer` for `canvas` and paint it in `color` into `slot`.
    ///
    /// Layout and glyph inking run before the buffer is touched, and nothing
    /// after a successful acquire can fail. Any error therefore leaves the
    /// slot's current buffer and pixels intact.
    pub fn rasterize(
        &mut self,
        layer: &TextLayer,
        canvas: Size<u32>,
        slot: &mut BufferSlot,
        color: Color,
    ) -> TextResult<RasterOutcome> {
        profile_function!();

        if canvas.is_empty() {
            return Err(TextError::InvalidCanvas {
                width: canvas.width,
                height: canvas.height,
            });
        }

        let font = layer.font();
        let request = LayoutRequest::new(
            layer.text(),
            font.pixel_size(canvas.width),
            &font.typeface,
            self.policy.width_budget(canvas.width) as f32,
        )
        .line_height(self.line_height);

        let layout = self.layouter.layout(&request)?;
        let size = self.policy.size_for(layout.measured_height, canvas)?;
        let ink = self.layouter.ink(&layout, color)?;
        let acquisition = slot.acquire(&mut self.allocator, size.width, size.height)?;

        let measured_height = layout.measured_height;
        let offset_y = if measured_height < size.height as f32 {
            (size.height as f32 - measured_height) * 0.5
        } else {
            0.0
        };

        if let Some(buffer) = slot.get_mut() {
            if let Some(rect) =
                self.decorator
                    .background_rect(size, layout.ink_width(), measured_height, offset_y)
            {
                profile_scope!("background");
                self.decorator.paint(buffer.pixmap_mut(), rect);
            }

            self.layouter
                .composite(&ink, buffer.pixmap_mut(), Vec2::new(0.0, offset_y));
        }

        tracing::trace!(
            width = size.width,
            height = size.height,
            lines = layout.line_count(),
            measured_height,
            "rasterized text layer"
        );

        Ok(RasterOutcome {
            size,
            acquisition,
            measured_height,
            line_count: layout.line_count(),
        })
    }

    /// Hand the slot's buffer back to the allocator.
    pub fn release(&mut self, slot: &mut BufferSlot) -> bool {
        slot.release(&mut self.allocator)
    }
}
