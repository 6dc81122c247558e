use imprint_core::profiling::profile_function;
use imprint_core::{Color, Quad, Size, Transform2D};
use imprint_scene::{EntityKind, EntityTransform, MotionEntity, PaintOverride};
use tiny_skia::{BlendMode, FilterQuality, PixmapMut, PixmapPaint, Transform};

use crate::buffer::{BufferAllocator, BufferSlot, PixmapAllocator, RasterBuffer};
use crate::config::TextEntityConfig;
use crate::error::{TextError, TextResult};
use crate::font::FontSystem;
use crate::geometry::EntityGeometry;
use crate::layer::{FontSizeLimits, TextLayer};
use crate::layout::TextLayouter;
use crate::raster::{RasterOutcome, TextRasterizer};
use crate::shaping::CosmicLayouter;

/// An editable text overlay.
///
/// The entity owns its [`TextLayer`], exactly one raster buffer and the
/// geometry derived from it. Every edit re-rasterizes; when the buffer
/// dimensions change the entity is moved so its visual center stays put.
///
/// Colors come in two flavors: a preview set with
/// [`preview_color`](Self::preview_color) only affects what is rendered,
/// while [`commit_color`](Self::commit_color) writes into the layer's font.
/// Painting never changes the layer.
pub struct TextEntity<L: TextLayouter = CosmicLayouter, A: BufferAllocator = PixmapAllocator> {
    layer: TextLayer,
    rasterizer: TextRasterizer<L, A>,
    slot: BufferSlot,
    geometry: EntityGeometry,
    transform: EntityTransform,
    font_limits: FontSizeLimits,
    preview: Option<Color>,
    /// Color the current buffer was painted with.
    rendered: Option<Color>,
    disposed: bool,
}

impl TextEntity {
    /// Text entity backed by cosmic-text with the default configuration.
    pub fn new(layer: TextLayer, canvas: Size<u32>, font_system: FontSystem) -> TextResult<Self> {
        Self::with_config(layer, canvas, font_system, TextEntityConfig::default())
    }

    pub fn with_config(
        layer: TextLayer,
        canvas: Size<u32>,
        font_system: FontSystem,
        config: TextEntityConfig,
    ) -> TextResult<Self> {
        let allocator = PixmapAllocator::new(config.max_buffer_pixels);
        Self::create(
            layer,
            canvas,
            CosmicLayouter::new(font_system),
            allocator,
            config,
        )
    }
}

impl<L: TextLayouter, A: BufferAllocator> TextEntity<L, A> {
    /// Build and lay out an entity. It starts at the transform's default
    /// anchor (the canvas origin); no recentering happens here.
    pub fn create(
        layer: TextLayer,
        canvas: Size<u32>,
        layouter: L,
        allocator: A,
        config: TextEntityConfig,
    ) -> TextResult<Self> {
        config.validate()?;

        let mut entity = Self {
            layer,
            rasterizer: TextRasterizer::new(layouter, allocator, &config),
            slot: BufferSlot::new(),
            geometry: EntityGeometry::empty(),
            transform: EntityTransform::new(canvas, config.scale_limits),
            font_limits: config.font_limits,
            preview: None,
            rendered: None,
            disposed: false,
        };
        entity.render()?;

        tracing::debug!(
            width = entity.width(),
            height = entity.height(),
            scale = entity.geometry.uniform_scale,
            "created text entity"
        );
        Ok(entity)
    }

    pub fn layer(&self) -> &TextLayer {
        &self.layer
    }

    pub fn text(&self) -> &str {
        self.layer.text()
    }

    pub fn geometry(&self) -> &EntityGeometry {
        &self.geometry
    }

    pub fn buffer(&self) -> Option<&RasterBuffer> {
        self.slot.get()
    }

    pub fn preview(&self) -> Option<Color> {
        self.preview
    }

    pub fn rasterizer(&self) -> &TextRasterizer<L, A> {
        &self.rasterizer
    }

    pub fn allocator(&self) -> &A {
        self.rasterizer.allocator()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The color text is rendered in absent a per-frame override.
    pub fn display_color(&self) -> Color {
        self.preview.unwrap_or(self.layer.font().color)
    }

    /// Re-rasterize after the layer changed, keeping the visual center.
    ///
    /// On failure the previous buffer and geometry stay in place.
    pub fn update_on_edit(&mut self) -> TextResult<()> {
        profile_function!();
        self.ensure_live()?;

        let before = self.slot.size();
        let center = self.absolute_center();

        match self.render() {
            Ok(outcome) => {
                if outcome.size != before {
                    tracing::debug!(
                        from_width = before.width,
                        from_height = before.height,
                        to_width = outcome.size.width,
                        to_height = outcome.size.height,
                        "text entity resized, recentering"
                    );
                    self.move_center_to(center);
                }
                Ok(())
            }
            Err(err) => {
                if err.is_recoverable() {
                    tracing::warn!("keeping previous text buffer: {}", err);
                } else {
                    tracing::warn!("rejected text edit: {}", err);
                }
                Err(err)
            }
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> TextResult<()> {
        let text = text.into();
        self.edit(|layer| {
            layer.set_text(text);
            true
        })
        .map(|_| ())
    }

    /// Returns false when the font is already at its maximum size.
    pub fn increase_font_size(&mut self) -> TextResult<bool> {
        let limits = self.font_limits;
        self.edit(|layer| layer.increase_font_size(&limits))
    }

    /// Returns false when the font is already at its minimum size.
    pub fn decrease_font_size(&mut self) -> TextResult<bool> {
        let limits = self.font_limits;
        self.edit(|layer| layer.decrease_font_size(&limits))
    }

    /// Render in `color` without touching the layer. On failure the previous
    /// preview stays.
    pub fn preview_color(&mut self, color: Color) -> TextResult<()> {
        self.ensure_live()?;
        let previous = self.preview.replace(color);
        if let Err(err) = self.refresh() {
            self.preview = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn clear_preview(&mut self) -> TextResult<()> {
        self.ensure_live()?;
        if let Some(previous) = self.preview.take()
            && let Err(err) = self.refresh()
        {
            self.preview = Some(previous);
            return Err(err);
        }
        Ok(())
    }

    /// Persist `color` into the layer's font if the entity is selected.
    ///
    /// Returns whether the color was applied. Any preview is dropped. A
    /// failed repaint restores both the color and the preview.
    pub fn commit_color(&mut self, color: Color) -> TextResult<bool> {
        self.ensure_live()?;
        if !self.is_selected() {
            return Ok(false);
        }
        let (old_color, old_preview) = (self.layer.font().color, self.preview.take());
        self.layer.set_color(color);
        if let Err(err) = self.refresh() {
            self.layer.set_color(old_color);
            self.preview = old_preview;
            return Err(err);
        }
        Ok(true)
    }

    /// Color edit issued by the editing UI.
    pub fn apply_color_edit(&mut self, color: Color) -> TextResult<bool> {
        self.commit_color(color)
    }

    /// Release the raster buffer for good. Safe to call more than once.
    ///
    /// Afterwards edits and color changes fail with [`TextError::Disposed`]
    /// and painting draws nothing.
    pub fn dispose(&mut self) {
        if self.rasterizer.release(&mut self.slot) {
            tracing::debug!("disposed text entity");
        }
        self.geometry = EntityGeometry::empty();
        self.rendered = None;
        self.disposed = true;
    }

    fn ensure_live(&self) -> TextResult<()> {
        if self.disposed {
            return Err(TextError::Disposed);
        }
        Ok(())
    }

    fn edit(&mut self, apply: impl FnOnce(&mut TextLayer) -> bool) -> TextResult<bool> {
        self.ensure_live()?;
        let previous = self.layer.clone();
        if !apply(&mut self.layer) {
            return Ok(false);
        }
        if let Err(err) = self.update_on_edit() {
            self.layer = previous;
            return Err(err);
        }
        Ok(true)
    }

    /// Repaint in the display color if it differs from what the buffer shows.
    fn refresh(&mut self) -> TextResult<()> {
        if self.rendered != Some(self.display_color()) {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> TextResult<RasterOutcome> {
        self.render_with(self.display_color())
    }

    fn render_with(&mut self, color: Color) -> TextResult<RasterOutcome> {
        let canvas = self.transform.canvas();
        let result = self
            .rasterizer
            .rasterize(&self.layer, canvas, &mut self.slot, color);
        // Geometry always follows whatever buffer the slot holds.
        if !self.slot.is_empty() {
            self.geometry = EntityGeometry::derive(self.slot.size(), canvas.width);
        }
        let outcome = result?;
        self.rendered = Some(color);
        Ok(outcome)
    }
}

impl<L: TextLayouter, A: BufferAllocator> MotionEntity for TextEntity<L, A> {
    fn kind(&self) -> EntityKind {
        EntityKind::Text
    }

    fn width(&self) -> u32 {
        self.slot.size().width
    }

    fn height(&self) -> u32 {
        self.slot.size().height
    }

    fn corners(&self) -> Quad {
        self.geometry.quad
    }

    fn uniform_scale(&self) -> f32 {
        self.geometry.uniform_scale
    }

    fn transform(&self) -> &EntityTransform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut EntityTransform {
        &mut self.transform
    }

    fn paint(
        &mut self,
        surface: &mut PixmapMut<'_>,
        matrix: &Transform2D,
        override_paint: Option<&PaintOverride>,
    ) {
        profile_function!();
        if self.disposed {
            return;
        }

        let color = override_paint
            .and_then(|paint| paint.color)
            .unwrap_or_else(|| self.display_color());
        if self.rendered != Some(color)
            && let Err(err) = self.render_with(color)
        {
            tracing::warn!("painting previous text buffer: {}", err);
        }

        let Some(buffer) = self.slot.get() else {
            return;
        };

        let opacity = override_paint.map_or(1.0, |paint| paint.opacity.clamp(0.0, 1.0));
        let paint = PixmapPaint {
            opacity,
            blend_mode: BlendMode::SourceOver,
            quality: FilterQuality::Bilinear,
        };
        let [a, b, c, d, tx, ty] = matrix.to_affine();

        surface.draw_pixmap(
            0,
            0,
            buffer.pixmap().as_ref(),
            &paint,
            Transform::from_row(a, b, c, d, tx, ty),
            None,
        );
    }

    fn release(&mut self) {
        self.dispose();
    }
}

impl<L: TextLayouter, A: BufferAllocator> Drop for TextEntity<L, A> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<L: TextLayouter, A: BufferAllocator> std::fmt::Debug for TextEntity<L, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEntity")
            .field("text", &self.layer.text())
            .field("size", &self.slot.size())
            .field("uniform_scale", &self.geometry.uniform_scale)
            .field("preview", &self.preview)
            .field("disposed", &self.disposed)
            .finish()
    }
}
