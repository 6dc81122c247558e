//! cosmic-text backed layout and glyph painting.

use cosmic_text::{Buffer, CacheKey, LineIter, Metrics, Shaping, SwashCache, SwashContent, Wrap};
use imprint_core::Color;
use imprint_core::math::Vec2;
use imprint_core::profiling::{profile_function, profile_scope};
use tiny_skia::{ColorU8, Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

use crate::error::TextResult;
use crate::font::FontSystem;
use crate::layout::{LayoutLine, LayoutRequest, TextLayout, TextLayouter};

/// A shaped glyph positioned on its baseline, in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedGlyph {
    /// Complete cache key for glyph rasterization
    pub cache_key: CacheKey,
    pub x: i32,
    /// Baseline y
    pub y: i32,
}

/// A tinted glyph image, offset from the layout's top-left.
struct GlyphMask {
    x: i32,
    y: i32,
    pixmap: Pixmap,
}

/// Every glyph of a layout, rasterized in one color.
pub struct GlyphInk {
    masks: Vec<GlyphMask>,
}

impl GlyphInk {
    pub fn glyph_count(&self) -> usize {
        self.masks.len()
    }
}

/// Layouter using cosmic-text for shaping and swash for glyph coverage.
pub struct CosmicLayouter {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl CosmicLayouter {
    pub fn new(font_system: FontSystem) -> Self {
        Self {
            font_system,
            swash_cache: SwashCache::new(),
        }
    }

    pub fn font_system(&self) -> &FontSystem {
        &self.font_system
    }
}

/// Byte offset of each paragraph in `text`, split on the same line endings
/// the shaping buffer uses.
fn paragraph_starts(text: &str) -> Vec<usize> {
    let mut starts: Vec<usize> = LineIter::new(text).map(|(range, _)| range.start).collect();
    if starts.is_empty() {
        starts.push(0);
    }
    starts
}

impl TextLayouter for CosmicLayouter {
    type Glyph = PlacedGlyph;
    type Ink = GlyphInk;

    fn layout(&mut self, request: &LayoutRequest<'_>) -> TextResult<TextLayout<PlacedGlyph>> {
        profile_function!();
        request.validate()?;

        let mut font_system = self.font_system.lock()?;

        let metrics = Metrics::new(request.font_size, request.line_height_px());
        let mut buffer = Buffer::new(&mut font_system, metrics);
        buffer.set_wrap(&mut font_system, Wrap::WordOrGlyph);
        buffer.set_size(&mut font_system, Some(request.width_budget), None);
        buffer.set_text(
            &mut font_system,
            request.text,
            request.typeface.to_cosmic(),
            Shaping::Advanced,
        );

        let align = Some(request.align.to_cosmic());
        for line in &mut buffer.lines {
            line.set_align(align);
        }

        buffer.shape_until_scroll(&mut font_system, false);

        let starts = paragraph_starts(request.text);
        let mut lines = Vec::new();
        let mut glyphs = Vec::new();

        for run in buffer.layout_runs() {
            let base = starts.get(run.line_i).copied().unwrap_or(0);
            let mut range = usize::MAX..0;
            let mut left = f32::MAX;

            for glyph in run.glyphs.iter() {
                range.start = range.start.min(glyph.start);
                range.end = range.end.max(glyph.end);
                left = left.min(glyph.x);

                let physical = glyph.physical((0.0, run.line_y), 1.0);
                glyphs.push(PlacedGlyph {
                    cache_key: physical.cache_key,
                    x: physical.x,
                    y: physical.y,
                });
            }

            if run.glyphs.is_empty() {
                range = 0..0;
                left = request.align.offset(0.0, request.width_budget);
            }

            lines.push(LayoutLine {
                range: base + range.start..base + range.end,
                left,
                top: run.line_top,
                width: run.line_w,
                height: run.line_height,
                baseline: run.line_y,
            });
        }

        if lines.is_empty() {
            let height = request.line_height_px();
            lines.push(LayoutLine {
                range: 0..0,
                left: request.align.offset(0.0, request.width_budget),
                top: 0.0,
                width: 0.0,
                height,
                baseline: request.font_size,
            });
        }

        let measured_height = lines.iter().map(|line| line.height).sum();

        Ok(TextLayout {
            lines,
            glyphs,
            measured_height,
        })
    }

    fn ink(&mut self, layout: &TextLayout<PlacedGlyph>, color: Color) -> TextResult<GlyphInk> {
        profile_function!();

        let mut font_system = self.font_system.lock()?;
        let [r, g, b, a] = color.to_rgba_u8();
        let mut masks = Vec::with_capacity(layout.glyphs.len());

        for glyph in &layout.glyphs {
            profile_scope!("ink_glyph");
            let Some(image) = self.swash_cache.get_image(&mut font_system, glyph.cache_key) else {
                continue;
            };

            let placement = image.placement;
            let Some(mut mask) = Pixmap::new(placement.width, placement.height) else {
                continue;
            };

            let pixels = mask.pixels_mut();
            match image.content {
                SwashContent::Mask => {
                    for (px, &coverage) in pixels.iter_mut().zip(&image.data) {
                        *px = tint(r, g, b, a, coverage);
                    }
                }
                SwashContent::SubpixelMask => {
                    for (px, rgba) in pixels.iter_mut().zip(image.data.chunks_exact(4)) {
                        let coverage =
                            ((rgba[0] as u16 + rgba[1] as u16 + rgba[2] as u16) / 3) as u8;
                        *px = tint(r, g, b, a, coverage);
                    }
                }
                SwashContent::Color => {
                    for (px, rgba) in pixels.iter_mut().zip(image.data.chunks_exact(4)) {
                        *px = ColorU8::from_rgba(rgba[0], rgba[1], rgba[2], rgba[3]).premultiply();
                    }
                }
            }

            masks.push(GlyphMask {
                x: glyph.x + placement.left,
                y: glyph.y - placement.top,
                pixmap: mask,
            });
        }

        Ok(GlyphInk { masks })
    }

    fn composite(&self, ink: &GlyphInk, target: &mut Pixmap, origin: Vec2) {
        profile_function!();

        let origin_x = origin.x.round() as i32;
        let origin_y = origin.y.round() as i32;
        for mask in &ink.masks {
            target.draw_pixmap(
                origin_x + mask.x,
                origin_y + mask.y,
                mask.pixmap.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
    }
}

/// Text color scaled by glyph coverage, premultiplied.
fn tint(r: u8, g: u8, b: u8, a: u8, coverage: u8) -> PremultipliedColorU8 {
    let alpha = (a as u16 * coverage as u16 / 255) as u8;
    ColorU8::from_rgba(r, g, b, alpha).premultiply()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontAttributes, FontDatabase};

    fn layouter() -> CosmicLayouter {
        CosmicLayouter::new(FontSystem::with_system_fonts())
    }

    #[test]
    fn test_empty_text_is_one_line() {
        let mut layouter = layouter();
        let typeface = FontAttributes::default();
        let request = LayoutRequest::new("", 75.0, &typeface, 600.0);
        let layout = layouter.layout(&request).unwrap();

        assert_eq!(layout.line_count(), 1);
        assert_eq!(layout.measured_height, request.line_height_px());
        assert!(layout.glyphs.is_empty());
    }

    #[test]
    fn test_layout_is_deterministic() {
        let mut layouter = layouter();
        let typeface = FontAttributes::default();
        let request = LayoutRequest::new("Hello there, overlay", 40.0, &typeface, 300.0);

        let first = layouter.layout(&request).unwrap();
        let second = layouter.layout(&request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_budget_is_rejected() {
        let mut layouter = layouter();
        let typeface = FontAttributes::default();
        let request = LayoutRequest::new("Hi", 40.0, &typeface, 0.0);
        assert!(layouter.layout(&request).is_err());
    }

    #[test]
    fn test_long_text_wraps_within_budget() {
        let db = FontDatabase::new();
        if db.is_empty() {
            return;
        }
        let mut layouter = CosmicLayouter::new(FontSystem::new(db));
        let typeface = FontAttributes::default();

        let short = layouter
            .layout(&LayoutRequest::new("Hi", 40.0, &typeface, 300.0))
            .unwrap();
        let long = layouter
            .layout(&LayoutRequest::new(
                "Hi there, this is a much longer line of text that wraps",
                40.0,
                &typeface,
                300.0,
            ))
            .unwrap();

        assert_eq!(short.line_count(), 1);
        assert!(long.line_count() > 1);
        assert!(long.measured_height > short.measured_height);
        assert!(long.lines.iter().all(|line| line.width <= 300.0 + 0.5));
    }

    #[test]
    fn test_paragraph_starts() {
        assert_eq!(paragraph_starts("ab\ncd\n"), vec![0, 3]);
        assert_eq!(paragraph_starts(""), vec![0]);
    }

    #[test]
    fn test_paragraph_starts_follow_crlf_and_cr() {
        assert_eq!(paragraph_starts("ab\r\ncd\rx"), vec![0, 4, 7]);
        assert_eq!(paragraph_starts("a\n\rb"), vec![0, 3]);
    }

    #[test]
    fn test_crlf_line_ranges_cover_source_text() {
        let db = FontDatabase::new();
        if db.is_empty() {
            return;
        }
        let mut layouter = CosmicLayouter::new(FontSystem::new(db));
        let typeface = FontAttributes::default();
        let text = "Hi\r\nthere";
        let layout = layouter
            .layout(&LayoutRequest::new(text, 40.0, &typeface, 600.0))
            .unwrap();

        assert_eq!(layout.line_count(), 2);
        assert_eq!(&text[layout.lines[1].range.clone()], "there");
    }
}
