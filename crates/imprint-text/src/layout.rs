//! Wrapped, measured text layout.
//!
//! A [`TextLayouter`] turns a string, a pixel font size and a width budget
//! into a [`TextLayout`]: greedy line breaks, per-line placement and the total
//! measured height. Layouters are pure with respect to their inputs; the same
//! request always yields the same layout.

use std::ops::Range;

use imprint_core::Color;
use imprint_core::math::Vec2;
use tiny_skia::Pixmap;

use crate::error::{TextError, TextResult};
use crate::font::FontAttributes;

/// Horizontal alignment of each line within the width budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub(crate) fn to_cosmic(self) -> cosmic_text::Align {
        match self {
            TextAlign::Left => cosmic_text::Align::Left,
            TextAlign::Center => cosmic_text::Align::Center,
            TextAlign::Right => cosmic_text::Align::Right,
        }
    }

    /// Left offset of a line of `line_width` inside `budget`.
    pub fn offset(self, line_width: f32, budget: f32) -> f32 {
        let slack = (budget - line_width).max(0.0);
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Center => slack * 0.5,
            TextAlign::Right => slack,
        }
    }
}

/// Everything needed to lay out one text layer.
#[derive(Debug, Clone, Copy)]
pub struct LayoutRequest<'a> {
    pub text: &'a str,
    pub font_size: f32,
    pub typeface: &'a FontAttributes,
    pub width_budget: f32,
    /// Line height as a multiple of `font_size`.
    pub line_height: f32,
    pub align: TextAlign,
}

impl<'a> LayoutRequest<'a> {
    pub fn new(text: &'a str, font_size: f32, typeface: &'a FontAttributes, width_budget: f32) -> Self {
        Self {
            text,
            font_size,
            typeface,
            width_budget,
            line_height: 1.2,
            align: TextAlign::Center,
        }
    }

    pub fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    /// Line height in pixels.
    pub fn line_height_px(&self) -> f32 {
        self.font_size * self.line_height
    }

    /// Reject non-positive or non-finite sizes before any shaping happens.
    pub fn validate(&self) -> TextResult<()> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if valid(self.width_budget) && valid(self.font_size) && valid(self.line_height) {
            Ok(())
        } else {
            Err(TextError::InvalidLayoutInput {
                width_budget: self.width_budget,
                font_size: self.font_size,
            })
        }
    }
}

/// One wrapped line.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    /// Byte range of the source text covered by this line.
    pub range: Range<usize>,
    /// Left edge after alignment.
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Baseline, measured from the top of the layout.
    pub baseline: f32,
}

/// Result of laying out a request.
///
/// `G` is the layouter's positioned-glyph type; it is opaque to everything
/// except the layouter that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout<G> {
    pub lines: Vec<LayoutLine>,
    pub glyphs: Vec<G>,
    /// Total height of all lines, line padding included.
    pub measured_height: f32,
}

impl<G> TextLayout<G> {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Width of the widest line: the tight horizontal extent of the text.
    pub fn ink_width(&self) -> f32 {
        self.lines.iter().map(|line| line.width).fold(0.0, f32::max)
    }
}

/// Text measurement and glyph painting backend.
///
/// Painting is split in two: [`ink`](Self::ink) does everything that can
/// fail (font-system access, glyph rasterization) without touching any
/// buffer, and [`composite`](Self::composite) copies the result into a
/// target and cannot fail.
///
/// An empty string lays out as a single empty line of one line height.
pub trait TextLayouter {
    type Glyph;
    /// Colored glyph coverage ready to composite.
    type Ink;

    fn layout(&mut self, request: &LayoutRequest<'_>) -> TextResult<TextLayout<Self::Glyph>>;

    fn ink(&mut self, layout: &TextLayout<Self::Glyph>, color: Color) -> TextResult<Self::Ink>;

    /// Paint `ink` into `target` with the layout's top-left at `origin`.
    fn composite(&self, ink: &Self::Ink, target: &mut Pixmap, origin: Vec2);
}
