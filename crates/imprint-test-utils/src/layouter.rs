//! Font-free deterministic layouter.

use std::ops::Range;
use std::sync::Arc;

use imprint_core::Color;
use imprint_core::math::Vec2;
use imprint_text::{LayoutLine, LayoutRequest, TextError, TextLayout, TextLayouter, TextResult};
use parking_lot::Mutex;
use tiny_skia::{Paint, Pixmap, Transform};

/// A filled rectangle standing in for a glyph, in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGlyph {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Boxes of one layout, colored and ready to composite.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxInk {
    pub boxes: Vec<BoxGlyph>,
    pub color: Color,
}

/// Handle that makes a [`BoxLayouter`]'s next inking calls fail.
///
/// Stays with the test after the layouter moves into an entity.
#[derive(Debug, Clone, Default)]
pub struct InkFaults {
    remaining: Arc<Mutex<usize>>,
}

impl InkFaults {
    /// Make the next `count` inking calls fail with [`TextError::LockPoisoned`].
    pub fn fail_next(&self, count: usize) {
        *self.remaining.lock() = count;
    }

    fn take(&self) -> bool {
        let mut remaining = self.remaining.lock();
        if *remaining == 0 {
            return false;
        }
        *remaining -= 1;
        true
    }
}

/// Fixed-advance layouter.
///
/// Every character is half the font size wide and every line is exactly one
/// line height tall. Lines break greedily at spaces and inside words that do
/// not fit on their own. Glyphs paint as solid boxes.
#[derive(Debug, Clone, Default)]
pub struct BoxLayouter {
    faults: InkFaults,
}

impl BoxLayouter {
    const ADVANCE_RATIO: f32 = 0.5;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn faults(&self) -> InkFaults {
        self.faults.clone()
    }

    fn advance(&self, font_size: f32) -> f32 {
        font_size * Self::ADVANCE_RATIO
    }
}

/// A line under construction: byte range within the paragraph and char count.
struct Pending {
    start: usize,
    end: usize,
    chars: usize,
}

fn wrap_paragraph(paragraph: &str, base: usize, max_chars: usize, out: &mut Vec<(Range<usize>, usize)>) {
    let mut line: Option<Pending> = None;
    let mut pos = 0;

    for word in paragraph.split(' ') {
        let start = pos;
        pos += word.len() + 1;
        if word.is_empty() {
            continue;
        }

        let word_chars = word.chars().count();
        if let Some(current) = line.as_mut() {
            if current.chars + 1 + word_chars <= max_chars {
                current.end = start + word.len();
                current.chars += 1 + word_chars;
                continue;
            }
        }
        if let Some(done) = line.take() {
            out.push((base + done.start..base + done.end, done.chars));
        }

        let offsets: Vec<usize> = word.char_indices().map(|(i, _)| i).collect();
        let mut chunk = 0;
        while chunk < word_chars {
            let next = (chunk + max_chars).min(word_chars);
            let end = offsets.get(next).copied().unwrap_or(word.len());
            let pending = Pending {
                start: start + offsets[chunk],
                end: start + end,
                chars: next - chunk,
            };
            if next < word_chars {
                out.push((base + pending.start..base + pending.end, pending.chars));
            } else {
                line = Some(pending);
            }
            chunk = next;
        }
    }

    match line {
        Some(done) => out.push((base + done.start..base + done.end, done.chars)),
        None => out.push((base..base, 0)),
    }
}

impl TextLayouter for BoxLayouter {
    type Glyph = BoxGlyph;
    type Ink = BoxInk;

    fn layout(&mut self, request: &LayoutRequest<'_>) -> TextResult<TextLayout<BoxGlyph>> {
        request.validate()?;

        let advance = self.advance(request.font_size);
        let line_height = request.line_height_px();
        let max_chars = ((request.width_budget / advance).floor() as usize).max(1);

        let mut ranges = Vec::new();
        let mut base = 0;
        for paragraph in request.text.split('\n') {
            wrap_paragraph(paragraph, base, max_chars, &mut ranges);
            base += paragraph.len() + 1;
        }

        let glyph_height = request.font_size * 0.7;
        let mut lines = Vec::with_capacity(ranges.len());
        let mut glyphs = Vec::new();

        for (index, (range, chars)) in ranges.into_iter().enumerate() {
            let width = chars as f32 * advance;
            let left = request.align.offset(width, request.width_budget);
            let top = index as f32 * line_height;
            let baseline = top + line_height * 0.8;

            for (column, ch) in request.text[range.clone()].chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                glyphs.push(BoxGlyph {
                    x: left + column as f32 * advance,
                    y: baseline - glyph_height,
                    width: advance * 0.8,
                    height: glyph_height,
                });
            }

            lines.push(LayoutLine {
                range,
                left,
                top,
                width,
                height: line_height,
                baseline,
            });
        }

        let measured_height = lines.len() as f32 * line_height;
        Ok(TextLayout {
            lines,
            glyphs,
            measured_height,
        })
    }

    fn ink(&mut self, layout: &TextLayout<BoxGlyph>, color: Color) -> TextResult<BoxInk> {
        if self.faults.take() {
            return Err(TextError::LockPoisoned(String::from("injected ink failure")));
        }
        Ok(BoxInk {
            boxes: layout.glyphs.clone(),
            color,
        })
    }

    fn composite(&self, ink: &BoxInk, target: &mut Pixmap, origin: Vec2) {
        let [r, g, b, a] = ink.color.to_rgba_u8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);

        for glyph in &ink.boxes {
            if let Some(rect) = tiny_skia::Rect::from_xywh(
                origin.x + glyph.x,
                origin.y + glyph.y,
                glyph.width,
                glyph.height,
            ) {
                target.fill_rect(rect, &paint, Transform::identity(), None);
            }
        }
    }
}
