use imprint_core::profiling::profile_function;
use imprint_core::{Color, Rect, Size};
use tiny_skia::{FillRule, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Look of the rounded card painted behind the text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundStyle {
    pub fill: Color,
    pub border: Color,
    pub border_width: f32,
    pub corner_radius: f32,
    /// Space between the text bounds and the card edge, in buffer pixels.
    pub padding: f32,
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        Self {
            fill: Color::WHITE,
            border: Color::from_hex(0x1B5FA7),
            border_width: 1.0,
            corner_radius: 8.0,
            padding: 16.0,
        }
    }
}

/// Paints the filled and stroked highlight card.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackgroundDecorator {
    style: BackgroundStyle,
}

impl BackgroundDecorator {
    pub fn new(style: BackgroundStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &BackgroundStyle {
        &self.style
    }

    /// Card rectangle in buffer pixels.
    ///
    /// Horizontally the card is centered on text `ink_width` wide and padded on
    /// both sides; vertically it starts `padding` below the text origin
    /// `offset_y` and spans `measured_height`. Both axes are clamped to the
    /// buffer. Returns `None` when nothing would be visible.
    pub fn background_rect(
        &self,
        buffer: Size<u32>,
        ink_width: f32,
        measured_height: f32,
        offset_y: f32,
    ) -> Option<Rect<f32>> {
        let width = buffer.width as f32;
        let height = buffer.height as f32;
        let padding = self.style.padding;

        let left = ((width - ink_width) * 0.5 - padding).max(0.0);
        let right = (left + ink_width + 2.0 * padding).min(width);
        let top = offset_y + padding;
        let bottom = (top + measured_height).min(height);

        let rect = Rect::from_ltrb(left, top, right, bottom);
        (!rect.is_empty()).then_some(rect)
    }

    /// Fill then stroke the card into `pixmap`.
    pub fn paint(&self, pixmap: &mut Pixmap, rect: Rect<f32>) {
        profile_function!();

        let radius = self
            .style
            .corner_radius
            .min(rect.width * 0.5)
            .min(rect.height * 0.5)
            .max(0.0);
        let Some(path) = rounded_rect_path(rect, radius) else {
            return;
        };

        pixmap.fill_path(
            &path,
            &solid(self.style.fill),
            FillRule::Winding,
            Transform::identity(),
            None,
        );

        if self.style.border_width > 0.0 {
            let stroke = Stroke {
                width: self.style.border_width,
                line_cap: LineCap::Round,
                ..Default::default()
            };
            pixmap.stroke_path(
                &path,
                &solid(self.style.border),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }
}

pub(crate) fn skia_color(color: Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_rgba_u8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}

fn rounded_rect_path(rect: Rect<f32>, radius: f32) -> Option<tiny_skia::Path> {
    // 4/3 * tan(pi/8)
    const KAPPA: f32 = 0.552_284_8;

    let (x, y) = (rect.x, rect.y);
    let (right, bottom) = (rect.right(), rect.bottom());

    if radius <= 0.0 {
        return tiny_skia::Rect::from_xywh(x, y, rect.width, rect.height)
            .map(PathBuilder::from_rect);
    }

    let k = radius * KAPPA;
    let mut pb = PathBuilder::new();
    pb.move_to(x + radius, y);
    pb.line_to(right - radius, y);
    pb.cubic_to(right - radius + k, y, right, y + radius - k, right, y + radius);
    pb.line_to(right, bottom - radius);
    pb.cubic_to(
        right,
        bottom - radius + k,
        right - radius + k,
        bottom,
        right - radius,
        bottom,
    );
    pb.line_to(x + radius, bottom);
    pb.cubic_to(x + radius - k, bottom, x, bottom - radius + k, x, bottom - radius);
    pb.line_to(x, y + radius);
    pb.cubic_to(x, y + radius - k, x + radius - k, y, x + radius, y);
    pb.close();
    pb.finish()
}
