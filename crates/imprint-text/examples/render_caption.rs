//! Caption Rendering Example
//!
//! Places a text overlay on a portrait canvas, edits it the way the editor
//! UI would, and writes the composed frame to a PNG:
//! - entity creation and centering on the canvas
//! - text edits that grow the buffer while keeping the overlay in place
//! - color preview followed by an explicit commit
//! - painting through the entity's transform
//!
//! ## Usage
//! ```bash
//! RUST_LOG=imprint_text=trace cargo run -p imprint-text --example render_caption
//! ```

use imprint_core::logging;
use imprint_core::profiling::{ProfilingBackend, init_profiling, new_frame};
use imprint_core::{Color, Size};
use imprint_scene::MotionEntity;
use imprint_text::{FontSystem, TextEntity, TextLayer, TextResult};
use tiny_skia::Pixmap;

const CANVAS: Size<u32> = Size {
    width: 1080,
    height: 1920,
};

fn main() -> TextResult<()> {
    logging::init();
    init_profiling(ProfilingBackend::PuffinHttp);

    let font_system = FontSystem::with_system_fonts();
    let layer = TextLayer::with_defaults("Hi", &Default::default());
    let mut entity = TextEntity::new(layer, CANVAS, font_system)?;
    entity.move_to_canvas_center();
    tracing::info!("created {:?}", entity);

    new_frame();
    entity.set_text("Hello from Imprint, a caption long enough to wrap")?;
    entity.increase_font_size()?;

    entity.transform_mut().set_selected(true);
    entity.preview_color(Color::RED)?;
    entity.apply_color_edit(Color::from_hex(0x1B5FA7))?;
    entity.transform_mut().rotate_by(-8.0);

    let Some(mut canvas) = Pixmap::new(CANVAS.width, CANVAS.height) else {
        tracing::error!("could not allocate canvas");
        return Ok(());
    };
    canvas.fill(tiny_skia::Color::from_rgba8(48, 48, 56, 255));

    new_frame();
    entity.paint_current(&mut canvas.as_mut(), None);

    let path = std::env::temp_dir().join("imprint_caption.png");
    match canvas.save_png(&path) {
        Ok(()) => tracing::info!("wrote {}", path.display()),
        Err(e) => tracing::error!("failed to write {}: {}", path.display(), e),
    }

    entity.dispose();
    Ok(())
}
