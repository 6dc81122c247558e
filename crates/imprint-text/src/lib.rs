//! Imprint Text - editable text overlays for the composition canvas
//!
//! A [`TextEntity`] turns a [`TextLayer`] (string plus font) into a raster
//! buffer the canvas can move, scale and rotate like any other
//! [`MotionEntity`](imprint_scene::MotionEntity):
//!
//! - text is wrapped and center-aligned inside 60% of the canvas width
//! - the buffer is at least a fixed fraction of the canvas height tall and
//!   grows with the text; text is vertically centered in any extra space
//! - a rounded, bordered card is painted behind the text
//! - a buffer of matching size is cleared and reused instead of reallocated
//! - the entity's corner quad and uniform scale are re-derived from the buffer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imprint_core::{Color, Size};
//! use imprint_scene::MotionEntity;
//! use imprint_text::{FontSystem, TextEntity, TextLayer};
//!
//! let layer = TextLayer::with_defaults("Hello", &Default::default());
//! let mut entity = TextEntity::new(layer, Size::new(1080, 1920), FontSystem::with_system_fonts())?;
//! entity.move_to_canvas_center();
//!
//! entity.set_text("Hello there")?;
//! entity.transform_mut().set_selected(true);
//! entity.apply_color_edit(Color::RED)?;
//! # Ok::<(), imprint_text::TextError>(())
//! ```

pub mod buffer;
pub mod config;
pub mod decoration;
pub mod entity;
pub mod error;
pub mod font;
pub mod geometry;
pub mod layer;
pub mod layout;
pub mod raster;
pub mod shaping;
pub mod size_policy;

pub use buffer::{Acquisition, BufferAllocator, BufferId, BufferSlot, PixmapAllocator, RasterBuffer};
pub use config::TextEntityConfig;
pub use decoration::{BackgroundDecorator, BackgroundStyle};
pub use entity::TextEntity;
pub use error::{TextError, TextResult};
pub use font::{FontAttributes, FontDatabase, FontDescriptor, FontSystem};
pub use geometry::EntityGeometry;
pub use layer::{FontSizeLimits, TextLayer};
pub use layout::{LayoutLine, LayoutRequest, TextAlign, TextLayout, TextLayouter};
pub use raster::{RasterOutcome, TextRasterizer};
pub use shaping::{CosmicLayouter, GlyphInk, PlacedGlyph};
pub use size_policy::BufferSizePolicy;

// Re-export shared types
pub use imprint_core::{Color, Quad, Size};
