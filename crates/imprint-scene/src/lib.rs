//! Imprint Scene
//!
//! The contract between the composition canvas and the overlays placed on it.
//!
//! The canvas only ever talks to [`MotionEntity`]: it reads an entity's pixel
//! size and corner quad, composes the entity's [`EntityTransform`] on top, and
//! asks the entity to paint itself through the resulting matrix. Concrete
//! overlays (text, images, freehand drawings) implement the trait; the canvas
//! never sees the concrete type.

pub mod entity;
pub mod transform;

pub use entity::{EntityKind, MotionEntity, PaintOverride};
pub use transform::{EntityTransform, ScaleLimits};
