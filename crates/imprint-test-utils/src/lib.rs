//! Test utilities for Imprint crates.
//!
//! - [`TrackingAllocator`] records every buffer allocation and release so
//!   tests can assert that no buffer outlives its entity. Its
//!   [`AllocationTracker`] handle stays with the test after the allocator
//!   moves into the entity, and can inject allocation failures.
//! - [`BoxLayouter`] lays text out with a fixed advance per character and
//!   paints glyphs as boxes, so layout-dependent tests give the same result
//!   on every machine whatever fonts are installed. Its [`InkFaults`]
//!   handle makes glyph inking fail on demand.
//!
//! # Example
//!
//! ```rust
//! use imprint_core::Size;
//! use imprint_test_utils::{BoxLayouter, TrackingAllocator};
//! use imprint_text::{TextEntity, TextEntityConfig, TextLayer};
//!
//! let allocator = TrackingAllocator::new();
//! let tracker = allocator.tracker();
//!
//! let layer = TextLayer::with_defaults("Hi", &Default::default());
//! let mut entity = TextEntity::create(
//!     layer,
//!     Size::new(1000, 1000),
//!     BoxLayouter::new(),
//!     allocator,
//!     TextEntityConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(tracker.live(), 1);
//!
//! entity.dispose();
//! assert_eq!(tracker.live(), 0);
//! ```

pub mod allocator;
pub mod layouter;

pub use allocator::{AllocationEvent, AllocationTracker, TrackingAllocator};
pub use layouter::{BoxGlyph, BoxInk, BoxLayouter, InkFaults};
