//! Raster buffer ownership and reuse.
//!
//! A text entity owns at most one [`RasterBuffer`] at a time, held in a
//! [`BufferSlot`]. On every re-layout the slot either clears and reuses the
//! buffer it holds (same dimensions) or allocates a replacement and only then
//! releases the old one. Allocation and release go through a
//! [`BufferAllocator`] so hosts can enforce memory limits and tests can count
//! live buffers.

use std::sync::atomic::{AtomicU64, Ordering};

use imprint_core::Size;
use tiny_skia::Pixmap;

use crate::error::{TextError, TextResult};

/// Identity of a buffer allocation. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(u64);

impl BufferId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        BufferId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// A premultiplied RGBA pixel buffer.
#[derive(Debug)]
pub struct RasterBuffer {
    id: BufferId,
    pixmap: Pixmap,
}

impl RasterBuffer {
    /// Take ownership of a pixmap, assigning it a fresh identity.
    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self {
            id: BufferId::next(),
            pixmap,
        }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> Size<u32> {
        Size::new(self.width(), self.height())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Reset every pixel to fully transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }
}

/// Source and sink of raster buffers.
pub trait BufferAllocator {
    /// A zero-initialized (transparent) buffer of exactly `width` x `height`.
    fn allocate(&mut self, width: u32, height: u32) -> TextResult<RasterBuffer>;

    /// Return a buffer. Called exactly once per allocated buffer.
    fn release(&mut self, buffer: RasterBuffer);
}

/// Heap allocator with a per-buffer pixel limit.
#[derive(Debug, Clone)]
pub struct PixmapAllocator {
    max_pixels: u64,
}

impl PixmapAllocator {
    pub fn new(max_pixels: u64) -> Self {
        Self { max_pixels }
    }
}

impl Default for PixmapAllocator {
    fn default() -> Self {
        Self::new(1 << 25)
    }
}

impl BufferAllocator for PixmapAllocator {
    fn allocate(&mut self, width: u32, height: u32) -> TextResult<RasterBuffer> {
        let pixels = width as u64 * height as u64;
        if pixels > self.max_pixels {
            return Err(TextError::BufferAllocation {
                width,
                height,
                reason: format!("exceeds limit of {} pixels", self.max_pixels),
            });
        }

        let pixmap = Pixmap::new(width, height).ok_or_else(|| TextError::BufferAllocation {
            width,
            height,
            reason: String::from("invalid pixmap dimensions"),
        })?;

        Ok(RasterBuffer::from_pixmap(pixmap))
    }

    fn release(&mut self, buffer: RasterBuffer) {
        drop(buffer);
    }
}

/// How [`BufferSlot::acquire`] satisfied a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// The held buffer matched and was cleared in place.
    Reused,
    /// A new buffer was allocated; `previous` is the size of the buffer it replaced.
    Allocated { previous: Option<Size<u32>> },
}

impl Acquisition {
    pub fn is_reused(self) -> bool {
        matches!(self, Acquisition::Reused)
    }
}

/// Holds zero or one raster buffer.
#[derive(Debug, Default)]
pub struct BufferSlot {
    buffer: Option<RasterBuffer>,
}

impl BufferSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&RasterBuffer> {
        self.buffer.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut RasterBuffer> {
        self.buffer.as_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_none()
    }

    /// Size of the held buffer, zero when empty.
    pub fn size(&self) -> Size<u32> {
        self.buffer
            .as_ref()
            .map(RasterBuffer::size)
            .unwrap_or_default()
    }

    /// Ensure the slot holds a cleared buffer of `width` x `height`.
    ///
    /// On allocation failure the slot keeps its current buffer untouched.
    pub fn acquire<A: BufferAllocator + ?Sized>(
        &mut self,
        allocator: &mut A,
        width: u32,
        height: u32,
    ) -> TextResult<Acquisition> {
        if let Some(buffer) = self.buffer.as_mut()
            && buffer.width() == width
            && buffer.height() == height
        {
            buffer.clear();
            tracing::trace!(id = buffer.id().get(), width, height, "reusing raster buffer");
            return Ok(Acquisition::Reused);
        }

        let replacement = allocator.allocate(width, height)?;
        tracing::debug!(
            id = replacement.id().get(),
            width,
            height,
            "allocated raster buffer"
        );

        let previous = self.buffer.replace(replacement).map(|old| {
            let size = old.size();
            tracing::debug!(
                id = old.id().get(),
                width = size.width,
                height = size.height,
                "released superseded raster buffer"
            );
            allocator.release(old);
            size
        });

        Ok(Acquisition::Allocated { previous })
    }

    /// Release the held buffer, if any. Returns true if a buffer was released.
    pub fn release<A: BufferAllocator + ?Sized>(&mut self, allocator: &mut A) -> bool {
        match self.buffer.take() {
            Some(buffer) => {
                tracing::debug!(id = buffer.id().get(), "released raster buffer");
                allocator.release(buffer);
                true
            }
            None => false,
        }
    }
}
