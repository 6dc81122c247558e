//! Allocation-tracking buffer allocator.

use std::collections::HashSet;
use std::sync::Arc;

use imprint_text::{BufferAllocator, BufferId, PixmapAllocator, RasterBuffer, TextError, TextResult};
use parking_lot::Mutex;

/// One allocator call, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationEvent {
    Allocated { id: BufferId, width: u32, height: u32 },
    Released { id: BufferId },
    Failed { width: u32, height: u32 },
}

#[derive(Debug, Default)]
struct TrackerState {
    events: Vec<AllocationEvent>,
    live: HashSet<BufferId>,
    unknown_releases: usize,
    fail_next: usize,
}

/// Shared view of a [`TrackingAllocator`]'s history.
///
/// The allocator itself moves into the entity under test; keep a tracker
/// handle to observe and steer it afterwards.
#[derive(Debug, Clone, Default)]
pub struct AllocationTracker {
    state: Arc<Mutex<TrackerState>>,
}

impl AllocationTracker {
    pub fn events(&self) -> Vec<AllocationEvent> {
        self.state.lock().events.clone()
    }

    /// Successful allocations.
    pub fn allocations(&self) -> usize {
        self.count(|event| matches!(event, AllocationEvent::Allocated { .. }))
    }

    pub fn releases(&self) -> usize {
        self.count(|event| matches!(event, AllocationEvent::Released { .. }))
    }

    pub fn failures(&self) -> usize {
        self.count(|event| matches!(event, AllocationEvent::Failed { .. }))
    }

    /// Buffers allocated and not yet released.
    pub fn live(&self) -> usize {
        self.state.lock().live.len()
    }

    pub fn is_live(&self, id: BufferId) -> bool {
        self.state.lock().live.contains(&id)
    }

    /// Releases of buffers this allocator never handed out or already got back.
    pub fn unknown_releases(&self) -> usize {
        self.state.lock().unknown_releases
    }

    /// Make the next `count` allocations fail with [`TextError::BufferAllocation`].
    pub fn fail_next(&self, count: usize) {
        self.state.lock().fail_next = count;
    }

    fn count(&self, predicate: impl Fn(&AllocationEvent) -> bool) -> usize {
        self.state.lock().events.iter().filter(|e| predicate(e)).count()
    }
}

/// [`BufferAllocator`] that records every allocation and release.
#[derive(Debug, Default)]
pub struct TrackingAllocator {
    inner: PixmapAllocator,
    tracker: AllocationTracker,
}

impl TrackingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracking allocator that rejects buffers larger than `max_pixels`.
    pub fn with_limit(max_pixels: u64) -> Self {
        Self {
            inner: PixmapAllocator::new(max_pixels),
            tracker: AllocationTracker::default(),
        }
    }

    pub fn tracker(&self) -> AllocationTracker {
        self.tracker.clone()
    }
}

impl BufferAllocator for TrackingAllocator {
    fn allocate(&mut self, width: u32, height: u32) -> TextResult<RasterBuffer> {
        let mut state = self.tracker.state.lock();

        let result = if state.fail_next > 0 {
            state.fail_next -= 1;
            Err(TextError::BufferAllocation {
                width,
                height,
                reason: String::from("injected failure"),
            })
        } else {
            self.inner.allocate(width, height)
        };

        match &result {
            Ok(buffer) => {
                state.live.insert(buffer.id());
                state.events.push(AllocationEvent::Allocated {
                    id: buffer.id(),
                    width,
                    height,
                });
            }
            Err(_) => state.events.push(AllocationEvent::Failed { width, height }),
        }
        result
    }

    fn release(&mut self, buffer: RasterBuffer) {
        let mut state = self.tracker.state.lock();
        let id = buffer.id();
        if !state.live.remove(&id) {
            state.unknown_releases += 1;
        }
        state.events.push(AllocationEvent::Released { id });
        drop(state);
        self.inner.release(buffer);
    }
}
