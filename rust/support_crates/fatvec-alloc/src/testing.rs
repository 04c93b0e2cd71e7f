//! Instrumented allocators for exercising allocation paths in tests.
//!
//! Both allocators keep their state in `Cell`s and are meant to be shared by reference
//! (`&CountingAllocator` is itself a [`RawAllocator`]).

use std::{alloc::Layout, cell::Cell, ptr::NonNull};

use crate::{AllocError, Global, RawAllocator};

/// Forwards to an inner allocator and counts every call.
#[derive(Debug, Default)]
pub struct CountingAllocator<A: RawAllocator = Global> {
    inner: A,
    allocations: Cell<usize>,
    reallocations: Cell<usize>,
    releases: Cell<usize>,
    live_bytes: Cell<usize>,
}

impl CountingAllocator<Global> {
    pub fn new() -> Self {
        Self::wrap(Global)
    }
}

impl<A: RawAllocator> CountingAllocator<A> {
    pub fn wrap(inner: A) -> Self {
        CountingAllocator {
            inner,
            allocations: Cell::new(0),
            reallocations: Cell::new(0),
            releases: Cell::new(0),
            live_bytes: Cell::new(0),
        }
    }

    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    pub fn reallocations(&self) -> usize {
        self.reallocations.get()
    }

    pub fn releases(&self) -> usize {
        self.releases.get()
    }

    /// Blocks handed out and not yet released.
    pub fn live_blocks(&self) -> usize {
        self.allocations.get() - self.releases.get()
    }

    /// Total size of the live blocks.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.get()
    }
}

unsafe impl<A: RawAllocator> RawAllocator for CountingAllocator<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let ptr = self.inner.allocate(layout)?;
        self.allocations.set(self.allocations.get() + 1);
        self.live_bytes.set(self.live_bytes.get() + layout.size());
        Ok(ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<u8>, AllocError> {
        let ptr = unsafe { self.inner.reallocate(ptr, old_layout, new_layout)? };
        self.reallocations.set(self.reallocations.get() + 1);
        self.live_bytes
            .set(self.live_bytes.get() - old_layout.size() + new_layout.size());
        Ok(ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        self.releases.set(self.releases.get() + 1);
        self.live_bytes.set(self.live_bytes.get() - layout.size());
        unsafe { self.inner.release(ptr, layout) }
    }
}

/// Serves a fixed number of requests, then reports out-of-memory for every
/// `allocate` and `reallocate` call.
#[derive(Debug)]
pub struct FailingAllocator<A: RawAllocator = Global> {
    inner: A,
    remaining: Cell<usize>,
}

impl FailingAllocator<Global> {
    /// Succeeds `successes` times before failing.
    pub fn fail_after(successes: usize) -> Self {
        FailingAllocator {
            inner: Global,
            remaining: Cell::new(successes),
        }
    }

    /// Fails every request.
    pub fn always() -> Self {
        Self::fail_after(0)
    }
}

impl<A: RawAllocator> FailingAllocator<A> {
    /// Allows `successes` more requests to go through.
    pub fn refill(&self, successes: usize) {
        self.remaining.set(successes);
    }

    fn admit(&self, layout: Layout) -> Result<(), AllocError> {
        match self.remaining.get() {
            0 => Err(AllocError::new(layout)),
            n => {
                self.remaining.set(n - 1);
                Ok(())
            }
        }
    }
}

unsafe impl<A: RawAllocator> RawAllocator for FailingAllocator<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.admit(layout)?;
        self.inner.allocate(layout)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<u8>, AllocError> {
        self.admit(new_layout)?;
        unsafe { self.inner.reallocate(ptr, old_layout, new_layout) }
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { self.inner.release(ptr, layout) }
    }
}
