//! `RawAllocator`: the allocate / reallocate / release capability.

use std::{alloc::Layout, ptr::NonNull};

/// The allocator could not satisfy a request.
///
/// Carries the layout that was requested so that callers which treat the failure as
/// fatal can forward it to [`std::alloc::handle_alloc_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("memory allocation of {} bytes (align {}) failed", .layout.size(), .layout.align())]
pub struct AllocError {
    layout: Layout,
}

impl AllocError {
    pub fn new(layout: Layout) -> AllocError {
        AllocError { layout }
    }

    /// The layout of the request that failed.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }
}

/// A source of raw memory blocks.
///
/// # Safety
///
/// Implementors must guarantee that:
/// - A block returned by `allocate` or `reallocate` is valid for reads and writes of
///   at least `layout.size()` bytes and is aligned to at least `layout.align()`.
/// - A block stays valid until it is passed to `release` or `reallocate` on the same
///   allocator.
/// - A failed `reallocate` leaves the original block valid and its contents untouched.
pub unsafe trait RawAllocator {
    /// Allocates a block described by `layout`. `layout.size()` is never zero.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Resizes `ptr` from `old_layout` to `new_layout`, preserving the first
    /// `min(old_layout.size(), new_layout.size())` bytes. The block may move.
    ///
    /// # Safety
    ///
    /// - `ptr` must have been returned by this allocator with `old_layout`.
    /// - `new_layout.align()` must equal `old_layout.align()`.
    /// - `new_layout.size()` must be non-zero.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<u8>, AllocError>;

    /// Gives the block back to the allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this allocator with `layout`, and must not be
    /// used after this call.
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout);
}

unsafe impl<A: RawAllocator + ?Sized> RawAllocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<u8>, AllocError> {
        unsafe { (**self).reallocate(ptr, old_layout, new_layout) }
    }

    #[inline]
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { (**self).release(ptr, layout) }
    }
}
