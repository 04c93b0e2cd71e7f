use std::{
    alloc::{Layout, alloc, dealloc, realloc},
    ptr::NonNull,
};

use crate::allocator::{AllocError, RawAllocator};

/// The Rust global allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

unsafe impl RawAllocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert_ne!(layout.size(), 0);
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError::new(layout))
    }

    #[inline]
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<u8>, AllocError> {
        debug_assert_eq!(old_layout.align(), new_layout.align());
        debug_assert_ne!(new_layout.size(), 0);
        let ptr = unsafe { realloc(ptr.as_ptr(), old_layout, new_layout.size()) };
        NonNull::new(ptr).ok_or(AllocError::new(new_layout))
    }

    #[inline]
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { dealloc(ptr.as_ptr(), layout) }
    }
}
