use std::{alloc::Layout, ptr::NonNull};

use crate::allocator::{AllocError, RawAllocator};

/// Alignment that `malloc` guarantees for every block on the supported targets.
pub const MALLOC_ALIGN: usize = 2 * std::mem::size_of::<usize>();

/// The C heap: `malloc`, `realloc` and `free`.
///
/// Requests aligned beyond [`MALLOC_ALIGN`] are served by `posix_memalign`; since
/// `realloc` does not preserve such alignment, resizing them allocates a fresh block
/// and copies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Malloc;

impl Malloc {
    fn allocate_overaligned(layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let mut ptr = std::ptr::null_mut();
        let rc = unsafe { libc::posix_memalign(&mut ptr, layout.align(), layout.size()) };
        if rc != 0 {
            return Err(AllocError::new(layout));
        }
        NonNull::new(ptr.cast::<u8>()).ok_or(AllocError::new(layout))
    }
}

unsafe impl RawAllocator for Malloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert_ne!(layout.size(), 0);
        if layout.align() > MALLOC_ALIGN {
            return Self::allocate_overaligned(layout);
        }
        let ptr = unsafe { libc::malloc(layout.size()) };
        NonNull::new(ptr.cast::<u8>()).ok_or(AllocError::new(layout))
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Result<NonNull<u8>, AllocError> {
        debug_assert_eq!(old_layout.align(), new_layout.align());
        if new_layout.align() > MALLOC_ALIGN {
            log::trace!(
                "malloc: moving over-aligned block ({} -> {} bytes, align {})",
                old_layout.size(),
                new_layout.size(),
                new_layout.align()
            );
            let new_ptr = Self::allocate_overaligned(new_layout)?;
            unsafe {
                std::ptr::copy_nonoverlapping(
                    ptr.as_ptr(),
                    new_ptr.as_ptr(),
                    old_layout.size().min(new_layout.size()),
                );
                libc::free(ptr.as_ptr().cast());
            }
            return Ok(new_ptr);
        }
        let new_ptr = unsafe { libc::realloc(ptr.as_ptr().cast(), new_layout.size()) };
        NonNull::new(new_ptr.cast::<u8>()).ok_or(AllocError::new(new_layout))
    }

    unsafe fn release(&self, ptr: NonNull<u8>, _layout: Layout) {
        unsafe { libc::free(ptr.as_ptr().cast()) };
    }
}
