//! Header layout and handle-to-header addressing.
//!
//! Every vector lives in a single allocation:
//!
//! ```text
//! +----------+---------+------------------------------------------+
//! | capacity | length  | item_size | pad | item 0 | item 1 | ...   |
//! +----------+---------+------------------------------------------+
//! ^ block                                ^ handle (element 0)
//! ```
//!
//! The handle points at element 0; the header always sits exactly [`HEADER_SIZE`]
//! bytes before it. The header is padded to [`HEADER_ALIGN`], so element 0 carries
//! the alignment of the block itself.

use std::{alloc::Layout, mem, ptr::NonNull};

use crate::{align::align_up, error::Error, result::Result};

/// Alignment of every vector allocation, and therefore of element 0.
pub const HEADER_ALIGN: usize = 16;

/// Byte distance from the start of the allocation to element 0.
pub const HEADER_SIZE: usize = align_up(mem::size_of::<Header>(), HEADER_ALIGN);

/// Largest item alignment a typed view over a vector can rely on.
pub const MAX_ITEM_ALIGN: usize = HEADER_ALIGN;

/// Bookkeeping stored in front of the data.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Items the allocation can hold without reallocating.
    pub capacity: usize,
    /// Items currently valid, `length <= capacity`.
    pub length: usize,
    /// Size of one item in bytes. Never changes after construction.
    pub item_size: usize,
}

impl Header {
    pub fn new(item_size: usize, capacity: usize) -> Header {
        Header {
            capacity,
            length: 0,
            item_size,
        }
    }

    /// Total size of the allocation described by this header.
    #[inline]
    pub fn total_size(&self) -> usize {
        HEADER_SIZE + self.capacity * self.item_size
    }

    /// Byte offset of the item at `index` from element 0.
    #[inline]
    pub fn offset_of(&self, index: usize) -> usize {
        index * self.item_size
    }
}

/// Computes the allocation layout for `capacity` items of `item_size` bytes.
pub fn layout_for(item_size: usize, capacity: usize) -> Result<Layout> {
    let total = capacity
        .checked_mul(item_size)
        .and_then(|data| data.checked_add(HEADER_SIZE))
        .ok_or_else(Error::capacity_overflow)?;
    Layout::from_size_align(total, HEADER_ALIGN).map_err(|_| Error::capacity_overflow())
}

/// Returns the address of the header belonging to the vector at `data`.
///
/// # Safety
///
/// `data` must be the element-0 pointer of a live vector allocation.
#[inline]
pub unsafe fn header_of(data: NonNull<u8>) -> NonNull<Header> {
    unsafe { block_of(data).cast() }
}

/// Returns the start of the allocation for the vector at `data`.
///
/// # Safety
///
/// `data` must be the element-0 pointer of a live vector allocation.
#[inline]
pub unsafe fn block_of(data: NonNull<u8>) -> NonNull<u8> {
    unsafe { data.sub(HEADER_SIZE) }
}

/// Returns the element-0 pointer for an allocation starting at `block`.
///
/// # Safety
///
/// `block` must be an allocation of at least [`HEADER_SIZE`] bytes.
#[inline]
pub unsafe fn data_of(block: NonNull<u8>) -> NonNull<u8> {
    unsafe { block.add(HEADER_SIZE) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_size() {
        assert!(HEADER_SIZE >= 3 * mem::size_of::<usize>());
        assert_eq!(HEADER_SIZE % HEADER_ALIGN, 0);
        assert!(mem::align_of::<Header>() <= HEADER_ALIGN);
    }

    #[test]
    fn test_layout_for() {
        let layout = layout_for(4, 8).unwrap();
        assert_eq!(layout.size(), HEADER_SIZE + 32);
        assert_eq!(layout.align(), HEADER_ALIGN);

        let layout = layout_for(7, 0).unwrap();
        assert_eq!(layout.size(), HEADER_SIZE);
    }

    #[test]
    fn test_layout_for_overflow() {
        assert!(layout_for(usize::MAX, 2).is_err());
        assert!(layout_for(2, usize::MAX / 2).is_err());
        assert!(layout_for(1, usize::MAX - 1).is_err());
    }

    #[test]
    fn test_total_size_and_offsets() {
        let mut header = Header::new(12, 10);
        assert_eq!(header.total_size(), HEADER_SIZE + 120);
        assert_eq!(header.offset_of(3), 36);
        header.length = 4;
        assert_eq!(header.total_size(), HEADER_SIZE + 120);
    }

    #[test]
    fn test_addressing_roundtrip() {
        let mut storage = [0u128; 8];
        let block = NonNull::new(storage.as_mut_ptr().cast::<u8>()).unwrap();
        unsafe {
            let data = data_of(block);
            assert_eq!(block_of(data), block);
            header_of(data).write(Header::new(4, 2));
            assert_eq!(storage.as_ptr().cast::<Header>().read(), Header::new(4, 2));
        }
    }
}
