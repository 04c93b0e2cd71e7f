//! `RawVec`: the type-erased, header-prefixed vector.

use std::{alloc::Layout, fmt, mem, ptr, ptr::NonNull, slice};

use fatvec_alloc::{
    Global, RawAllocator,
    memory_owner::{MemoryAllocation, MemoryOwner},
};

use crate::{
    align::is_aligned_ptr,
    error::{Error, ErrorKind},
    growth::GrowthPolicy,
    header::{self, HEADER_ALIGN, Header},
    result::Result,
    verify_arg,
};

/// A growable vector of fixed-size, byte-copyable items whose size is only known at
/// runtime.
///
/// The vector owns one allocation holding a [`Header`] followed by `capacity` item
/// slots. The handle points at the first item, so the valid items are always
/// available as a contiguous byte slice ([`as_bytes`](Self::as_bytes)).
///
/// # Allocation failure
///
/// Operations without a `try_` prefix never report allocation failure: they log it and
/// terminate the process through [`std::alloc::handle_alloc_error`]. Their `try_`
/// counterparts return the error and leave the vector unchanged.
///
/// # Out-of-range indices
///
/// [`insert`](Self::insert) past the end and [`remove`](Self::remove) past the last
/// item are silent no-ops.
pub struct RawVec<A: RawAllocator = Global> {
    /// Element 0. The header lives `HEADER_SIZE` bytes before it.
    data: NonNull<u8>,
    policy: GrowthPolicy,
    alloc: A,
}

unsafe impl<A: RawAllocator + Send> Send for RawVec<A> {}

unsafe impl<A: RawAllocator + Sync> Sync for RawVec<A> {}

impl RawVec<Global> {
    /// Creates a vector of `item_size`-byte items with room for one item.
    pub fn new(item_size: usize) -> RawVec {
        Self::with_capacity(item_size, 1)
    }

    /// Creates a vector with room for `capacity` items of `item_size` bytes.
    ///
    /// The item slots are zero-filled.
    pub fn with_capacity(item_size: usize, capacity: usize) -> RawVec {
        Self::with_capacity_in(item_size, capacity, Global)
    }

    /// Same as [`with_capacity`](Self::with_capacity).
    #[inline]
    pub fn new_len(item_size: usize, capacity: usize) -> RawVec {
        Self::with_capacity(item_size, capacity)
    }

    /// Same as [`with_capacity`](Self::with_capacity).
    #[inline]
    pub fn new_size(item_size: usize, capacity: usize) -> RawVec {
        Self::with_capacity(item_size, capacity)
    }

    pub fn try_new(item_size: usize) -> Result<RawVec> {
        Self::try_with_capacity(item_size, 1)
    }

    pub fn try_with_capacity(item_size: usize, capacity: usize) -> Result<RawVec> {
        Self::try_with_capacity_in(item_size, capacity, Global)
    }
}

impl<A: RawAllocator> RawVec<A> {
    /// Creates a vector with room for one item, allocated from `alloc`.
    pub fn new_in(item_size: usize, alloc: A) -> Self {
        Self::with_capacity_in(item_size, 1, alloc)
    }

    /// Creates a vector with room for `capacity` items, allocated from `alloc`.
    ///
    /// # Panics
    ///
    /// Panics if `item_size` is zero or the allocation size overflows.
    /// Aborts the process if the allocation fails.
    pub fn with_capacity_in(item_size: usize, capacity: usize, alloc: A) -> Self {
        unwrap_or_abort(Self::try_with_capacity_in(item_size, capacity, alloc))
    }

    pub fn try_with_capacity_in(item_size: usize, capacity: usize, alloc: A) -> Result<Self> {
        verify_arg!(item_size, item_size != 0);
        let layout = header::layout_for(item_size, capacity)?;
        let block = alloc.allocate(layout)?;
        debug_assert!(is_aligned_ptr(block.as_ptr(), HEADER_ALIGN));

        let data = unsafe {
            block.cast::<Header>().write(Header::new(item_size, capacity));
            let data = header::data_of(block);
            data.write_bytes(0, capacity * item_size);
            data
        };
        log::debug!(
            "fatvec: created vector of {capacity} x {item_size} bytes ({} total)",
            layout.size()
        );

        Ok(RawVec {
            data,
            policy: GrowthPolicy::default(),
            alloc,
        })
    }

    /// Replaces the growth policy used when the vector is full.
    pub fn with_growth_policy(mut self, policy: GrowthPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.policy
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns an independent copy of the vector, including every capacity slot.
    ///
    /// Aborts the process if the allocation fails.
    pub fn duplicate(&self) -> Self
    where
        A: Clone,
    {
        unwrap_or_abort(self.try_duplicate())
    }

    pub fn try_duplicate(&self) -> Result<Self>
    where
        A: Clone,
    {
        let layout = self.current_layout();
        let alloc = self.alloc.clone();
        let block = alloc.allocate(layout)?;
        let data = unsafe {
            ptr::copy_nonoverlapping(
                header::block_of(self.data).as_ptr(),
                block.as_ptr(),
                layout.size(),
            );
            header::data_of(block)
        };
        log::debug!("fatvec: duplicated vector ({} bytes)", layout.size());

        Ok(RawVec {
            data,
            policy: self.policy,
            alloc,
        })
    }

    /// Releases the vector's allocation. Equivalent to dropping it.
    pub fn destroy(self) {
        drop(self)
    }
}

impl<A: RawAllocator> RawVec<A> {
    /// Returns a copy of the header.
    #[inline]
    pub fn header(&self) -> Header {
        *self.header_ref()
    }

    /// Items the vector can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.header_ref().capacity
    }

    /// Number of valid items.
    #[inline]
    pub fn len(&self) -> usize {
        self.header_ref().length
    }

    /// Same as [`len`](Self::len).
    #[inline]
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Size of one item in bytes.
    #[inline]
    pub fn item_size(&self) -> usize {
        self.header_ref().item_size
    }

    /// Same as [`item_size`](Self::item_size).
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.item_size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the whole allocation, header included.
    #[inline]
    pub fn total_size(&self) -> usize {
        self.header_ref().total_size()
    }

    /// Pointer to the first item. Stable until the next capacity change.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.data.as_ptr()
    }

    /// The valid items as one byte slice of `len() * item_size()` bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        let header = self.header_ref();
        unsafe { slice::from_raw_parts(self.data.as_ptr(), header.offset_of(header.length)) }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.header_ref().offset_of(self.len());
        unsafe { slice::from_raw_parts_mut(self.data.as_ptr(), len) }
    }

    /// The bytes of the item at `index`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let item_size = self.item_size();
        let start = index.checked_mul(item_size)?;
        self.as_bytes().get(start..start.checked_add(item_size)?)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let item_size = self.item_size();
        let start = index.checked_mul(item_size)?;
        self.as_bytes_mut().get_mut(start..start.checked_add(item_size)?)
    }

    /// Iterates over the valid items, one `item_size()` chunk each.
    #[inline]
    pub fn items(&self) -> slice::ChunksExact<'_, u8> {
        self.as_bytes().chunks_exact(self.item_size())
    }
}

impl<A: RawAllocator> RawVec<A> {
    /// Drops all items. Capacity and allocation are kept.
    #[inline]
    pub fn clear(&mut self) {
        self.header_mut().length = 0;
    }

    /// Drops the last item, if any, and returns its bytes.
    ///
    /// The bytes stay in place until the slot is overwritten.
    pub fn pop(&mut self) -> Option<&[u8]> {
        let header = self.header_mut();
        if header.length == 0 {
            return None;
        }
        header.length -= 1;
        let Header {
            length, item_size, ..
        } = *header;
        Some(unsafe { slice::from_raw_parts(self.slot_ptr(length), item_size) })
    }

    /// Removes the item at `index`, shifting the following items left.
    ///
    /// Does nothing if `index >= len()`.
    pub fn remove(&mut self, index: usize) {
        let Header {
            length, item_size, ..
        } = *self.header_ref();
        if index >= length {
            return;
        }
        unsafe {
            let slot = self.slot_ptr(index);
            ptr::copy(slot.add(item_size), slot, (length - index - 1) * item_size);
        }
        self.header_mut().length = length - 1;
    }

    /// Appends `item`, growing the allocation if the vector is full.
    ///
    /// # Panics
    ///
    /// Panics if `item.len() != item_size()`. Aborts the process if growth fails.
    pub fn push(&mut self, item: &[u8]) {
        unwrap_or_abort(self.try_push(item))
    }

    pub fn try_push(&mut self, item: &[u8]) -> Result<()> {
        self.verify_item(item)?;
        self.grow_if_full()?;
        let length = self.len();
        unsafe { ptr::copy_nonoverlapping(item.as_ptr(), self.slot_ptr(length), item.len()) };
        self.header_mut().length = length + 1;
        Ok(())
    }

    /// Inserts `item` at `index`, shifting the items at and after it right.
    ///
    /// Does nothing if `index > len()`.
    ///
    /// # Panics
    ///
    /// Panics if `item.len() != item_size()`. Aborts the process if growth fails.
    pub fn insert(&mut self, item: &[u8], index: usize) {
        unwrap_or_abort(self.try_insert(item, index))
    }

    pub fn try_insert(&mut self, item: &[u8], index: usize) -> Result<()> {
        self.verify_item(item)?;
        if index > self.len() {
            return Ok(());
        }
        self.grow_if_full()?;
        let Header {
            length, item_size, ..
        } = *self.header_ref();
        unsafe {
            let slot = self.slot_ptr(index);
            ptr::copy(slot, slot.add(item_size), (length - index) * item_size);
            ptr::copy_nonoverlapping(item.as_ptr(), slot, item_size);
        }
        self.header_mut().length = length + 1;
        Ok(())
    }

    /// Exchanges two vectors. No item is copied.
    #[inline]
    pub fn swap(a: &mut Self, b: &mut Self) {
        mem::swap(a, b)
    }

    /// Grows the capacity to exactly `min_capacity` if it is currently smaller.
    ///
    /// Aborts the process if the allocation fails.
    pub fn reserve(&mut self, min_capacity: usize) {
        unwrap_or_abort(self.try_reserve(min_capacity))
    }

    pub fn try_reserve(&mut self, min_capacity: usize) -> Result<()> {
        if min_capacity > self.capacity() {
            self.resize_allocation(min_capacity)?;
        }
        Ok(())
    }

    /// Shrinks the capacity to `max(len(), 1)`.
    ///
    /// Aborts the process if the allocation fails.
    pub fn shrink(&mut self) {
        unwrap_or_abort(self.try_shrink())
    }

    pub fn try_shrink(&mut self) -> Result<()> {
        let target = self.len().max(1);
        if target != self.capacity() {
            self.resize_allocation(target)?;
        }
        Ok(())
    }
}

impl<A: RawAllocator> RawVec<A> {
    #[inline]
    fn header_ref(&self) -> &Header {
        unsafe { header::header_of(self.data).as_ref() }
    }

    #[inline]
    fn header_mut(&mut self) -> &mut Header {
        unsafe { header::header_of(self.data).as_mut() }
    }

    /// Pointer to item slot `index`, which must be `<= capacity`.
    #[inline]
    fn slot_ptr(&self, index: usize) -> *mut u8 {
        debug_assert!(index <= self.capacity());
        unsafe { self.data.as_ptr().add(self.header_ref().offset_of(index)) }
    }

    #[inline]
    fn current_layout(&self) -> Layout {
        // SAFETY: the layout was validated by `layout_for` when this capacity was set.
        unsafe { Layout::from_size_align_unchecked(self.total_size(), HEADER_ALIGN) }
    }

    fn verify_item(&self, item: &[u8]) -> Result<()> {
        verify_arg!(item, item.len() == self.item_size());
        Ok(())
    }

    #[inline]
    fn grow_if_full(&mut self) -> Result<()> {
        let Header {
            capacity, length, ..
        } = *self.header_ref();
        if length < capacity {
            return Ok(());
        }
        self.grow(capacity)
    }

    #[cold]
    fn grow(&mut self, capacity: usize) -> Result<()> {
        let new_capacity = self
            .policy
            .next_capacity(capacity)
            .ok_or_else(Error::capacity_overflow)?;
        self.resize_allocation(new_capacity)
    }

    /// Moves the vector into an allocation of exactly `new_capacity` items.
    fn resize_allocation(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(new_capacity >= self.len());
        let Header {
            capacity,
            item_size,
            ..
        } = *self.header_ref();
        let old_layout = self.current_layout();
        let new_layout = header::layout_for(item_size, new_capacity)?;

        let block = unsafe {
            self.alloc
                .reallocate(header::block_of(self.data), old_layout, new_layout)?
        };
        debug_assert!(is_aligned_ptr(block.as_ptr(), HEADER_ALIGN));
        log::trace!("fatvec: reallocated {capacity} -> {new_capacity} items of {item_size} bytes");

        self.data = unsafe { header::data_of(block) };
        self.header_mut().capacity = new_capacity;
        Ok(())
    }
}

/// Unwraps the result of an operation that must not report failure.
#[inline]
pub(crate) fn unwrap_or_abort<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => fail(e),
    }
}

#[cold]
#[inline(never)]
fn fail(e: Error) -> ! {
    match e.into_kind() {
        ErrorKind::AllocationFailed { source } => {
            log::error!("fatvec: {source}, aborting");
            std::alloc::handle_alloc_error(source.layout())
        }
        kind => panic!("{kind}"),
    }
}

impl<A: RawAllocator> Drop for RawVec<A> {
    fn drop(&mut self) {
        let layout = self.current_layout();
        unsafe { self.alloc.release(header::block_of(self.data), layout) };
    }
}

impl<A: RawAllocator + Clone> Clone for RawVec<A> {
    fn clone(&self) -> Self {
        self.duplicate()
    }
}

impl<A: RawAllocator> fmt::Debug for RawVec<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawVec")
            .field("len", &self.len())
            .field("cap", &self.capacity())
            .field("item_size", &self.item_size())
            .field("bytes", &self.as_bytes())
            .finish_non_exhaustive()
    }
}

unsafe impl<A: RawAllocator> MemoryOwner for RawVec<A> {
    fn memory(&self) -> MemoryAllocation {
        let header = self.header_ref();
        MemoryAllocation {
            ptr: self.as_ptr(),
            len: header.offset_of(header.length),
            capacity: header.offset_of(header.capacity),
            alignment: HEADER_ALIGN,
        }
    }
}
