//! `MemoryOwner`: a trait for types that own a block of element memory.

/// A trait for types that exclusively own an allocated block of element memory.
///
/// # Safety
///
/// Implementors must guarantee that:
/// - The memory described by `memory()` stays valid for as long as the owner is
///   neither mutated nor dropped.
/// - The memory is exclusively owned by the instance.
/// - `ptr` is aligned to at least `alignment`.
/// - The reported length and capacity are accurate and `len <= capacity`.
pub unsafe trait MemoryOwner {
    /// Returns information about the owned memory block.
    fn memory(&self) -> MemoryAllocation;
}

/// Describes a block of element memory.
#[derive(Debug, Clone)]
pub struct MemoryAllocation {
    /// Pointer to the first element.
    pub ptr: *const u8,
    /// Bytes currently holding valid elements.
    pub len: usize,
    /// Bytes available for elements without reallocation.
    pub capacity: usize,
    /// Guaranteed alignment of `ptr`.
    pub alignment: usize,
}

impl MemoryAllocation {
    /// Bytes that are allocated but do not hold valid elements.
    #[inline]
    pub fn spare(&self) -> usize {
        self.capacity - self.len
    }

    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.alignment.is_power_of_two() && (self.ptr as usize) & (self.alignment - 1) == 0
    }
}
