//! `FatVec<T>`: a typed view over [`RawVec`].

use std::{
    fmt,
    marker::PhantomData,
    mem,
    ops::{Deref, DerefMut},
};

use bytemuck::Pod;
use fatvec_alloc::{Global, RawAllocator};

use crate::{growth::GrowthPolicy, header::MAX_ITEM_ALIGN, raw_vec::RawVec, result::Result, verify_arg};

/// A header-prefixed vector of plain-old-data items.
///
/// `FatVec<T>` stores its items in a [`RawVec`] with `item_size == size_of::<T>()`
/// and dereferences to `[T]`. Items are moved in and out by copying their bytes, which
/// is why `T` must be [`Pod`].
pub struct FatVec<T: Pod, A: RawAllocator = Global> {
    raw: RawVec<A>,
    _marker: PhantomData<T>,
}

impl<T: Pod> FatVec<T> {
    /// Creates a vector with room for one item.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        Self::try_with_capacity_in(capacity, Global)
    }
}

impl<T: Pod, A: RawAllocator> FatVec<T, A> {
    const ITEM_SIZE: usize = {
        assert!(mem::size_of::<T>() != 0, "zero-sized items are not supported");
        assert!(
            mem::align_of::<T>() <= MAX_ITEM_ALIGN,
            "item alignment exceeds the header alignment"
        );
        mem::size_of::<T>()
    };

    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self::wrap(RawVec::with_capacity_in(Self::ITEM_SIZE, capacity, alloc))
    }

    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        RawVec::try_with_capacity_in(Self::ITEM_SIZE, capacity, alloc).map(Self::wrap)
    }

    /// Adopts an untyped vector whose item size matches `T`.
    pub fn from_raw(raw: RawVec<A>) -> Result<Self> {
        verify_arg!(raw, raw.item_size() == Self::ITEM_SIZE);
        Ok(Self::wrap(raw))
    }

    pub fn into_raw(self) -> RawVec<A> {
        self.raw
    }

    pub fn as_raw(&self) -> &RawVec<A> {
        &self.raw
    }

    pub fn with_growth_policy(self, policy: GrowthPolicy) -> Self {
        Self::wrap(self.raw.with_growth_policy(policy))
    }

    fn wrap(raw: RawVec<A>) -> Self {
        FatVec {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        bytemuck::cast_slice(self.raw.as_bytes())
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut(self.raw.as_bytes_mut())
    }

    pub fn push(&mut self, value: T) {
        self.raw.push(bytemuck::bytes_of(&value))
    }

    pub fn try_push(&mut self, value: T) -> Result<()> {
        self.raw.try_push(bytemuck::bytes_of(&value))
    }

    /// Inserts `value` at `index`. Does nothing if `index > len()`.
    pub fn insert(&mut self, value: T, index: usize) {
        self.raw.insert(bytemuck::bytes_of(&value), index)
    }

    pub fn try_insert(&mut self, value: T, index: usize) -> Result<()> {
        self.raw.try_insert(bytemuck::bytes_of(&value), index)
    }

    /// Removes and returns the item at `index`, or `None` if out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let value = *self.as_slice().get(index)?;
        self.raw.remove(index);
        Some(value)
    }

    pub fn pop(&mut self) -> Option<T> {
        self.raw.pop().map(bytemuck::pod_read_unaligned)
    }

    pub fn clear(&mut self) {
        self.raw.clear()
    }

    pub fn extend_from_slice(&mut self, values: &[T]) {
        for &value in values {
            self.push(value);
        }
    }

    /// Grows the capacity to exactly `min_capacity` if it is currently smaller.
    pub fn reserve(&mut self, min_capacity: usize) {
        self.raw.reserve(min_capacity)
    }

    pub fn try_reserve(&mut self, min_capacity: usize) -> Result<()> {
        self.raw.try_reserve(min_capacity)
    }

    /// Shrinks the capacity to `max(len(), 1)`.
    pub fn shrink(&mut self) {
        self.raw.shrink()
    }

    pub fn try_shrink(&mut self) -> Result<()> {
        self.raw.try_shrink()
    }

    #[inline]
    pub fn swap(a: &mut Self, b: &mut Self) {
        RawVec::swap(&mut a.raw, &mut b.raw)
    }
}

impl<T: Pod> Default for FatVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod, A: RawAllocator> Deref for FatVec<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Pod, A: RawAllocator> DerefMut for FatVec<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Pod, A: RawAllocator + Clone> Clone for FatVec<T, A> {
    fn clone(&self) -> Self {
        Self::wrap(self.raw.duplicate())
    }
}

impl<T: Pod + fmt::Debug, A: RawAllocator> fmt::Debug for FatVec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Pod> From<&[T]> for FatVec<T> {
    fn from(values: &[T]) -> Self {
        let mut v = FatVec::with_capacity(values.len().max(1));
        v.extend_from_slice(values);
        v
    }
}

impl<T: Pod + PartialEq, A: RawAllocator, B: RawAllocator> PartialEq<FatVec<T, B>> for FatVec<T, A> {
    fn eq(&self, other: &FatVec<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Pod + Eq, A: RawAllocator> Eq for FatVec<T, A> {}

impl<T: Pod + PartialEq, A: RawAllocator> PartialEq<[T]> for FatVec<T, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Pod + PartialEq, A: RawAllocator, const N: usize> PartialEq<[T; N]> for FatVec<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
    struct Point {
        x: f32,
        y: f32,
        z: f32,
    }

    #[test]
    fn test_push_and_deref() {
        let mut v = FatVec::<u16>::new();
        v.extend_from_slice(&[1, 2, 3]);
        assert_eq!(v, [1, 2, 3]);
        assert_eq!(v.iter().sum::<u16>(), 6);
        v[1] = 20;
        assert_eq!(v.as_slice(), &[1, 20, 3]);
        assert_eq!(v.as_raw().item_size(), 2);
    }

    #[test]
    fn test_struct_items() {
        let mut v = FatVec::<Point>::with_capacity(2);
        v.push(Point { x: 1.0, y: 2.0, z: 3.0 });
        v.insert(Point { x: 0.0, y: 0.0, z: 0.0 }, 0);
        v.push(Point { x: 4.0, y: 5.0, z: 6.0 });
        assert_eq!(v.len(), 3);
        assert_eq!(v.capacity(), 4);
        assert_eq!(v[2].y, 5.0);
        assert_eq!(v.remove(0), Some(Point { x: 0.0, y: 0.0, z: 0.0 }));
        assert_eq!(v[0].x, 1.0);
    }

    #[test]
    fn test_overaligned_items() {
        let mut v = FatVec::<u128>::new();
        for i in 0..9u128 {
            v.push(i << 100);
        }
        assert_eq!(v[8], 8u128 << 100);
        assert_eq!(v.as_ptr() as usize % 16, 0);
    }

    #[test]
    fn test_pop_and_remove() {
        let mut v = FatVec::from(&[5i64, 6, 7][..]);
        assert_eq!(v.pop(), Some(7));
        assert_eq!(v.remove(5), None);
        assert_eq!(v.remove(0), Some(5));
        assert_eq!(v, [6]);
        assert_eq!(v.pop(), Some(6));
        assert_eq!(v.pop(), None);
        assert!(v.is_empty());
    }

    #[test]
    fn test_insert_out_of_range_is_noop() {
        let mut v = FatVec::from(&[1u8, 2][..]);
        v.insert(9, 3);
        assert_eq!(v, [1, 2]);
        v.insert(9, 2);
        assert_eq!(v, [1, 2, 9]);
    }

    #[test]
    fn test_from_raw_checks_item_size() {
        let mut raw = RawVec::new(4);
        raw.push(&42u32.to_ne_bytes());
        assert!(FatVec::<u64>::from_raw(raw.duplicate()).is_err());
        let v = FatVec::<u32>::from_raw(raw).unwrap();
        assert_eq!(v, [42]);
        let raw = v.into_raw();
        assert_eq!(raw.len(), 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let a = FatVec::from(&[1u32, 2, 3][..]);
        let mut b = a.clone();
        b.push(4);
        b[0] = 100;
        assert_eq!(a, [1, 2, 3]);
        assert_eq!(b, [100, 2, 3, 4]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_swap_and_clear() {
        let mut a = FatVec::from(&[1u32][..]);
        let mut b = FatVec::from(&[2u32, 3][..]);
        FatVec::swap(&mut a, &mut b);
        assert_eq!(a, [2, 3]);
        assert_eq!(b, [1]);
        a.clear();
        assert!(a.is_empty());
        assert_eq!(a.capacity(), 2);
    }

    #[test]
    fn test_reserve_and_shrink() {
        let mut v = FatVec::<u32>::default();
        v.reserve(10);
        assert_eq!(v.capacity(), 10);
        v.extend_from_slice(&[1, 2, 3]);
        v.shrink();
        assert_eq!(v.capacity(), 3);
        assert_eq!(v, [1, 2, 3]);
    }

    #[test]
    fn test_growth_policy() {
        let mut v = FatVec::<u8>::new().with_growth_policy(GrowthPolicy::new(2));
        let mut caps = Vec::new();
        for i in 0..6 {
            v.push(i);
            caps.push(v.capacity());
        }
        assert_eq!(caps, [1, 2, 4, 4, 5, 6]);
    }

    #[test]
    fn test_debug() {
        let v = FatVec::from(&[1u8, 2][..]);
        assert_eq!(format!("{v:?}"), "[1, 2]");
    }
}
