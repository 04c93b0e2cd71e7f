//! Capacity growth for full vectors.

/// Default threshold, in items, up to which growth doubles the capacity.
pub const DEFAULT_MAX_PREALLOC: usize = 1024 * 1024;

/// Decides the next capacity when an append or insert finds the vector full.
///
/// Up to and including `max_prealloc` items the capacity doubles; above it the
/// capacity grows by one item at a time, which bounds the unused tail of very
/// large vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    max_prealloc: usize,
}

impl GrowthPolicy {
    pub const fn new(max_prealloc: usize) -> GrowthPolicy {
        GrowthPolicy { max_prealloc }
    }

    #[inline]
    pub const fn max_prealloc(&self) -> usize {
        self.max_prealloc
    }

    /// Returns the capacity that follows `capacity`, or `None` on overflow.
    ///
    /// An empty allocation grows to one item.
    #[inline]
    pub fn next_capacity(&self, capacity: usize) -> Option<usize> {
        if capacity <= self.max_prealloc {
            capacity.checked_mul(2).map(|c| c.max(1))
        } else {
            capacity.checked_add(1)
        }
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        GrowthPolicy::new(DEFAULT_MAX_PREALLOC)
    }
}
