//! Growable vectors with their bookkeeping stored in front of the data.
//!
//! A vector is a single allocation: a small [`Header`] (capacity, length, item size)
//! followed by the item slots. The handle points at the first item, so the contents are
//! always one contiguous run of bytes that can be indexed and sliced like an array.
//!
//! ```text
//! +--------+--------------------------------------+
//! | Header | item 0 | item 1 | item 2 | ...       |
//! +--------+--------------------------------------+
//!          ^ handle
//! ```
//!
//! - [`RawVec`] is type-erased: the item size is a runtime value and items are byte
//!   slices.
//! - [`FatVec<T>`] is the same vector viewed as `[T]` for plain-old-data `T`.
//!
//! Growth doubles the capacity up to [`DEFAULT_MAX_PREALLOC`] items (configurable through
//! [`GrowthPolicy`]) and adds one item at a time beyond it. Allocation goes through an
//! injected [`RawAllocator`]. Operations that cannot report failure abort the process when
//! the allocator is out of memory; each has a `try_` variant that returns an [`Error`].
//!
//! ```
//! use fatvec::FatVec;
//!
//! let mut v = FatVec::<u32>::new();
//! for x in [10, 20, 30, 40, 50] {
//!     v.push(x);
//! }
//! assert_eq!(v.capacity(), 8);
//!
//! v.remove(1);
//! v.shrink();
//! assert_eq!(v, [10, 30, 40, 50]);
//! assert_eq!(v.capacity(), 4);
//! ```

pub mod align;
pub mod error;
pub mod growth;
pub mod header;
pub mod raw_vec;
pub mod result;
pub mod typed_vec;

pub use error::{Error, ErrorKind};
pub use fatvec_alloc::{AllocError, Global, RawAllocator};
#[cfg(all(unix, feature = "libc"))]
pub use fatvec_alloc::Malloc;
pub use growth::{DEFAULT_MAX_PREALLOC, GrowthPolicy};
pub use header::{HEADER_ALIGN, HEADER_SIZE, Header};
pub use raw_vec::RawVec;
pub use result::Result;
pub use typed_vec::FatVec;
