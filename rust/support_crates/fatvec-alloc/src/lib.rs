//! Raw allocation primitives used by `fatvec`.
//!
//! A header-prefixed vector needs exactly three things from its environment: a way to
//! obtain a block of bytes, a way to resize that block while preserving its contents,
//! and a way to give it back. This crate defines that capability as the [`RawAllocator`]
//! trait and ships the implementations the vectors use in practice:
//!
//! - [`Global`]: the Rust global allocator (`std::alloc`), the default everywhere.
//! - [`Malloc`]: the C heap (`malloc`/`realloc`/`free`), available on unix with the
//!   `libc` feature.
//!
//! The `test-utils` feature adds instrumented allocators in [`testing`].

pub mod allocator;
pub mod global;
#[cfg(all(unix, feature = "libc"))]
pub mod malloc;
pub mod memory_owner;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use allocator::{AllocError, RawAllocator};
pub use global::Global;
#[cfg(all(unix, feature = "libc"))]
pub use malloc::Malloc;

#[cfg(test)]
mod tests;
