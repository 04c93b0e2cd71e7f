use std::{alloc::Layout, ptr::NonNull};

use crate::{
    AllocError, Global, RawAllocator,
    memory_owner::MemoryAllocation,
    testing::{CountingAllocator, FailingAllocator},
};

fn layout(size: usize, align: usize) -> Layout {
    Layout::from_size_align(size, align).unwrap()
}

fn fill(ptr: NonNull<u8>, len: usize) {
    for i in 0..len {
        unsafe { ptr.as_ptr().add(i).write(i as u8) };
    }
}

fn check_prefix(ptr: NonNull<u8>, len: usize) {
    for i in 0..len {
        assert_eq!(unsafe { ptr.as_ptr().add(i).read() }, i as u8, "byte {i}");
    }
}

fn exercise<A: RawAllocator>(alloc: &A, align: usize) {
    let small = layout(48, align);
    let ptr = alloc.allocate(small).unwrap();
    assert_eq!(ptr.as_ptr() as usize % align, 0);
    fill(ptr, small.size());

    let large = layout(4096 + 48, align);
    let ptr = unsafe { alloc.reallocate(ptr, small, large).unwrap() };
    assert_eq!(ptr.as_ptr() as usize % align, 0);
    check_prefix(ptr, small.size());

    let tiny = layout(16, align);
    let ptr = unsafe { alloc.reallocate(ptr, large, tiny).unwrap() };
    check_prefix(ptr, tiny.size());

    unsafe { alloc.release(ptr, tiny) };
}

#[test]
fn test_global_allocate_reallocate_release() {
    exercise(&Global, 16);
    exercise(&Global, 64);
}

#[cfg(all(unix, feature = "libc"))]
#[test]
fn test_malloc_allocate_reallocate_release() {
    exercise(&crate::Malloc, 8);
    exercise(&crate::Malloc, crate::malloc::MALLOC_ALIGN);
}

#[cfg(all(unix, feature = "libc"))]
#[test]
fn test_malloc_overaligned() {
    exercise(&crate::Malloc, 256);
}

#[test]
fn test_global_huge_request_fails() {
    let huge = layout(isize::MAX as usize - 64, 16);
    let err = Global.allocate(huge).unwrap_err();
    assert_eq!(err.layout(), huge);
}

#[test]
fn test_alloc_error_display() {
    let err = AllocError::new(layout(96, 16));
    assert_eq!(
        err.to_string(),
        "memory allocation of 96 bytes (align 16) failed"
    );
}

#[test]
fn test_counting_allocator_balances() {
    let counting = CountingAllocator::new();
    exercise(&counting, 16);
    assert_eq!(counting.allocations(), 1);
    assert_eq!(counting.reallocations(), 2);
    assert_eq!(counting.releases(), 1);
    assert_eq!(counting.live_blocks(), 0);
    assert_eq!(counting.live_bytes(), 0);
}

#[test]
fn test_counting_allocator_tracks_live_bytes() {
    let counting = CountingAllocator::new();
    let blocks: Vec<_> = (1..=8)
        .map(|i| {
            let l = layout(i * 16, 16);
            (counting.allocate(l).unwrap(), l)
        })
        .collect();
    assert_eq!(counting.live_blocks(), 8);
    assert_eq!(counting.live_bytes(), 16 * 36);

    for (ptr, l) in blocks {
        unsafe { counting.release(ptr, l) };
    }
    assert_eq!(counting.live_bytes(), 0);
}

#[test]
fn test_failing_allocator() {
    let failing = FailingAllocator::fail_after(2);
    let l = layout(32, 16);
    let a = failing.allocate(l).unwrap();
    let a = unsafe { failing.reallocate(a, l, layout(64, 16)).unwrap() };
    fill(a, 64);

    let err = unsafe { failing.reallocate(a, layout(64, 16), layout(128, 16)) }.unwrap_err();
    assert_eq!(err.layout().size(), 128);
    // The original block survives a failed reallocation.
    check_prefix(a, 64);
    assert!(failing.allocate(l).is_err());

    failing.refill(1);
    let b = failing.allocate(l).unwrap();
    unsafe {
        failing.release(a, layout(64, 16));
        failing.release(b, l);
    }
}

#[test]
fn test_random_reallocations_preserve_contents() {
    fastrand::seed(8_675_309);
    let counting = CountingAllocator::new();
    let mut current = layout(16, 16);
    let mut ptr = counting.allocate(current).unwrap();
    fill(ptr, current.size());

    for _ in 0..200 {
        let next = layout(fastrand::usize(1..8192), 16);
        ptr = unsafe { counting.reallocate(ptr, current, next).unwrap() };
        check_prefix(ptr, current.size().min(next.size()));
        fill(ptr, next.size());
        current = next;
    }

    unsafe { counting.release(ptr, current) };
    assert_eq!(counting.live_bytes(), 0);
}

#[test]
fn test_memory_allocation_helpers() {
    let data = [0u64; 4];
    let m = MemoryAllocation {
        ptr: data.as_ptr().cast(),
        len: 8,
        capacity: 32,
        alignment: 8,
    };
    assert_eq!(m.spare(), 24);
    assert!(m.is_aligned());
}
