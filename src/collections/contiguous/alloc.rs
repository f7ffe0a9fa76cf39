//! The allocation strategy used by [`Vector`](super::Vector) for its header-prefixed blocks.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// A memory source with `realloc`/`free` semantics. Every [`Vector`](super::Vector) owns one and
/// routes all of its allocations through it, which allows tests and embedders to substitute their
/// own.
///
/// # Safety
/// Implementors must return pointers which are valid for reads and writes of `new.size()` bytes
/// and aligned to `new.align()`, and must preserve the first `min(old.size(), new.size())` bytes
/// when moving an existing block.
pub unsafe trait RawAlloc {
    /// Grows (or creates, if `ptr` is [`None`]) a block so that it fits `new`, possibly moving it.
    /// Returns [`None`] if the request can't be satisfied, in which case the original block is
    /// left untouched.
    ///
    /// # Safety
    /// If `ptr` is [`Some`], it must have been returned by this allocator for a block described by
    /// `old`. `old` and `new` must share an alignment and `new` must have a non-zero size.
    unsafe fn realloc(
        &self,
        ptr: Option<NonNull<u8>>,
        old: Layout,
        new: Layout,
    ) -> Option<NonNull<u8>>;

    /// Returns a block to the allocator.
    ///
    /// # Safety
    /// `ptr` must have been returned by this allocator for a block described by `layout`, and
    /// mustn't be used afterwards.
    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout);

    /// Invoked whenever a request for `layout` fails, before the failure is reported. Does nothing
    /// by default.
    fn out_of_memory(&self, _layout: Layout) {}
}

/// The default strategy, backed by the global allocator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

// SAFETY: std::alloc upholds the same guarantees.
unsafe impl RawAlloc for Global {
    unsafe fn realloc(
        &self,
        ptr: Option<NonNull<u8>>,
        old: Layout,
        new: Layout,
    ) -> Option<NonNull<u8>> {
        let raw_ptr = match ptr {
            // SAFETY: The caller guarantees that new has a non-zero size.
            None => unsafe { alloc::alloc(new) },
            // SAFETY: The caller guarantees that ptr was allocated with old in this allocator and
            // that the alignment doesn't change. new.size() is <= isize::MAX by construction of a
            // Layout.
            Some(ptr) => unsafe { alloc::realloc(ptr.as_ptr(), old, new.size()) },
        };

        NonNull::new(raw_ptr)
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: The caller guarantees that ptr was allocated with layout in this allocator.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }
}
