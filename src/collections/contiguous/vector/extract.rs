use std::ptr;

use super::Vector;
use crate::collections::contiguous::alloc::RawAlloc;
use crate::collections::contiguous::header::Header;
use crate::collections::contiguous::index::bounds_failure;
use crate::util::error::IndexOutOfBounds;

impl<T: Copy, H: Header, A: RawAlloc + Clone> Vector<T, H, A> {
    /// Creates an independent copy of the Vector, with the same capacity and a bitwise copy of the
    /// whole allocation, header included. Duplicating an empty Vector produces another empty one.
    ///
    /// # Panics
    /// Aborts if the allocator can't provide the memory.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec = Vector::with_cap(8);
    /// vec.append_slice(&[1, 2, 3]);
    ///
    /// let mut dup = vec.duplicate();
    /// dup[0] = 100;
    /// assert_eq!(dup.cap(), 8);
    /// assert_eq!(&*dup, &[100, 2, 3]);
    /// assert_eq!(&*vec, &[1, 2, 3]);
    /// ```
    pub fn duplicate(&self) -> Vector<T, H, A> {
        let mut dup = Vector::new_in(self.alloc.clone());
        let Some(ptr) = self.ptr else {
            return dup;
        };

        // SAFETY: self is allocated. dup is given an allocation of the same layout, so the whole
        // block (header, elements and spare capacity) can be copied over, after which dup's header
        // describes its own block. T: Copy makes the bitwise copies of the elements independent.
        unsafe {
            dup.realloc_with_cap(self.cap_unchecked());
            ptr::copy_nonoverlapping(
                Self::base_of(ptr).as_ptr(),
                Self::base_of(dup.data()).as_ptr(),
                self.total_cap_size_unchecked(),
            );
        }

        dup
    }

    /// Copies the `count` elements starting at `first` into a new Vector, which has a capacity of
    /// exactly `count`. The new Vector gets a fresh header, so extension fields start zeroed.
    ///
    /// # Panics
    /// Invokes the bounds hook (which panics by default) if `first + count > len`.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let vec = Vector::from([0, 1, 2, 3, 4, 5]);
    /// let sub = vec.sub(2, 3);
    /// assert_eq!(&*sub, &[2, 3, 4]);
    /// assert_eq!(sub.cap(), 3);
    /// ```
    pub fn sub(&self, first: usize, count: usize) -> Vector<T, H, A> {
        let len = self.len();
        match first.checked_add(count) {
            Some(end) if end <= len => (),
            _ => bounds_failure(IndexOutOfBounds {
                index: first.try_into().unwrap_or(isize::MAX),
                len,
            }),
        }

        // SAFETY: The range has just been checked against the length.
        unsafe { self.sub_unchecked(first, count) }
    }

    /// Copies the `count` elements starting at `first` into a new Vector, without checking the
    /// range.
    ///
    /// # Safety
    /// `first + count` must not exceed the length of the Vector.
    pub unsafe fn sub_unchecked(&self, first: usize, count: usize) -> Vector<T, H, A> {
        debug_assert!(first + count <= self.len());

        let mut sub = Vector::new_in(self.alloc.clone());
        if count == 0 {
            return sub;
        }

        sub.realloc_with_cap(count);
        // SAFETY: sub has room for exactly count elements and the caller guarantees that the source
        // range is initialized. The two allocations are distinct.
        unsafe {
            ptr::copy_nonoverlapping(self.data().add(first).as_ptr(), sub.as_mut_ptr(), count);
            sub.set_len(count);
        }
        sub
    }
}
