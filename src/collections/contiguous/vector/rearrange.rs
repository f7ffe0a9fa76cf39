use std::mem::MaybeUninit;
use std::ptr;

use super::Vector;
use crate::collections::contiguous::alloc::RawAlloc;
use crate::collections::contiguous::header::Header;
use crate::collections::contiguous::index::check_index;

/// The size in bytes of the stack buffer used by [`Vector::rotate_right`].
const SCRATCH_SIZE: usize = 256;

impl<T, H: Header, A: RawAlloc> Vector<T, H, A> {
    /// Reverses the order of the elements in place.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 2, 3, 4, 5]);
    /// vec.reverse();
    /// assert_eq!(&*vec, &[5, 4, 3, 2, 1]);
    /// ```
    pub fn reverse(&mut self) {
        let len = self.len();
        for i in 0..len / 2 {
            self.swap(i, len - 1 - i);
        }
    }

    /// Rotates the Vector `n` places towards higher indices, so that the last `n` elements move to
    /// the front in their original order. The elements are moved through a fixed-size buffer on
    /// the stack, in as many passes as the moved bytes require.
    ///
    /// # Panics
    /// Invokes the bounds hook (which panics by default) if `n > len`.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec = Vector::from(['A', 'B', 'C', 'D']);
    /// vec.rotate_right(1);
    /// assert_eq!(&*vec, &['D', 'A', 'B', 'C']);
    /// vec.rotate_right(3);
    /// assert_eq!(&*vec, &['A', 'B', 'C', 'D']);
    /// ```
    pub fn rotate_right(&mut self, n: usize) {
        let len = self.len();
        check_index(len, n, true);

        let mut scratch = [MaybeUninit::<u8>::uninit(); SCRATCH_SIZE];
        let mut base = self.data().cast::<u8>();
        let body = (len - n) * size_of::<T>();
        let mut remaining = n * size_of::<T>();

        // The body is followed by what is left of the tail. Each pass moves the leading chunk of
        // the tail in front of the body, where it is final, and continues past it.
        while remaining > 0 {
            let chunk = remaining.min(SCRATCH_SIZE);

            // SAFETY: base + body + remaining never exceeds the end of the initialized elements,
            // and chunk <= remaining. Elements are only permuted, so each one ends up in exactly
            // one slot once the rotation completes.
            unsafe {
                let stash = scratch.as_mut_ptr().cast::<u8>();
                ptr::copy_nonoverlapping(base.add(body).as_ptr(), stash, chunk);
                ptr::copy(base.as_ptr(), base.add(chunk).as_ptr(), body);
                ptr::copy_nonoverlapping(stash, base.as_ptr(), chunk);
                base = base.add(chunk);
            }

            remaining -= chunk;
        }
    }
}
