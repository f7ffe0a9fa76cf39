use std::iter::FusedIterator;
use std::ptr;

use super::Vector;
use crate::collections::contiguous::alloc::RawAlloc;
use crate::collections::contiguous::header::Header;

impl<T, H: Header, A: RawAlloc> IntoIterator for Vector<T, H, A> {
    type Item = T;

    type IntoIter = IntoIter<T, H, A>;

    fn into_iter(mut self) -> Self::IntoIter {
        let len = self.len();
        if self.is_allocated() {
            // SAFETY: The Vector is allocated. Ownership of the elements moves to the iterator,
            // which reads them out by position, so the Vector must no longer drop them.
            unsafe { self.set_len(0) }
        }

        IntoIter {
            vec: self,
            front: 0,
            back: len,
        }
    }
}

impl<'a, T, H: Header, A: RawAlloc> IntoIterator for &'a Vector<T, H, A> {
    type Item = &'a T;

    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, H: Header, A: RawAlloc> IntoIterator for &'a mut Vector<T, H, A> {
    type Item = &'a mut T;

    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A type for owned iteration over a [`Vector`]. See [`Vector::into_iter`]. The allocation is
/// released once the iterator is dropped.
pub struct IntoIter<T, H: Header, A: RawAlloc> {
    vec: Vector<T, H, A>,
    front: usize,
    back: usize,
}

impl<T, H: Header, A: RawAlloc> Drop for IntoIter<T, H, A> {
    fn drop(&mut self) {
        // SAFETY: Elements in [front, back) haven't been yielded yet and are still initialized. The
        // Vector itself has length 0, so it only frees the allocation afterwards.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.vec.data().add(self.front).as_ptr(),
                self.back - self.front,
            ));
        }
    }
}

impl<T, H: Header, A: RawAlloc> Iterator for IntoIter<T, H, A> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            // SAFETY: front is within the initialized and not yet yielded range.
            let value = unsafe { self.vec.data().add(self.front).read() };
            self.front += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.back - self.front;
        (left, Some(left))
    }
}

impl<T, H: Header, A: RawAlloc> DoubleEndedIterator for IntoIter<T, H, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            self.back -= 1;
            // SAFETY: back is within the initialized and not yet yielded range.
            Some(unsafe { self.vec.data().add(self.back).read() })
        } else {
            None
        }
    }
}

impl<T, H: Header, A: RawAlloc> FusedIterator for IntoIter<T, H, A> {}

impl<T, H: Header, A: RawAlloc> ExactSizeIterator for IntoIter<T, H, A> {
    fn len(&self) -> usize {
        self.back - self.front
    }
}
