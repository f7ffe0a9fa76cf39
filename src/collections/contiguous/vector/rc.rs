use super::Vector;
use crate::collections::contiguous::alloc::RawAlloc;
use crate::collections::contiguous::header::RcHeader;

impl<T, A: RawAlloc> Vector<T, RcHeader, A> {
    /// Returns the reference count stored in the header, 0 if the Vector is empty.
    pub fn refs(&self) -> usize {
        self.header().map_or(0, |h| h.refs)
    }

    /// Increments the reference count and returns the new count. An empty Vector has nowhere to
    /// store a count, so this does nothing and returns 0.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::{Global, RcHeader, Vector};
    /// let mut vec: Vector<u8, RcHeader> = Vector::new_in(Global);
    /// vec.push(1);
    /// assert_eq!(vec.retain(), 1);
    /// assert_eq!(vec.retain(), 2);
    /// assert_eq!(vec.release_ref(), 1);
    /// assert_eq!(vec.release_ref(), 0);
    /// assert!(!vec.is_allocated());
    /// ```
    pub fn retain(&mut self) -> usize {
        // SAFETY: Only the reference count is modified.
        match unsafe { self.header_mut() } {
            Some(header) => {
                header.refs = header.refs.saturating_add(1);
                header.refs
            }
            None => 0,
        }
    }

    /// Decrements the reference count and returns the new count. The Vector is
    /// [`release`](Vector::release)d once the count reaches 0.
    pub fn release_ref(&mut self) -> usize {
        // SAFETY: Only the reference count is modified.
        let refs = match unsafe { self.header_mut() } {
            Some(header) => {
                header.refs = header.refs.saturating_sub(1);
                header.refs
            }
            None => return 0,
        };

        if refs == 0 {
            self.release();
        }
        refs
    }
}
