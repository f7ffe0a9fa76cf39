//! Metadata blocks stored directly in front of a [`Vector`](super::Vector)'s elements.
//!
//! A header always carries the capacity and length of its array, and may embed any other data
//! alongside them. The header of a freshly created array starts out with every byte zeroed, after
//! which the capacity is written; any extension fields therefore begin at their zero value.

/// The metadata which precedes the elements of a [`Vector`](super::Vector) in the same allocation.
///
/// # Safety
/// A value consisting entirely of zero bytes must be a valid instance of the implementing type,
/// with `cap() == 0` and `len() == 0`. The getters must return exactly what was last passed to the
/// matching setter.
///
/// # Examples
/// ```
/// # use header_array::collections::contiguous::{Header, Vector};
/// #[derive(Debug, Clone, Copy)]
/// #[repr(C)]
/// struct Tagged {
///     cap: usize,
///     len: usize,
///     tag: u32,
/// }
///
/// // SAFETY: All fields are integers, which are valid when zeroed.
/// unsafe impl Header for Tagged {
///     fn cap(&self) -> usize { self.cap }
///     fn len(&self) -> usize { self.len }
///     fn set_cap(&mut self, cap: usize) { self.cap = cap }
///     fn set_len(&mut self, len: usize) { self.len = len }
/// }
///
/// let mut vec: Vector<u8, Tagged> = Vector::default();
/// vec.push(1);
/// assert_eq!(vec.header().map(|h| h.tag), Some(0));
/// ```
pub unsafe trait Header: Copy {
    /// The number of elements the allocation has room for.
    fn cap(&self) -> usize;

    /// The number of initialized elements.
    fn len(&self) -> usize;

    /// Records a new capacity.
    fn set_cap(&mut self, cap: usize);

    /// Records a new length.
    fn set_len(&mut self, len: usize);
}

/// The default header, holding nothing but the capacity and length.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct ArrHeader {
    /// The capacity in elements.
    pub cap: usize,
    /// The number of initialized elements.
    pub len: usize,
}

// SAFETY: Both fields are plain integers and zeroed integers are valid.
unsafe impl Header for ArrHeader {
    fn cap(&self) -> usize {
        self.cap
    }

    fn len(&self) -> usize {
        self.len
    }

    fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
    }

    fn set_len(&mut self, len: usize) {
        self.len = len;
    }
}

/// A header with an additional, manually managed reference count. The count isn't atomic and is
/// never consulted by the core operations, see [`Vector::retain`](super::Vector::retain) and
/// [`Vector::release_ref`](super::Vector::release_ref).
#[cfg(feature = "rc")]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct RcHeader {
    /// The capacity in elements.
    pub cap: usize,
    /// The number of initialized elements.
    pub len: usize,
    /// The number of references beyond the first.
    pub refs: usize,
}

#[cfg(feature = "rc")]
// SAFETY: All fields are plain integers and zeroed integers are valid.
unsafe impl Header for RcHeader {
    fn cap(&self) -> usize {
        self.cap
    }

    fn len(&self) -> usize {
        self.len
    }

    fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
    }

    fn set_len(&mut self, len: usize) {
        self.len = len;
    }
}
