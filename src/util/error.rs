use std::alloc::Layout;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant};

use crate::util::panic::Panic;

/// A resolved index fell outside of `0..len`. Negative indices are reported as they were passed,
/// before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    /// The index as it was passed.
    pub index: isize,
    /// The length of the collection.
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds for collection with {} elements!", self.index, self.len)
    }
}

impl Error for IndexOutOfBounds {}

impl Panic for IndexOutOfBounds {}

/// A requested capacity would exceed [`isize::MAX`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityOverflow;

impl Display for CapacityOverflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Capacity overflow!")
    }
}

impl Error for CapacityOverflow {}

impl Panic for CapacityOverflow {}

/// The allocator strategy couldn't satisfy a request for `layout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError {
    /// The layout which was requested.
    pub layout: Layout,
}

impl Display for AllocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Allocation of {} bytes failed!", self.layout.size())
    }
}

impl Error for AllocError {}

/// Errors produced when an array fails to acquire more capacity.
#[derive(Debug, Display, Error, From, IsVariant, Clone, Copy, PartialEq, Eq)]
pub enum ReserveError {
    /// See [`CapacityOverflow`].
    CapacityOverflow(CapacityOverflow),
    /// See [`AllocError`].
    AllocError(AllocError),
}

/// Errors produced by [`Vector::sort_by_member_raw`](crate::collections::contiguous::Vector)
/// and its safe counterpart.
#[derive(Debug, Display, Error, IsVariant, Clone, Copy, PartialEq, Eq)]
pub enum SortError {
    /// There is no comparison for the requested kind at this width.
    #[display("no {kind} comparison exists for a member of {width} bytes")]
    UnsupportedWidth {
        /// The name of the requested kind.
        kind: &'static str,
        /// The requested width in bytes.
        width: usize,
    },
    /// The member extends past the end of an element.
    #[display(
        "member at offset {offset} ({width} bytes) doesn't fit in an element of {size} bytes"
    )]
    MemberOutOfBounds {
        /// The offset of the member in bytes.
        offset: usize,
        /// The width of the member in bytes.
        width: usize,
        /// The size of an element in bytes.
        size: usize,
    },
    /// The member of an element isn't at the same offset as in the first element.
    #[display("member of element {index} isn't at the same offset as that of the first element")]
    InconsistentMember {
        /// The index of the first element found to differ.
        index: usize,
    },
}
