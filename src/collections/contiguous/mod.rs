//! Contiguous collection types. Namely [`Vector`], a growable array which stores its capacity and
//! length in a header directly in front of its elements.
#![warn(missing_docs)]

pub mod alloc;
pub mod header;
pub mod index;
pub mod scoped;
pub mod vector;

#[doc(inline)]
pub use alloc::{Global, RawAlloc};
#[doc(inline)]
pub use header::{ArrHeader, Header};
#[cfg(feature = "rc")]
#[doc(inline)]
pub use header::RcHeader;
#[doc(inline)]
pub use index::{BoundsHook, in_bounds, resolve_index, set_bounds_hook, try_resolve_index};
#[doc(inline)]
pub use scoped::{Scoped, scoped, scoped_init};
#[doc(inline)]
pub use vector::{IntoIter, LoopInfo, ScalarKey, ScalarKind, SortDir, Vector};

pub use crate::util::error::{
    AllocError, CapacityOverflow, IndexOutOfBounds, ReserveError, SortError,
};
