//! A module containing [`Vector`] and associated types.
//!
//! The operations on a Vector are spread over several files: growth and mutation live alongside
//! the type itself, while sorting, rearrangement, extraction, traversal and the reference counting
//! extension each get their own module. [`IntoIter`] provides owned iteration, while
//! [`Iter`](std::slice::Iter) and [`IterMut`](std::slice::IterMut) from [`std::slice`] are used for
//! borrowed iteration.
//!
//! [`Vector`] is also re-exported under the parent module.

mod extract;
mod iter;
mod rearrange;
#[cfg(feature = "rc")]
mod rc;
mod sort;
mod tests;
mod traverse;
mod vector;

pub use iter::*;
pub use sort::*;
pub use traverse::*;
pub use vector::*;
