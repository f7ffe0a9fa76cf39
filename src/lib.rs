//! A growable array which keeps its capacity and length in a header, stored in the same allocation
//! directly in front of its elements.
//!
//! # Purpose
//! A plain pointer to the first element is all that's needed to reach both the elements and the
//! metadata describing them. This crate wraps that layout in an owning type,
//! [`Vector`](collections::contiguous::Vector), which is generic over the element type, the header
//! type and the allocator it requests memory from.
//!
//! # Method
//! The Vector is written on top of raw allocations, with all of the pointer arithmetic confined to
//! the type itself. Everything a slice can do is provided through
//! [`Deref<Target = [T]>`](std::ops::Deref), leaving the Vector to implement growth, insertion and
//! removal, negative indexing, sorting by a scalar member, rotation, extraction and a set of
//! closure-based traversals. [`Scoped`](collections::contiguous::Scoped) binds a Vector's
//! allocation to a lexical scope.
//!
//! # Error Handling
//! Specifically for a collection, it is more ergonomic for functions to panic in some cases,
//! because users don't want to be forced to handle an error every time they invoke a method. For
//! example, imagine having to handle the possibility of a capacity overflow every time you push
//! into a Vector. So the common operations panic on capacity overflow, abort when the allocator
//! runs dry and hand bounds violations to a replaceable hook (see
//! [`set_bounds_hook`](collections::contiguous::set_bounds_hook)), which panics by default.
//!
//! Where a failure is worth recovering from, there is a `try_` variant or a [`Result`]. Errors are
//! strongly typed, using enums for static dispatch rather than dynamic, with structs (often ZSTs)
//! that implement [`Error`](std::error::Error).
//!
//! # Dependencies
//! This crate depends on some derive macros because they're helpful and remove the need for some
//! very repetitive programming. Outside of tests, it doesn't use [`Vec`] at all.

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod collections;

pub(crate) mod util;
