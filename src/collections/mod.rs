//! Collection types built on raw, header-prefixed allocations.
//!
//! # Method
//! [`Vector`](contiguous::Vector) implements [`Deref<Target = [T]>`](std::ops::Deref) (and
//! DerefMut), so everything a slice offers is available without being reimplemented here.

pub mod contiguous;
