//! Binding a [`Vector`]'s allocation to a lexical scope.
//!
//! A [`Scoped`] guard releases the Vector it holds when it goes out of scope, whichever way control
//! leaves that scope: falling off the end, `return`, `break`, `?` or unwinding. Guards declared
//! in the same scope are released in reverse order of declaration.

use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::ptr;

use crate::collections::contiguous::alloc::{Global, RawAlloc};
use crate::collections::contiguous::header::{ArrHeader, Header};
use crate::collections::contiguous::vector::Vector;

/// A guard which releases the contained [`Vector`] when dropped. Dereferences to the Vector.
///
/// # Examples
/// ```
/// # use header_array::collections::contiguous::{Scoped, Vector};
/// let total = {
///     let mut vec = Scoped::new(Vector::new());
///     for i in 1..=4 {
///         vec.push(i);
///     }
///     vec.iter().sum::<i32>()
/// };
/// assert_eq!(total, 10);
/// ```
pub struct Scoped<T, H: Header = ArrHeader, A: RawAlloc = Global> {
    vec: Vector<T, H, A>,
}

impl<T, H: Header, A: RawAlloc> Scoped<T, H, A> {
    /// Binds `vec` to the current scope.
    pub const fn new(vec: Vector<T, H, A>) -> Scoped<T, H, A> {
        Scoped { vec }
    }

    /// Leaves the scope early, releasing the Vector now rather than at the end of the scope.
    pub fn exit(mut self) {
        self.vec.release();
    }

    /// Unbinds the Vector from the scope, handing its ownership back to the caller.
    pub fn into_inner(self) -> Vector<T, H, A> {
        let this = ManuallyDrop::new(self);
        // SAFETY: this is never dropped, so the Vector is moved out exactly once.
        unsafe { ptr::read(&this.vec) }
    }
}

impl<T, H: Header, A: RawAlloc> Drop for Scoped<T, H, A> {
    fn drop(&mut self) {
        self.vec.release();
    }
}

impl<T, H: Header, A: RawAlloc> Deref for Scoped<T, H, A> {
    type Target = Vector<T, H, A>;

    fn deref(&self) -> &Self::Target {
        &self.vec
    }
}

impl<T, H: Header, A: RawAlloc> DerefMut for Scoped<T, H, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.vec
    }
}

/// Runs `f` with a new, empty Vector which is released as soon as `f` returns (or unwinds).
/// Returning from `f` early exits the scope.
///
/// # Examples
/// ```
/// # use header_array::collections::contiguous::scoped;
/// let first_big = scoped(|vec| {
///     vec.append_slice(&[3, 14, 15, 92]);
///     for (i, n) in vec.each() {
///         if *n > 10 {
///             return Some(i);
///         }
///     }
///     None
/// });
/// assert_eq!(first_big, Some(1));
/// ```
pub fn scoped<T, R, F>(f: F) -> R
where
    F: FnOnce(&mut Vector<T>) -> R,
{
    scoped_init(Vector::new(), f)
}

/// Runs `f` with `init`, which is released as soon as `f` returns (or unwinds).
///
/// # Examples
/// ```
/// # use header_array::collections::contiguous::{scoped_init, Vector};
/// let len = scoped_init(Vector::from([1, 2, 3]), |outer| {
///     scoped_init(outer.duplicate(), |inner| {
///         inner.append_slice(&outer[..]);
///         inner.len()
///     })
/// });
/// assert_eq!(len, 6);
/// ```
pub fn scoped_init<T, H, A, R, F>(init: Vector<T, H, A>, f: F) -> R
where
    H: Header,
    A: RawAlloc,
    F: FnOnce(&mut Vector<T, H, A>) -> R,
{
    let mut guard = Scoped::new(init);
    f(&mut guard)
}
