//! Sorting by a scalar member of each element.
//!
//! Elements are compared by reading a signed integer, unsigned integer or floating point member,
//! located by its byte offset and width, directly out of each element. The comparison is chosen
//! once per sort and monomorphized, so the inner loop never goes through a callback. The sort
//! itself is a stable insertion sort, swapping whole elements.

use std::cmp::Ordering;
use std::ptr;

use derive_more::IsVariant;

use super::Vector;
use crate::collections::contiguous::alloc::RawAlloc;
use crate::collections::contiguous::header::Header;
use crate::util::error::SortError;
use crate::util::sealed::Sealed;

/// How the bytes of a sort member are interpreted.
#[derive(Debug, IsVariant, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// A two's complement signed integer.
    Signed,
    /// An unsigned integer.
    Unsigned,
    /// An IEEE 754 float.
    Float,
}

impl ScalarKind {
    const fn name(self) -> &'static str {
        match self {
            ScalarKind::Signed => "signed integer",
            ScalarKind::Unsigned => "unsigned integer",
            ScalarKind::Float => "floating point",
        }
    }
}

/// The direction of a sort.
#[derive(Debug, IsVariant, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDir {
    /// Smallest member first.
    Asc,
    /// Largest member first.
    Desc,
}

impl SortDir {
    /// The factor applied to each three-way comparison.
    const fn sign(self) -> i8 {
        match self {
            SortDir::Asc => 1,
            SortDir::Desc => -1,
        }
    }
}

/// A primitive type which can act as a sort member. Implemented for all fixed-width integers and
/// floats of 1, 2, 4 or 8 bytes, as well as `isize` and `usize`.
pub trait ScalarKey: Copy + PartialOrd + Sealed {
    /// How this type's bytes are compared.
    const KIND: ScalarKind;
}

macro_rules! scalar_key {
    ($kind:ident: $($ty:ty),*) => {
        $(
            impl Sealed for $ty {}

            impl ScalarKey for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;
            }
        )*
    };
}

scalar_key!(Signed: i8, i16, i32, i64, isize);
scalar_key!(Unsigned: u8, u16, u32, u64, usize);
scalar_key!(Float: f32, f64);

impl<T, H: Header, A: RawAlloc> Vector<T, H, A> {
    /// Sorts the Vector by the scalar member of each element returned by `member`. The kind of
    /// comparison is taken from the member's type. Elements with equal members keep their relative
    /// order. Floats which don't compare (NaN) are treated as equal to everything.
    ///
    /// `member` must return a reference into the element it is given, at the same offset for every
    /// element.
    ///
    /// # Errors
    /// Returns a [`SortError`] if `member` returns a reference outside of the element or if the
    /// member moves between elements. The Vector is left untouched in that case.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::{SortDir, Vector};
    /// #[derive(Debug, Clone, Copy, PartialEq)]
    /// struct Record {
    ///     key: i32,
    ///     weight: f32,
    /// }
    ///
    /// let mut vec = Vector::from([
    ///     Record { key: 0xFF, weight: -0.2 },
    ///     Record { key: 0x00, weight: 482.0 },
    ///     Record { key: -12, weight: 74.0 },
    /// ]);
    ///
    /// vec.sort_by_member(|r| &r.key, SortDir::Asc).unwrap();
    /// assert_eq!(vec.iter().map(|r| r.key).collect::<Vector<_>>(), [-12, 0x00, 0xFF]);
    ///
    /// vec.sort_by_member(|r| &r.weight, SortDir::Desc).unwrap();
    /// assert_eq!(vec.iter().map(|r| r.key).collect::<Vector<_>>(), [0x00, -12, 0xFF]);
    /// ```
    pub fn sort_by_member<K, F>(&mut self, member: F, dir: SortDir) -> Result<(), SortError>
    where
        K: ScalarKey,
        F: Fn(&T) -> &K,
    {
        let Some(first) = self.first() else {
            return Ok(());
        };

        let offset = Self::member_offset(first, member(first));
        let width = size_of::<K>();

        if offset.checked_add(width).is_none_or(|end| end > size_of::<T>()) {
            return Err(SortError::MemberOutOfBounds {
                offset,
                width,
                size: size_of::<T>(),
            });
        }

        for (index, element) in self.iter().enumerate().skip(1) {
            if Self::member_offset(element, member(element)) != offset {
                return Err(SortError::InconsistentMember { index });
            }
        }

        // SAFETY: Every element has been shown to hold an initialized K at offset, which remains
        // true while elements are only swapped.
        unsafe { self.sort_by_member_raw(offset, width, K::KIND, dir) }
    }

    /// Sorts the Vector by a scalar member of each element, described by its byte `offset` within
    /// the element, its `width` in bytes and how it should be interpreted. Elements with equal
    /// members keep their relative order.
    ///
    /// Integers may be 1, 2, 4 or 8 bytes wide and floats 4 or 8 bytes.
    ///
    /// # Errors
    /// Returns a [`SortError`] if there is no comparison for `kind` at `width`, or if the member
    /// doesn't fit within an element. The Vector is left untouched in that case.
    ///
    /// # Safety
    /// The `width` bytes at `offset` must be initialized in every element, for example by
    /// describing a field of a struct.
    pub unsafe fn sort_by_member_raw(
        &mut self,
        offset: usize,
        width: usize,
        kind: ScalarKind,
        dir: SortDir,
    ) -> Result<(), SortError> {
        use ScalarKind::*;

        let sort: fn(&mut [T], usize, SortDir) = match (kind, width) {
            (Signed, 1) => insertion_sort::<T, i8>,
            (Signed, 2) => insertion_sort::<T, i16>,
            (Signed, 4) => insertion_sort::<T, i32>,
            (Signed, 8) => insertion_sort::<T, i64>,
            (Unsigned, 1) => insertion_sort::<T, u8>,
            (Unsigned, 2) => insertion_sort::<T, u16>,
            (Unsigned, 4) => insertion_sort::<T, u32>,
            (Unsigned, 8) => insertion_sort::<T, u64>,
            (Float, 4) => insertion_sort::<T, f32>,
            (Float, 8) => insertion_sort::<T, f64>,
            _ => return Err(SortError::UnsupportedWidth { kind: kind.name(), width }),
        };

        if offset.checked_add(width).is_none_or(|end| end > size_of::<T>()) {
            return Err(SortError::MemberOutOfBounds {
                offset,
                width,
                size: size_of::<T>(),
            });
        }

        sort(&mut self[..], offset, dir);
        Ok(())
    }

    /// The distance in bytes from the start of `element` to `member`, wrapping for members that
    /// come before the element.
    fn member_offset<K>(element: &T, member: &K) -> usize {
        ptr::from_ref(member).addr().wrapping_sub(ptr::from_ref(element).addr())
    }
}

/// Reads the member of type `K` at `offset` bytes into `element`.
///
/// # Safety
/// `element` must contain an initialized `K` at `offset`, which may be unaligned.
unsafe fn read_member<T, K: ScalarKey>(element: &T, offset: usize) -> K {
    // SAFETY: The caller guarantees that the read is in bounds and initialized.
    unsafe { ptr::from_ref(element).cast::<u8>().add(offset).cast::<K>().read_unaligned() }
}

const fn three_way(ordering: Option<Ordering>) -> i8 {
    match ordering {
        Some(Ordering::Greater) => 1,
        Some(Ordering::Less) => -1,
        _ => 0,
    }
}

/// Stable insertion sort on the `K` member at `offset`. Only ever called through
/// [`Vector::sort_by_member_raw`], which validates the member beforehand.
fn insertion_sort<T, K: ScalarKey>(elements: &mut [T], offset: usize, dir: SortDir) {
    for at in 1..elements.len() {
        let mut j = at;
        while j > 0 {
            // SAFETY: The caller of sort_by_member_raw guarantees an initialized K at offset in
            // every element.
            let (prev, cur) = unsafe {
                (
                    read_member::<T, K>(&elements[j - 1], offset),
                    read_member::<T, K>(&elements[j], offset),
                )
            };

            if three_way(prev.partial_cmp(&cur)) * dir.sign() > 0 {
                elements.swap(j - 1, j);
                j -= 1;
            } else {
                break;
            }
        }
    }
}
