use std::alloc::{self, Layout};
use std::borrow::{Borrow, BorrowMut};
use std::cmp;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use crate::collections::contiguous::alloc::{Global, RawAlloc};
use crate::collections::contiguous::header::{ArrHeader, Header};
use crate::collections::contiguous::index::{
    bounds_failure, check_index, resolve_index, try_resolve_index,
};
use crate::util::error::{AllocError, CapacityOverflow, IndexOutOfBounds, ReserveError};
use crate::util::option::OptionExtension;
use crate::util::panic::Panic;

const GROWTH_FACTOR: usize = 2;

/// A growable contiguous collection which keeps its capacity and length in a header, stored in the
/// same allocation directly in front of the first element.
///
/// A Vector is either empty, with no allocation at all, or allocated. The header type `H` can be
/// swapped out for one carrying extra fields (see [`Header`]) and all memory is requested through
/// the allocator strategy `A`. Every operation which can grow the Vector may move the allocation.
///
/// The accessors come in two tiers: [`len`](Vector::len) and friends accept an empty Vector and
/// report 0, while [`len_unchecked`](Vector::len_unchecked) and friends skip that check and
/// require an allocation to exist.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the Vector.
/// - `i`: The index of the item in question.
/// - `m`: The number of items being added or removed.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `at` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `add` | `O(m)`*, `O(n+m)` |
/// | `pop` | `O(1)` |
/// | `insert` | `O(n-i)` |
/// | `remove` | `O(n-i)` |
/// | `remove_swap` | `O(1)` |
/// | `reverse` | `O(n)` |
/// | `rotate_right` | `O(n)` |
/// | `sort_by_member` | `O(n^2)` |
/// | `duplicate` | `O(n)` |
///
/// \* If the Vector doesn't have enough capacity for the new elements, a reallocation takes `O(n)`.
pub struct Vector<T, H: Header = ArrHeader, A: RawAlloc = Global> {
    pub(crate) ptr: Option<NonNull<T>>,
    pub(crate) alloc: A,
    pub(crate) _phantom: PhantomData<(T, H)>,
}

impl<T> Vector<T> {
    /// Creates a new, empty Vector. Nothing is allocated until an element is added.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let vec: Vector<u8> = Vector::new();
    /// assert_eq!(vec.len(), 0);
    /// assert_eq!(vec.cap(), 0);
    /// assert!(!vec.is_allocated());
    /// ```
    pub const fn new() -> Vector<T> {
        Vector::new_in(Global)
    }

    /// Creates a new Vector with capacity for `cap` elements.
    ///
    /// # Panics
    /// Panics if the memory layout size would exceed [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let vec: Vector<u8> = Vector::with_cap(5);
    /// assert_eq!(vec.cap(), 5);
    /// assert_eq!(vec.len(), 0);
    /// ```
    pub fn with_cap(cap: usize) -> Vector<T> {
        Vector::with_cap_in(cap, Global)
    }
}

impl<T, H: Header, A: RawAlloc> Vector<T, H, A> {
    const ALIGN: usize = if align_of::<H>() > align_of::<T>() {
        align_of::<H>()
    } else {
        align_of::<T>()
    };

    /// The size of the header region, rounded up so that the first element is properly aligned.
    pub const HEADER_SIZE: usize = size_of::<H>().next_multiple_of(align_of::<T>());

    /// Creates a new, empty Vector which will allocate through `alloc`.
    pub const fn new_in(alloc: A) -> Vector<T, H, A> {
        Vector {
            ptr: None,
            alloc,
            _phantom: PhantomData,
        }
    }

    /// Creates a new Vector with capacity for `cap` elements, allocated through `alloc`.
    ///
    /// # Panics
    /// Panics if the memory layout size would exceed [`isize::MAX`].
    pub fn with_cap_in(cap: usize, alloc: A) -> Vector<T, H, A> {
        let mut vec = Vector::new_in(alloc);
        vec.realloc_with_cap(cap);
        vec
    }

    /// Returns true if the Vector currently owns an allocation.
    pub const fn is_allocated(&self) -> bool {
        self.ptr.is_some()
    }

    /// Returns a reference to the allocator strategy.
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the header of the Vector, or [`None`] if it is empty.
    pub fn header(&self) -> Option<&H> {
        // SAFETY: An allocated Vector always has an initialized header in front of ptr, which is
        // only mutated through &mut self.
        self.ptr.map(|ptr| unsafe { Self::header_of(ptr).as_ref() })
    }

    /// Returns a mutable reference to the header of the Vector, or [`None`] if it is empty.
    ///
    /// # Safety
    /// The capacity and length stored in the header must not be changed, because the Vector relies
    /// on them to describe its allocation. Other fields can be modified freely.
    pub unsafe fn header_mut(&mut self) -> Option<&mut H> {
        // SAFETY: As for header, with uniqueness provided by &mut self.
        self.ptr.map(|ptr| unsafe { Self::header_of(ptr).as_mut() })
    }

    /// Returns the number of elements in the Vector, 0 if it is empty.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec = Vector::new();
    /// assert_eq!(vec.len(), 0);
    /// vec.push(1_u8);
    /// assert_eq!(vec.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.header().map_or(0, |h| h.len())
    }

    /// Returns true if the Vector contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of elements the Vector can hold in its current allocation, 0 if it is
    /// empty.
    pub fn cap(&self) -> usize {
        self.header().map_or(0, |h| h.cap())
    }

    /// Returns the number of bytes occupied by the elements in use.
    pub fn size(&self) -> usize {
        self.len() * size_of::<T>()
    }

    /// Returns the number of bytes occupied by the elements in use and the header, 0 if the Vector
    /// is empty.
    pub fn total_size(&self) -> usize {
        if self.is_allocated() {
            self.size() + Self::HEADER_SIZE
        } else {
            0
        }
    }

    /// Returns the number of bytes available for elements in the current allocation.
    pub fn cap_size(&self) -> usize {
        self.cap() * size_of::<T>()
    }

    /// Returns the number of bytes in the current allocation, including the header, 0 if the
    /// Vector is empty.
    pub fn total_cap_size(&self) -> usize {
        if self.is_allocated() {
            self.cap_size() + Self::HEADER_SIZE
        } else {
            0
        }
    }

    /// Returns the number of elements in the Vector, without checking for an allocation.
    ///
    /// # Safety
    /// The Vector must be allocated.
    pub unsafe fn len_unchecked(&self) -> usize {
        // SAFETY: The caller guarantees that ptr is Some, pointing just past the header.
        unsafe { Self::header_of(self.ptr.unreachable()).as_ref().len() }
    }

    /// Returns the capacity of the Vector, without checking for an allocation.
    ///
    /// # Safety
    /// The Vector must be allocated.
    pub unsafe fn cap_unchecked(&self) -> usize {
        // SAFETY: The caller guarantees that ptr is Some, pointing just past the header.
        unsafe { Self::header_of(self.ptr.unreachable()).as_ref().cap() }
    }

    /// Returns [`size`](Vector::size), without checking for an allocation.
    ///
    /// # Safety
    /// The Vector must be allocated.
    pub unsafe fn size_unchecked(&self) -> usize {
        // SAFETY: Passed on to the caller.
        unsafe { self.len_unchecked() * size_of::<T>() }
    }

    /// Returns [`total_size`](Vector::total_size), without checking for an allocation.
    ///
    /// # Safety
    /// The Vector must be allocated.
    pub unsafe fn total_size_unchecked(&self) -> usize {
        // SAFETY: Passed on to the caller.
        unsafe { self.size_unchecked() + Self::HEADER_SIZE }
    }

    /// Returns [`cap_size`](Vector::cap_size), without checking for an allocation.
    ///
    /// # Safety
    /// The Vector must be allocated.
    pub unsafe fn cap_size_unchecked(&self) -> usize {
        // SAFETY: Passed on to the caller.
        unsafe { self.cap_unchecked() * size_of::<T>() }
    }

    /// Returns [`total_cap_size`](Vector::total_cap_size), without checking for an allocation.
    ///
    /// # Safety
    /// The Vector must be allocated.
    pub unsafe fn total_cap_size_unchecked(&self) -> usize {
        // SAFETY: Passed on to the caller.
        unsafe { self.cap_size_unchecked() + Self::HEADER_SIZE }
    }

    /// Sets the length of the Vector directly.
    ///
    /// # Safety
    /// The Vector must be allocated, `len` must not exceed the capacity and all elements below
    /// `len` must be initialized.
    pub unsafe fn set_len(&mut self, len: usize) {
        // SAFETY: The caller guarantees that ptr is Some, pointing just past the header.
        unsafe { Self::header_of(self.ptr.unreachable()).as_mut().set_len(len) }
    }

    /// Returns a pointer to the first element, which is dangling for an empty Vector.
    pub fn as_ptr(&self) -> *const T {
        self.data().as_ptr().cast_const()
    }

    /// Returns a mutable pointer to the first element, which is dangling for an empty Vector.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data().as_ptr()
    }

    /// Push the provided value onto the end of the Vector, growing (or creating) the allocation if
    /// required. Returns the index that the value was written to.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec = Vector::<u8>::new();
    /// for i in 0..=5 {
    ///     assert_eq!(vec.push(i), i as usize);
    /// }
    /// assert_eq!(&*vec, &[0, 1, 2, 3, 4, 5]);
    /// ```
    pub fn push(&mut self, value: T) -> usize {
        self.maybe_grow(1);
        // SAFETY: The capacity has just been adjusted to support the addition of the new item.
        unsafe { self.push_unchecked(value) }
    }

    /// Push the provided value onto the end of the Vector, reporting allocation failures instead of
    /// aborting. The value is dropped if the push fails.
    ///
    /// # Errors
    /// Returns a [`ReserveError`] if the Vector couldn't grow.
    pub fn try_push(&mut self, value: T) -> Result<usize, ReserveError> {
        self.try_reserve(1)?;
        // SAFETY: The capacity has just been adjusted to support the addition of the new item.
        Ok(unsafe { self.push_unchecked(value) })
    }

    /// Push the provided value onto the end of the Vector, assuming that there is enough capacity
    /// to do so.
    ///
    /// # Safety
    /// The Vector must be allocated with a capacity greater than its length.
    pub unsafe fn push_unchecked(&mut self, value: T) -> usize {
        // SAFETY: It is up to the caller to ensure that the Vector has capacity for this push,
        // leading to the write being in bounds of the allocation.
        unsafe {
            let len = self.len_unchecked();
            self.data().add(len).write(value);
            self.set_len(len + 1);
            len
        }
    }

    /// Adds `count` elements to the end of the Vector, each initialized with the default value of
    /// `T`. Returns the index of the first added element.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec = Vector::from([7_u8, 8]);
    /// assert_eq!(vec.add(3), 2);
    /// assert_eq!(&*vec, &[7, 8, 0, 0, 0]);
    /// ```
    pub fn add(&mut self, count: usize) -> usize
    where
        T: Default,
    {
        self.maybe_grow(count);
        // SAFETY: The Vector has been grown to fit count more elements and the length only covers
        // elements which have been written.
        unsafe {
            let start = self.len_unchecked();
            for i in start..start + count {
                self.data().add(i).write(T::default());
                self.set_len(i + 1);
            }
            start
        }
    }

    /// Adds `count` elements to the end of the Vector without initializing them. Returns the index
    /// of the first added element.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Safety
    /// The added elements contain whatever the allocation held before. They must all be written
    /// (without reading or dropping the old value) before the Vector is read from or dropped.
    pub unsafe fn add_uninit(&mut self, count: usize) -> usize {
        self.maybe_grow(count);
        // SAFETY: The Vector has been grown to fit count more elements. Initialization is up to
        // the caller.
        unsafe {
            let start = self.len_unchecked();
            self.set_len(start + count);
            start
        }
    }

    /// Moves `count` elements from `src` onto the end of the Vector with a single bulk copy.
    /// Returns the index of the first appended element.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Safety
    /// `src` must be valid for reads of `count` elements and must not point into this Vector. The
    /// elements are moved bitwise, so the originals must not be used or dropped afterwards unless
    /// `T` is [`Copy`].
    pub unsafe fn append_ptr(&mut self, src: *const T, count: usize) -> usize {
        self.maybe_grow(count);
        // SAFETY: The Vector has room for count more elements and the caller guarantees that src
        // is readable and doesn't overlap.
        unsafe {
            let start = self.len_unchecked();
            ptr::copy_nonoverlapping(src, self.data().add(start).as_ptr(), count);
            self.set_len(start + count);
            start
        }
    }

    /// Copies all elements of `src` onto the end of the Vector. Returns the index of the first
    /// appended element.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1_u8]);
    /// assert_eq!(vec.append_slice(&[2, 3]), 1);
    /// assert_eq!(&*vec, &[1, 2, 3]);
    /// ```
    pub fn append_slice(&mut self, src: &[T]) -> usize
    where
        T: Copy,
    {
        // SAFETY: src is a valid slice and can't borrow from self, which is borrowed mutably.
        unsafe { self.append_ptr(src.as_ptr(), src.len()) }
    }

    /// Moves all elements of a fixed-size array onto the end of the Vector. Returns the index of
    /// the first appended element.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn append_array<const N: usize>(&mut self, src: [T; N]) -> usize {
        let src = ManuallyDrop::new(src);
        // SAFETY: src is owned here and will never be dropped, so its elements can be moved.
        unsafe { self.append_ptr(src.as_ptr(), N) }
    }

    /// Copies all elements of `other` onto the end of the Vector. Returns the index of the first
    /// appended element.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn concat<H2: Header, A2: RawAlloc>(&mut self, other: &Vector<T, H2, A2>) -> usize
    where
        T: Copy,
    {
        self.append_slice(other)
    }

    /// Inserts the provided value at `index`, moving all following elements up by one position.
    /// Returns `index`.
    ///
    /// # Panics
    /// Invokes the bounds hook (which panics by default) if `index > len`. Panics if the memory
    /// layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec = Vector::from([0, 1, 2]);
    /// vec.insert(1, 100);
    /// vec.insert(1, 200);
    /// vec.insert(5, 300);
    /// assert_eq!(&*vec, &[0, 200, 100, 1, 2, 300]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        let len = self.len();
        check_index(len, index, true);
        self.maybe_grow(1);

        // SAFETY: index <= len and the Vector has room for one more element, so shifting
        // [index, len) up by one stays within the allocation. ptr::copy handles the overlap.
        unsafe {
            let at = self.data().add(index);
            ptr::copy(at.as_ptr(), at.add(1).as_ptr(), len - index);
            at.write(value);
            self.set_len(len + 1);
        }

        index
    }

    /// Removes `count` elements starting at `index`, dropping them and moving all following
    /// elements down to fill the gap. The allocation is never shrunk.
    ///
    /// # Panics
    /// Invokes the bounds hook (which panics by default) if `index + count > len`.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec = Vector::from([0, 1, 2, 3, 4]);
    /// vec.remove(1, 2);
    /// assert_eq!(&*vec, &[0, 3, 4]);
    /// ```
    pub fn remove(&mut self, index: usize, count: usize) {
        let len = self.len();
        let end = match index.checked_add(count) {
            Some(end) if end <= len => end,
            _ => bounds_failure(IndexOutOfBounds {
                index: index.try_into().unwrap_or(isize::MAX),
                len,
            }),
        };

        if count == 0 {
            return;
        }

        // SAFETY: [index, end) is within [0, len), so all of those elements are initialized. The
        // length is lowered before dropping, so a panicking drop can only leak the tail.
        unsafe {
            self.set_len(index);
            let at = self.data().add(index);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(at.as_ptr(), count));
            ptr::copy(at.add(count).as_ptr(), at.as_ptr(), len - end);
            self.set_len(len - count);
        }
    }

    /// Removes and returns the element at `index`, moving all following elements down by one.
    ///
    /// # Panics
    /// Invokes the bounds hook (which panics by default) if `index` is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec: Vector<_> = "Hello world!".chars().collect();
    /// assert_eq!(vec.take(1), 'e');
    /// assert_eq!(vec.take(4), ' ');
    /// assert_eq!(vec, "Hlloworld!".chars().collect::<Vector<_>>());
    /// ```
    pub fn take(&mut self, index: usize) -> T {
        let len = self.len();
        check_index(len, index, false);

        // SAFETY: index < len, so the element is initialized and is moved out before its slot is
        // overwritten by the following elements.
        unsafe {
            let at = self.data().add(index);
            let value = at.read();
            ptr::copy(at.add(1).as_ptr(), at.as_ptr(), len - index - 1);
            self.set_len(len - 1);
            value
        }
    }

    /// Removes and returns the first element, moving all others down by one.
    pub fn shift(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            Some(self.take(0))
        }
    }

    /// Removes and returns the element at `index`, replacing it with the last element. This is
    /// `O(1)` but doesn't preserve the order of the elements.
    ///
    /// # Panics
    /// Invokes the bounds hook (which panics by default) if `index` is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec = Vector::from(['a', 'b', 'c', 'd']);
    /// assert_eq!(vec.remove_swap(1), 'b');
    /// assert_eq!(&*vec, &['a', 'd', 'c']);
    /// ```
    pub fn remove_swap(&mut self, index: usize) -> T {
        let len = self.len();
        check_index(len, index, false);

        // SAFETY: index < len, so both index and len - 1 are initialized. The value at index is
        // moved out before being overwritten and the last slot is excluded by the new length.
        unsafe {
            let last = len - 1;
            let at = self.data().add(index);
            let value = at.read();
            if index != last {
                ptr::copy_nonoverlapping(self.data().add(last).as_ptr(), at.as_ptr(), 1);
            }
            self.set_len(last);
            value
        }
    }

    /// Pops the last value off the end of the Vector, returning an owned value if the Vector has
    /// length greater than 0.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec: Vector<_> = (0..5).collect();
    /// for i in (0..vec.len()).rev() {
    ///     assert_eq!(vec.pop(), Some(i));
    /// }
    /// assert_eq!(vec.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            None
        } else {
            // SAFETY: len > 0 implies an allocation, and the value at len - 1 is initialized. We
            // make a bitwise copy of the value and then forget that the original exists by
            // lowering the length.
            unsafe {
                self.set_len(len - 1);
                Some(self.data().add(len - 1).read())
            }
        }
    }

    /// Shortens the Vector to `len` elements, dropping the rest. Does nothing if the Vector is
    /// already shorter. The allocation is kept.
    pub fn truncate(&mut self, len: usize) {
        let old_len = self.len();
        if len >= old_len {
            return;
        }

        // SAFETY: [len, old_len) are initialized and excluded from the Vector before being dropped.
        unsafe {
            self.set_len(len);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.data().add(len).as_ptr(),
                old_len - len,
            ));
        }
    }

    /// Drops all elements, setting the length to 0 while keeping the allocation.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Clears the Vector and then [`add`](Vector::add)s `len` default elements.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn reset_len(&mut self, len: usize)
    where
        T: Default,
    {
        self.clear();
        self.add(len);
    }

    /// Clears the Vector and then [`add_uninit`](Vector::add_uninit)s `len` elements.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    ///
    /// # Safety
    /// See [`add_uninit`](Vector::add_uninit).
    pub unsafe fn reset_len_uninit(&mut self, len: usize) {
        self.clear();
        // SAFETY: Passed on to the caller.
        unsafe {
            self.add_uninit(len);
        }
    }

    /// Drops all elements and frees the allocation, returning the Vector to its empty state. The
    /// Vector can be used again afterwards. Releasing an empty Vector does nothing.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 2, 3]);
    /// vec.release();
    /// assert!(!vec.is_allocated());
    /// assert_eq!(vec.cap(), 0);
    /// vec.push(4);
    /// assert_eq!(&*vec, &[4]);
    /// ```
    pub fn release(&mut self) {
        let Some(ptr) = self.ptr else {
            return;
        };

        // SAFETY: The Vector is allocated, so its header is valid and all elements below len are
        // initialized. The layout matches the one used for the current allocation.
        // The handle is reset first, so a panicking drop leaks the allocation instead of freeing it
        // twice.
        unsafe {
            let header = *Self::header_of(ptr).as_ref();
            self.ptr = None;
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(ptr.as_ptr(), header.len()));
            self.alloc.free(Self::base_of(ptr), Self::layout_unchecked(header.cap()));
        }
    }

    /// Returns a reference to the element at `index`, where negative values count back from the
    /// end.
    ///
    /// # Panics
    /// Invokes the bounds hook (which panics by default) if `index` doesn't resolve to an element.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let vec = Vector::from(['a', 'b', 'c', 'd']);
    /// assert_eq!(vec.at(0), &'a');
    /// assert_eq!(vec.at(-1), &'d');
    /// assert_eq!(vec.at(-3), &'b');
    /// ```
    pub fn at(&self, index: isize) -> &T {
        let index = resolve_index(self.len(), index);
        &self[index]
    }

    /// Returns a mutable reference to the element at `index`, where negative values count back
    /// from the end.
    ///
    /// # Panics
    /// Invokes the bounds hook (which panics by default) if `index` doesn't resolve to an element.
    pub fn at_mut(&mut self, index: isize) -> &mut T {
        let index = resolve_index(self.len(), index);
        &mut self[index]
    }

    /// Returns a reference to the element at `index`, where negative values count back from the
    /// end.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index` doesn't resolve to an element.
    pub fn try_at(&self, index: isize) -> Result<&T, IndexOutOfBounds> {
        let index = try_resolve_index(self.len(), index)?;
        Ok(&self[index])
    }

    /// Returns the index of `element`, if it is a reference to one of this Vector's elements.
    /// Always returns [`None`] for zero-sized types, which have no distinct addresses.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let vec = Vector::from([10, 20, 30]);
    /// let found = vec.iter().find(|v| **v > 15).unwrap();
    /// assert_eq!(vec.index_of(found), Some(1));
    /// assert_eq!(vec.index_of(&20), None);
    /// ```
    pub fn index_of(&self, element: &T) -> Option<usize> {
        let size = size_of::<T>();
        if size == 0 {
            return None;
        }

        let offset = ptr::from_ref(element).addr().checked_sub(self.as_ptr().addr())?;
        let index = offset / size;
        (offset % size == 0 && index < self.len()).then_some(index)
    }

    /// Ensures that the Vector can take `extra` more elements, growing it the same way a push
    /// would.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn reserve(&mut self, extra: usize) {
        self.maybe_grow(extra);
    }

    /// Ensures that the Vector can take `extra` more elements, growing it the same way a push
    /// would.
    ///
    /// # Errors
    /// Returns a [`ReserveError`] if the Vector would overflow or the allocator fails.
    pub fn try_reserve(&mut self, extra: usize) -> Result<(), ReserveError> {
        if self.needs_grow(extra) {
            self.try_grow(extra)
        } else {
            Ok(())
        }
    }

    /// Shrinks the allocation so that the capacity is equal to the length. Does nothing for an
    /// empty Vector.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub fn shrink_to_fit(&mut self) {
        if self.is_allocated() {
            self.realloc_with_cap(self.len());
        }
    }

    /// Returns true if adding `increment` elements requires the Vector to grow first.
    pub(crate) fn needs_grow(&self, increment: usize) -> bool {
        match self.header() {
            Some(h) => h.len().saturating_add(increment) >= h.cap(),
            None => true,
        }
    }

    /// Grows the Vector if adding `increment` elements requires it.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub(crate) fn maybe_grow(&mut self, increment: usize) {
        if self.needs_grow(increment) {
            self.grow(increment);
        }
    }

    /// Grows the Vector so that it can take at least `increment` more elements. Allocation
    /// failures are fatal.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub(crate) fn grow(&mut self, increment: usize) {
        match self.try_grow(increment) {
            Ok(()) => (),
            Err(ReserveError::CapacityOverflow(err)) => err.panic(),
            Err(ReserveError::AllocError(err)) => alloc::handle_alloc_error(err.layout),
        }
    }

    /// Grows the Vector to the larger of double its capacity and its length plus `increment`.
    /// Existing elements are preserved, but the allocation may move.
    pub(crate) fn try_grow(&mut self, increment: usize) -> Result<(), ReserveError> {
        let (cap, len) = self.header().map_or((0, 0), |h| (h.cap(), h.len()));
        let needed = len.checked_add(increment).ok_or(CapacityOverflow)?;
        let new_cap = cmp::max(cap.saturating_mul(GROWTH_FACTOR), needed);

        // If doubling would overflow, fall back to exactly what is needed.
        if new_cap > needed && Self::layout(new_cap).is_err() {
            return self.try_realloc(needed);
        }

        self.try_realloc(new_cap)
    }

    /// Reallocates the Vector with the provided capacity.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`].
    pub(crate) fn realloc_with_cap(&mut self, new_cap: usize) {
        match self.try_realloc(new_cap) {
            Ok(()) => (),
            Err(ReserveError::CapacityOverflow(err)) => err.panic(),
            Err(ReserveError::AllocError(err)) => alloc::handle_alloc_error(err.layout),
        }
    }

    /// Moves (or creates) the allocation so that it fits exactly `new_cap` elements. The header of
    /// a new allocation is zeroed before the capacity is written. Elements beyond `new_cap` must
    /// already have been dropped by the caller.
    pub(crate) fn try_realloc(&mut self, new_cap: usize) -> Result<(), ReserveError> {
        let new_layout = Self::layout(new_cap)?;

        let (old_ptr, old_layout) = match self.ptr {
            // SAFETY: The existing allocation was made with the layout for its capacity.
            Some(ptr) => (Some(Self::base_of(ptr)), unsafe { Self::layout_unchecked(self.cap()) }),
            None => (None, new_layout),
        };

        // SAFETY: old_ptr was allocated by self.alloc with old_layout, both layouts share ALIGN
        // and new_layout always includes the (non-zero) header.
        let Some(base) = (unsafe { self.alloc.realloc(old_ptr, old_layout, new_layout) }) else {
            self.alloc.out_of_memory(new_layout);
            return Err(AllocError { layout: new_layout }.into());
        };

        // SAFETY: base is valid for new_layout, which starts with HEADER_SIZE bytes for the header.
        // A zeroed header is valid according to the Header contract.
        unsafe {
            if old_ptr.is_none() {
                base.write_bytes(0, Self::HEADER_SIZE);
            }
            base.cast::<H>().as_mut().set_cap(new_cap);
            self.ptr = Some(base.add(Self::HEADER_SIZE).cast());
        }

        Ok(())
    }

    /// Returns the pointer to the first element, or a dangling pointer for an empty Vector.
    pub(crate) fn data(&self) -> NonNull<T> {
        self.ptr.unwrap_or(NonNull::dangling())
    }

    /// Creates the [`Layout`] of an allocation with room for `cap` elements.
    pub(crate) fn layout(cap: usize) -> Result<Layout, CapacityOverflow> {
        let size = size_of::<T>()
            .checked_mul(cap)
            .and_then(|size| size.checked_add(Self::HEADER_SIZE))
            .ok_or(CapacityOverflow)?;

        Layout::from_size_align(size, Self::ALIGN).map_err(|_| CapacityOverflow)
    }

    /// Creates the [`Layout`] of an allocation with room for `cap` elements, without checking for
    /// overflow.
    ///
    /// # Safety
    /// [`Vector::layout`] must succeed for `cap`, which is the case for the capacity of any
    /// existing allocation.
    pub(crate) unsafe fn layout_unchecked(cap: usize) -> Layout {
        // SAFETY: The caller guarantees that this layout has been successfully created before.
        unsafe {
            Layout::from_size_align_unchecked(size_of::<T>() * cap + Self::HEADER_SIZE, Self::ALIGN)
        }
    }

    /// Recovers the header from a pointer to the first element.
    ///
    /// # Safety
    /// `ptr` must be the element pointer of an allocated Vector with this header type.
    pub(crate) unsafe fn header_of(ptr: NonNull<T>) -> NonNull<H> {
        // SAFETY: The header starts HEADER_SIZE bytes before the first element, within the same
        // allocation.
        unsafe { Self::base_of(ptr).cast() }
    }

    /// Returns the start of the allocation which `ptr` points into.
    pub(crate) fn base_of(ptr: NonNull<T>) -> NonNull<u8> {
        // SAFETY: Element pointers are only ever created HEADER_SIZE bytes into an allocation.
        unsafe { ptr.cast::<u8>().sub(Self::HEADER_SIZE) }
    }
}

impl<T, H: Header, A: RawAlloc> Extend<T> for Vector<T, H, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if lower > 0 {
            self.reserve(lower);
        }
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a, H: Header, A: RawAlloc> Extend<&'a T> for Vector<T, H, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        Extend::<T>::extend(self, iter.into_iter().copied());
    }
}

impl<T, H: Header, A: RawAlloc + Default> FromIterator<T> for Vector<T, H, A> {
    fn from_iter<I: IntoIterator<Item = T>>(value: I) -> Self {
        let mut vec = Vector::new_in(A::default());
        vec.extend(value);
        vec
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(value: [T; N]) -> Self {
        let mut vec = Vector::new();
        vec.append_array(value);
        vec
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(value: &[T]) -> Self {
        value.iter().cloned().collect()
    }
}

impl<T, H: Header, A: RawAlloc + Default> Default for Vector<T, H, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, H: Header, A: RawAlloc> Drop for Vector<T, H, A> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T, H: Header, A: RawAlloc> Deref for Vector<T, H, A> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: Vector is valid as a slice for len values, which are all initialized. The pointer
        // is nonnull and properly aligned (dangling for len 0). The borrow checker enforces that
        // self isn't mutated due to this function taking a &self.
        unsafe { slice::from_raw_parts(self.data().as_ptr(), self.len()) }
    }
}

impl<T, H: Header, A: RawAlloc> DerefMut for Vector<T, H, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: As for deref, with uniqueness provided by &mut self.
        unsafe { slice::from_raw_parts_mut(self.data().as_ptr(), self.len()) }
    }
}

impl<T, H: Header, A: RawAlloc> AsRef<[T]> for Vector<T, H, A> {
    fn as_ref(&self) -> &[T] {
        self.deref()
    }
}

impl<T, H: Header, A: RawAlloc> AsMut<[T]> for Vector<T, H, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.deref_mut()
    }
}

impl<T, H: Header, A: RawAlloc> Borrow<[T]> for Vector<T, H, A> {
    fn borrow(&self) -> &[T] {
        self.as_ref()
    }
}

impl<T, H: Header, A: RawAlloc> BorrowMut<[T]> for Vector<T, H, A> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut()
    }
}

// SAFETY: Vectors, when used safely rely on unique pointers and are therefore safe for Send when T:
// Send. The header is plain data owned alongside the elements.
unsafe impl<T: Send, H: Header + Send, A: RawAlloc + Send> Send for Vector<T, H, A> {}
// SAFETY: Vector's safe API obeys all rules of the borrow checker, so no interior mutability
// occurs. This means that Vector can safely implement Sync when its parts are Sync.
unsafe impl<T: Sync, H: Header + Sync, A: RawAlloc + Sync> Sync for Vector<T, H, A> {}

impl<T: Clone, H: Header, A: RawAlloc + Clone> Clone for Vector<T, H, A> {
    /// Clones the Vector into a new allocation with the same capacity and a copy of the header.
    fn clone(&self) -> Self {
        let mut vec = Vector::new_in(self.alloc.clone());

        if let Some(header) = self.header() {
            vec.realloc_with_cap(header.cap());
            // SAFETY: vec has just been allocated with the same capacity. Its length is reset
            // after copying the header and only covers clones that have been written.
            unsafe {
                *Self::header_of(vec.data()).as_mut() = *header;
                vec.set_len(0);
                for value in self.iter() {
                    vec.push_unchecked(value.clone());
                }
            }
        }

        vec
    }
}

impl<T, H, A, H2, A2> PartialEq<Vector<T, H2, A2>> for Vector<T, H, A>
where
    T: PartialEq,
    H: Header,
    A: RawAlloc,
    H2: Header,
    A2: RawAlloc,
{
    fn eq(&self, other: &Vector<T, H2, A2>) -> bool {
        **self == **other
    }
}

impl<T: PartialEq, H: Header, A: RawAlloc> PartialEq<[T]> for Vector<T, H, A> {
    fn eq(&self, other: &[T]) -> bool {
        **self == *other
    }
}

impl<T: PartialEq, H: Header, A: RawAlloc, const N: usize> PartialEq<[T; N]> for Vector<T, H, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        **self == *other
    }
}

impl<T: Eq, H: Header, A: RawAlloc> Eq for Vector<T, H, A> {}

impl<T: Hash, H: Header, A: RawAlloc> Hash for Vector<T, H, A> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        (**self).hash(state);
    }
}

impl<T: Debug, H: Header, A: RawAlloc> Debug for Vector<T, H, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("contents", &&**self)
            .field("len", &self.len())
            .field("cap", &self.cap())
            .finish()
    }
}

impl<T: Debug, H: Header, A: RawAlloc> Display for Vector<T, H, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
