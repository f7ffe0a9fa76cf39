//! Higher-order traversals over a [`Vector`].
//!
//! Each traversal covers the elements in bounds at the time of the call. The closures only ever
//! receive shared (or, for [`Vector::find_mut`], exclusive) references to single elements, so a
//! Vector can't be resized while it is being traversed.

use std::iter::{Enumerate, Rev};
use std::ops::Range;
use std::slice::Iter;

use super::Vector;
use crate::collections::contiguous::alloc::RawAlloc;
use crate::collections::contiguous::header::Header;

/// The position of the current element within a traversal, handed to the closures of
/// [`map`](Vector::map), [`reduce`](Vector::reduce) and the filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopInfo {
    /// The index of the current element.
    pub index: usize,
    /// The number of elements being traversed.
    pub count: usize,
}

impl LoopInfo {
    /// Returns true if the current element is the first one.
    pub const fn is_first(&self) -> bool {
        self.index == 0
    }

    /// Returns true if the current element is the last one.
    pub const fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }
}

impl<T, H: Header, A: RawAlloc> Vector<T, H, A> {
    /// Returns the indices of all elements, in ascending order. The range is taken from the length
    /// at the time of the call, so calling this again after mutating the Vector picks up the new
    /// length.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let mut vec = Vector::from([5, 6, 7]);
    /// for i in vec.indices() {
    ///     vec[i] *= 2;
    /// }
    /// assert_eq!(&*vec, &[10, 12, 14]);
    /// ```
    pub fn indices(&self) -> Range<usize> {
        0..self.len()
    }

    /// Returns the indices of all elements, in descending order.
    pub fn indices_rev(&self) -> Rev<Range<usize>> {
        self.indices().rev()
    }

    /// Returns an iterator over every element paired with its index.
    pub fn each(&self) -> Enumerate<Iter<'_, T>> {
        self.iter().enumerate()
    }

    /// Returns an iterator over every element paired with its index, starting from the last.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let vec = Vector::from(['a', 'b', 'c']);
    /// let visited: Vector<_> = vec.each_rev().map(|(i, c)| (i, *c)).collect();
    /// assert_eq!(visited, [(2, 'c'), (1, 'b'), (0, 'a')]);
    /// ```
    pub fn each_rev(&self) -> Rev<Enumerate<Iter<'_, T>>> {
        self.each().rev()
    }

    /// Replaces the contents of `dst` with the result of applying `f` to every element, in order.
    /// `dst` is cleared and reserved up front, so it ends up with exactly as many elements as
    /// `self`.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let vec = Vector::from([1, 2, 3]);
    /// let mut labels = Vector::from([String::from("stale")]);
    /// vec.map_into(&mut labels, |info, n| format!("{}:{}", info.index, n));
    /// assert_eq!(labels, ["0:1", "1:2", "2:3"].map(String::from));
    /// ```
    pub fn map_into<U, H2, A2, F>(&self, dst: &mut Vector<U, H2, A2>, mut f: F)
    where
        H2: Header,
        A2: RawAlloc,
        F: FnMut(LoopInfo, &T) -> U,
    {
        let count = self.len();
        dst.clear();
        dst.reserve(count);
        for (index, element) in self.each() {
            dst.push(f(LoopInfo { index, count }, element));
        }
    }

    /// Creates a new Vector from the result of applying `f` to every element, in order.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let vec = Vector::from([1.5_f32, -2.0]);
    /// assert_eq!(vec.map(|_, x| x.abs() as u8), [1, 2]);
    /// ```
    pub fn map<U, F>(&self, f: F) -> Vector<U, H, A>
    where
        A: Clone,
        F: FnMut(LoopInfo, &T) -> U,
    {
        let mut dst = Vector::new_in(self.alloc.clone());
        self.map_into(&mut dst, f);
        dst
    }

    /// Folds every element into an accumulator, starting from `init`.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let vec = Vector::from([3, 4, 5]);
    /// let weighted = vec.reduce(0, |acc, info, n| acc + info.index * n);
    /// assert_eq!(weighted, 0 * 3 + 1 * 4 + 2 * 5);
    /// ```
    pub fn reduce<R, F>(&self, init: R, mut f: F) -> R
    where
        F: FnMut(R, LoopInfo, &T) -> R,
    {
        let count = self.len();
        self.each()
            .fold(init, |acc, (index, element)| f(acc, LoopInfo { index, count }, element))
    }

    /// Replaces the contents of `dst` with clones of the elements for which `pred` returns true.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let vec = Vector::from([1, 2, 3, 4, 5, 6]);
    /// let mut evens = Vector::new();
    /// vec.filter_into(&mut evens, |_, n| n % 2 == 0);
    /// assert_eq!(evens, [2, 4, 6]);
    /// ```
    pub fn filter_into<H2, A2, F>(&self, dst: &mut Vector<T, H2, A2>, mut pred: F)
    where
        T: Clone,
        H2: Header,
        A2: RawAlloc,
        F: FnMut(LoopInfo, &T) -> bool,
    {
        let count = self.len();
        dst.clear();
        for (index, element) in self.each() {
            if pred(LoopInfo { index, count }, element) {
                dst.push(element.clone());
            }
        }
    }

    /// Replaces the contents of `dst` with clones of the elements for which `pred` returns false.
    pub fn reject_into<H2, A2, F>(&self, dst: &mut Vector<T, H2, A2>, mut pred: F)
    where
        T: Clone,
        H2: Header,
        A2: RawAlloc,
        F: FnMut(LoopInfo, &T) -> bool,
    {
        self.filter_into(dst, |info, element| !pred(info, element));
    }

    /// Counts the elements for which `pred` returns true.
    pub fn count_where<F>(&self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().filter(|element| pred(element)).count()
    }

    /// Returns the first element for which `pred` returns true.
    ///
    /// # Examples
    /// ```
    /// # use header_array::collections::contiguous::Vector;
    /// let vec = Vector::from([1, 8, 3, 9]);
    /// assert_eq!(vec.find(|n| *n > 5), Some(&8));
    /// assert_eq!(vec.find_index(|n| *n > 5), Some(1));
    /// assert_eq!(vec.find(|n| *n > 10), None);
    /// ```
    pub fn find<F>(&self, mut pred: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().find(|element| pred(element))
    }

    /// Returns the index of the first element for which `pred` returns true.
    pub fn find_index<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().position(pred)
    }

    /// Returns a mutable reference to the first element for which `pred` returns true.
    pub fn find_mut<F>(&mut self, mut pred: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter_mut().find(|element| pred(element))
    }
}
