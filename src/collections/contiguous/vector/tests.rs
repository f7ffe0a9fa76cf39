#![cfg(test)]

use std::hash::{BuildHasher, RandomState};
use std::iter;
use std::mem::offset_of;
use std::panic;

use proptest::prelude::*;

use super::*;
use crate::collections::contiguous::{
    ArrHeader, Header, IndexOutOfBounds, ReserveError, Scoped, SortError, in_bounds, resolve_index,
    scoped, scoped_init, set_bounds_hook, try_resolve_index,
};
use crate::util::alloc::{CountedDrop, CountingAlloc, FailingAlloc, ZeroSizedType};
use crate::util::panic::assert_panics;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Record {
    int: i32,
    float: f32,
    string: &'static str,
}

const fn record(int: i32, float: f32, string: &'static str) -> Record {
    Record { int, float, string }
}

const VALS: [Record; 4] = [
    record(0xFF, -0.2, "I, Andrew"),
    record(0x00, 482.0, "am the creator"),
    record(-12, 74.0, "of this library"),
    record(0xFF, -0.2, "I, Andrew"),
];

const NEW_VAL: Record = record(-64, 12.345, "New value");

fn init_vals() -> Vector<Record> {
    Vector::from(VALS)
}

#[derive(Debug, Clone, Copy)]
#[repr(C)]
struct Tagged {
    cap: usize,
    len: usize,
    tag: u32,
}

// SAFETY: All fields are integers, which are valid when zeroed.
unsafe impl Header for Tagged {
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

#[test]
fn test_push_and_add() {
    let mut vec = Vector::new();
    let val = record(2, -3.4, "Test String");
    assert_eq!(vec.len(), 0, "An empty Vector should have no elements.");

    let i = vec.push(val);
    assert_eq!(vec[i], val, "Reading the returned index should produce the pushed value.");
    assert_eq!(vec.len(), 1);

    let i = vec.add(3);
    assert_eq!(i, 1, "Add should return the index of the first new element.");
    assert_eq!(vec.len(), 4);
    assert_eq!(vec[3], Record::default(), "Added elements should be defaulted.");

    let i = vec.append_array(VALS);
    assert_eq!(i, 4);
    assert_eq!(vec.len(), 8);
    assert_eq!(&vec[4..], &VALS, "Appended elements should be in order.");

    let mut other = Vector::new();
    assert_eq!(other.append_slice(&VALS[..2]), 0);
    assert_eq!(vec.concat(&other), 8, "Concat should return the previous length.");
    assert_eq!(&vec[8..], &VALS[..2]);

    vec.release();
    assert!(!vec.is_allocated());
    assert_eq!(vec.len(), 0, "A released Vector should have no elements.");
}

#[test]
fn test_metadata() {
    let mut vec = Vector::<Record>::new();
    assert_eq!(vec.len(), 0);
    assert_eq!(vec.cap(), 0);
    assert_eq!(vec.size(), 0);
    assert_eq!(vec.total_size(), 0);
    assert_eq!(vec.cap_size(), 0);
    assert_eq!(vec.total_cap_size(), 0);
    assert!(vec.header().is_none(), "An empty Vector shouldn't have a header.");

    vec.append_array(VALS);
    assert_eq!(Vector::<Record>::HEADER_SIZE, size_of::<ArrHeader>());

    // SAFETY: The Vector has just been allocated.
    unsafe {
        assert_eq!(vec.len(), 4);
        assert_eq!(vec.len_unchecked(), 4);
        assert_eq!(vec.cap(), 4);
        assert_eq!(vec.cap_unchecked(), 4);

        assert_eq!(vec.size_unchecked(), size_of_val(&VALS));
        assert_eq!(vec.total_size_unchecked(), size_of_val(&VALS) + size_of::<ArrHeader>());
        assert_eq!(vec.cap_size_unchecked(), 4 * size_of::<Record>());
        assert_eq!(
            vec.total_cap_size_unchecked(),
            4 * size_of::<Record>() + size_of::<ArrHeader>()
        );
    }

    vec.push(NEW_VAL);
    assert_eq!(vec.len(), 5);
    assert_eq!(vec.cap(), 8, "Growing should double the capacity.");
}

#[test]
fn test_growth() {
    let mut vec = Vector::<usize>::new();
    for i in 0..100 {
        vec.push(i);
        assert!(vec.len() <= vec.cap(), "The length should never exceed the capacity.");
    }

    let (len, cap) = (vec.len(), vec.cap());
    vec.add(cap * 3);
    assert_eq!(vec.len(), len + cap * 3);
    assert!(vec.cap() >= vec.len());
    assert!(
        vec.iter().take(100).copied().eq(0..100),
        "Growing should preserve existing elements."
    );

    vec.truncate(10);
    vec.shrink_to_fit();
    assert_eq!(vec.cap(), 10);
    assert_eq!(&*vec, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);

    vec.reserve(20);
    assert!(vec.cap() >= 30);

    let mut vec = Vector::<u8>::with_cap(5);
    assert!(vec.is_allocated(), "with_cap should allocate up front.");
    assert_eq!(vec.cap(), 5);
    vec.push(1);
    assert_eq!(vec.cap(), 5, "A push with spare capacity shouldn't reallocate.");

    assert_panics!({
        let mut vec = Vector::<u64>::new();
        vec.reserve(isize::MAX as usize);
    });
}

#[test]
fn test_insert_remove() {
    let mut vec = init_vals();

    let val1 = vec[1];
    vec.remove(0, 1);
    assert_eq!(vec[0], val1, "Removing should move following elements down.");

    let i = vec.insert(1, NEW_VAL);
    assert_eq!(i, 1);
    assert_eq!(vec[i], NEW_VAL);

    let last = vec.len();
    let i = vec.insert(last, NEW_VAL);
    assert_eq!(i, vec.len() - 1, "Inserting at the length should append.");

    let before = init_vals();
    let mut vec = init_vals();
    vec.insert(2, NEW_VAL);
    vec.remove(2, 1);
    assert_eq!(vec, before, "Insert and remove at the same index should cancel out.");

    vec.remove(1, 0);
    assert_eq!(vec, before, "Removing nothing should change nothing.");

    vec.remove(1, 2);
    assert_eq!(&*vec, &[VALS[0], VALS[3]]);

    assert_panics!({ init_vals().insert(5, NEW_VAL) });
    assert_panics!({ init_vals().remove(3, 2) });
    assert_panics!({ init_vals().remove(usize::MAX, 2) });

    let counter = CountedDrop::new(0);
    let mut vec: Vector<_> = iter::repeat_with(|| counter.clone()).take(10).collect();
    vec.remove(2, 5);
    assert_eq!(counter.take(), 5, "5 removed elements should have been dropped.");
    assert_eq!(vec.len(), 5);
}

#[test]
fn test_remove_swap_and_pop() {
    let mut vec = init_vals();
    vec.push(NEW_VAL);

    let before_len = vec.len();
    let last = *vec.at(-1);
    let removed = vec.remove_swap(2);
    assert_eq!(removed, VALS[2]);
    assert_eq!(vec.len(), before_len - 1);
    assert_eq!(vec[2], last, "The last element should fill the gap.");
    assert_eq!(&vec[..2], &VALS[..2], "Elements before the gap shouldn't move.");

    let mut vec = init_vals();
    assert_eq!(vec.pop(), Some(VALS[3]));
    assert_eq!(vec.len(), 3);
    assert_eq!(vec.shift(), Some(VALS[0]));
    assert_eq!(vec.take(1), VALS[2]);
    assert_eq!(&*vec, &[VALS[1]]);
    assert_eq!(vec.remove_swap(0), VALS[1]);
    assert_eq!(vec.pop(), None);
    assert_eq!(vec.shift(), None);
    assert!(vec.is_allocated(), "Removing elements should keep the allocation.");

    assert_panics!({ Vector::<u8>::new().remove_swap(0) });
}

#[test]
fn test_clear_and_reset_len() {
    let mut vec = init_vals();
    assert_eq!(vec.len(), 4);

    vec.reset_len(129);
    assert_eq!(vec.len(), 129);
    assert!(vec.iter().all(|r| *r == Record::default()));

    vec.clear();
    assert!(vec.is_allocated(), "Clearing should keep the allocation.");
    assert_eq!(vec.len(), 0);

    let mut bytes = Vector::from([1_u8, 2, 3]);
    // SAFETY: Every added element is written before being read.
    unsafe {
        bytes.reset_len_uninit(2);
        bytes.as_mut_ptr().write_bytes(7, 2);
    }
    assert_eq!(&*bytes, &[7, 7]);
}

#[test]
fn test_indexing() {
    let vec = init_vals();
    assert_eq!(vec.at(3), vec.at(-1));
    assert_eq!(vec.at(-3), vec.at(1));
    assert_eq!(vec.try_at(-4), Ok(&VALS[0]));
    assert_eq!(vec.try_at(-5), Err(IndexOutOfBounds { index: -5, len: 4 }));
    assert_eq!(vec.try_at(4), Err(IndexOutOfBounds { index: 4, len: 4 }));

    assert!(!in_bounds(vec.len(), 4));
    assert!(!in_bounds(vec.len(), 68));
    assert!(!in_bounds(vec.len(), -1));
    for i in 0..4 {
        assert!(in_bounds(vec.len(), i));
    }

    assert_eq!(resolve_index(4, -1), 3);
    assert_eq!(try_resolve_index(0, -1), Err(IndexOutOfBounds { index: -1, len: 0 }));
    assert_eq!(try_resolve_index(usize::MAX, -1), Ok(isize::MAX as usize - 1));

    assert_panics!({ vec.at(4) });
    assert_panics!({ vec.at(-5) });
    assert_panics!({
        Vector::<u8>::new().at(0);
    });

    let other = init_vals();
    assert_eq!(vec.index_of(&vec[2]), Some(2));
    assert_eq!(vec.index_of(vec.at(-1)), Some(3));
    assert_eq!(vec.index_of(&other[2]), None, "Elements of another Vector have no index.");
    assert_eq!(Vector::<Record>::new().index_of(&VALS[0]), None);
    assert_eq!(Vector::from([ZeroSizedType; 3]).index_of(&ZeroSizedType), None);

    let mut vec = init_vals();
    vec.at_mut(-2).int = 7;
    assert_eq!(vec[2].int, 7);
}

fn hooked(err: &IndexOutOfBounds) -> ! {
    panic!("hooked: {}", err.index)
}

#[test]
fn test_bounds_hook() {
    let previous = set_bounds_hook(Some(hooked));

    let result = panic::catch_unwind(|| {
        init_vals().at(-9);
    });
    set_bounds_hook(previous);

    let payload = result.expect_err("An out of bounds index should invoke the hook.");
    assert_eq!(
        payload.downcast_ref::<String>().map(String::as_str),
        Some("hooked: -9"),
        "The hook should receive the original index."
    );
}

#[test]
fn test_sort() {
    let mut vec = init_vals();

    vec.sort_by_member(|r| &r.int, SortDir::Asc).unwrap();
    assert_eq!(
        &*vec,
        &[VALS[2], VALS[1], VALS[0], VALS[3]],
        "Sort by int ascending should keep equal elements in order."
    );

    vec.sort_by_member(|r| &r.int, SortDir::Desc).unwrap();
    assert_eq!(&*vec, &[VALS[0], VALS[3], VALS[1], VALS[2]]);

    vec.sort_by_member(|r| &r.float, SortDir::Asc).unwrap();
    assert_eq!(&*vec, &[VALS[0], VALS[3], VALS[2], VALS[1]]);

    // SAFETY: The member describes the int field, reinterpreted as unsigned.
    unsafe {
        vec.sort_by_member_raw(offset_of!(Record, int), 4, ScalarKind::Unsigned, SortDir::Asc)
            .unwrap();
    }
    assert_eq!(
        &*vec,
        &[VALS[1], VALS[0], VALS[3], VALS[2]],
        "-12 should sort last when compared as unsigned."
    );

    let mut keyed: Vector<(u8, usize)> =
        [3_u8, 1, 4, 1, 5, 9, 2, 6].iter().copied().zip(0..).collect();
    keyed.sort_by_member(|k| &k.0, SortDir::Asc).unwrap();
    let ascending = keyed.clone();
    keyed.sort_by_member(|k| &k.0, SortDir::Desc).unwrap();
    assert_eq!(keyed.map(|_, k| k.0), [9, 6, 5, 4, 3, 2, 1, 1]);
    assert_eq!(ascending.map(|_, k| k.1), [1, 3, 6, 0, 2, 4, 7, 5]);
    assert_eq!(keyed.map(|_, k| k.1), [5, 7, 4, 2, 0, 6, 1, 3]);

    let mut distinct: Vector<(u64, u16)> = [7_u64, u64::MAX, 0, 1 << 63, 42, (1 << 63) - 1]
        .iter()
        .copied()
        .zip(0..)
        .collect();
    distinct.sort_by_member(|d| &d.0, SortDir::Asc).unwrap();
    assert_eq!(distinct.map(|_, d| d.0), [0, 7, 42, (1 << 63) - 1, 1 << 63, u64::MAX]);
    let ascending = distinct.clone();
    distinct.sort_by_member(|d| &d.0, SortDir::Desc).unwrap();
    assert!(
        distinct.iter().eq(ascending.iter().rev()),
        "With distinct keys, descending should be the exact reverse of ascending."
    );

    let mut floats = Vector::from([2.5_f64, f64::NAN, -1.0]);
    floats.sort_by_member(|f| f, SortDir::Asc).unwrap();
    assert_eq!(floats.len(), 3, "Sorting with NaN should still terminate.");

    let mut empty = Vector::<Record>::new();
    assert_eq!(empty.sort_by_member(|r| &r.int, SortDir::Asc), Ok(()));
}

static OUTSIDE: i32 = 0;

#[test]
fn test_sort_errors() {
    let mut vec = init_vals();

    // SAFETY: Every call below is rejected before any element is read.
    unsafe {
        assert_eq!(
            vec.sort_by_member_raw(0, 2, ScalarKind::Float, SortDir::Asc),
            Err(SortError::UnsupportedWidth { kind: "floating point", width: 2 })
        );
        assert!(vec.sort_by_member_raw(0, 3, ScalarKind::Signed, SortDir::Asc).is_err());
        assert_eq!(
            vec.sort_by_member_raw(size_of::<Record>() - 2, 4, ScalarKind::Signed, SortDir::Asc),
            Err(SortError::MemberOutOfBounds {
                offset: size_of::<Record>() - 2,
                width: 4,
                size: size_of::<Record>(),
            })
        );
    }

    assert!(
        vec.sort_by_member(|_| &OUTSIDE, SortDir::Asc).unwrap_err().is_member_out_of_bounds(),
        "A member outside of the element should be rejected."
    );
    assert_eq!(
        vec.sort_by_member(|r| if r.int == 0 { &OUTSIDE } else { &r.int }, SortDir::Asc),
        Err(SortError::InconsistentMember { index: 1 })
    );
    assert_eq!(vec, init_vals(), "A rejected sort shouldn't touch the Vector.");
}

#[test]
fn test_rotate() {
    let mut vec = init_vals();
    vec.rotate_right(1);
    assert_eq!(&*vec, &[VALS[3], VALS[0], VALS[1], VALS[2]]);

    let mut vec = init_vals();
    vec.rotate_right(2);
    assert_eq!(&*vec, &[VALS[2], VALS[3], VALS[0], VALS[1]]);

    let mut vec = init_vals();
    vec.rotate_right(0);
    assert_eq!(vec, init_vals());
    vec.rotate_right(4);
    assert_eq!(vec, init_vals(), "Rotating by the length should change nothing.");

    // 40 u64s are more than the scratch buffer can hold at once.
    let mut vec: Vector<u64> = (0..100).collect();
    let mut expected: Vector<u64> = (0..100).collect();
    vec.rotate_right(40);
    expected.as_mut().rotate_right(40);
    assert_eq!(vec, expected);

    let mut vec: Vector<[u8; 3]> = (0..200_u8).map(|i| [i, i, i]).collect();
    let mut expected = vec.clone();
    vec.rotate_right(150);
    expected.as_mut().rotate_right(150);
    assert_eq!(vec, expected, "Chunks should be allowed to split elements.");

    let mut vec: Vector<[u64; 100]> = (0..7_u64).map(|i| [i; 100]).collect();
    let mut expected = vec.clone();
    vec.rotate_right(3);
    expected.as_mut().rotate_right(3);
    assert_eq!(vec, expected, "Elements larger than the buffer should move in several chunks.");

    let counter = CountedDrop::new(0);
    let mut vec: Vector<_> = iter::repeat_with(|| counter.clone()).take(100).collect();
    vec.rotate_right(99);
    drop(vec);
    assert_eq!(counter.take(), 100, "Rotation should neither drop nor duplicate elements.");

    assert_panics!({ init_vals().rotate_right(5) });
}

#[test]
fn test_reverse() {
    let mut vec = init_vals();
    vec.reverse();
    assert_eq!(&*vec, &[VALS[3], VALS[2], VALS[1], VALS[0]]);

    let mut vec = init_vals();
    vec.truncate(3);
    vec.reverse();
    assert_eq!(&*vec, &[VALS[2], VALS[1], VALS[0]]);

    let mut vec = Vector::<u8>::new();
    vec.reverse();
    assert!(!vec.is_allocated());
}

#[test]
fn test_duplicate_and_sub() {
    let base = init_vals();

    let mut dup = base.duplicate();
    assert!(dup.is_allocated());
    assert_eq!(dup, base);
    assert_eq!(dup.cap(), base.cap(), "A duplicate should have the same capacity.");
    assert_ne!(dup.as_ptr(), base.as_ptr(), "A duplicate should have its own allocation.");

    dup[0] = NEW_VAL;
    dup.push(NEW_VAL);
    assert_eq!(base, init_vals(), "Mutating a duplicate shouldn't affect the source.");

    assert!(!Vector::<u8>::new().duplicate().is_allocated());

    let sub = base.sub(1, 2);
    assert_eq!(&*sub, &VALS[1..3]);
    assert_eq!(sub.cap(), 2, "A sub-range should be allocated for exactly its elements.");
    assert_eq!(base.sub(4, 0).len(), 0);

    assert_panics!({ base.sub(3, 2) });
    assert_panics!({ base.sub(usize::MAX, 2) });

    let cloned = base.clone();
    assert_eq!(cloned, base);
    assert_eq!(cloned.cap(), base.cap());
}

#[test]
fn test_custom_header() {
    let mut vec: Vector<u16, Tagged> = Vector::default();
    assert_eq!(Vector::<u16, Tagged>::HEADER_SIZE, size_of::<Tagged>());

    vec.push(1);
    assert_eq!(vec.header().map(|h| h.tag), Some(0), "Extension fields should start zeroed.");

    // SAFETY: Only the extension field is modified.
    unsafe { vec.header_mut().unwrap().tag = 0xBEEF };
    vec.extend(2..50);
    assert_eq!(vec.header().map(|h| h.tag), Some(0xBEEF), "Growing should keep the header.");
    assert_eq!(vec.header().map(|h| (h.len, h.cap)), Some((vec.len(), vec.cap())));

    assert_eq!(vec.duplicate().header().map(|h| h.tag), Some(0xBEEF));
    assert_eq!(vec.clone().header().map(|h| h.tag), Some(0xBEEF));
    assert_eq!(vec.sub(0, 3).header().map(|h| h.tag), Some(0));

    // Over-aligned elements push the first element past the padding after the header.
    #[derive(Debug, Clone, Copy, PartialEq)]
    #[repr(align(32))]
    struct Wide(u8);

    let mut wide: Vector<Wide, Tagged> = Vector::default();
    assert_eq!(Vector::<Wide, Tagged>::HEADER_SIZE, 32);
    wide.push(Wide(3));
    wide.push(Wide(4));
    assert_eq!(wide.as_ptr().addr() % 32, 0);
    assert_eq!(&*wide, &[Wide(3), Wide(4)]);
}

#[test]
fn test_zst_support() {
    let mut vec = Vector::<ZeroSizedType>::new();
    vec.add(5);
    assert_eq!(vec[0], ZeroSizedType, "Indexing with no offset should work.");
    assert_eq!(vec[4], ZeroSizedType, "Indexing with an in-bounds offset should work.");
    assert_eq!(vec.iter().len(), 5, "Should iterate over the right number of ZST instances.");

    vec.rotate_right(3);
    vec.reverse();
    assert_eq!(vec.len(), 5);
    assert_eq!(vec.size(), 0);
    assert_eq!(vec.total_size(), Vector::<ZeroSizedType>::HEADER_SIZE);
    assert_eq!(vec.pop(), Some(ZeroSizedType));
    assert_eq!(vec.duplicate().len(), 4);
}

#[test]
fn test_drop() {
    let counter = CountedDrop::new(0);
    let mut vec: Vector<_> = iter::repeat_with(|| counter.clone()).take(10).collect();

    vec.truncate(8);
    assert_eq!(counter.take(), 2, "Truncating should drop the cut elements.");

    drop(vec.take(0));
    drop(vec.remove_swap(0));
    assert_eq!(counter.take(), 2);

    vec.release();
    vec.release();
    assert_eq!(counter.take(), 6, "Release should drop every element once.");
    assert_eq!((vec.len(), vec.cap()), (0, 0));

    let vec: Vector<_> = iter::repeat_with(|| counter.clone()).take(10).collect();
    drop(vec);
    assert_eq!(counter.take(), 10, "10 elements should have been dropped.");
}

#[test]
fn test_allocator() {
    let alloc = CountingAlloc::default();
    let mut vec = Vector::<u32, ArrHeader, _>::new_in(alloc.clone());
    assert_eq!(alloc.live.get(), 0, "An empty Vector shouldn't allocate.");

    vec.extend(0..1000);
    assert_eq!(alloc.live.get(), 1, "Growth should reuse a single block.");

    let dup = vec.duplicate();
    let sub = vec.sub(10, 5);
    assert_eq!(alloc.live.get(), 3, "Duplicates should allocate through a clone of the strategy.");

    drop(dup);
    drop(sub);
    vec.release();
    vec.release();
    assert_eq!(alloc.live.get(), 0, "Every block should have been freed.");
    assert_eq!(alloc.freed.borrow().len(), 3, "Release should only free once.");
    assert_eq!(alloc.oom.get(), 0);
}

#[test]
fn test_out_of_memory() {
    let alloc = FailingAlloc::default();
    let mut vec = Vector::<u8, ArrHeader, _>::new_in(alloc.clone());

    let err = vec.try_push(1).unwrap_err();
    assert!(err.is_alloc_error());
    assert_eq!(alloc.oom.get(), 1, "The out of memory hook should fire once per failure.");
    assert!(!vec.is_allocated(), "A failed push should leave the Vector empty.");

    assert!(matches!(vec.try_reserve(usize::MAX), Err(ReserveError::CapacityOverflow(_))));
    assert_eq!(alloc.oom.get(), 1, "An overflow never reaches the allocator.");
}

#[test]
fn test_traversal() {
    let vec = init_vals();

    assert!(vec.indices().eq(0..4));
    assert!(vec.indices_rev().eq([3, 2, 1, 0]));
    assert!(vec.each().map(|(i, r)| (i, r.int)).eq([(0, 0xFF), (1, 0), (2, -12), (3, 0xFF)]));
    assert_eq!(vec.each_rev().next().map(|(i, _)| i), Some(3));

    let ints = vec.map(|info, r| {
        assert_eq!(info.count, 4);
        r.int
    });
    assert_eq!(ints, [0xFF, 0, -12, 0xFF]);

    let mut strings = Vector::from(["stale"; 9]);
    vec.map_into(&mut strings, |_, r| r.string);
    assert_eq!(strings.len(), 4, "The destination should be resized to the source.");
    assert_eq!(strings[2], "of this library");

    let last_flags = vec.map(|info, _| (info.is_first(), info.is_last()));
    assert_eq!(last_flags[0], (true, false));
    assert_eq!(last_flags[3], (false, true));

    assert_eq!(vec.reduce(0, |acc, _, r| acc + r.int), 0xFF * 2 - 12);

    let mut out = Vector::from([NEW_VAL]);
    vec.filter_into(&mut out, |_, r| r.int == 0xFF);
    assert_eq!(&*out, &[VALS[0], VALS[3]], "The filter destination should be cleared first.");
    vec.reject_into(&mut out, |_, r| r.int == 0xFF);
    assert_eq!(&*out, &[VALS[1], VALS[2]]);
    vec.filter_into(&mut out, |info, _| info.index % 2 == 1);
    assert_eq!(&*out, &[VALS[1], VALS[3]]);

    assert_eq!(vec.count_where(|r| r.float < 0.0), 2);
    assert_eq!(vec.find(|r| r.int < 0), Some(&VALS[2]));
    assert_eq!(vec.find_index(|r| r.int == 0), Some(1));
    assert_eq!(vec.find(|r| r.int == 1), None);

    let mut vec = vec;
    if let Some(r) = vec.find_mut(|r| r.int == 0xFF) {
        r.int = 1;
    }
    assert_eq!(vec[0].int, 1);
    assert_eq!(vec[3].int, 0xFF, "Only the first match should be returned.");
}

#[test]
fn test_scoped() {
    let alloc = CountingAlloc::default();

    scoped_init(Vector::<u8, ArrHeader, _>::with_cap_in(4, alloc.clone()), |outer| {
        scoped_init(Vector::<u8, ArrHeader, _>::with_cap_in(8, alloc.clone()), |inner| {
            inner.push(1);
            outer.push(2);
        });
        assert_eq!(alloc.live.get(), 1, "The inner scope should have been released.");
    });
    assert_eq!(alloc.live.get(), 0);
    assert_eq!(
        &*alloc.freed.borrow(),
        &[16 + 8, 16 + 4],
        "Nested scopes should release in reverse order."
    );

    let found = scoped(|vec: &mut Vector<Record>| {
        vec.append_array(VALS);
        for (i, r) in vec.each() {
            if r.int < 0 {
                return Some(i);
            }
        }
        None
    });
    assert_eq!(found, Some(2));

    let alloc = CountingAlloc::default();
    let guard = Scoped::new(Vector::<u8, ArrHeader, _>::with_cap_in(4, alloc.clone()));
    assert!(guard.is_allocated());
    guard.exit();
    assert_eq!(alloc.live.get(), 0, "Exiting should release immediately.");

    let mut guard = Scoped::new(Vector::<u8, ArrHeader, _>::new_in(alloc.clone()));
    guard.push(9);
    let vec = guard.into_inner();
    assert_eq!(alloc.live.get(), 1, "Unbinding shouldn't release.");
    drop(vec);

    let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        scoped_init(Vector::<u8, ArrHeader, _>::with_cap_in(4, alloc.clone()), |vec| {
            if vec.is_allocated() {
                panic!("unwinding out of a scope")
            }
        })
    }));
    assert!(result.is_err());
    assert_eq!(alloc.live.get(), 0, "Unwinding should release the scope.");
}

#[cfg(feature = "rc")]
#[test]
fn test_ref_counting() {
    use crate::collections::contiguous::RcHeader;

    let alloc = CountingAlloc::default();
    let mut vec = Vector::<u8, RcHeader, _>::new_in(alloc.clone());
    assert_eq!(vec.retain(), 0, "An empty Vector can't hold a count.");

    vec.push(1);
    assert_eq!(vec.refs(), 0);
    assert_eq!(vec.retain(), 1);
    assert_eq!(vec.retain(), 2);
    vec.extend([2, 3, 4, 5]);
    assert_eq!(vec.refs(), 2, "Growing should keep the count.");

    assert_eq!(vec.release_ref(), 1);
    assert!(vec.is_allocated());
    assert_eq!(vec.release_ref(), 0);
    assert!(!vec.is_allocated(), "The Vector should be released at zero.");
    assert_eq!(alloc.live.get(), 0);
    assert_eq!(vec.release_ref(), 0);
}

#[test]
fn test_equality_and_hash() {
    let vec: Vector<usize> = (0..5).collect();

    assert_eq!(
        vec,
        Vector::from([0, 1, 2, 3, 4]),
        "Different construction methods should produce equal results."
    );
    assert_ne!(Vector::from([0, 1, 2, 5, 4]), vec);
    assert_eq!(vec, Vector::from(&[0_usize, 1, 2, 3, 4][..]));

    let state = RandomState::new();
    assert_eq!(
        state.hash_one(&vec),
        state.hash_one([0_usize, 1, 2, 3, 4]),
        "Borrow hash equality should be upheld."
    );

    assert_eq!(format!("{}", vec), "[0, 1, 2, 3, 4]");
    assert_eq!(
        format!("{:?}", Vector::from([1_u8])),
        "Vector { contents: [1], len: 1, cap: 1 }"
    );
}

#[test]
fn test_iterators() {
    let mut vec: Vector<usize> = (0..5).collect();
    for i in &mut vec {
        *i *= 2;
    }
    assert_eq!(*vec, [0_usize, 2, 4, 6, 8], "Vector mutated by iterator should equal this slice.");

    let mut iter = vec.into_iter();
    assert_eq!(iter.len(), 5);
    assert_eq!(iter.next(), Some(0));
    assert_eq!(iter.next_back(), Some(8));
    assert_eq!(iter.next_back(), Some(6));
    assert_eq!(iter.next(), Some(2));
    assert_eq!(iter.next_back(), Some(4));
    assert_eq!(iter.next(), None);

    let counter = CountedDrop::new(0);
    let vec: Vector<_> = iter::repeat_with(|| counter.clone()).take(10).collect();
    let mut iter = vec.into_iter();
    drop(iter.next());
    drop(iter);
    assert_eq!(counter.take(), 10, "Dropping an owned iterator should drop all elements.");
}

proptest! {
    #[test]
    fn prop_len_never_exceeds_cap(ops in prop::collection::vec((0_u8..4, 0_usize..20), 0..64)) {
        let mut vec = Vector::<u32>::new();
        for (op, n) in ops {
            match op {
                0 => { vec.push(n as u32); }
                1 => { vec.add(n); }
                2 => { vec.truncate(n); }
                _ => {
                    let len = vec.len();
                    vec.insert(n.min(len), 0);
                }
            }
            prop_assert!(vec.len() <= vec.cap());
        }
    }

    #[test]
    fn prop_rotation_round_trips(
        values in prop::collection::vec(any::<u16>(), 1..128),
        n in any::<usize>(),
    ) {
        let original: Vector<u16> = values.iter().copied().collect();
        let len = original.len();
        let n = n % (len + 1);

        let mut vec = original.clone();
        vec.rotate_right(n);
        prop_assert_eq!(vec.at(-1), &original[(2 * len - n - 1) % len]);
        vec.rotate_right((len - n) % len);
        prop_assert_eq!(vec, original);
    }

    #[test]
    fn prop_reverse_is_involutive(values in prop::collection::vec(any::<i64>(), 0..64)) {
        let original: Vector<i64> = values.iter().copied().collect();
        let mut vec = original.clone();
        vec.reverse();
        prop_assert!(vec.iter().eq(original.iter().rev()));
        vec.reverse();
        prop_assert_eq!(vec, original);
    }

    #[test]
    fn prop_sort_matches_stable_sort(
        values in prop::collection::vec((any::<i16>(), any::<u8>()), 0..64),
    ) {
        let mut vec: Vector<(i16, u8)> = values.iter().copied().collect();
        let mut expected = values.clone();
        expected.sort_by_key(|v| v.0);

        vec.sort_by_member(|v| &v.0, SortDir::Asc).unwrap();
        prop_assert_eq!(&*vec, &expected[..]);
    }
}
