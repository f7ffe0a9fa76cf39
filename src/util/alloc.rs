#![cfg(test)]

use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::rc::Rc;

use crate::collections::contiguous::{Global, RawAlloc, Vector};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ZeroSizedType;

#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<RefCell<usize>>);

impl CountedDrop {
    pub fn new(value: usize) -> CountedDrop {
        CountedDrop(Rc::new(RefCell::new(value)))
    }
}

impl Deref for CountedDrop {
    type Target = Rc<RefCell<usize>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for CountedDrop {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.replace_with(|v| *v + 1);
    }
}

/// Forwards to [`Global`] while tracking live allocations, the byte size of every freed block (in
/// order) and how often the out of memory hook fired.
#[derive(Debug, Clone, Default)]
pub struct CountingAlloc {
    pub live: Rc<Cell<usize>>,
    pub freed: Rc<RefCell<Vector<usize>>>,
    pub oom: Rc<Cell<usize>>,
}

// SAFETY: All requests are forwarded to Global unchanged.
unsafe impl RawAlloc for CountingAlloc {
    unsafe fn realloc(
        &self,
        ptr: Option<NonNull<u8>>,
        old: Layout,
        new: Layout,
    ) -> Option<NonNull<u8>> {
        if ptr.is_none() {
            self.live.set(self.live.get() + 1);
        }
        // SAFETY: The caller upholds Global's requirements.
        unsafe { Global.realloc(ptr, old, new) }
    }

    unsafe fn free(&self, ptr: NonNull<u8>, layout: Layout) {
        self.live.set(self.live.get() - 1);
        self.freed.borrow_mut().push(layout.size());
        // SAFETY: The caller upholds Global's requirements.
        unsafe { Global.free(ptr, layout) }
    }

    fn out_of_memory(&self, _layout: Layout) {
        self.oom.set(self.oom.get() + 1);
    }
}

/// An allocator which never has any memory to give.
#[derive(Debug, Clone, Default)]
pub struct FailingAlloc {
    pub oom: Rc<Cell<usize>>,
}

// SAFETY: Never hands out memory, so there is nothing to uphold.
unsafe impl RawAlloc for FailingAlloc {
    unsafe fn realloc(
        &self,
        _ptr: Option<NonNull<u8>>,
        _old: Layout,
        _new: Layout,
    ) -> Option<NonNull<u8>> {
        None
    }

    unsafe fn free(&self, _ptr: NonNull<u8>, _layout: Layout) {
        unreachable!("nothing was ever allocated")
    }

    fn out_of_memory(&self, _layout: Layout) {
        self.oom.set(self.oom.get() + 1);
    }
}
