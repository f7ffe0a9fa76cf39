use std::error::Error;

/// An [`Error`] which can be raised as a panic carrying its own message.
pub trait Panic: Error {
    fn panic(&self) -> ! {
        panic!("{}", self)
    }
}

#[allow(unused_macros)]
macro_rules! assert_panics {
    ($run:block) => {
        assert_panics!($run, "assertion failed to panic")
    };
    ($run:block, $msg:literal) => {
        assert!(
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $run)).is_err(),
            $msg
        );
        println!("^ panic caught");
    };
}

#[allow(unused_imports)]
pub(crate) use assert_panics;
