//! Bounds checking and index resolution, including negative indices which count back from the end
//! of a collection.
//!
//! A failed bounds check is a programmer error rather than something to recover from, so the
//! resolving functions never clamp or wrap. Instead, they hand the error to the bounds hook, which
//! panics with the error's message unless replaced via [`set_bounds_hook`].

use std::sync::RwLock;

use crate::util::error::IndexOutOfBounds;
use crate::util::panic::Panic;

/// A replacement for the default bounds failure behavior. It must not return.
pub type BoundsHook = fn(&IndexOutOfBounds) -> !;

static BOUNDS_HOOK: RwLock<Option<BoundsHook>> = RwLock::new(None);

/// Replaces the function invoked when an index fails to resolve, returning the previous one.
/// Passing [`None`] restores the default, which panics.
///
/// The hook is process-wide and applies to every collection in this crate.
///
/// # Examples
/// ```
/// # use header_array::collections::contiguous::{set_bounds_hook, IndexOutOfBounds};
/// fn loud(err: &IndexOutOfBounds) -> ! {
///     panic!("bad index: {}", err.index)
/// }
///
/// let previous = set_bounds_hook(Some(loud));
/// set_bounds_hook(previous);
/// ```
pub fn set_bounds_hook(hook: Option<BoundsHook>) -> Option<BoundsHook> {
    let mut guard = match BOUNDS_HOOK.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    std::mem::replace(&mut *guard, hook)
}

/// Reports `err` through the bounds hook.
///
/// # Panics
/// Panics with the message of `err` if no hook is installed.
pub(crate) fn bounds_failure(err: IndexOutOfBounds) -> ! {
    let hook = match BOUNDS_HOOK.read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    };

    match hook {
        Some(hook) => hook(&err),
        None => err.panic(),
    }
}

/// Returns true if `index` lies within `0..len`.
///
/// # Examples
/// ```
/// # use header_array::collections::contiguous::in_bounds;
/// assert!(in_bounds(3, 0));
/// assert!(!in_bounds(3, 3));
/// assert!(!in_bounds(3, -1));
/// ```
pub const fn in_bounds(len: usize, index: isize) -> bool {
    index >= 0 && (index as usize) < len
}

/// Resolves a possibly negative `index` against a collection of `len` elements. Negative values
/// count back from the end, so `-1` refers to the last element.
///
/// # Errors
/// Returns [`IndexOutOfBounds`] if the resolved index isn't within `0..len`.
///
/// # Examples
/// ```
/// # use header_array::collections::contiguous::try_resolve_index;
/// assert_eq!(try_resolve_index(4, -1), Ok(3));
/// assert_eq!(try_resolve_index(4, -3), Ok(1));
/// assert!(try_resolve_index(4, -5).is_err());
/// ```
pub const fn try_resolve_index(len: usize, index: isize) -> Result<usize, IndexOutOfBounds> {
    let resolved = if index >= 0 {
        index
    } else {
        // Lengths above isize::MAX can't exist for non-zero-sized elements. Those that do are
        // saturated, which still resolves every negative index correctly.
        let len = if len > isize::MAX as usize { isize::MAX } else { len as isize };
        len + index
    };

    if in_bounds(len, resolved) {
        Ok(resolved as usize)
    } else {
        Err(IndexOutOfBounds { index, len })
    }
}

/// Resolves a possibly negative `index` against a collection of `len` elements, as
/// [`try_resolve_index`] does.
///
/// # Panics
/// Invokes the bounds hook, which panics by default, if the index is out of bounds.
pub fn resolve_index(len: usize, index: isize) -> usize {
    match try_resolve_index(len, index) {
        Ok(resolved) => resolved,
        Err(err) => bounds_failure(err),
    }
}

/// Checks that `index` is a valid position within `0..len` (or `0..=len` for `inclusive`) for
/// operations which take unsigned indices.
///
/// # Panics
/// Invokes the bounds hook, which panics by default, if the index is out of bounds.
pub(crate) fn check_index(len: usize, index: usize, inclusive: bool) {
    let limit = if inclusive { len.saturating_add(1) } else { len };
    if index >= limit {
        bounds_failure(IndexOutOfBounds {
            index: index.try_into().unwrap_or(isize::MAX),
            len,
        })
    }
}
