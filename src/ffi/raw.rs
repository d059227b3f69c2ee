use crate::num_traits::{scalars_for_blocks, ElementCount};
use crate::{BoundaryError, BoundaryResult};
use core::ffi::{c_double, c_int};

/// Determines whether a pointer is aligned for its pointee type.
#[inline]
pub(crate) fn is_aligned<T>(ptr: *const T) -> bool {
    (ptr as usize) % core::mem::align_of::<T>() == 0
}

/// Converts a count received from C into a `usize`.
pub(crate) fn count_from_c(length: c_int, argument: &'static str) -> BoundaryResult<usize> {
    length.element_count().ok_or(BoundaryError::InvalidLength {
        argument,
        length: length.into(),
    })
}

/// Borrows `len` doubles starting at `ptr`.
///
/// A zero length never touches `ptr`, which may then be null.
///
/// # Safety
/// If `len` is non-zero and `ptr` passes the null and alignment checks, `ptr`
/// must point to at least `len` initialized doubles that stay valid and
/// unmodified for `'a`.
pub(crate) unsafe fn read_scalars<'a>(
    ptr: *const c_double,
    len: usize,
    argument: &'static str,
) -> BoundaryResult<&'a [f64]> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(BoundaryError::NullPointer { argument });
    }
    if !is_aligned(ptr) {
        return Err(BoundaryError::Misaligned {
            argument,
            address: ptr as usize,
            required: core::mem::align_of::<c_double>(),
        });
    }
    if scalars_for_blocks::<c_double>(len, 1).is_none() {
        return Err(BoundaryError::InvalidLength {
            argument,
            length: i64::try_from(len).unwrap_or(i64::MAX),
        });
    }

    // SAFETY: non-null and aligned checked above, extent guaranteed by the caller.
    Ok(unsafe { core::slice::from_raw_parts(ptr, len) })
}

/// Borrows `count` consecutive blocks of `block_len` doubles starting at `ptr`.
///
/// # Safety
/// Same as [`read_scalars`] for `count * block_len` doubles.
pub(crate) unsafe fn read_blocks<'a>(
    ptr: *const c_double,
    count: usize,
    block_len: usize,
    argument: &'static str,
) -> BoundaryResult<&'a [f64]> {
    let len =
        scalars_for_blocks::<c_double>(count, block_len).ok_or(BoundaryError::InvalidLength {
            argument,
            length: i64::try_from(count).unwrap_or(i64::MAX),
        })?;

    // SAFETY: forwarded to the caller.
    unsafe { read_scalars(ptr, len, argument) }
}
