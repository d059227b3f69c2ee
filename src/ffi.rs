//! C entry points.
//!
//! Every function validates its pointers and counts before reading anything.
//! Failures are reported through the return value (a [`BoundaryStatus`], NaN
//! or [`KfResultHandle::INVALID`]) and recorded in a per-thread slot that can
//! be inspected with [`kf_last_error`] and [`kf_last_error_message`]. Every
//! entry point other than those two starts by clearing that slot, so after a
//! successful call [`kf_last_error`] reports `0`.
//!
//! Input buffers are only borrowed for the duration of a call. Filter results
//! are owned by this library until released with [`kf_result_release`].

mod handles;
mod last_error;
mod raw;

pub use crate::ffi::handles::{live_results, with_result, KfResultHandle, ResultBundle};
pub use crate::ffi::last_error::{clear_last_error, last_error};

use crate::boundary;
use crate::filter::{installed_filter, is_filter_installed, FilterOutput};
use crate::types::{Real, MAT3_ELEMENTS};
use crate::{BoundaryError, BoundaryResult, BoundaryStatus, Hit, HitCovariance, MagneticField};
use core::ffi::{c_char, c_double, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Sums `length` doubles starting at `arr_start` and adds
/// [`MAKE_ARRAY_OFFSET`](crate::boundary::MAKE_ARRAY_OFFSET).
///
/// Returns NaN on failure.
///
/// # Safety
/// Unless `length` is zero, `arr_start` must point to `length` readable doubles.
#[no_mangle]
pub unsafe extern "C" fn make_array(arr_start: *const c_double, length: c_int) -> c_double {
    clear_last_error();
    let result = raw::count_from_c(length, "length")
        .and_then(|len| unsafe { raw::read_scalars(arr_start, len, "arr_start") });

    match result {
        Ok(values) => boundary::make_array(values),
        Err(e) => {
            last_error::record(e);
            c_double::NAN
        }
    }
}

/// Reads a column-major 3×3 matrix of exactly nine doubles.
///
/// # Safety
/// `matrix_ptr` must point to nine readable doubles.
#[no_mangle]
pub unsafe extern "C" fn eigen_to_nalgebra(matrix_ptr: *const c_double) -> BoundaryStatus {
    clear_last_error();
    let result = unsafe { raw::read_scalars(matrix_ptr, MAT3_ELEMENTS, "matrix_ptr") }
        .and_then(boundary::matrix3_from_slice)
        .map(|_| ());
    last_error::status_of(result)
}

/// Reads `arr_len` consecutive hits of two doubles each.
///
/// # Safety
/// Unless `arr_len` is zero, `first_element` must point to `2 * arr_len` readable doubles.
#[no_mangle]
pub unsafe extern "C" fn eigen_hits_to_nalgebra_hits(
    first_element: *const c_double,
    arr_len: c_int,
) -> BoundaryStatus {
    clear_last_error();
    let result = raw::count_from_c(arr_len, "arr_len")
        .and_then(|count| unsafe {
            raw::read_blocks(first_element, count, Hit::<Real>::ELEMENTS, "first_element")
        })
        .map(|values| {
            let hits = Hit::cast_flat(values).unwrap_or_default();
            boundary::hits_to_nalgebra(hits);
        });
    last_error::status_of(result)
}

/// Runs the installed filter over `sensor_count` hits and covariances.
///
/// Returns a handle to the result, or [`KfResultHandle::INVALID`] on failure.
///
/// # Safety
/// Unless `sensor_count` is zero, `hits` must point to `2 * sensor_count` and
/// `covariances` to `4 * sensor_count` readable doubles.
#[no_mangle]
pub unsafe extern "C" fn run_linear_kf(
    hits: *const c_double,
    covariances: *const c_double,
    sensor_count: c_int,
) -> KfResultHandle {
    clear_last_error();
    let result = unsafe { read_track(hits, covariances, sensor_count) }.and_then(
        |(hits, covariances, count)| {
            let filter = installed_filter()?;
            guard_panics(|| boundary::run_linear_kf(&*filter, hits, covariances, count))
        },
    );
    into_handle(result)
}

/// Runs the installed constant-field filter over `sensor_count` hits and covariances.
///
/// Returns a handle to the result, or [`KfResultHandle::INVALID`] on failure.
///
/// # Safety
/// As for [`run_linear_kf`], and `b_field` must point to three readable doubles.
#[no_mangle]
pub unsafe extern "C" fn run_const_b_kf(
    hits: *const c_double,
    covariances: *const c_double,
    b_field: *const c_double,
    sensor_count: c_int,
) -> KfResultHandle {
    clear_last_error();
    let result = unsafe { read_track(hits, covariances, sensor_count) }.and_then(
        |(hits, covariances, count)| {
            let field = unsafe {
                raw::read_scalars(b_field, MagneticField::<Real>::ELEMENTS, "b_field")
            }?;
            let field = MagneticField::from_slice(field);
            let filter = installed_filter()?;
            guard_panics(|| {
                boundary::run_const_b_kf(&*filter, hits, covariances, field, count)
            })
        },
    );
    into_handle(result)
}

/// Writes the buffer view of a live result into `out`.
///
/// # Safety
/// `out` must be null or point to writable memory for one [`ResultBundle`].
#[no_mangle]
pub unsafe extern "C" fn kf_result_bundle(
    handle: KfResultHandle,
    out: *mut ResultBundle,
) -> BoundaryStatus {
    clear_last_error();
    if out.is_null() {
        return last_error::record(BoundaryError::NullPointer { argument: "out" });
    }

    let result = handles::bundle(handle).map(|bundle| {
        // SAFETY: non-null checked above, validity guaranteed by the caller.
        unsafe { out.write(bundle) }
    });
    last_error::status_of(result)
}

/// Releases a result. All addresses previously obtained for it become invalid.
#[no_mangle]
pub extern "C" fn kf_result_release(handle: KfResultHandle) -> BoundaryStatus {
    clear_last_error();
    last_error::status_of(handles::release(handle))
}

/// Returns the status of the failure of the latest call on this thread, or `0`.
#[no_mangle]
pub extern "C" fn kf_last_error() -> BoundaryStatus {
    last_error()
        .map(|e| BoundaryStatus::from(&e))
        .unwrap_or(BoundaryStatus::Ok)
}

/// Forgets the most recent failure on this thread.
#[no_mangle]
pub extern "C" fn kf_clear_last_error() {
    clear_last_error();
}

/// Copies the message of the most recent failure on this thread into `buf`.
///
/// Returns the number of bytes written without the terminating NUL, `0` if there
/// was no failure, or `-1` if `buf` is null or too small.
///
/// # Safety
/// `buf` must be null or point to `buf_len` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn kf_last_error_message(buf: *mut c_char, buf_len: usize) -> c_int {
    let Some(error) = last_error() else {
        return 0;
    };
    if buf.is_null() {
        return -1;
    }

    let message = error.to_string();
    let bytes = message.as_bytes();
    let Ok(written) = c_int::try_from(bytes.len()) else {
        return -1;
    };
    if bytes.len() >= buf_len {
        return -1;
    }

    // SAFETY: `buf` holds `buf_len > bytes.len()` writable bytes.
    unsafe {
        core::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), bytes.len());
        buf.add(bytes.len()).write(0);
    }
    written
}

/// Returns `1` if a filter is installed, `0` otherwise.
#[no_mangle]
pub extern "C" fn kf_filter_installed() -> c_int {
    clear_last_error();
    c_int::from(is_filter_installed())
}

type TrackSlices<'a> = (&'a [f64], &'a [f64], usize);

/// Borrows the paired hit and covariance buffers of a filter call.
unsafe fn read_track<'a>(
    hits: *const c_double,
    covariances: *const c_double,
    sensor_count: c_int,
) -> BoundaryResult<TrackSlices<'a>> {
    let count = raw::count_from_c(sensor_count, "sensor_count")?;
    let hits = unsafe { raw::read_blocks(hits, count, Hit::<Real>::ELEMENTS, "hits") }?;
    let covariances = unsafe {
        raw::read_blocks(
            covariances,
            count,
            HitCovariance::<Real>::ELEMENTS,
            "covariances",
        )
    }?;
    Ok((hits, covariances, count))
}

/// Turns a filter panic into an error instead of unwinding into C.
fn guard_panics<F>(f: F) -> BoundaryResult<FilterOutput>
where
    F: FnOnce() -> BoundaryResult<FilterOutput>,
{
    catch_unwind(AssertUnwindSafe(f)).unwrap_or(Err(BoundaryError::Panicked))
}

fn into_handle(result: BoundaryResult<FilterOutput>) -> KfResultHandle {
    match result.and_then(handles::store) {
        Ok(handle) => handle,
        Err(e) => {
            last_error::record(e);
            KfResultHandle::INVALID
        }
    }
}
