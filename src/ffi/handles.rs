use crate::filter::{FilterOutput, FlatOutput};
use crate::{BoundaryError, BoundaryResult};
use core::ffi::c_double;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// An opaque handle to a filter result owned by this library.
///
/// The value `0` never refers to a result and signals failure.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KfResultHandle(pub u64);

impl KfResultHandle {
    /// The handle returned when a call fails.
    pub const INVALID: KfResultHandle = KfResultHandle(0);

    /// Determines whether this is the failure handle.
    #[inline]
    pub const fn is_invalid(&self) -> bool {
        self.0 == 0
    }
}

/// A borrowed view of a filter result: four buffer addresses plus the entry count.
///
/// The addresses stay valid until the owning handle is released. Each points to
/// `len` consecutive blocks, laid out as described on [`FlatOutput`].
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct ResultBundle {
    /// `len` blocks of 5 doubles.
    pub state_vectors: *const c_double,
    /// `len` blocks of 25 doubles, column-major.
    pub covariances: *const c_double,
    /// `len` blocks of 4 doubles, column-major.
    pub residual_covariances: *const c_double,
    /// `len` blocks of 2 doubles.
    pub residual_vectors: *const c_double,
    /// Number of entries in each sequence.
    pub len: usize,
}

impl ResultBundle {
    /// A bundle of null addresses and zero entries.
    pub const EMPTY: ResultBundle = ResultBundle {
        state_vectors: core::ptr::null(),
        covariances: core::ptr::null(),
        residual_covariances: core::ptr::null(),
        residual_vectors: core::ptr::null(),
        len: 0,
    };
}

struct StoredResult {
    output: FilterOutput,
    flat: FlatOutput,
}

impl StoredResult {
    fn bundle(&self) -> ResultBundle {
        // The flat buffers are never resized while stored, so their heap
        // addresses are stable even when the map moves the entry.
        ResultBundle {
            state_vectors: self.flat.state_vectors.as_ptr(),
            covariances: self.flat.covariances.as_ptr(),
            residual_covariances: self.flat.residual_covariances.as_ptr(),
            residual_vectors: self.flat.residual_vectors.as_ptr(),
            len: self.flat.len,
        }
    }
}

static RESULTS: Mutex<BTreeMap<u64, StoredResult>> = parking_lot::const_mutex(BTreeMap::new());
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Takes ownership of `output` and returns a handle to it.
pub(crate) fn store(output: FilterOutput) -> BoundaryResult<KfResultHandle> {
    let flat = output.to_flat()?;
    let handle = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
    debug!(handle, entries = flat.len, "storing filter result");
    RESULTS.lock().insert(handle, StoredResult { output, flat });
    Ok(KfResultHandle(handle))
}

/// Returns the buffer view of a live result.
pub(crate) fn bundle(handle: KfResultHandle) -> BoundaryResult<ResultBundle> {
    RESULTS
        .lock()
        .get(&handle.0)
        .map(StoredResult::bundle)
        .ok_or(BoundaryError::StaleHandle(handle.0))
}

/// Drops a live result. Its bundle addresses become invalid.
pub(crate) fn release(handle: KfResultHandle) -> BoundaryResult<()> {
    match RESULTS.lock().remove(&handle.0) {
        Some(_) => {
            debug!(handle = handle.0, "released filter result");
            Ok(())
        }
        None => Err(BoundaryError::StaleHandle(handle.0)),
    }
}

/// Runs `f` on the result behind a live handle.
pub fn with_result<R, F>(handle: KfResultHandle, f: F) -> BoundaryResult<R>
where
    F: FnOnce(&FilterOutput) -> R,
{
    RESULTS
        .lock()
        .get(&handle.0)
        .map(|stored| f(&stored.output))
        .ok_or(BoundaryError::StaleHandle(handle.0))
}

/// Returns the number of results that have not been released yet.
pub fn live_results() -> usize {
    RESULTS.lock().len()
}
