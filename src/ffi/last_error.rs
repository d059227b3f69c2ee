use crate::{BoundaryError, BoundaryStatus};
use std::cell::RefCell;
use tracing::warn;

thread_local! {
    static LAST_ERROR: RefCell<Option<BoundaryError>> = const { RefCell::new(None) };
}

/// Stores `error` as the most recent failure on this thread and returns its status.
pub(crate) fn record(error: BoundaryError) -> BoundaryStatus {
    warn!(%error, "boundary call failed");
    let status = BoundaryStatus::from(&error);
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(error));
    status
}

/// Converts a result into a status code, recording the error if there is one.
pub(crate) fn status_of(result: Result<(), BoundaryError>) -> BoundaryStatus {
    match result {
        Ok(()) => BoundaryStatus::Ok,
        Err(e) => record(e),
    }
}

/// Returns the most recent failure recorded on this thread.
pub fn last_error() -> Option<BoundaryError> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

/// Forgets the most recent failure recorded on this thread.
pub fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}
