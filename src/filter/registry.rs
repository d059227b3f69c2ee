use crate::filter::TrackFilter;
use crate::{BoundaryError, BoundaryResult};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// The filter used by the C entry points.
static FILTER: RwLock<Option<Arc<dyn TrackFilter>>> = parking_lot::const_rwlock(None);

/// Installs the filter used by the C entry points, returning the previous one.
pub fn install_filter<F>(filter: F) -> Option<Arc<dyn TrackFilter>>
where
    F: TrackFilter + 'static,
{
    install_shared_filter(Arc::new(filter))
}

/// Installs an already shared filter, returning the previous one.
pub fn install_shared_filter(filter: Arc<dyn TrackFilter>) -> Option<Arc<dyn TrackFilter>> {
    debug!("installing track filter");
    FILTER.write().replace(filter)
}

/// Removes the installed filter, returning it.
pub fn uninstall_filter() -> Option<Arc<dyn TrackFilter>> {
    debug!("removing track filter");
    FILTER.write().take()
}

/// Returns the installed filter.
///
/// The lock is released before returning, so the filter may run while another
/// thread replaces it.
pub fn installed_filter() -> BoundaryResult<Arc<dyn TrackFilter>> {
    FILTER
        .read()
        .as_ref()
        .cloned()
        .ok_or(BoundaryError::NoFilterInstalled)
}

/// Determines whether a filter is installed.
pub fn is_filter_installed() -> bool {
    FILTER.read().is_some()
}
