//! The seam to the Kalman filter collaborator.
//!
//! This crate only moves data across the boundary. The filter mathematics live
//! in a [`TrackFilter`] implementation that the host installs at startup via
//! [`install_filter`].

mod output;
mod registry;

pub use crate::filter::output::{FilterOutput, FlatOutput};
pub use crate::filter::registry::{
    install_filter, install_shared_filter, installed_filter, is_filter_installed,
    uninstall_filter,
};

use crate::types::{Mat2, Vec2, Vec3};
use crate::FilterError;

/// A track fitter consuming paired hits and hit covariances.
///
/// The `i`-th covariance always belongs to the `i`-th hit, and both slices
/// have the same length.
pub trait TrackFilter: Send + Sync {
    /// Runs a filter for a track in a field-free region.
    fn run_linear(&self, hits: &[Vec2], covariances: &[Mat2]) -> Result<FilterOutput, FilterError>;

    /// Runs a filter for a track bent by a constant magnetic field.
    fn run_const_b(
        &self,
        hits: &[Vec2],
        covariances: &[Mat2],
        b_field: &Vec3,
    ) -> Result<FilterOutput, FilterError>;
}
