//! Slice-based versions of every boundary operation.
//!
//! The C entry points in [`ffi`](crate::ffi) validate their pointers and counts,
//! turn them into slices and then call into this module. Rust callers can use
//! these functions directly.

use crate::filter::{FilterOutput, TrackFilter};
use crate::num_traits::scalars_for_blocks;
use crate::storage_order::EIGEN_STORAGE_ORDER;
use crate::types::{Mat2, Mat3, Real, Vec2, Vec3, MAT3_ELEMENTS};
use crate::{BoundaryError, BoundaryResult, Hit, HitCovariance, MagneticField};
use tracing::debug;

/// The constant added to the sum computed by [`make_array`].
pub const MAKE_ARRAY_OFFSET: Real = 6.0;

/// Sums the values and adds [`MAKE_ARRAY_OFFSET`].
///
/// An empty slice yields the offset alone.
pub fn make_array(values: &[Real]) -> Real {
    let sum: Real = values.iter().sum();
    debug!(len = values.len(), sum, "received scalar array");
    sum + MAKE_ARRAY_OFFSET
}

/// Converts a 3×3 block in Eigen's storage order into an nalgebra matrix.
///
/// The values are passed through unaltered.
pub fn eigen_to_nalgebra(block: &[Real; MAT3_ELEMENTS]) -> Mat3 {
    let matrix = EIGEN_STORAGE_ORDER.matrix3(block);
    debug!(?matrix, "received 3x3 matrix");
    matrix
}

/// Like [`eigen_to_nalgebra`], but takes a slice that must hold exactly nine values.
pub fn matrix3_from_slice(values: &[Real]) -> BoundaryResult<Mat3> {
    let block: &[Real; MAT3_ELEMENTS] =
        values.try_into().map_err(|_| BoundaryError::LengthMismatch {
            argument: "matrix",
            expected: MAT3_ELEMENTS,
            actual: values.len(),
        })?;
    Ok(eigen_to_nalgebra(block))
}

/// Converts `count` consecutive 2-value blocks into hit vectors.
pub fn eigen_hits_to_nalgebra_hits(values: &[Real], count: usize) -> BoundaryResult<Vec<Vec2>> {
    let hits = copy_blocks(values, count, Hit::<Real>::ELEMENTS, "hits", Hit::from_flat)?;
    Ok(hits_to_nalgebra(&hits))
}

/// Converts typed hits into nalgebra vectors.
pub fn hits_to_nalgebra(hits: &[Hit<Real>]) -> Vec<Vec2> {
    let hits: Vec<Vec2> = hits.iter().map(Vec2::from).collect();
    debug!(count = hits.len(), "received hits");
    hits
}

/// Converts typed hit covariances into nalgebra matrices.
pub fn covariances_to_nalgebra(covariances: &[HitCovariance<Real>]) -> Vec<Mat2> {
    covariances.iter().map(Mat2::from).collect()
}

/// Hits paired by index with their measurement covariances.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInput {
    /// The measured hits.
    pub hits: Vec<Vec2>,
    /// The covariance of each hit.
    pub covariances: Vec<Mat2>,
}

impl TrackInput {
    /// Reads `sensor_count` hits and `sensor_count` covariances from two flat buffers.
    ///
    /// Each buffer must hold exactly the number of values implied by `sensor_count`.
    pub fn from_flat(
        hits: &[Real],
        covariances: &[Real],
        sensor_count: usize,
    ) -> BoundaryResult<Self> {
        let hits = copy_blocks(
            hits,
            sensor_count,
            Hit::<Real>::ELEMENTS,
            "hits",
            Hit::from_flat,
        )?;
        let covariances = copy_blocks(
            covariances,
            sensor_count,
            HitCovariance::<Real>::ELEMENTS,
            "covariances",
            HitCovariance::from_flat,
        )?;

        Ok(Self {
            hits: hits_to_nalgebra(&hits),
            covariances: covariances_to_nalgebra(&covariances),
        })
    }

    /// Returns the number of sensors, i.e. hit/covariance pairs.
    pub fn sensor_count(&self) -> usize {
        self.hits.len()
    }
}

/// Runs the field-free filter over `sensor_count` paired hits and covariances.
pub fn run_linear_kf(
    filter: &dyn TrackFilter,
    hits: &[Real],
    covariances: &[Real],
    sensor_count: usize,
) -> BoundaryResult<FilterOutput> {
    let input = TrackInput::from_flat(hits, covariances, sensor_count)?;
    debug!(sensor_count, "running linear filter");
    let output = filter.run_linear(&input.hits, &input.covariances)?;
    output.entry_count()?;
    Ok(output)
}

/// Runs the constant-field filter over `sensor_count` paired hits and covariances.
pub fn run_const_b_kf(
    filter: &dyn TrackFilter,
    hits: &[Real],
    covariances: &[Real],
    field: &MagneticField<Real>,
    sensor_count: usize,
) -> BoundaryResult<FilterOutput> {
    let input = TrackInput::from_flat(hits, covariances, sensor_count)?;
    let b_field = Vec3::from(*field);
    debug!(sensor_count, ?b_field, "running constant field filter");
    let output = filter.run_const_b(&input.hits, &input.covariances, &b_field)?;
    output.entry_count()?;
    Ok(output)
}

/// Splits `values` into `count` blocks of `block_len` values each.
fn copy_blocks<B>(
    values: &[Real],
    count: usize,
    block_len: usize,
    argument: &'static str,
    from_flat: fn(&[Real]) -> Option<B>,
) -> BoundaryResult<Vec<B>> {
    let expected =
        scalars_for_blocks::<Real>(count, block_len).ok_or(BoundaryError::InvalidLength {
            argument,
            length: i64::try_from(count).unwrap_or(i64::MAX),
        })?;
    if values.len() != expected {
        return Err(BoundaryError::LengthMismatch {
            argument,
            expected,
            actual: values.len(),
        });
    }

    values
        .chunks_exact(block_len)
        .map(|block| {
            from_flat(block).ok_or(BoundaryError::LengthMismatch {
                argument,
                expected: block_len,
                actual: block.len(),
            })
        })
        .collect()
}
