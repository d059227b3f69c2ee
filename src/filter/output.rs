use crate::types::{Mat2, Mat5, Real, Vec2, Vec5};
use crate::{BoundaryError, BoundaryResult};

/// The result of one filter run: one entry per processed hit in each sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutput {
    /// Estimated track parameters.
    pub state_vectors: Vec<Vec5>,
    /// Covariance of the estimated track parameters.
    pub covariances: Vec<Mat5>,
    /// Covariance of the residuals.
    pub residual_covariances: Vec<Mat2>,
    /// Residuals between measured hits and the estimate.
    pub residual_vectors: Vec<Vec2>,
}

impl FilterOutput {
    /// Initializes a new [`FilterOutput`] with room for `capacity` entries per sequence.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state_vectors: Vec::with_capacity(capacity),
            covariances: Vec::with_capacity(capacity),
            residual_covariances: Vec::with_capacity(capacity),
            residual_vectors: Vec::with_capacity(capacity),
        }
    }

    /// Appends one entry to every sequence.
    pub fn push(&mut self, state: Vec5, covariance: Mat5, residual_covariance: Mat2, residual: Vec2) {
        self.state_vectors.push(state);
        self.covariances.push(covariance);
        self.residual_covariances.push(residual_covariance);
        self.residual_vectors.push(residual);
    }

    /// Returns the number of entries, provided all sequences agree on it.
    pub fn entry_count(&self) -> BoundaryResult<usize> {
        let len = self.state_vectors.len();
        if self.covariances.len() != len
            || self.residual_covariances.len() != len
            || self.residual_vectors.len() != len
        {
            return Err(BoundaryError::InconsistentOutput {
                state_vectors: self.state_vectors.len(),
                covariances: self.covariances.len(),
                residual_covariances: self.residual_covariances.len(),
                residual_vectors: self.residual_vectors.len(),
            });
        }
        Ok(len)
    }

    /// Flattens every sequence into one contiguous column-major buffer.
    pub fn to_flat(&self) -> BoundaryResult<FlatOutput> {
        let len = self.entry_count()?;
        Ok(FlatOutput {
            len,
            state_vectors: flatten(&self.state_vectors, |v| v.as_slice()),
            covariances: flatten(&self.covariances, |m| m.as_slice()),
            residual_covariances: flatten(&self.residual_covariances, |m| m.as_slice()),
            residual_vectors: flatten(&self.residual_vectors, |v| v.as_slice()),
        })
    }
}

/// A [`FilterOutput`] laid out as four flat buffers of doubles.
///
/// Entry `i` of a sequence whose blocks hold `n` values occupies `[i * n, (i + 1) * n)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatOutput {
    /// Number of entries in each sequence.
    pub len: usize,
    /// `len` blocks of 5 values.
    pub state_vectors: Vec<Real>,
    /// `len` blocks of 25 values, column-major.
    pub covariances: Vec<Real>,
    /// `len` blocks of 4 values, column-major.
    pub residual_covariances: Vec<Real>,
    /// `len` blocks of 2 values.
    pub residual_vectors: Vec<Real>,
}

fn flatten<M, F>(items: &[M], as_slice: F) -> Vec<Real>
where
    F: Fn(&M) -> &[Real],
{
    items.iter().flat_map(|m| as_slice(m).iter().copied()).collect()
}
