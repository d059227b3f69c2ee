use thiserror::Error;

/// Errors raised while moving buffers across the boundary.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BoundaryError {
    /// A null address was passed for a buffer with a non-zero element count.
    #[error("null pointer passed for `{argument}`")]
    NullPointer {
        /// The name of the offending argument.
        argument: &'static str,
    },

    /// A buffer address is not aligned for `f64`.
    #[error("pointer {address:#x} passed for `{argument}` is not aligned to {required} bytes")]
    Misaligned {
        /// The name of the offending argument.
        argument: &'static str,
        /// The misaligned address.
        address: usize,
        /// Required alignment in bytes.
        required: usize,
    },

    /// An element count is negative or too large to address.
    #[error("invalid length {length} for `{argument}`")]
    InvalidLength {
        /// The name of the offending argument.
        argument: &'static str,
        /// The count as received from the caller.
        length: i64,
    },

    /// A buffer holds a different number of scalars than its element count implies.
    #[error("`{argument}` holds {actual} values, expected {expected}")]
    LengthMismatch {
        /// The name of the offending argument.
        argument: &'static str,
        /// Expected number of scalars.
        expected: usize,
        /// Actual number of scalars.
        actual: usize,
    },

    /// A filter run was requested but no filter is installed.
    #[error("no track filter is installed")]
    NoFilterInstalled,

    /// The installed filter reported a failure.
    #[error("track filter failed: {0}")]
    Filter(#[from] FilterError),

    /// The filter produced output sequences of different lengths.
    #[error(
        "inconsistent filter output: {state_vectors} state vectors, {covariances} covariances, \
         {residual_covariances} residual covariances, {residual_vectors} residual vectors"
    )]
    InconsistentOutput {
        /// Number of state vectors.
        state_vectors: usize,
        /// Number of state covariance matrices.
        covariances: usize,
        /// Number of residual covariance matrices.
        residual_covariances: usize,
        /// Number of residual vectors.
        residual_vectors: usize,
    },

    /// A result handle is unknown or was already released.
    #[error("result handle {0} is unknown or was already released")]
    StaleHandle(u64),

    /// The filter panicked while processing the call.
    #[error("track filter panicked")]
    Panicked,
}

/// Errors reported by a [`TrackFilter`](crate::TrackFilter) implementation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FilterError {
    /// A matrix that needed to be inverted was singular.
    #[error("matrix is not invertible")]
    NonInvertible,

    /// A hit could not be associated with the track.
    #[error("hit {index} lies outside the sensor bounds")]
    OutsideSensorBounds {
        /// Index of the hit in the input sequence.
        index: usize,
    },

    /// Any other failure, described by the filter.
    #[error("{0}")]
    Other(String),
}

/// Result type for boundary operations.
pub type BoundaryResult<T> = Result<T, BoundaryError>;

/// Status codes returned across the C ABI.
#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoundaryStatus {
    Ok = 0,
    NullPointer = 1,
    Misaligned = 2,
    InvalidLength = 3,
    LengthMismatch = 4,
    NoFilterInstalled = 5,
    FilterFailed = 6,
    InconsistentOutput = 7,
    StaleHandle = 8,
    Panicked = 9,
}

impl From<&BoundaryError> for BoundaryStatus {
    fn from(value: &BoundaryError) -> Self {
        match value {
            BoundaryError::NullPointer { .. } => BoundaryStatus::NullPointer,
            BoundaryError::Misaligned { .. } => BoundaryStatus::Misaligned,
            BoundaryError::InvalidLength { .. } => BoundaryStatus::InvalidLength,
            BoundaryError::LengthMismatch { .. } => BoundaryStatus::LengthMismatch,
            BoundaryError::NoFilterInstalled => BoundaryStatus::NoFilterInstalled,
            BoundaryError::Filter(_) => BoundaryStatus::FilterFailed,
            BoundaryError::InconsistentOutput { .. } => BoundaryStatus::InconsistentOutput,
            BoundaryError::StaleHandle(_) => BoundaryStatus::StaleHandle,
            BoundaryError::Panicked => BoundaryStatus::Panicked,
        }
    }
}

impl<T> From<&BoundaryResult<T>> for BoundaryStatus {
    fn from(value: &BoundaryResult<T>) -> Self {
        match value {
            Ok(_) => BoundaryStatus::Ok,
            Err(e) => e.into(),
        }
    }
}
