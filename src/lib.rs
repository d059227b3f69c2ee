// Ensure allow(unsafe_code) / forbid(unsafe_code) markers.
#![cfg_attr(feature = "ffi", allow(unsafe_code))]
#![cfg_attr(feature = "ffi", deny(unsafe_op_in_unsafe_fn))]
#![cfg_attr(not(feature = "ffi"), forbid(unsafe_code))]
// Only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod boundary;
mod error;
#[cfg_attr(docsrs, doc(cfg(feature = "ffi")))]
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod filter;
mod hit;
mod hit_covariance;
mod macros;
mod magnetic_field;
mod num_traits;
mod storage_order;
pub mod types;

pub use crate::error::{BoundaryError, BoundaryResult, BoundaryStatus, FilterError};
pub use crate::filter::{FilterOutput, TrackFilter};
pub use crate::hit::Hit;
pub use crate::hit_covariance::HitCovariance;
pub use crate::magnetic_field::MagneticField;
pub use crate::num_traits::ElementCount;
pub use crate::storage_order::{StorageOrder, EIGEN_STORAGE_ORDER, NALGEBRA_STORAGE_ORDER};
