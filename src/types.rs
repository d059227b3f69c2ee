//! Scalar and matrix shapes exchanged across the boundary.

use nalgebra as na;

pub use crate::hit::Hit;
pub use crate::hit_covariance::HitCovariance;
pub use crate::magnetic_field::MagneticField;

/// The scalar type of every buffer on both sides of the boundary.
pub type Real = f64;

pub type Vec2 = na::Vector2<Real>;
pub type Vec3 = na::Vector3<Real>;
pub type Vec5 = na::Vector5<Real>;

pub type Mat2 = na::Matrix2<Real>;
pub type Mat3 = na::Matrix3<Real>;
pub type Mat5 = na::Matrix5<Real>;

/// Number of scalars in a 3×3 matrix block.
pub const MAT3_ELEMENTS: usize = 9;
