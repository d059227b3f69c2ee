use crate::impl_standard_traits;
use core::fmt::{Debug, Formatter};
use nalgebra::{Matrix2, Scalar};
use uniform_array_derive::UniformArray;

/// The 2×2 measurement noise covariance paired with a [`Hit`](crate::Hit).
///
/// Fields are stored in column-major order, matching an Eigen `Matrix2d`.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct HitCovariance<T> {
    /// Row 0, column 0.
    pub xx: T,
    /// Row 1, column 0.
    pub yx: T,
    /// Row 0, column 1.
    pub xy: T,
    /// Row 1, column 1.
    pub yy: T,
}

impl<T> HitCovariance<T> {
    /// Initializes a new [`HitCovariance`] instance from its column-major entries.
    #[inline(always)]
    pub const fn new(xx: T, yx: T, xy: T, yy: T) -> Self {
        Self { xx, yx, xy, yy }
    }

    /// Initializes a diagonal covariance with the given variances.
    #[inline]
    pub fn diagonal(var_x: T, var_y: T) -> Self
    where
        T: Default,
    {
        Self::new(var_x, T::default(), T::default(), var_y)
    }
}

impl<T> Default for HitCovariance<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
        )
    }
}

impl<T> Clone for HitCovariance<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            xx: self.xx.clone(),
            yx: self.yx.clone(),
            xy: self.xy.clone(),
            yy: self.yy.clone(),
        }
    }
}

impl<T> Debug for HitCovariance<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("HitCovariance")
            .field(&self.xx)
            .field(&self.yx)
            .field(&self.xy)
            .field(&self.yy)
            .finish()
    }
}

impl<T> From<HitCovariance<T>> for Matrix2<T>
where
    T: Scalar,
{
    #[inline]
    fn from(value: HitCovariance<T>) -> Self {
        // Matrix2::new takes its arguments row by row.
        Matrix2::new(value.xx, value.xy, value.yx, value.yy)
    }
}

impl<T> From<&HitCovariance<T>> for Matrix2<T>
where
    T: Scalar,
{
    #[inline]
    fn from(value: &HitCovariance<T>) -> Self {
        Matrix2::from(value.clone())
    }
}

impl_standard_traits!(HitCovariance, T; xx, yx, xy, yy);
