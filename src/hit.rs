use crate::impl_standard_traits;
use core::fmt::{Debug, Formatter};
use nalgebra::{Scalar, Vector2};
use uniform_array_derive::UniformArray;

/// A single two-dimensional measurement on a sensor plane.
///
/// The memory layout matches an Eigen `Vector2d`, i.e. two consecutive doubles.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct Hit<T> {
    /// The local x coordinate of the measurement.
    pub x: T,
    /// The local y coordinate of the measurement.
    pub y: T,
}

impl<T> Hit<T> {
    /// Initializes a new [`Hit`] instance.
    #[inline(always)]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T> Default for Hit<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(Default::default(), Default::default())
    }
}

impl<T> Clone for Hit<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }
}

impl<T> Debug for Hit<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Hit").field(&self.x).field(&self.y).finish()
    }
}

impl<T> From<Hit<T>> for Vector2<T>
where
    T: Scalar,
{
    #[inline]
    fn from(value: Hit<T>) -> Self {
        Vector2::new(value.x, value.y)
    }
}

impl<T> From<&Hit<T>> for Vector2<T>
where
    T: Scalar,
{
    #[inline]
    fn from(value: &Hit<T>) -> Self {
        Vector2::new(value.x.clone(), value.y.clone())
    }
}

impl<T> From<Vector2<T>> for Hit<T>
where
    T: Scalar,
{
    #[inline]
    fn from(value: Vector2<T>) -> Self {
        Self::new(value[0].clone(), value[1].clone())
    }
}

impl_standard_traits!(Hit, T; x, y);
