use crate::impl_standard_traits;
use core::fmt::{Debug, Formatter};
use nalgebra::{Scalar, Vector3};
use uniform_array_derive::UniformArray;

/// A constant magnetic field vector, as used by the constant-field filter.
#[derive(UniformArray)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct MagneticField<T> {
    /// The field strength along the x-axis.
    pub x: T,
    /// The field strength along the y-axis.
    pub y: T,
    /// The field strength along the z-axis.
    pub z: T,
}

impl<T> MagneticField<T> {
    /// Initializes a new [`MagneticField`] instance.
    #[inline(always)]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

impl<T> Default for MagneticField<T>
where
    T: Default,
{
    #[inline]
    fn default() -> Self {
        Self::new(Default::default(), Default::default(), Default::default())
    }
}

impl<T> Clone for MagneticField<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
        }
    }
}

impl<T> Debug for MagneticField<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("MagneticField")
            .field(&self.x)
            .field(&self.y)
            .field(&self.z)
            .finish()
    }
}

impl<T> From<MagneticField<T>> for Vector3<T>
where
    T: Scalar,
{
    #[inline]
    fn from(value: MagneticField<T>) -> Self {
        Vector3::new(value.x, value.y, value.z)
    }
}

impl_standard_traits!(MagneticField, T; x, y, z);
