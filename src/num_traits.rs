use num_traits::ToPrimitive;

/// Converts an element count received from a foreign caller into a `usize`.
pub trait ElementCount {
    /// Returns the count as `usize`, or `None` if it is negative or does not fit.
    fn element_count(&self) -> Option<usize>;
}

impl<T> ElementCount for T
where
    T: ToPrimitive,
{
    #[inline]
    fn element_count(&self) -> Option<usize> {
        self.to_usize()
    }
}

/// Computes the number of scalars covered by `count` blocks of `block_len` scalars each.
///
/// Returns `None` if the byte size of the result would not fit into an `isize`,
/// which is the limit for a single allocation.
pub fn scalars_for_blocks<T>(count: usize, block_len: usize) -> Option<usize> {
    let scalars = count.checked_mul(block_len)?;
    let bytes = scalars.checked_mul(core::mem::size_of::<T>())?;
    if bytes > isize::MAX as usize {
        return None;
    }
    Some(scalars)
}
