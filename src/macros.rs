#[macro_export]
macro_rules! impl_standard_traits {
    ($type_name:ident, $type_param:ident; $($field:ident),+) => {
        impl<$type_param> Copy for $type_name<$type_param> where $type_param: Copy {}

        impl<$type_param> $type_name<$type_param> {
            /// The number of scalar values in one block of this type.
            pub const ELEMENTS: usize =
                core::mem::size_of::<Self>() / core::mem::size_of::<$type_param>();
        }

        impl<$type_param> $type_name<$type_param>
        where
            $type_param: Copy,
        {
            /// Copies a new instance out of a flat slice holding exactly one block.
            ///
            /// Returns `None` if the slice length does not match the block size.
            pub fn from_flat(flat: &[$type_param]) -> Option<Self> {
                match flat {
                    [$($field),+] => Some(Self { $($field: *$field),+ }),
                    _ => None,
                }
            }
        }

        #[cfg_attr(docsrs, doc(cfg(feature = "ffi")))]
        #[cfg(feature = "ffi")]
        impl<$type_param> $type_name<$type_param>
        where
            $type_param: Default,
        {
            /// Constructs a new instance from a slice.
            #[allow(unused)]
            #[inline]
            pub fn from_slice(slice: &[$type_param]) -> &Self {
                assert_eq!(slice.len(), Self::ELEMENTS);

                // SAFETY: $type_name only contains `$type_param` fields and is `repr(C)`
                unsafe { &*(slice.as_ptr() as *const Self) }
            }

            /// Reinterprets a flat slice as a sequence of consecutive blocks.
            ///
            /// Returns `None` if the slice length is not a multiple of the block size.
            #[inline]
            pub fn cast_flat(flat: &[$type_param]) -> Option<&[Self]> {
                if flat.len() % Self::ELEMENTS != 0 {
                    return None;
                }

                // SAFETY: $type_name only contains `$type_param` fields and is `repr(C)`,
                // so it has the alignment of `$type_param` and no padding.
                Some(unsafe {
                    core::slice::from_raw_parts(
                        flat.as_ptr() as *const Self,
                        flat.len() / Self::ELEMENTS,
                    )
                })
            }
        }

        #[cfg_attr(docsrs, doc(cfg(feature = "ffi")))]
        #[cfg(feature = "ffi")]
        impl<$type_param> core::convert::AsRef<[$type_param]> for $type_name<$type_param>
        where
            $type_param: Default,
        {
            fn as_ref(&self) -> &[$type_param] {
                unsafe {
                    // SAFETY: $type_name only contains `$type_param` fields and is `repr(C)`
                    core::slice::from_raw_parts(
                        self as *const _ as *const $type_param,
                        Self::ELEMENTS,
                    )
                }
            }
        }

        #[cfg(test)]
        paste::paste! {
            #[cfg(test)]
            mod [<tests_gen_ $type_name:snake>] {
                use super::*;

                #[test]
                fn test_from_flat() {
                    const NUM_ELEMS: usize = $type_name::<u32>::ELEMENTS;
                    let data: [u32; NUM_ELEMS] = core::array::from_fn(|i| i as u32 + 1);
                    let value = $type_name::<u32>::from_flat(&data).unwrap();
                    for i in 0..NUM_ELEMS {
                        assert_eq!(value[i], data[i]);
                    }
                }

                #[test]
                fn test_from_flat_rejects_wrong_length() {
                    const NUM_ELEMS: usize = $type_name::<u32>::ELEMENTS;
                    let data = [0u32; NUM_ELEMS + 1];
                    assert!($type_name::<u32>::from_flat(&data).is_none());
                    assert!($type_name::<u32>::from_flat(&data[..NUM_ELEMS - 1]).is_none());
                }

                #[test]
                #[cfg(feature = "ffi")]
                fn test_from_slice() {
                    const NUM_ELEMS: usize = $type_name::<u32>::ELEMENTS;
                    const ARRAY_SIZE: usize = NUM_ELEMS + 1;
                    let data = [0u32; ARRAY_SIZE];
                    let state = $type_name::from_slice(&data[..NUM_ELEMS]);
                    assert_eq!(state.len(), NUM_ELEMS);
                    assert!(core::ptr::eq(
                        AsRef::<[u32]>::as_ref(state).as_ptr(),
                        data.as_ptr()
                    ));
                }

                #[test]
                #[cfg(feature = "ffi")]
                fn test_cast_flat() {
                    const NUM_ELEMS: usize = $type_name::<u32>::ELEMENTS;
                    let data: [u32; NUM_ELEMS * 3] = core::array::from_fn(|i| i as u32);
                    let blocks = $type_name::<u32>::cast_flat(&data).unwrap();
                    assert_eq!(blocks.len(), 3);
                    assert_eq!(blocks[2][0], (NUM_ELEMS * 2) as u32);
                    assert!(core::ptr::eq(blocks.as_ptr() as *const u32, data.as_ptr()));
                    assert!($type_name::<u32>::cast_flat(&data[..NUM_ELEMS + 1]).is_none());
                }
            }
        }
    };
}
