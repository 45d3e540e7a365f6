// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Bit-field arithmetic usable in constant expressions.
//!
//! Every mask in this crate is produced here. The functions are `const`
//! so a field that is empty or does not fit in its register stops the
//! build instead of silently truncating.

macro_rules! mask_fn {
    ($name:ident, $type:ty) => {
        /// Mask of `size` contiguous set bits starting at bit `position`.
        ///
        /// # Panics
        ///
        /// Panics (at compile time, when evaluated in a constant) if
        /// `size` is zero or if `size + position` exceeds the width of
        #[doc = concat!("`", stringify!($type), "`.")]
        pub const fn $name(size: usize, position: usize) -> $type {
            const BITS: usize = <$type>::BITS as usize;

            assert!(size > 0, "bit field must not be empty");
            assert!(
                size <= BITS && position <= BITS - size,
                "bit field does not fit in the register"
            );

            (<$type>::MAX >> (BITS - size)) << position
        }
    };
}

mask_fn!(mask_u8, u8);
mask_fn!(mask_u16, u16);
mask_fn!(mask_u32, u32);
mask_fn!(mask_u64, u64);
mask_fn!(mask_usize, usize);

/// Number of `element_size`-byte elements spanning `first_offset` to
/// `last_offset`, both inclusive.
///
/// Used to size register banks and reserved ranges from the offsets of
/// their first and last element.
pub const fn bank_len(first_offset: usize, last_offset: usize, element_size: usize) -> usize {
    assert!(element_size > 0);
    assert!(last_offset >= first_offset);

    ((last_offset - first_offset) + element_size) / element_size
}
