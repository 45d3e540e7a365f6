// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Register bitfield types and macros
//!
//! To conveniently access and manipulate fields of a register, this
//! library provides types and macros to describe and access bitfields
//! of a register. This can be especially useful in conjuction with
//! the APIs defined in [`interfaces`](crate::interfaces), which make
//! use of these types and hence allow to access and manipulate
//! bitfields of proper registers directly.
//!
//! A specific section (bitfield) in a register is described by the
//! [`Field`] type, consisting of the bit size of the section, its
//! position in the register and the in-place mask derived from both. A
//! [`FieldValue`] is a value written to one or more fields: an in-place
//! mask plus the already-shifted value. Field values of the same
//! register can be combined with `+`.
//!
//! The [`register_bitfields!`](crate::register_bitfields) macro
//! generates all of these from a list of field sizes. Fields are listed
//! from the least significant bit up and each one starts where the
//! previous one ended, so the only thing to get right is the size. The
//! sizes of all fields, reserved ranges included, must add up to the
//! width of the register or the declaration does not compile.
//!
//! ```rust
//! # use mmio_registers::LocalRegisterCopy;
//! # use mmio_registers::register_bitfields;
//! register_bitfields![u8,
//!     Status [
//!         BUSY       NUMBITS(1),
//!         RESERVED1  NUMBITS(3),
//!         MODE       NUMBITS(2) [
//!             Idle = 0,
//!             Run = 1,
//!             Halt = 3
//!         ],
//!         RESERVED6  NUMBITS(2)
//!     ]
//! ];
//!
//! let status = LocalRegisterCopy::<u8, Status::Register>::new(0b0011_0001);
//! assert!(status.is_set(Status::BUSY));
//! assert_eq!(status.read_as_enum(Status::MODE), Some(Status::MODE::Value::Halt));
//! ```

use core::fmt;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign};

use crate::{bits, RegisterLongName, UIntLike};

/// Specific section of a register.
///
/// For the [`Field`] of a register to be useful, it has to have
/// a register long name, which is generated together with the field
/// by [`register_bitfields!`](crate::register_bitfields).
pub struct Field<T: UIntLike, R: RegisterLongName> {
    /// Number of bits in the field.
    pub size: usize,
    /// Position of the least significant bit of the field.
    pub shift: usize,
    /// `size` set bits starting at `shift`.
    pub mask: T,
    associated_register: PhantomData<R>,
}

impl<T: UIntLike, R: RegisterLongName> Field<T, R> {
    #[inline]
    pub fn read(self, val: T) -> T {
        (val & self.mask) >> self.shift
    }

    #[inline]
    /// Check if one or more bits in a field are set
    pub fn is_set(self, val: T) -> bool {
        val & self.mask != T::zero()
    }

    #[inline]
    /// Read value of the field as an enum member
    ///
    /// This method expects to be passed the unasked and unshifted register
    /// value, extracts the field value by calling [`Field::read`] and
    /// subsequently passes that value to the [`TryFromValue`] implementation
    /// of the passed enum type.
    ///
    /// The [`register_bitfields!`](crate::register_bitfields) macro will
    /// generate an enum containing the various named field variants and
    /// implementing the required [`TryFromValue`] trait. It is accessible as
    /// `$REGISTER_NAME::$FIELD_NAME::Value`.
    ///
    /// This method can be useful to symbolically represent read register field
    /// states throughout the codebase and to enforce exhaustive matches over
    /// all defined valid register field values.
    pub fn read_as_enum<E: TryFromValue<T, EnumType = E>>(self, val: T) -> Option<E> {
        E::try_from_value(self.read(val))
    }

    /// Field value writing `value` into this field.
    ///
    /// Bits of `value` that do not fit in the field are dropped.
    #[inline]
    pub fn val(self, value: T) -> FieldValue<T, R> {
        FieldValue {
            mask: self.mask,
            value: (value << self.shift) & self.mask,
            associated_register: PhantomData,
        }
    }
}

// #[derive(Copy, Clone)] won't work here because it will use
// incorrect bounds, as a result of using a PhantomData over the
// generic R. The PhantomData<R> implements Copy regardless of whether
// R does, but the #[derive(Copy, Clone)] generates
//
//    #[automatically_derived]
//    #[allow(unused_qualifications)]
//    impl<T: UIntLike + ::core::marker::Copy, R: ::core::marker::Copy +
//            RegisterLongName> ::core::marker::Copy for Field<T, R> {}
//
// , so Field will only implement Copy if R: Copy.
//
// Manually implementing Clone and Copy works around this issue.
//
// Relevant Rust issue: https://github.com/rust-lang/rust/issues/26925
impl<T: UIntLike, R: RegisterLongName> Clone for Field<T, R> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: UIntLike, R: RegisterLongName> Copy for Field<T, R> {}

impl<T: UIntLike, R: RegisterLongName> fmt::Debug for Field<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("size", &self.size)
            .field("shift", &self.shift)
            .field("mask", &self.mask)
            .finish()
    }
}

/// Values for the specific register fields.
///
/// [`FieldValue`] can be used to combine multiple fields (or values
/// of fields) of a register to be written at once, or to compare a
/// register against a particular combination of field values.
pub struct FieldValue<T: UIntLike, R: RegisterLongName> {
    mask: T,
    value: T,
    associated_register: PhantomData<R>,
}

impl<T: UIntLike, R: RegisterLongName> Clone for FieldValue<T, R> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: UIntLike, R: RegisterLongName> Copy for FieldValue<T, R> {}

impl<T: UIntLike, R: RegisterLongName> fmt::Debug for FieldValue<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValue")
            .field("mask", &self.mask)
            .field("value", &self.value)
            .finish()
    }
}

macro_rules! field_impl_for {
    ($type:ty, $mask_fn:ident) => {
        impl<R: RegisterLongName> Field<$type, R> {
            /// Field of `size` bits starting at bit `shift`.
            ///
            /// Fails to compile when evaluated in a constant if the field is
            /// empty or does not fit in the register.
            pub const fn new(size: usize, shift: usize) -> Field<$type, R> {
                Field {
                    size,
                    shift,
                    mask: bits::$mask_fn(size, shift),
                    associated_register: PhantomData,
                }
            }
        }

        impl<R: RegisterLongName> FieldValue<$type, R> {
            /// Field value for the field with in-place mask `mask` starting
            /// at `shift`, holding the unshifted `value`.
            pub const fn new(mask: $type, shift: usize, value: $type) -> Self {
                FieldValue {
                    mask,
                    value: (value << shift) & mask,
                    associated_register: PhantomData,
                }
            }
        }

        impl<R: RegisterLongName> From<FieldValue<$type, R>> for $type {
            fn from(val: FieldValue<$type, R>) -> $type {
                val.value
            }
        }
    };
}

field_impl_for!(u8, mask_u8);
field_impl_for!(u16, mask_u16);
field_impl_for!(u32, mask_u32);
field_impl_for!(u64, mask_u64);
field_impl_for!(usize, mask_usize);

impl<T: UIntLike, R: RegisterLongName> FieldValue<T, R> {
    /// Field value that touches no bits.
    pub fn none() -> Self {
        FieldValue {
            mask: T::zero(),
            value: T::zero(),
            associated_register: PhantomData,
        }
    }

    /// Get the raw bitmask represented by this FieldValue.
    #[inline]
    pub fn mask(&self) -> T {
        self.mask
    }

    /// Get the shifted value represented by this FieldValue.
    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    #[inline]
    pub fn read(&self, field: Field<T, R>) -> T {
        field.read(self.value)
    }

    /// Modify fields in a register value
    ///
    /// Bits outside of the mask are kept, bits inside of it are replaced.
    #[inline]
    pub fn modify(self, val: T) -> T {
        (val & !self.mask) | self.value
    }

    /// Check if any of the bits covered by the mask for this
    /// `FieldValue` and set in the `FieldValue` are also set
    /// in the provided parameter `val`
    #[inline]
    pub fn any_matching_bits_set(&self, val: T) -> bool {
        val & self.mask & self.value != T::zero()
    }

    /// Check if all specified parts of a field match
    #[inline]
    pub fn matches_all(&self, val: T) -> bool {
        val & self.mask == self.value
    }
}

// Combine two fields with the addition operator
impl<T: UIntLike, R: RegisterLongName> Add for FieldValue<T, R> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        FieldValue {
            mask: self.mask | rhs.mask,
            value: self.value | rhs.value,
            associated_register: PhantomData,
        }
    }
}

// Combine two fields with the += operator
impl<T: UIntLike, R: RegisterLongName> AddAssign for FieldValue<T, R> {
    #[inline]
    fn add_assign(&mut self, rhs: FieldValue<T, R>) {
        self.mask |= rhs.mask;
        self.value |= rhs.value;
    }
}

/// Conversion of raw register value into enumerated values member.
/// Implemented inside register_bitfields! macro for each bit field.
pub trait TryFromValue<V> {
    type EnumType;

    fn try_from_value(v: V) -> Option<Self::EnumType>;
}

/// Entry of a register's field table.
///
/// Carries what a [`Field`] carries, minus the register type, plus the
/// declared name and a formatter that prints a raw field value through
/// the field's `Value` enum when it has a matching member.
#[derive(Clone, Copy)]
pub struct FieldInfo<T: UIntLike> {
    pub name: &'static str,
    pub size: usize,
    pub shift: usize,
    pub mask: T,
    fmt_raw: fn(T, &mut fmt::Formatter<'_>) -> fmt::Result,
}

impl<T: UIntLike> FieldInfo<T> {
    #[doc(hidden)]
    pub const fn new(
        name: &'static str,
        size: usize,
        shift: usize,
        mask: T,
        fmt_raw: fn(T, &mut fmt::Formatter<'_>) -> fmt::Result,
    ) -> Self {
        FieldInfo {
            name,
            size,
            shift,
            mask,
            fmt_raw,
        }
    }

    /// Reserved bit ranges are declared like any other field but with a
    /// name starting with `RESERVED`.
    pub const fn is_reserved(&self) -> bool {
        const PREFIX: &[u8] = b"RESERVED";

        let name = self.name.as_bytes();
        if name.len() < PREFIX.len() {
            return false;
        }
        let mut i = 0;
        while i < PREFIX.len() {
            if name[i] != PREFIX[i] {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Value of this field in the full register value `val`.
    pub fn read(&self, val: T) -> T {
        (val & self.mask) >> self.shift
    }

    pub(crate) fn fmt_value(&self, val: T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.fmt_raw)(self.read(val), f)
    }
}

impl<T: UIntLike> fmt::Debug for FieldInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("shift", &self.shift)
            .field("mask", &self.mask)
            .finish()
    }
}

/// Name and field table of a register, in declaration order.
///
/// Implemented by [`register_bitfields!`](crate::register_bitfields) for
/// every generated `Register` long name.
pub trait RegisterLayout<T: UIntLike>: RegisterLongName {
    const NAME: &'static str;
    const FIELDS: &'static [FieldInfo<T>];

    /// OR of every field mask, reserved ranges included.
    fn union_mask() -> T {
        Self::FIELDS
            .iter()
            .fold(T::zero(), |acc, field| acc | field.mask)
    }

    /// Whether no two fields share a bit.
    fn fields_disjoint() -> bool {
        Self::FIELDS.iter().enumerate().all(|(i, a)| {
            Self::FIELDS[i + 1..]
                .iter()
                .all(|b| a.mask & b.mask == T::zero())
        })
    }

    /// Field table without the reserved ranges.
    fn named_fields() -> impl Iterator<Item = &'static FieldInfo<T>> {
        Self::FIELDS.iter().filter(|field| !field.is_reserved())
    }
}

/// Define register types and fields.
///
/// Fields are listed from the least significant bit up as
/// `NAME NUMBITS(size)`, optionally followed by a list of named values.
/// Each field begins where the previous one ended. Use names starting
/// with `RESERVED` for bit ranges without a meaning; they still take up
/// their bits so the layout stays correct.
///
/// For every register `Reg` this generates a module `Reg` holding the
/// long name `Reg::Register` and, for every field `F`, a constant
/// `Reg::F: Field` plus a module `Reg::F` with the `SET` and `CLEAR`
/// field values, one field value per named value, and the `Value` enum.
///
/// Implementations of [`RegisterLongName`] and [`RegisterLayout`] are
/// generated for `Reg::Register`.
#[macro_export]
macro_rules! register_bitfields {
    {
        $valtype:ident, $( $(#[$attrs:meta])* $vis:vis $reg:ident $fields:tt ),* $(,)?
    } => {
        $(
            #[allow(non_snake_case)]
            $(#[$attrs])*
            $vis mod $reg {
                // Visibility note: This is left always `pub` as it is not
                // meaningful to restrict access to the `Register` element of
                // a register module if the rest of the module is visible.
                pub struct Register;
                impl $crate::RegisterLongName for Register {}

                #[allow(unused_imports)]
                use $crate::fields::Field;

                $crate::register_bitmasks!($valtype, $reg, $fields);
            }
        )*
    }
}

#[macro_export]
#[doc(hidden)]
macro_rules! register_bitmasks {
    // Entry point: start the running bit position at zero.
    ($valtype:ident, $reg:ident, [ $($fields:tt)* ]) => {
        $crate::register_bitmasks!(@fields $valtype, $reg, (0), [], [ $($fields)* ]);
    };

    // Take one field off the front of the list.
    (@fields $valtype:ident, $reg:ident, ($pos:expr), [ $($done:ident,)* ], [
        $(#[$attr:meta])*
        $field:ident NUMBITS($numbits:literal) $([ $($values:tt)* ])?
        $(, $($rest:tt)*)?
    ]) => {
        $crate::register_bitmasks!(
            @field $valtype, $(#[$attr])* $field, ($pos), $numbits, [ $($($values)*)? ]
        );
        $crate::register_bitmasks!(
            @fields $valtype, $reg, ($pos + $numbits), [ $($done,)* $field, ], [ $($($rest)*)? ]
        );
    };

    // All fields placed: the register must be exactly covered.
    (@fields $valtype:ident, $reg:ident, ($pos:expr), [ $($done:ident,)* ], []) => {
        const _: () = assert!(
            $pos == <$valtype>::BITS as usize,
            concat!("field sizes of ", stringify!($reg), " do not add up to the register width")
        );

        impl $crate::fields::RegisterLayout<$valtype> for Register {
            const NAME: &'static str = stringify!($reg);
            const FIELDS: &'static [$crate::fields::FieldInfo<$valtype>] = &[
                $(
                    $crate::fields::FieldInfo::new(
                        stringify!($done),
                        $done.size,
                        $done.shift,
                        $done.mask,
                        $done::fmt_value,
                    ),
                )*
            ];
        }
    };

    (@field $valtype:ident, $(#[$attr:meta])* $field:ident, ($pos:expr), $numbits:literal,
        [ $($values:tt)* ]) => {
        #[allow(non_upper_case_globals)]
        #[allow(unused)]
        $(#[$attr])*
        pub const $field: Field<$valtype, Register> =
            Field::<$valtype, Register>::new($numbits, $pos);

        #[allow(non_snake_case)]
        #[allow(unused)]
        $(#[$attr])*
        pub mod $field {
            #[allow(unused_imports)]
            use $crate::fields::{FieldValue, TryFromValue};
            use super::Register;

            #[allow(non_upper_case_globals)]
            #[allow(unused)]
            pub const SET: FieldValue<$valtype, Register> =
                FieldValue::<$valtype, Register>::new(super::$field.mask, super::$field.shift, <$valtype>::MAX);

            #[allow(non_upper_case_globals)]
            #[allow(unused)]
            pub const CLEAR: FieldValue<$valtype, Register> =
                FieldValue::<$valtype, Register>::new(super::$field.mask, super::$field.shift, 0);

            $crate::register_bitmasks!(@values $valtype, $field, [ $($values)* ]);

            #[doc(hidden)]
            pub fn fmt_value(raw: $valtype, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match <Value as TryFromValue<$valtype>>::try_from_value(raw) {
                    ::core::option::Option::Some(value) => ::core::fmt::Debug::fmt(&value, f),
                    ::core::option::Option::None => ::core::fmt::Debug::fmt(&raw, f),
                }
            }
        }
    };

    (@values $valtype:ident, $field:ident, [
        $( $(#[$inner:meta])* $valname:ident = $value:expr ),+ $(,)?
    ]) => {
        $(
            #[allow(non_upper_case_globals)]
            #[allow(unused)]
            $(#[$inner])*
            pub const $valname: FieldValue<$valtype, Register> =
                FieldValue::<$valtype, Register>::new(super::$field.mask, super::$field.shift, $value);
        )*

        #[allow(dead_code)]
        #[allow(non_camel_case_types)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq)]
        #[repr($valtype)] // so that values larger than isize::MAX can be stored
        pub enum Value {
            $(
                $(#[$inner])*
                $valname = $value,
            )*
        }

        impl TryFromValue<$valtype> for Value {
            type EnumType = Value;

            fn try_from_value(v: $valtype) -> ::core::option::Option<Self::EnumType> {
                match v {
                    $(
                        $(#[$inner])*
                        x if x == Value::$valname as $valtype => ::core::option::Option::Some(Value::$valname),
                    )*

                    _ => ::core::option::Option::None
                }
            }
        }

        impl From<Value> for FieldValue<$valtype, Register> {
            fn from(v: Value) -> Self {
                Self::new(super::$field.mask, super::$field.shift, v as $valtype)
            }
        }
    };

    (@values $valtype:ident, $field:ident, []) => {
        #[allow(dead_code)]
        #[allow(non_camel_case_types)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq)]
        pub enum Value {}

        impl TryFromValue<$valtype> for Value {
            type EnumType = Value;

            fn try_from_value(_v: $valtype) -> ::core::option::Option<Self::EnumType> {
                ::core::option::Option::None
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::{FieldInfo, FieldValue, RegisterLayout};
    use crate::{LocalRegisterCopy, UIntLike};

    register_bitfields![u32,
        Control [
            ENABLE      NUMBITS(1),
            MODE        NUMBITS(2) [
                Off = 0,
                Slow = 1,
                Fast = 3
            ],
            RESERVED3   NUMBITS(5),
            COUNT       NUMBITS(8),
            KEY         NUMBITS(16)
        ],
        Tiny [
            LOW         NUMBITS(16),
            HIGH        NUMBITS(16)
        ]
    ];

    register_bitfields![u8,
        Byte [
            A           NUMBITS(3),
            B           NUMBITS(5)
        ]
    ];

    #[test]
    fn positions_are_running_sums() {
        assert_eq!(Control::ENABLE.shift, 0);
        assert_eq!(Control::MODE.shift, 1);
        assert_eq!(Control::RESERVED3.shift, 3);
        assert_eq!(Control::COUNT.shift, 8);
        assert_eq!(Control::KEY.shift, 16);

        assert_eq!(Control::MODE.mask, 0x0000_0006);
        assert_eq!(Control::COUNT.mask, 0x0000_FF00);
        assert_eq!(Control::KEY.mask, 0xFFFF_0000);
        assert_eq!(Byte::B.mask, 0xF8);
    }

    #[test]
    fn set_clear_and_named_values() {
        assert_eq!(Control::ENABLE::SET.value(), 1);
        assert_eq!(Control::ENABLE::CLEAR.value(), 0);
        assert_eq!(Control::ENABLE::CLEAR.mask(), 1);
        assert_eq!(Control::MODE::Fast.value(), 0b110);
        assert_eq!(Control::COUNT::SET.value(), 0xFF00);
        assert_eq!(Control::COUNT.val(0x1AB).value(), 0xAB00);
    }

    #[test]
    fn modify_replaces_only_masked_bits() {
        let original = 0xDEAD_BEEF_u32;
        let updated = Control::COUNT.val(0x12).modify(original);
        assert_eq!(updated, 0xDEAD_12EF);
        assert_eq!(Control::COUNT.read(updated), 0x12);
        assert_eq!(updated & !Control::COUNT.mask, original & !Control::COUNT.mask);
    }

    #[test]
    fn combined_values() {
        let mut value = Control::ENABLE::SET + Control::MODE::Slow;
        value += Control::KEY.val(0x5FA0);
        assert_eq!(value.mask(), 0xFFFF_0007);
        assert_eq!(value.value(), 0x5FA0_0003);
        assert_eq!(u32::from(value), 0x5FA0_0003);
        assert!(value.matches_all(0x5FA0_FF03));
        assert!(!value.matches_all(0x5FA0_FF05));
        assert!(value.any_matching_bits_set(0x0000_0001));
        assert!(!FieldValue::<u32, Control::Register>::none().any_matching_bits_set(u32::MAX));
    }

    #[test]
    fn enum_decoding() {
        let reg = LocalRegisterCopy::<u32, Control::Register>::new(0b011);
        assert_eq!(reg.read_as_enum(Control::MODE), Some(Control::MODE::Value::Slow));
        let reg = LocalRegisterCopy::<u32, Control::Register>::new(0b101);
        assert_eq!(reg.read_as_enum::<Control::MODE::Value>(Control::MODE), None);
    }

    #[test]
    fn layout_tables() {
        assert_eq!(<Control::Register as RegisterLayout<u32>>::NAME, "Control");
        let names: Vec<_> = Control::Register::FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names, ["ENABLE", "MODE", "RESERVED3", "COUNT", "KEY"]);

        assert_eq!(Control::Register::union_mask(), u32::MAX);
        assert!(Control::Register::fields_disjoint());
        assert_eq!(Tiny::Register::union_mask(), u32::MAX);
        assert_eq!(Byte::Register::union_mask(), u8::MAX);

        let reserved: Vec<_> = Control::Register::FIELDS
            .iter()
            .filter(|f| f.is_reserved())
            .map(|f| f.name)
            .collect();
        assert_eq!(reserved, ["RESERVED3"]);
        assert_eq!(Control::Register::named_fields().count(), 4);
    }

    fn named_table<T: UIntLike, R: RegisterLayout<T>>() -> Vec<&'static FieldInfo<T>> {
        R::named_fields().collect()
    }

    #[test]
    fn tables_outlive_any_register_width() {
        let wide: Vec<_> = named_table::<u32, Control::Register>()
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(wide, ["ENABLE", "MODE", "COUNT", "KEY"]);

        let narrow = named_table::<u8, Byte::Register>();
        assert_eq!(narrow.len(), 2);
        assert_eq!(narrow[1].mask, 0xF8);
    }
}
