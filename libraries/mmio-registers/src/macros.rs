// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Macros for cleanly defining peripheral registers.

/// Define a peripheral register block.
///
/// Registers are listed with the byte offset they have in the datasheet.
/// An offset followed by a bare name (`_reserved0`) starts a reserved
/// range that lasts until the next offset; it becomes an array of
/// [`Reserved<u32>`](crate::registers::Reserved). The list ends with the
/// total size of the block, `(size => @END)`.
///
/// The generated struct is `#[repr(C)]`. Every member, padding included,
/// is checked to sit at its declared offset and the struct is checked to
/// have the declared size, all at compile time.
///
/// ```rust
/// # fn main() {}
/// use mmio_registers::registers::{ReadOnly, ReadWrite};
/// use mmio_registers::register_structs;
///
/// register_structs! {
///     pub UartRegisters {
///         (0x000 => pub data: ReadWrite<u32>),
///         (0x004 => pub status: ReadOnly<u32>),
///         (0x008 => _reserved0),
///         (0x100 => pub baud: [ReadWrite<u32>; 2]),
///         (0x108 => @END),
///     },
///     TimerRegisters {
///         (0x00 => count: ReadOnly<u32>),
///         (0x04 => @END),
///     }
/// }
/// ```
///
/// A block whose declared offsets do not match its layout is rejected:
///
/// ```rust,compile_fail
/// # fn main() {}
/// use mmio_registers::registers::ReadWrite;
/// use mmio_registers::register_structs;
///
/// register_structs! {
///     Broken {
///         (0x00 => a: ReadWrite<u32>),
///         (0x08 => b: ReadWrite<u32>),
///         (0x0C => @END),
///     }
/// }
/// ```
#[macro_export]
macro_rules! register_structs {
    {
        $(
            $(#[$attr:meta])*
            $vis_struct:vis $name:ident {
                $( $fields:tt )*
            }
        ),*
        $(,)?
    } => {
        $(
            $crate::register_fields!(@root $(#[$attr])* $vis_struct $name { $($fields)* });
            $crate::register_fields!(@check $name ( $($fields)* ));
        )*
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! register_fields {
    // Macro entry point.
    (@root $(#[$attr_struct:meta])* $vis_struct:vis $name:ident { $($input:tt)* } ) => {
        $crate::register_fields!(
            @munch (
                $($input)*
            ) -> {
                $vis_struct struct $(#[$attr_struct])* $name
            }
        );
    };

    // Print the struct once all fields have been munched.
    (@munch
        (
            $(#[$attr_end:meta])*
            ($offset:expr => @END),
        )
        -> {$vis_struct:vis struct $(#[$attr_struct:meta])* $name:ident $(
                $(#[$attr:meta])*
                ($vis:vis $id:ident: $ty:ty)
            )*}
    ) => {
        $(#[$attr_struct])*
        #[repr(C)]
        $vis_struct struct $name {
            $(
                $(#[$attr])*
                $vis $id: $ty
            ),*
        }
    };

    // Munch field.
    (@munch
        (
            $(#[$attr:meta])*
            ($offset_start:expr => $vis:vis $field:ident: $ty:ty),
            $($after:tt)*
        )
        -> {$($output:tt)*}
    ) => {
        $crate::register_fields!(
            @munch (
                $($after)*
            ) -> {
                $($output)*
                $(#[$attr])*
                ($vis $field: $ty)
            }
        );
    };

    // Munch padding.
    (@munch
        (
            $(#[$attr:meta])*
            ($offset_start:expr => $padding:ident),
            $(#[$attr_next:meta])*
            ($offset_end:expr => $($next:tt)*),
            $($after:tt)*
        )
        -> {$($output:tt)*}
    ) => {
        $crate::register_fields!(
            @munch (
                $(#[$attr_next])*
                ($offset_end => $($next)*),
                $($after)*
            ) -> {
                $($output)*
                $(#[$attr])*
                ($padding: [$crate::registers::Reserved<u32>; $crate::bank_len($offset_start, $offset_end - 4, 4)])
            }
        );
    };

    // Size check.
    (@check $name:ident (
        $(#[$attr:meta])*
        ($offset:expr => @END),
    )) => {
        const _: () = assert!(
            ::core::mem::size_of::<$name>() == $offset,
            concat!("size of ", stringify!($name), " does not match its @END offset")
        );
    };

    // Offset check for a register.
    (@check $name:ident (
        $(#[$attr:meta])*
        ($offset:expr => $vis:vis $field:ident: $ty:ty),
        $($after:tt)*
    )) => {
        const _: () = assert!(
            ::core::mem::offset_of!($name, $field) == $offset,
            concat!("offset of ", stringify!($name), "::", stringify!($field), " does not match")
        );
        $crate::register_fields!(@check $name ( $($after)* ));
    };

    // Offset check for a reserved range.
    (@check $name:ident (
        $(#[$attr:meta])*
        ($offset:expr => $padding:ident),
        $($after:tt)*
    )) => {
        const _: () = assert!(
            ::core::mem::offset_of!($name, $padding) == $offset,
            concat!("offset of ", stringify!($name), "::", stringify!($padding), " does not match")
        );
        $crate::register_fields!(@check $name ( $($after)* ));
    };
}

#[cfg(test)]
mod tests {
    use core::mem::{offset_of, size_of};

    use crate::registers::{ReadOnly, ReadWrite};

    crate::register_structs! {
        Sparse {
            (0x000 => first: ReadWrite<u32>),
            (0x004 => _reserved0),
            (0x080 => second: ReadOnly<u32>),
            (0x084 => _reserved1),
            (0x300 => bank: [ReadWrite<u32>; 8]),
            (0x320 => _reserved2),
            (0x3F0 => @END),
        },
        pub Dense {
            (0x00 => pub a: ReadWrite<u8>),
            (0x01 => pub b: ReadWrite<u8>),
            (0x02 => pub c: ReadWrite<u16>),
            (0x04 => pub d: ReadWrite<u32>),
            (0x08 => @END),
        }
    }

    #[test]
    fn padding_lengths() {
        assert_eq!(size_of::<Sparse>(), 0x3F0);
        assert_eq!(offset_of!(Sparse, second), 0x080);
        assert_eq!(offset_of!(Sparse, _reserved1), 0x084);
        assert_eq!(offset_of!(Sparse, bank), 0x300);
        assert_eq!(offset_of!(Sparse, _reserved2), 0x320);
        assert_eq!(size_of::<Dense>(), 8);
    }
}
