// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Implementation of registers and bitfields.
//!
//! Provides efficient mechanisms to express and use type-checked memory mapped
//! registers and bitfields.
//!
//! The types in this module have no constructors and implement neither
//! `Clone`, `Copy` nor `Drop`: they only exist as fields of a register
//! block that is overlaid on device memory through a
//! [`StaticRef`](crate::StaticRef).
//!
//! ```rust
//! # fn main() {}
//!
//! use mmio_registers::registers::{ReadOnly, ReadWrite, Reserved};
//! use mmio_registers::register_bitfields;
//!
//! // Register maps are specified like this:
//! #[repr(C)]
//! struct Registers {
//!     // Control register: read-write
//!     cr: ReadWrite<u32, Control::Register>,
//!     _reserved: [Reserved<u32>; 3],
//!     // Status register: read-only
//!     s: ReadOnly<u32, Status::Register>,
//! }
//!
//! // Register fields and definitions look like this:
//! register_bitfields![u32,
//!     Control [
//!         /// Master Enable
//!         MEN       NUMBITS(1),
//!         /// Master Disable
//!         MDIS      NUMBITS(1),
//!         RESERVED2 NUMBITS(5),
//!         /// Software Reset
//!         SWRST     NUMBITS(1),
//!         /// Stop the Current Transfer
//!         STOP      NUMBITS(1),
//!         RESERVED9 NUMBITS(23)
//!     ],
//!
//!     Status [
//!         TXCOMPLETE  NUMBITS(1),
//!         TXINTERRUPT NUMBITS(1),
//!         RXCOMPLETE  NUMBITS(1),
//!         RXINTERRUPT NUMBITS(1),
//!         MODE        NUMBITS(2) [
//!             FullDuplex = 0,
//!             HalfDuplex = 1,
//!             Loopback = 2,
//!             Disabled = 3
//!         ],
//!         ERRORCOUNT  NUMBITS(3),
//!         RESERVED9   NUMBITS(23)
//!     ]
//! ];
//! ```

use core::cell::UnsafeCell;
use core::marker::PhantomData;

use crate::interfaces::{Readable, Writeable};
use crate::{mmio, RegisterLongName, UIntLike};

/// Read/Write registers.
///
/// For accessing and manipulating the register contents, the
/// [`Readable`], [`Writeable`] and
/// [`ReadWriteable`](crate::interfaces::ReadWriteable) traits are
/// implemented.
// To successfully alias this structure onto hardware registers in memory, this
// struct must be exactly the size of the `T`.
#[repr(transparent)]
pub struct ReadWrite<T: UIntLike, R: RegisterLongName = ()> {
    value: UnsafeCell<T>,
    associated_register: PhantomData<R>,
}
impl<T: UIntLike, R: RegisterLongName> Readable for ReadWrite<T, R> {
    type T = T;
    type R = R;

    #[inline]
    fn get(&self) -> Self::T {
        unsafe { mmio::read_volatile(self.value.get()) }
    }
}
impl<T: UIntLike, R: RegisterLongName> Writeable for ReadWrite<T, R> {
    type T = T;
    type R = R;

    #[inline]
    fn set(&self, value: T) {
        unsafe { mmio::write_volatile(self.value.get(), value) }
    }
}

/// Read-only registers.
///
/// For accessing the register contents the [`Readable`] trait is
/// implemented.
// The hardware may change the value behind our back, so the storage is an
// `UnsafeCell` even though this side never writes it.
#[repr(transparent)]
pub struct ReadOnly<T: UIntLike, R: RegisterLongName = ()> {
    value: UnsafeCell<T>,
    associated_register: PhantomData<R>,
}
impl<T: UIntLike, R: RegisterLongName> Readable for ReadOnly<T, R> {
    type T = T;
    type R = R;

    #[inline]
    fn get(&self) -> T {
        unsafe { mmio::read_volatile(self.value.get()) }
    }
}

/// Reserved registers.
///
/// Occupies the space of a `T` in a register block and offers no way to
/// access it.
#[repr(transparent)]
pub struct Reserved<T: UIntLike> {
    _value: UnsafeCell<T>,
}
