// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! MMIO Register Interface
//!
//! Typed overlays for memory-mapped peripheral register blocks.
//!
//! A peripheral is described by two declarations. `register_bitfields!`
//! lists the fields of each register from the least significant bit up,
//! by size only; positions and masks are computed at compile time and the
//! sizes must add up to the register width. `register_structs!` lists the
//! registers of a block at their datasheet offsets; gaps become
//! [`Reserved`](registers::Reserved) padding and every offset is checked at compile time.
//!
//! ```rust
//! # fn main() {}
//! use mmio_registers::interfaces::{Readable, ReadWriteable, Writeable};
//! use mmio_registers::registers::{ReadOnly, ReadWrite};
//! use mmio_registers::{register_bitfields, register_structs, StaticRef};
//!
//! register_structs! {
//!     TimerRegisters {
//!         (0x00 => ctrl: ReadWrite<u32, Control::Register>),
//!         (0x04 => _reserved0),
//!         (0x0c => status: ReadOnly<u32, Status::Register>),
//!         (0x10 => @END),
//!     }
//! }
//!
//! register_bitfields![u32,
//!     Control [
//!         /// Counter enable
//!         ENABLE      NUMBITS(1),
//!         MODE        NUMBITS(2) [
//!             OneShot = 0,
//!             Periodic = 1,
//!             FreeRunning = 2
//!         ],
//!         RESERVED3   NUMBITS(29)
//!     ],
//!     Status [
//!         EXPIRED     NUMBITS(1),
//!         RESERVED1   NUMBITS(31)
//!     ]
//! ];
//!
//! const TIMER0: StaticRef<TimerRegisters> =
//!     unsafe { StaticRef::new(0x4000_1000 as *const TimerRegisters) };
//!
//! fn start() {
//!     TIMER0.ctrl.write(Control::MODE::Periodic + Control::ENABLE::SET);
//!     while !TIMER0.status.is_set(Status::EXPIRED) {}
//!     TIMER0.ctrl.modify(Control::ENABLE::CLEAR);
//! }
//! ```

#![cfg_attr(not(any(test, feature = "mmio-emu")), no_std)]

pub mod bits;
pub mod debug;
pub mod fields;
pub mod interfaces;
pub mod macros;
pub mod registers;

mod local_register;
mod mmio;
mod static_ref;

#[cfg(feature = "mmio-emu")]
pub mod mmio_emu;

pub use bits::bank_len;
pub use local_register::LocalRegisterCopy;
pub use static_ref::StaticRef;

use core::fmt::Debug;
use core::ops::{BitAnd, BitOr, BitOrAssign, Not, Shl, Shr};

/// Trait representing the base type of registers.
///
/// UIntLike defines basic properties of types required to
/// read/write/modify a register through its methods and supertrait
/// requirements.
///
/// It features a range of default implementations for common unsigned
/// integer types, such as [`u8`], [`u16`], [`u32`], [`u64`] and
/// [`usize`].
pub trait UIntLike:
    BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitOrAssign
    + Not<Output = Self>
    + Eq
    + Shr<usize, Output = Self>
    + Shl<usize, Output = Self>
    + Copy
    + Clone
    + Debug
    + 'static
{
    /// Width of the type in bits.
    const BITS: usize;

    /// Return the representation of the value `0` in the implementing
    /// type.
    ///
    /// To get the largest representable value, use a bitwise negation:
    /// `!(<T as UIntLike>::zero())`.
    fn zero() -> Self;
}

macro_rules! UIntLike_impl_for {
    ($type:ty) => {
        impl UIntLike for $type {
            const BITS: usize = <$type>::BITS as usize;

            fn zero() -> Self {
                0
            }
        }
    };
}

UIntLike_impl_for!(u8);
UIntLike_impl_for!(u16);
UIntLike_impl_for!(u32);
UIntLike_impl_for!(u64);
UIntLike_impl_for!(usize);

/// Descriptive name for each register.
pub trait RegisterLongName {}

// Registers accessed only as whole words.
impl RegisterLongName for () {}
