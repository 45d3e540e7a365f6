// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Cortex-M0+ NVIC
//!
//! The Cortex-M0+ supports up to 32 external interrupts, so each of the
//! enable and pending registers is a single word with one bit per
//! interrupt. Priorities are two bits wide and held in the upper bits of
//! one byte lane per interrupt, four interrupts per priority register.
//!
//! <https://developer.arm.com/documentation/dui0662/b/Cortex-M0--Peripherals/Nested-Vectored-Interrupt-Controller>

use mmio_registers::registers::ReadWrite;
use mmio_registers::{register_bitfields, register_structs, StaticRef};

register_structs! {
    /// NVIC Registers.
    pub NvicRegisters {
        /// Interrupt Set-Enable Register
        (0x000 => pub iser: ReadWrite<u32>),
        (0x004 => _reserved0),

        /// Interrupt Clear-Enable Register
        (0x080 => pub icer: ReadWrite<u32>),
        (0x084 => _reserved1),

        /// Interrupt Set-Pending Register
        (0x100 => pub ispr: ReadWrite<u32>),
        (0x104 => _reserved2),

        /// Interrupt Clear-Pending Register
        (0x180 => pub icpr: ReadWrite<u32>),
        (0x184 => _reserved3),

        /// Interrupt Priority Registers, IPR0 to IPR7
        (0x300 => pub ipr: [ReadWrite<u32, InterruptPriority::Register>; 8]),
        (0x320 => _reserved4),

        (0x3F0 => @END),
    }
}

register_bitfields![u32,
    pub InterruptPriority [
        RESERVED0   NUMBITS(6),
        /// Priority of interrupt 4n
        PRI_N0      NUMBITS(2),
        RESERVED8   NUMBITS(6),
        /// Priority of interrupt 4n + 1
        PRI_N1      NUMBITS(2),
        RESERVED16  NUMBITS(6),
        /// Priority of interrupt 4n + 2
        PRI_N2      NUMBITS(2),
        RESERVED24  NUMBITS(6),
        /// Priority of interrupt 4n + 3
        PRI_N3      NUMBITS(2)
    ]
];

/// Base address of the NVIC.
pub const NVIC_BASE: usize = 0xE000_E100;

/// The NVIC of the core.
pub const NVIC: StaticRef<NvicRegisters> =
    unsafe { StaticRef::new(NVIC_BASE as *const NvicRegisters) };

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_covers, Backing};
    use core::mem::{offset_of, size_of};
    use mmio_registers::interfaces::{ReadWriteable, Readable, Writeable};

    #[test]
    fn layout() {
        assert_eq!(size_of::<NvicRegisters>(), 0x3F0);
        assert_eq!(offset_of!(NvicRegisters, icer), 0x080);
        assert_eq!(offset_of!(NvicRegisters, ispr), 0x100);
        assert_eq!(offset_of!(NvicRegisters, icpr), 0x180);
        assert_eq!(offset_of!(NvicRegisters, ipr), 0x300);
        assert_eq!(offset_of!(NvicRegisters, _reserved4), 0x320);
    }

    #[test]
    fn priority_lanes() {
        assert_covers::<InterruptPriority::Register>();
        assert_eq!(InterruptPriority::PRI_N0.mask, 0x0000_00C0);
        assert_eq!(InterruptPriority::PRI_N1.mask, 0x0000_C000);
        assert_eq!(InterruptPriority::PRI_N2.mask, 0x00C0_0000);
        assert_eq!(InterruptPriority::PRI_N3.mask, 0xC000_0000);
    }

    #[test]
    fn registers_land_at_their_offsets() {
        let backing = Backing::<252>::new();
        let nvic = unsafe { backing.block::<NvicRegisters>() };

        nvic.iser.set(1 << 5);
        nvic.icer.set(1 << 6);
        nvic.ispr.set(1 << 7);
        nvic.icpr.set(1 << 8);
        nvic.ipr[1].write(InterruptPriority::PRI_N2.val(3));
        nvic.ipr[7].modify(InterruptPriority::PRI_N0.val(1));

        assert_eq!(backing.word(0x000), 1 << 5);
        assert_eq!(backing.word(0x080), 1 << 6);
        assert_eq!(backing.word(0x100), 1 << 7);
        assert_eq!(backing.word(0x180), 1 << 8);
        assert_eq!(backing.word(0x304), 0x00C0_0000);
        assert_eq!(backing.word(0x31C), 0x0000_0040);
        assert_eq!(nvic.ipr[1].read(InterruptPriority::PRI_N2), 3);
    }
}
