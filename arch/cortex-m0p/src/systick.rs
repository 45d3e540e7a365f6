// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! ARM Cortex-M0+ SysTick peripheral.
//!
//! Documented in the Cortex-M0+ Devices Generic User Guide, Chapter 4.4

use mmio_registers::registers::{ReadOnly, ReadWrite};
use mmio_registers::{register_bitfields, register_structs};

#[cfg(feature = "systick")]
use mmio_registers::StaticRef;

register_structs! {
    /// SysTick registers.
    pub SysTickRegisters {
        /// SysTick Control and Status Register
        (0x00 => pub csr: ReadWrite<u32, ControlAndStatus::Register>),

        /// SysTick Reload Value Register
        (0x04 => pub rvr: ReadWrite<u32, ReloadValue::Register>),

        /// SysTick Current Value Register
        (0x08 => pub cvr: ReadWrite<u32, CurrentValue::Register>),

        /// SysTick Calibration Value Register
        (0x0C => pub calib: ReadOnly<u32, CalibrationValue::Register>),

        (0x10 => @END),
    }
}

register_bitfields![u32,
    pub ControlAndStatus [
        /// Enable the counter (1 == Enabled).
        ENABLE      NUMBITS(1),

        /// Set to 1 to enable SysTick exception request.
        TICKINT     NUMBITS(1),

        /// Clock source is (0) External Clock or (1) Processor Clock.
        CLKSOURCE   NUMBITS(1) [
            ExternalReference = 0,
            Processor = 1
        ],

        RESERVED3   NUMBITS(13),

        /// Returns 1 if timer counted to 0 since last time this was read.
        COUNTFLAG   NUMBITS(1),

        RESERVED17  NUMBITS(15)
    ],

    pub ReloadValue [
        /// Value loaded to `syst_cvr` when counter is enabled and reaches 0.
        RELOAD      NUMBITS(24),
        RESERVED24  NUMBITS(8)
    ],

    pub CurrentValue [
        /// Reads current value. Write of any value sets to 0.
        CURRENT     NUMBITS(24),
        RESERVED24  NUMBITS(8)
    ],

    pub CalibrationValue [
        /// Reload value for 10ms ticks, or 0 if no calibration.
        TENMS       NUMBITS(24),

        RESERVED24  NUMBITS(6),

        /// 0 if TENMS value is exact, 1 if inexact or not given.
        SKEW        NUMBITS(1),

        /// 0 if device provides reference clock to processor.
        NOREF       NUMBITS(1)
    ]
];

/// Base address of the SysTick registers.
pub const SYSTICK_BASE: usize = 0xE000_E010;

/// The SysTick of the core.
#[cfg(feature = "systick")]
pub const SYSTICK: StaticRef<SysTickRegisters> =
    unsafe { StaticRef::new(SYSTICK_BASE as *const SysTickRegisters) };

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_covers, Backing};
    use core::mem::{offset_of, size_of};
    use mmio_registers::interfaces::{ReadWriteable, Readable, Writeable};

    #[test]
    fn layout() {
        assert_eq!(size_of::<SysTickRegisters>(), 0x10);
        assert_eq!(offset_of!(SysTickRegisters, rvr), 0x04);
        assert_eq!(offset_of!(SysTickRegisters, calib), 0x0C);
    }

    #[test]
    fn fields_cover_registers() {
        assert_covers::<ControlAndStatus::Register>();
        assert_covers::<ReloadValue::Register>();
        assert_covers::<CurrentValue::Register>();
        assert_covers::<CalibrationValue::Register>();

        assert_eq!(ControlAndStatus::COUNTFLAG.mask, 1 << 16);
        assert_eq!(CalibrationValue::SKEW.mask, 1 << 30);
        assert_eq!(CalibrationValue::NOREF.mask, 1 << 31);
    }

    #[test]
    fn program_on_memory() {
        let backing = Backing::<4>::new();
        let systick = unsafe { backing.block::<SysTickRegisters>() };

        systick.rvr.write(ReloadValue::RELOAD.val(47_999));
        systick.csr.write(ControlAndStatus::CLKSOURCE::Processor + ControlAndStatus::ENABLE::SET);
        systick.csr.modify(ControlAndStatus::TICKINT::SET);

        assert_eq!(systick.rvr.get(), 47_999);
        assert_eq!(systick.csr.get(), 0b111);
        assert_eq!(
            systick.csr.read_as_enum(ControlAndStatus::CLKSOURCE),
            Some(ControlAndStatus::CLKSOURCE::Value::Processor)
        );
        assert_eq!(backing.word(0x00), 0b111);
    }

    #[test]
    fn debug_output() {
        let backing = Backing::<4>::new();
        let systick = unsafe { backing.block::<SysTickRegisters>() };
        systick.csr.set(0x0001_0005);
        assert_eq!(
            format!("{:?}", systick.csr.debug()),
            "ControlAndStatus { ENABLE: 1, TICKINT: 0, CLKSOURCE: Processor, COUNTFLAG: 1 }"
        );
    }
}
