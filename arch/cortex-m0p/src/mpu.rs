// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! ARM Cortex-M0+ Memory Protection Unit (MPU)
//!
//! The MPU is an optional part of the core. When present it has eight
//! unified regions, each with eight equal subregions.
//!
//! <https://developer.arm.com/documentation/dui0662/b/Cortex-M0--Peripherals/Optional-Memory-Protection-Unit>

use mmio_registers::registers::{ReadOnly, ReadWrite};
use mmio_registers::{register_bitfields, register_structs, StaticRef};

register_structs! {
    /// MPU Registers for the Cortex-M0+ family.
    pub MpuRegisters {
        /// Indicates whether the MPU is present and, if so, how many regions it
        /// supports.
        (0x00 => pub r#type: ReadOnly<u32, Type::Register>),

        /// The control register.
        (0x04 => pub ctrl: ReadWrite<u32, Control::Register>),

        /// Selects the region number (zero-indexed) referenced by the region
        /// base address and region attribute and size registers.
        (0x08 => pub rnr: ReadWrite<u32, RegionNumber::Register>),

        /// Defines the base address of the currently selected MPU region.
        (0x0C => pub rbar: ReadWrite<u32, RegionBaseAddress::Register>),

        /// Defines the region size and memory attributes of the selected MPU
        /// region.
        (0x10 => pub rasr: ReadWrite<u32, RegionAttributes::Register>),

        (0x14 => @END),
    }
}

register_bitfields![u32,
    pub Type [
        /// Indicates whether the MPU has separate instruction and data maps.
        /// Always unified on the M0+.
        SEPARATE    NUMBITS(1),
        RESERVED1   NUMBITS(7),
        /// The number of data regions supported. If this field reads-as-zero the
        /// processor does not implement an MPU
        DREGION     NUMBITS(8),
        /// Number of supported MPU instruction regions. Always reads 0.
        IREGION     NUMBITS(8),
        RESERVED24  NUMBITS(8)
    ],

    pub Control [
        /// Enables the MPU
        ENABLE      NUMBITS(1) [
            Disable = 0,
            Enable = 1
        ],
        /// Enables the operation of MPU during hard fault and NMI handlers
        HFNMIENA    NUMBITS(1) [
            Disable = 0,
            Enable = 1
        ],
        /// Enables privileged software access to the default
        /// memory map
        PRIVDEFENA  NUMBITS(1) [
            Disable = 0,
            Enable = 1
        ],
        RESERVED3   NUMBITS(29)
    ],

    pub RegionNumber [
        /// Region referenced by the RBAR and RASR registers.
        REGION      NUMBITS(8),
        RESERVED8   NUMBITS(24)
    ],

    pub RegionBaseAddress [
        /// Specifies which MPU region to set if VALID is set to 1.
        REGION      NUMBITS(4),
        /// MPU Region Number valid bit.
        VALID       NUMBITS(1) [
            /// Use the region number in RNR
            UseRnr = 0,
            /// Use the REGION field of this register
            UseRbar = 1
        ],
        RESERVED5   NUMBITS(3),
        /// Base address of the selected region, bits 31:8.
        ADDR        NUMBITS(24)
    ],

    pub RegionAttributes [
        /// Enables the region
        ENABLE      NUMBITS(1),
        /// Specifies the region size, being 2^(SIZE+1) (minimum 7)
        SIZE        NUMBITS(5),
        RESERVED6   NUMBITS(2),
        /// Subregion disable bits
        SRD         NUMBITS(8),
        /// Bufferable
        B           NUMBITS(1),
        /// Cacheable
        C           NUMBITS(1),
        /// Shareable
        S           NUMBITS(1),
        RESERVED19  NUMBITS(5),
        /// Defines access permissions
        AP          NUMBITS(3) [
            //                                 Privileged  Unprivileged
            //                                 Access      Access
            NoAccess = 0b000,               // --          --
            PrivilegedOnly = 0b001,         // RW          --
            UnprivilegedReadOnly = 0b010,   // RW          R-
            ReadWrite = 0b011,              // RW          RW
            Reserved = 0b100,               // undef       undef
            PrivilegedOnlyReadOnly = 0b101, // R-          --
            ReadOnly = 0b110,               // R-          R-
            ReadOnlyAlias = 0b111           // R-          R-
        ],
        RESERVED27  NUMBITS(1),
        /// Instruction fetches disabled
        XN          NUMBITS(1) [
            Enable = 0,
            Disable = 1
        ],
        RESERVED29  NUMBITS(3)
    ]
];

/// Base address of the MPU.
pub const MPU_BASE: usize = 0xE000_ED90;

/// The MPU of the core.
pub const MPU: StaticRef<MpuRegisters> =
    unsafe { StaticRef::new(MPU_BASE as *const MpuRegisters) };

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{assert_covers, Backing};
    use core::mem::{offset_of, size_of};
    use mmio_registers::interfaces::{ReadWriteable, Readable, Writeable};

    #[test]
    fn layout() {
        assert_eq!(size_of::<MpuRegisters>(), 0x14);
        assert_eq!(offset_of!(MpuRegisters, ctrl), 0x04);
        assert_eq!(offset_of!(MpuRegisters, rnr), 0x08);
        assert_eq!(offset_of!(MpuRegisters, rbar), 0x0C);
        assert_eq!(offset_of!(MpuRegisters, rasr), 0x10);
    }

    #[test]
    fn fields_cover_registers() {
        assert_covers::<Type::Register>();
        assert_covers::<Control::Register>();
        assert_covers::<RegionNumber::Register>();
        assert_covers::<RegionBaseAddress::Register>();
        assert_covers::<RegionAttributes::Register>();

        assert_eq!(RegionBaseAddress::ADDR.mask, 0xFFFF_FF00);
        assert_eq!(RegionAttributes::AP.mask, 0x0700_0000);
        assert_eq!(RegionAttributes::XN.mask, 1 << 28);
    }

    #[test]
    fn configure_region() {
        let backing = Backing::<5>::new();
        let mpu = unsafe { backing.block::<MpuRegisters>() };

        mpu.rbar.write(
            RegionBaseAddress::ADDR.val(0x2000_0000 >> 8)
                + RegionBaseAddress::VALID::UseRbar
                + RegionBaseAddress::REGION.val(3),
        );
        mpu.rasr.write(
            RegionAttributes::ENABLE::SET
                + RegionAttributes::SIZE.val(11)
                + RegionAttributes::AP::ReadWrite
                + RegionAttributes::XN::Disable,
        );
        mpu.ctrl
            .modify(Control::ENABLE::Enable + Control::PRIVDEFENA::Enable);

        assert_eq!(backing.word(0x0C), 0x2000_0013);
        assert_eq!(backing.word(0x10), 0x1300_0017);
        assert_eq!(backing.word(0x04), 0b101);
        assert_eq!(
            mpu.rasr.read_as_enum(RegionAttributes::AP),
            Some(RegionAttributes::AP::Value::ReadWrite)
        );
        assert!(!mpu.ctrl.is_set(Control::HFNMIENA));
    }
}
