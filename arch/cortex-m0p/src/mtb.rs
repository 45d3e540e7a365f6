// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! ARM Cortex-M0+ Micro Trace Buffer (MTB)
//!
//! The MTB is placed by the chip vendor, so there is no base address
//! here. Chip crates alias `MtbRegisters` at their own address with
//! `StaticRef::new`.
//!
//! The block ends in the standard CoreSight identification registers.

use mmio_registers::registers::{ReadOnly, ReadWrite};
use mmio_registers::{register_bitfields, register_structs};

register_structs! {
    /// MTB Registers.
    pub MtbRegisters {
        /// Position Register
        (0x000 => pub position: ReadWrite<u32, Position::Register>),

        /// Master Trace Control Register
        (0x004 => pub master: ReadWrite<u32, Master::Register>),

        /// Flow Register
        (0x008 => pub flow: ReadWrite<u32, Flow::Register>),

        /// Base Register, the SRAM address the trace buffer starts at.
        (0x00C => pub base: ReadOnly<u32>),
        (0x010 => _reserved0),

        /// Integration Mode Control Register
        (0xF00 => pub itctrl: ReadWrite<u32, IntegrationModeControl::Register>),
        (0xF04 => _reserved1),

        /// Claim Tag Set Register
        (0xFA0 => pub claimset: ReadWrite<u32>),

        /// Claim Tag Clear Register
        (0xFA4 => pub claimclr: ReadWrite<u32>),

        /// Device Affinity Registers 0 and 1
        (0xFA8 => pub devaff: [ReadOnly<u32>; 2]),

        /// Lock Access Register
        (0xFB0 => pub lar: ReadWrite<u32>),

        /// Lock Status Register
        (0xFB4 => pub lsr: ReadOnly<u32, LockStatus::Register>),

        /// Authentication Status Register
        (0xFB8 => pub authstatus: ReadOnly<u32, AuthenticationStatus::Register>),

        /// Device Architecture Register
        (0xFBC => pub devarch: ReadOnly<u32, DeviceArchitecture::Register>),

        /// Device Configuration Registers 2, 1 and 0
        (0xFC0 => pub devid2: ReadOnly<u32>),
        (0xFC4 => pub devid1: ReadOnly<u32>),
        (0xFC8 => pub devid: ReadOnly<u32>),

        /// Device Type Register
        (0xFCC => pub devtype: ReadOnly<u32, DeviceType::Register>),

        /// Peripheral Identification Registers
        (0xFD0 => pub pidr4: ReadOnly<u32, PeripheralId4::Register>),
        (0xFD4 => pub pidr5: ReadOnly<u32>),
        (0xFD8 => pub pidr6: ReadOnly<u32>),
        (0xFDC => pub pidr7: ReadOnly<u32>),
        (0xFE0 => pub pidr0: ReadOnly<u32, PeripheralId0::Register>),
        (0xFE4 => pub pidr1: ReadOnly<u32, PeripheralId1::Register>),
        (0xFE8 => pub pidr2: ReadOnly<u32, PeripheralId2::Register>),
        (0xFEC => pub pidr3: ReadOnly<u32, PeripheralId3::Register>),

        /// Component Identification Registers
        (0xFF0 => pub cidr0: ReadOnly<u32, ComponentId0::Register>),
        (0xFF4 => pub cidr1: ReadOnly<u32, ComponentId1::Register>),
        (0xFF8 => pub cidr2: ReadOnly<u32, ComponentId2::Register>),
        (0xFFC => pub cidr3: ReadOnly<u32, ComponentId3::Register>),

        (0x1000 => @END),
    }
}

register_bitfields![u32,
    pub Position [
        RESERVED0   NUMBITS(2),
        /// Set when POINTER wraps around the end of the buffer.
        WRAP        NUMBITS(1),
        /// Trace write pointer, as a word offset into the buffer.
        POINTER     NUMBITS(29)
    ],

    pub Master [
        /// Size of the circular buffer, 2^(MASK+4) bytes.
        MASK        NUMBITS(5),
        /// Start tracing on a TSTART input.
        TSTARTEN    NUMBITS(1),
        /// Stop tracing on a TSTOP input.
        TSTOPEN     NUMBITS(1),
        /// Special function register writes need privilege.
        SFRWPRIV    NUMBITS(1),
        /// Trace RAM accesses need privilege.
        RAMPRIV     NUMBITS(1),
        /// Debug halt request.
        HALTREQ     NUMBITS(1),
        RESERVED10  NUMBITS(21),
        /// Main trace enable.
        EN          NUMBITS(1)
    ],

    pub Flow [
        /// Clear EN when POSITION reaches WATERMARK.
        AUTOSTOP    NUMBITS(1),
        /// Set HALTREQ when POSITION reaches WATERMARK.
        AUTOHALT    NUMBITS(1),
        RESERVED2   NUMBITS(1),
        WATERMARK   NUMBITS(29)
    ],

    pub IntegrationModeControl [
        /// Integration mode enable.
        IME         NUMBITS(1),
        RESERVED1   NUMBITS(31)
    ],

    pub LockStatus [
        /// Software lock implemented.
        SLI         NUMBITS(1),
        /// Software lock status.
        SLK         NUMBITS(1),
        /// Not thirty-two bit.
        NTT         NUMBITS(1),
        RESERVED3   NUMBITS(29)
    ],

    pub AuthenticationStatus [
        NSID        NUMBITS(2),
        NSNID       NUMBITS(2),
        SID         NUMBITS(2),
        SNID        NUMBITS(2),
        HID         NUMBITS(2),
        HNID        NUMBITS(2),
        RESERVED12  NUMBITS(20)
    ],

    pub DeviceArchitecture [
        ARCHID      NUMBITS(16),
        REVISION    NUMBITS(4),
        PRESENT     NUMBITS(1),
        ARCHITECT   NUMBITS(11) [
            Arm = 0x23B
        ]
    ],

    pub DeviceType [
        MAJOR       NUMBITS(4),
        SUB         NUMBITS(4),
        RESERVED8   NUMBITS(24)
    ],

    pub PeripheralId4 [
        /// JEP106 continuation code.
        DES_2       NUMBITS(4),
        /// Log2 of the number of 4KB blocks the component occupies.
        SIZE        NUMBITS(4),
        RESERVED8   NUMBITS(24)
    ],

    pub PeripheralId0 [
        PART_0      NUMBITS(8),
        RESERVED8   NUMBITS(24)
    ],

    pub PeripheralId1 [
        PART_1      NUMBITS(4),
        DES_0       NUMBITS(4),
        RESERVED8   NUMBITS(24)
    ],

    pub PeripheralId2 [
        DES_1       NUMBITS(3),
        JEDEC       NUMBITS(1),
        REVISION    NUMBITS(4),
        RESERVED8   NUMBITS(24)
    ],

    pub PeripheralId3 [
        CMOD        NUMBITS(4),
        REVAND      NUMBITS(4),
        RESERVED8   NUMBITS(24)
    ],

    pub ComponentId0 [
        PRMBL_0     NUMBITS(8),
        RESERVED8   NUMBITS(24)
    ],

    pub ComponentId1 [
        PRMBL_1     NUMBITS(4),
        CLASS       NUMBITS(4) [
            CoreSight = 0x9
        ],
        RESERVED8   NUMBITS(24)
    ],

    pub ComponentId2 [
        PRMBL_2     NUMBITS(8),
        RESERVED8   NUMBITS(24)
    ],

    pub ComponentId3 [
        PRMBL_3     NUMBITS(8),
        RESERVED8   NUMBITS(24)
    ]
];
