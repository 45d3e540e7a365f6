// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! ARM System Control Block
//!
//! <https://developer.arm.com/documentation/dui0662/b/Cortex-M0--Peripherals/System-Control-Block>
//!
//! Two parts of the block depend on the core configuration. The VTOR only
//! exists if the vendor implemented it; otherwise its word is reserved.
//! The ICSR has SysTick pending bits only if the core has a SysTick. Both
//! variants of each are defined and [`ScbRegisters`] and
//! [`InterruptControlAndState`] name the ones the target has.

use mmio_registers::registers::{ReadOnly, ReadWrite};
use mmio_registers::{register_bitfields, register_structs, StaticRef};

register_structs! {
    /// System Control Block of a core with a Vector Table Offset Register.
    pub ScbRegistersWithVtor {
        /// CPUID Base Register
        (0x00 => pub cpuid: ReadOnly<u32, CpuId::Register>),

        /// Interrupt Control and State Register
        (0x04 => pub icsr: ReadWrite<u32, InterruptControlAndState::Register>),

        /// Vector Table Offset Register
        (0x08 => pub vtor: ReadWrite<u32, VectorTableOffset::Register>),

        /// Application Interrupt and Reset Control Register
        (0x0C => pub aircr: ReadWrite<u32, ApplicationInterruptAndReset::Register>),

        /// System Control Register
        (0x10 => pub scr: ReadWrite<u32, SystemControl::Register>),

        /// Configuration and Control Register
        (0x14 => pub ccr: ReadOnly<u32, ConfigurationAndControl::Register>),

        (0x18 => _reserved0),

        /// System Handler Priority Register 2
        (0x1C => pub shpr2: ReadWrite<u32, SystemHandlerPriority2::Register>),

        /// System Handler Priority Register 3
        (0x20 => pub shpr3: ReadWrite<u32, SystemHandlerPriority3::Register>),

        (0x24 => @END),
    },

    /// System Control Block of a core without a Vector Table Offset
    /// Register.
    pub ScbRegistersWithoutVtor {
        (0x00 => pub cpuid: ReadOnly<u32, CpuId::Register>),
        (0x04 => pub icsr: ReadWrite<u32, InterruptControlAndState::Register>),

        /// VTOR not implemented
        (0x08 => _reserved0),

        (0x0C => pub aircr: ReadWrite<u32, ApplicationInterruptAndReset::Register>),
        (0x10 => pub scr: ReadWrite<u32, SystemControl::Register>),
        (0x14 => pub ccr: ReadOnly<u32, ConfigurationAndControl::Register>),
        (0x18 => _reserved1),
        (0x1C => pub shpr2: ReadWrite<u32, SystemHandlerPriority2::Register>),
        (0x20 => pub shpr3: ReadWrite<u32, SystemHandlerPriority3::Register>),
        (0x24 => @END),
    }
}

/// System Control Block layout of the target.
#[cfg(feature = "scb-vtor")]
pub type ScbRegisters = ScbRegistersWithVtor;
/// System Control Block layout of the target.
#[cfg(not(feature = "scb-vtor"))]
pub type ScbRegisters = ScbRegistersWithoutVtor;

/// ICSR fields of the target.
#[cfg(feature = "systick")]
pub use InterruptControlAndStateWithSysTick as InterruptControlAndState;
/// ICSR fields of the target.
#[cfg(not(feature = "systick"))]
pub use InterruptControlAndStateWithoutSysTick as InterruptControlAndState;

register_bitfields![u32,
    pub CpuId [
        /// Minor revision number m in the rnpm revision status
        REVISION        NUMBITS(4),
        /// Part number of the processor
        PARTNO          NUMBITS(12) [
            CortexM0Plus = 0xC60
        ],
        /// Reads as 0xC for ARMv6-M
        ARCHITECTURE    NUMBITS(4),
        /// Major revision number n in the rnpm revision status
        VARIANT         NUMBITS(4),
        /// Implementer code
        IMPLEMENTER     NUMBITS(8) [
            Arm = 0x41
        ]
    ],

    pub InterruptControlAndStateWithSysTick [
        RESERVED0       NUMBITS(12),
        /// Exception number of the highest priority pending enabled exception
        VECTPENDING     NUMBITS(6),
        RESERVED18      NUMBITS(7),
        /// SysTick exception clear-pending bit
        PENDSTCLR       NUMBITS(1),
        /// SysTick exception set-pending bit
        PENDSTSET       NUMBITS(1),
        /// PendSV clear-pending bit
        PENDSVCLR       NUMBITS(1),
        /// PendSV set-pending bit
        PENDSVSET       NUMBITS(1),
        RESERVED29      NUMBITS(2),
        /// NMI set-pending bit
        NMIPENDSET      NUMBITS(1)
    ],

    pub InterruptControlAndStateWithoutSysTick [
        RESERVED0       NUMBITS(12),
        VECTPENDING     NUMBITS(6),
        RESERVED18      NUMBITS(9),
        PENDSVCLR       NUMBITS(1),
        PENDSVSET       NUMBITS(1),
        RESERVED29      NUMBITS(2),
        NMIPENDSET      NUMBITS(1)
    ],

    pub VectorTableOffset [
        RESERVED0       NUMBITS(7),
        /// Bits [31:7] of the vector table address
        TBLOFF          NUMBITS(25)
    ],

    pub ApplicationInterruptAndReset [
        RESERVED0       NUMBITS(1),
        /// Reserved for debug use; write 0
        VECTCLRACTIVE   NUMBITS(1),
        /// System reset request
        SYSRESETREQ     NUMBITS(1),
        RESERVED3       NUMBITS(12),
        /// Data endianness, always little-endian on the Cortex-M0+
        ENDIANESS       NUMBITS(1) [
            LittleEndian = 0,
            BigEndian = 1
        ],
        /// Register key. Write 0x05FA or the write is ignored; reads as
        /// 0xFA05.
        VECTKEY         NUMBITS(16) [
            Write = 0x05FA,
            Read = 0xFA05
        ]
    ],

    pub SystemControl [
        RESERVED0       NUMBITS(1),
        /// Enter sleep on return from an ISR to Thread mode
        SLEEPONEXIT     NUMBITS(1),
        /// Use deep sleep as the low power mode
        SLEEPDEEP       NUMBITS(1),
        RESERVED3       NUMBITS(1),
        /// Pending interrupts, including disabled ones, are wakeup events
        SEVONPEND       NUMBITS(1),
        RESERVED5       NUMBITS(27)
    ],

    pub ConfigurationAndControl [
        RESERVED0       NUMBITS(3),
        /// Always 1, all unaligned accesses trap
        UNALIGN_TRP     NUMBITS(1),
        RESERVED4       NUMBITS(5),
        /// Always 1, 8-byte stack alignment on exception entry
        STKALIGN        NUMBITS(1),
        RESERVED10      NUMBITS(22)
    ],

    pub SystemHandlerPriority2 [
        RESERVED0       NUMBITS(30),
        /// Priority of SVCall
        PRI_11          NUMBITS(2)
    ],

    pub SystemHandlerPriority3 [
        RESERVED0       NUMBITS(22),
        /// Priority of PendSV
        PRI_14          NUMBITS(2),
        RESERVED24      NUMBITS(6),
        /// Priority of SysTick
        PRI_15          NUMBITS(2)
    ]
];

/// Base address of the System Control Block.
pub const SCB_BASE: usize = 0xE000_ED00;

/// The System Control Block of the core.
pub const SCB: StaticRef<ScbRegisters> = unsafe { StaticRef::new(SCB_BASE as *const ScbRegisters) };
