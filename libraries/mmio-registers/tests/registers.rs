// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Register blocks declared outside of the crate, the way a peripheral
//! crate uses the macros.

use std::cell::UnsafeCell;

use mmio_registers::interfaces::{ReadWriteable, Readable, Writeable};
use mmio_registers::registers::{ReadOnly, ReadWrite};
use mmio_registers::{register_bitfields, register_structs, LocalRegisterCopy, StaticRef};

register_structs! {
    UartRegisters {
        (0x00 => ctrl: ReadWrite<u32, Control::Register>),
        (0x04 => status: ReadOnly<u32, Status::Register>),
        (0x08 => _reserved0),
        (0x10 => baud: ReadWrite<u32>),
        (0x14 => @END),
    }
}

register_bitfields![u32,
    Control [
        ENABLE      NUMBITS(1),
        PARITY      NUMBITS(2) [
            None = 0,
            Even = 2,
            Odd = 3
        ],
        RESERVED3   NUMBITS(5),
        WATERMARK   NUMBITS(8),
        RESERVED16  NUMBITS(16)
    ],
    Status [
        TXEMPTY     NUMBITS(1),
        RXFULL      NUMBITS(1),
        RESERVED2   NUMBITS(30)
    ]
];

/// Stand-in for the memory a block is mapped at.
#[repr(C, align(4))]
struct Memory(UnsafeCell<[u32; 5]>);

impl Memory {
    fn new() -> Box<Memory> {
        Box::new(Memory(UnsafeCell::new([0; 5])))
    }

    fn uart(&self) -> StaticRef<UartRegisters> {
        unsafe { StaticRef::new(self.0.get() as *const UartRegisters) }
    }

    fn word(&self, index: usize) -> u32 {
        unsafe { (*self.0.get())[index] }
    }

    fn set_word(&self, index: usize, value: u32) {
        unsafe { (*self.0.get())[index] = value }
    }
}

#[test]
fn write_then_read() {
    let memory = Memory::new();
    let uart = memory.uart();

    uart.baud.set(115_200);
    assert_eq!(uart.baud.get(), 115_200);
    assert_eq!(memory.word(4), 115_200);
}

#[test]
fn modify_keeps_other_fields() {
    let memory = Memory::new();
    let uart = memory.uart();

    uart.ctrl.write(Control::ENABLE::SET + Control::WATERMARK.val(0x20));
    uart.ctrl.modify(Control::PARITY::Odd);

    assert_eq!(memory.word(0), 0x2007);
    assert_eq!(uart.ctrl.read(Control::WATERMARK), 0x20);
    assert_eq!(
        uart.ctrl.read_as_enum(Control::PARITY),
        Some(Control::PARITY::Value::Odd)
    );

    uart.ctrl.modify(Control::ENABLE::CLEAR);
    assert_eq!(memory.word(0), 0x2006);
}

#[test]
fn unknown_enum_value() {
    let memory = Memory::new();
    let uart = memory.uart();

    uart.ctrl.write(Control::PARITY.val(1));
    assert_eq!(uart.ctrl.read_as_enum::<Control::PARITY::Value>(Control::PARITY), None);
}

#[test]
fn instances_are_independent() {
    let first = Memory::new();
    let second = Memory::new();
    let (a, b) = (first.uart(), second.uart());

    a.ctrl.write(Control::ENABLE::SET);
    b.baud.set(9600);

    assert!(a.ctrl.is_set(Control::ENABLE));
    assert!(!b.ctrl.is_set(Control::ENABLE));
    assert_eq!(a.baud.get(), 0);
    assert_eq!(second.word(4), 9600);
}

#[test]
fn read_only_status() {
    let memory = Memory::new();
    let uart = memory.uart();

    memory.set_word(1, 0b10);
    assert!(uart.status.is_set(Status::RXFULL));
    assert!(uart.status.matches_all(Status::RXFULL::SET + Status::TXEMPTY::CLEAR));

    let snapshot: LocalRegisterCopy<u32, Status::Register> = uart.status.extract();
    memory.set_word(1, 0b01);
    assert!(snapshot.is_set(Status::RXFULL));
    assert!(uart.status.is_set(Status::TXEMPTY));
}

#[test]
fn debug_names_fields() {
    let memory = Memory::new();
    let uart = memory.uart();

    uart.ctrl.write(Control::ENABLE::SET + Control::PARITY::Even + Control::WATERMARK.val(4));
    assert_eq!(
        format!("{:?}", uart.ctrl.debug()),
        "Control { ENABLE: 1, PARITY: Even, WATERMARK: 4 }"
    );
}

#[cfg(feature = "mmio-emu")]
mod emulated {
    use super::*;
    use mmio_registers::mmio_emu::{emulate, MemoryDevice};

    #[test]
    fn device_sees_register_offsets() {
        let (uart, device) =
            emulate::<UartRegisters, _>(MemoryDevice::for_block::<UartRegisters>()).unwrap();

        uart.ctrl.write(Control::ENABLE::SET);
        uart.baud.set(57_600);

        let device = device.lock().unwrap();
        assert_eq!(device.word(0x00), 1);
        assert_eq!(device.word(0x10), 57_600);
        assert_eq!(device.bytes().len(), 0x14);
    }
}
