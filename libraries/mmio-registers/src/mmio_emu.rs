// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! MMIO backend for emulating register reads and writes.
//!
//! With the `mmio-emu` feature every register access is looked up in a
//! global table of emulated devices, keyed by address range. Accesses
//! inside a registered range go to that device; all other accesses are
//! plain volatile memory accesses, so register blocks overlaid on
//! ordinary buffers keep working.

// This module requires libstd.
use std::collections::BTreeMap;
use std::fmt;
use std::mem::{size_of, MaybeUninit};
use std::slice;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{StaticRef, UIntLike};

/// Errors that can be encountered by MMIO emulation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    RegionOverlaps(usize, usize),
    ZeroSizedRegion(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Error::*;

        match self {
            RegionOverlaps(base, size) => write!(
                f,
                "region overlaps with existing region of base {:#x} size {:#x}",
                base, size
            ),
            ZeroSizedRegion(base) => {
                write!(f, "region at base address {:#x} cannot be zero-sized", base)
            }
        }
    }
}

impl std::error::Error for Error {}

#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
struct MmioRegion {
    base: usize,
    size: usize,
}

impl MmioRegion {
    /// Returns true if there is overlap with the given range.
    fn overlaps(&self, base: usize, size: usize) -> bool {
        self.base < (base + size) && base < self.base + self.size
    }
}

/// A trait for devices that can be controlled by reading or writing MMIO registers.
///
/// Both methods run with the device locked, so a device must not access
/// its own registers from inside them.
pub trait MmioDevice: Send {
    /// Reads at `offset` from this device into `data`.
    fn mmio_read(&mut self, offset: usize, data: &mut [u8]);
    /// Writes `data` at `offset` of this device.
    fn mmio_write(&mut self, offset: usize, data: &[u8]);
}

/// Device that behaves like ordinary memory.
///
/// Reads return whatever was last written at the same bytes; the initial
/// content is all zeros.
#[derive(Debug, Clone)]
pub struct MemoryDevice {
    bytes: Vec<u8>,
}

impl MemoryDevice {
    /// Zero-filled device of `size` bytes.
    pub fn new(size: usize) -> Self {
        MemoryDevice {
            bytes: vec![0; size],
        }
    }

    /// Zero-filled device covering a whole register block.
    pub fn for_block<R>() -> Self {
        Self::new(size_of::<R>())
    }

    /// Current content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Native-endian 32-bit word at `offset`, as a register read would see it.
    pub fn word(&self, offset: usize) -> u32 {
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.bytes[offset..offset + 4]);
        u32::from_ne_bytes(word)
    }
}

impl MmioDevice for MemoryDevice {
    fn mmio_read(&mut self, offset: usize, data: &mut [u8]) {
        data.copy_from_slice(&self.bytes[offset..offset + data.len()]);
    }

    fn mmio_write(&mut self, offset: usize, data: &[u8]) {
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
    }
}

struct MmioEmu {
    devices: BTreeMap<MmioRegion, Arc<Mutex<dyn MmioDevice>>>,
}

impl MmioEmu {
    /// Creates a new `MmioEmu`.
    const fn new() -> Self {
        MmioEmu {
            devices: BTreeMap::new(),
        }
    }

    /// Adds `device` to be associated with the memory region in `region`.
    ///
    /// This may fail if the region is invalid (zero size), or the region conflicts with the
    /// region of a different device.
    fn add_device(&mut self, region: MmioRegion, device: Arc<Mutex<dyn MmioDevice>>) -> Result<()> {
        if region.size == 0 {
            return Err(Error::ZeroSizedRegion(region.base));
        }

        // Reject all cases where the new device's range overlaps with an existing device.
        if let Some(existing) = self
            .devices
            .keys()
            .find(|range| range.overlaps(region.base, region.size))
        {
            return Err(Error::RegionOverlaps(existing.base, existing.size));
        }
        self.devices.insert(region, device);
        Ok(())
    }

    /// Gets the device associated with `addr`, if any.
    ///
    /// If `addr` lies in a register block owned by a device, returns the offset
    /// into that register block and the device. Otherwise, returns None.
    fn get_device(&self, addr: usize) -> Option<(usize, Arc<Mutex<dyn MmioDevice>>)> {
        // The last region starting at or before `addr` is the only candidate.
        let (range, dev) = self
            .devices
            .range(
                ..=MmioRegion {
                    base: addr,
                    size: usize::MAX,
                },
            )
            .next_back()?;
        let offset = addr - range.base;
        (offset < range.size).then(|| (offset, dev.clone()))
    }
}

static MMIO_STATE: Mutex<MmioEmu> = Mutex::new(MmioEmu::new());

// A test that panics while holding the lock must not take every other test
// down with it.
fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn device_at(addr: usize) -> Option<(usize, Arc<Mutex<dyn MmioDevice>>)> {
    lock(&MMIO_STATE).get_device(addr)
}

/// Registers `device` to be associated with the static register block `registers`.
///
/// Every register access that falls in `registers` is handed to
/// `device` from then on, as a read or write at the byte offset of the
/// register within the block. The region stays registered for the rest of
/// the program.
///
/// # Errors
///
/// Fails if the register block is zero-sized or overlaps a block that
/// already has a device.
pub fn register_mmio_device<R: 'static>(
    device: Arc<Mutex<dyn MmioDevice>>,
    registers: &'static R,
) -> Result<()> {
    let region = MmioRegion {
        base: registers as *const R as usize,
        size: size_of::<R>(),
    };

    lock(&MMIO_STATE).add_device(region, device)
}

/// Emulates a register block of type `R` with `device`.
///
/// Allocates backing storage for one `R` for the rest of the program,
/// registers `device` for it and returns a reference to the block along
/// with a handle for inspecting the device.
///
/// # Errors
///
/// Fails for zero-sized register blocks.
///
/// # Example usage
///
/// ```rust
/// # use mmio_registers::interfaces::{Readable, Writeable};
/// # use mmio_registers::mmio_emu::{emulate, MemoryDevice};
/// # use mmio_registers::registers::ReadWrite;
/// #[repr(C)]
/// struct FooRegisters {
///     ctrl: ReadWrite<u32>,
///     data: ReadWrite<u32>,
/// }
///
/// let (regs, device) = emulate::<FooRegisters, _>(MemoryDevice::for_block::<FooRegisters>()).unwrap();
/// regs.data.set(0x1234);
/// assert_eq!(device.lock().unwrap().word(4), 0x1234);
/// assert_eq!(regs.ctrl.get(), 0);
/// ```
pub fn emulate<R: 'static, D: MmioDevice + 'static>(
    device: D,
) -> Result<(StaticRef<R>, Arc<Mutex<D>>)> {
    let backing: &'static MaybeUninit<R> = Box::leak(Box::new(MaybeUninit::uninit()));
    let device = Arc::new(Mutex::new(device));

    let region = MmioRegion {
        base: backing.as_ptr() as usize,
        size: size_of::<R>(),
    };
    lock(&MMIO_STATE).add_device(region, device.clone())?;

    // The block is never read as memory: every access in its range goes to
    // the device.
    Ok((unsafe { StaticRef::new(backing.as_ptr()) }, device))
}

/// Emulates an MMIO volatile read of `T`.
///
/// Reads the device owning `src`, or plain memory if there is none.
pub(crate) unsafe fn read_volatile<T: UIntLike>(src: *const T) -> T {
    match device_at(src as usize) {
        Some((offset, dev)) => {
            let mut result = T::zero();
            let bytes_slice =
                slice::from_raw_parts_mut(&mut result as *mut T as *mut u8, size_of::<T>());
            lock(&dev).mmio_read(offset, bytes_slice);
            result
        }
        None => ::core::ptr::read_volatile(src),
    }
}

/// Emulates an MMIO volatile write of `T`.
///
/// Writes to the device owning `dst`, or plain memory if there is none.
pub(crate) unsafe fn write_volatile<T: UIntLike>(dst: *mut T, src: T) {
    match device_at(dst as usize) {
        Some((offset, dev)) => {
            let bytes_slice = slice::from_raw_parts(&src as *const T as *const u8, size_of::<T>());
            lock(&dev).mmio_write(offset, bytes_slice);
        }
        None => ::core::ptr::write_volatile(dst, src),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{Readable, Writeable};
    use crate::registers::*;
    use std::convert::TryInto;

    /// MMIO register interface for a monotonically increasing counter device.
    #[repr(C)]
    struct CounterRegisters {
        /// Current counter value.
        counter: ReadOnly<u64>,
        /// Writing to this register increments the counter value by the amount in `increment`.
        increment: ReadWrite<u32>,
        _reserved: Reserved<u32>,
    }

    /// Internal state of the counter device.
    struct CounterDevice {
        value: u64,
    }

    impl MmioDevice for CounterDevice {
        fn mmio_read(&mut self, offset: usize, data: &mut [u8]) {
            match offset {
                0x0 => data.copy_from_slice(&self.value.to_ne_bytes()),
                0x8 => data.fill(0),
                _ => panic!("CounterDevice: illegal read offset {:#x}", offset),
            }
        }

        fn mmio_write(&mut self, offset: usize, data: &[u8]) {
            match offset {
                0x8 => {
                    let increment = u32::from_ne_bytes(data.try_into().unwrap());
                    self.value += u64::from(increment);
                }
                _ => panic!("CounterDevice: illegal write offset {:#x}", offset),
            }
        }
    }

    #[test]
    fn counter_device() {
        let (regs, device) =
            emulate::<CounterRegisters, _>(CounterDevice { value: 0 }).unwrap();

        assert_eq!(regs.counter.get(), 0);
        regs.increment.set(5);
        assert_eq!(regs.counter.get(), 5);
        regs.increment.set(1);
        assert_eq!(regs.counter.get(), 6);
        assert_eq!(regs.increment.get(), 0);
        assert_eq!(device.lock().unwrap().value, 6);
    }

    struct StaticBlock(MaybeUninit<CounterRegisters>);

    // Only ever accessed through the emulator.
    unsafe impl Sync for StaticBlock {}

    #[test]
    fn static_block_registration() {
        static FAKE_REGS: StaticBlock = StaticBlock(MaybeUninit::uninit());
        let device = Arc::new(Mutex::new(CounterDevice { value: 40 }));
        register_mmio_device(device, &FAKE_REGS.0).unwrap();

        let regs = unsafe { &*FAKE_REGS.0.as_ptr() };
        regs.increment.set(2);
        assert_eq!(regs.counter.get(), 42);

        assert_eq!(
            register_mmio_device(Arc::new(Mutex::new(MemoryDevice::new(4))), &FAKE_REGS.0),
            Err(Error::RegionOverlaps(
                FAKE_REGS.0.as_ptr() as usize,
                size_of::<CounterRegisters>()
            ))
        );
    }

    #[test]
    fn zero_sized_blocks_rejected() {
        #[repr(C)]
        struct Empty {}

        assert!(matches!(
            emulate::<Empty, _>(MemoryDevice::new(0)),
            Err(Error::ZeroSizedRegion(_))
        ));
    }

    #[test]
    fn independent_devices() {
        let (a, dev_a) = emulate::<CounterRegisters, _>(MemoryDevice::new(16)).unwrap();
        let (b, dev_b) = emulate::<CounterRegisters, _>(MemoryDevice::new(16)).unwrap();

        a.increment.set(0xAAAA);
        b.increment.set(0x5555);
        assert_eq!(a.increment.get(), 0xAAAA);
        assert_eq!(b.increment.get(), 0x5555);
        assert_eq!(dev_a.lock().unwrap().word(8), 0xAAAA);
        assert_eq!(dev_b.lock().unwrap().word(8), 0x5555);
    }

    #[test]
    fn unregistered_addresses_are_memory() {
        let backing = Box::new(0u32);
        let reg = unsafe { &*(&*backing as *const u32 as *const ReadWrite<u32>) };
        reg.set(0xC0FFEE);
        assert_eq!(reg.get(), 0xC0FFEE);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            Error::ZeroSizedRegion(0x1000).to_string(),
            "region at base address 0x1000 cannot be zero-sized"
        );
        assert_eq!(
            Error::RegionOverlaps(0x2000, 0x10).to_string(),
            "region overlaps with existing region of base 0x2000 size 0x10"
        );
    }
}
