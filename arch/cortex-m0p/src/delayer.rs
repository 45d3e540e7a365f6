// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Blocking delays on top of SysTick.
//!
//! A [`Delayer`] owns the SysTick for its lifetime: it starts the counter
//! when created and stops it when dropped. Each tick of a delay is one
//! wrap of the counter, so a delay lasts roughly
//! `ticks * (reload + 1) / clock_frequency`.
//!
//! ```ignore
//! use cortexm0p::delayer::{ClockSource, Delayer};
//! use cortexm0p::systick::SYSTICK;
//!
//! // 1ms ticks on a 48MHz processor clock.
//! let delayer = Delayer::new(&SYSTICK, ClockSource::Processor, 47_999, 10);
//! delayer.delay(); // ~10ms
//! ```

use crate::systick::{ControlAndStatus, CurrentValue, SysTickRegisters};
use mmio_registers::fields::FieldValue;
use mmio_registers::interfaces::{Readable, Writeable};

/// Clock the SysTick counter runs on.
///
/// If the core has no external reference clock, selecting
/// `ExternalReference` runs the counter on the processor clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    ExternalReference,
    Processor,
}

impl From<ClockSource> for FieldValue<u32, ControlAndStatus::Register> {
    fn from(source: ClockSource) -> Self {
        match source {
            ClockSource::ExternalReference => ControlAndStatus::CLKSOURCE::ExternalReference,
            ClockSource::Processor => ControlAndStatus::CLKSOURCE::Processor,
        }
    }
}

/// Busy-wait delayer.
///
/// Not re-entrant: a delay blocks until it completes and must not be
/// started from more than one context at a time.
pub struct Delayer<'a> {
    systick: Option<&'a SysTickRegisters>,
    ticks: u32,
}

impl<'a> Delayer<'a> {
    /// Programs `systick` with `reload` and starts it on `clock`.
    ///
    /// `reload` is stored as given; the hardware ignores bits 31:24. A
    /// `reload` of 0 with nonzero `ticks` never completes a delay.
    pub fn new(
        systick: &'a SysTickRegisters,
        clock: ClockSource,
        reload: u32,
        ticks: u32,
    ) -> Delayer<'a> {
        systick.rvr.set(reload);
        systick.cvr.write(CurrentValue::CURRENT.val(0));
        let clock: FieldValue<u32, ControlAndStatus::Register> = clock.into();
        systick.csr.write(clock + ControlAndStatus::ENABLE::SET);

        Delayer {
            systick: Some(systick),
            ticks,
        }
    }

    /// Blocks for the configured number of ticks.
    ///
    /// Reading CSR clears COUNTFLAG, so each wrap of the counter is seen
    /// exactly once.
    pub fn delay(&self) {
        let systick = match self.systick {
            Some(systick) => systick,
            None => return,
        };

        systick.cvr.write(CurrentValue::CURRENT.val(0));
        for _ in 0..self.ticks {
            while !systick.csr.is_set(ControlAndStatus::COUNTFLAG) {}
        }
    }

    /// Stops the counter. Later calls, and dropping, do nothing.
    pub fn disable(&mut self) {
        if let Some(systick) = self.systick.take() {
            systick.rvr.set(0);
            systick.csr.set(0);
        }
    }
}

impl Drop for Delayer<'_> {
    fn drop(&mut self) {
        self.disable();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::Backing;

    #[test]
    fn new_programs_and_starts_the_counter() {
        let backing = Backing::<4>::new();
        let systick = unsafe { backing.block::<SysTickRegisters>() };

        let delayer = Delayer::new(&systick, ClockSource::ExternalReference, 999, 3);
        assert_eq!(backing.word(0x04), 999);
        assert_eq!(backing.word(0x08), 0);
        assert_eq!(backing.word(0x00), 0b001);
        drop(delayer);

        let _delayer = Delayer::new(&systick, ClockSource::Processor, 999, 3);
        assert_eq!(backing.word(0x00), 0b101);
    }

    #[test]
    fn reload_is_stored_unchanged() {
        let backing = Backing::<4>::new();
        let systick = unsafe { backing.block::<SysTickRegisters>() };

        let _delayer = Delayer::new(&systick, ClockSource::Processor, 0xAB00_0010, 1);
        assert_eq!(backing.word(0x04), 0xAB00_0010);
    }

    #[test]
    fn disable_stops_the_counter_once() {
        let backing = Backing::<4>::new();
        let systick = unsafe { backing.block::<SysTickRegisters>() };

        let mut delayer = Delayer::new(&systick, ClockSource::Processor, 999, 1);
        delayer.disable();
        assert_eq!(backing.word(0x00), 0);
        assert_eq!(backing.word(0x04), 0);

        // Reprogram behind its back; a disabled delayer must not touch it.
        systick.rvr.set(5);
        delayer.disable();
        drop(delayer);
        assert_eq!(backing.word(0x04), 5);
    }

    #[test]
    fn zero_ticks_returns_immediately() {
        let backing = Backing::<4>::new();
        let systick = unsafe { backing.block::<SysTickRegisters>() };

        let delayer = Delayer::new(&systick, ClockSource::Processor, 999, 0);
        systick.cvr.set(123);
        delayer.delay();
        assert_eq!(backing.word(0x08), 0);
    }
}
