// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Core configuration of the target.
//!
//! The optional parts of a Cortex-M0+ core are chosen by the chip vendor.
//! Which ones the target has is set with cargo features; this is the only
//! place they are read as booleans. Layouts that depend on them are picked
//! with type aliases next to the variants they choose between.

/// Optional parts of the Cortex-M0+ core present on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// The core has a Memory Protection Unit.
    pub has_mpu: bool,

    /// The SCB has a Vector Table Offset Register.
    pub has_scb_vtor: bool,

    /// The core has a SysTick timer. This also decides whether the ICSR
    /// has the SysTick pending bits and whether the vector table has a
    /// SysTick slot.
    pub has_systick: bool,
}

/// Configuration selected by the crate features.
pub const CONFIG: Config = Config {
    has_mpu: cfg!(feature = "mpu"),
    has_scb_vtor: cfg!(feature = "scb-vtor"),
    has_systick: cfg!(feature = "systick"),
};
