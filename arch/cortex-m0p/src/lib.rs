// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Core peripherals of ARM Cortex-M0+ MCUs.
//!
//! Register-block layouts and fixed addresses for the NVIC, SCB, SysTick,
//! MPU and MTB, the layout of the vector table and a busy-wait delayer on
//! top of SysTick.
//!
//! The optional parts of the core are selected with cargo features, one
//! pair per option: `mpu`/`no-mpu`, `scb-vtor`/`no-scb-vtor` and
//! `systick`/`no-systick`. Each pair must have exactly one member enabled.

#![crate_name = "cortexm0p"]
#![crate_type = "rlib"]
#![cfg_attr(not(test), no_std)]

#[cfg(not(any(feature = "mpu", feature = "no-mpu")))]
compile_error!("MPU presence not configured: enable feature `mpu` or `no-mpu`");
#[cfg(all(feature = "mpu", feature = "no-mpu"))]
compile_error!("features `mpu` and `no-mpu` are mutually exclusive");

#[cfg(not(any(feature = "scb-vtor", feature = "no-scb-vtor")))]
compile_error!("SCB VTOR presence not configured: enable feature `scb-vtor` or `no-scb-vtor`");
#[cfg(all(feature = "scb-vtor", feature = "no-scb-vtor"))]
compile_error!("features `scb-vtor` and `no-scb-vtor` are mutually exclusive");

#[cfg(not(any(feature = "systick", feature = "no-systick")))]
compile_error!("SysTick presence not configured: enable feature `systick` or `no-systick`");
#[cfg(all(feature = "systick", feature = "no-systick"))]
compile_error!("features `systick` and `no-systick` are mutually exclusive");

pub mod config;
pub mod interrupt;
pub mod mtb;
pub mod nvic;
pub mod scb;
pub mod systick;

#[cfg(feature = "mpu")]
pub mod mpu;

#[cfg(feature = "systick")]
pub mod delayer;

pub use config::CONFIG;
