// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Wrapper around MMIO accesses.
//!
//! Passthrough implementation that performs volatile reads and writes, or
//! hands them to [`mmio_emu`](crate::mmio_emu) when the `mmio-emu` feature
//! is enabled.

#[cfg(not(feature = "mmio-emu"))]
use crate::UIntLike;

/// `read_volatile<T>` wraps `ptr::read_volatile<T>`.
#[cfg(not(feature = "mmio-emu"))]
#[inline(always)]
pub(crate) unsafe fn read_volatile<T: UIntLike>(src: *const T) -> T {
    ::core::ptr::read_volatile(src)
}

/// `write_volatile<T>` wraps `ptr::write_volatile<T>`.
#[cfg(not(feature = "mmio-emu"))]
#[inline(always)]
pub(crate) unsafe fn write_volatile<T: UIntLike>(dst: *mut T, src: T) {
    ::core::ptr::write_volatile(dst, src)
}

#[cfg(feature = "mmio-emu")]
pub(crate) use crate::mmio_emu::{read_volatile, write_volatile};
