// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Field-decoded formatting of register values.
//!
//! [`Readable::debug`](crate::interfaces::Readable::debug) performs a
//! single read and wraps the value in a [`RegisterDebugValue`], whose
//! [`fmt::Debug`] output names the register and lists its fields:
//!
//! ```text
//! SYST_CSR { ENABLE: 1, TICKINT: 0, CLKSOURCE: Processor, COUNTFLAG: 0 }
//! ```
//!
//! Reserved ranges are left out. Fields with named values print the
//! matching name, or the raw number when no name matches.

use core::fmt;
use core::marker::PhantomData;

use crate::fields::{FieldInfo, RegisterLayout};
use crate::UIntLike;

/// Register value captured for formatting.
///
/// The data is read once into this container and used for all fields, so
/// formatting never touches the hardware again.
pub struct RegisterDebugValue<T: UIntLike, R: RegisterLayout<T>> {
    data: T,
    _reg: PhantomData<R>,
}

impl<T: UIntLike, R: RegisterLayout<T>> RegisterDebugValue<T, R> {
    pub(crate) fn new(data: T) -> Self {
        RegisterDebugValue {
            data,
            _reg: PhantomData,
        }
    }

    /// The raw value that was read.
    pub fn raw(&self) -> T {
        self.data
    }
}

struct FieldDebug<'a, T: UIntLike> {
    info: &'a FieldInfo<T>,
    data: T,
}

impl<T: UIntLike> fmt::Debug for FieldDebug<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.info.fmt_value(self.data, f)
    }
}

impl<T: UIntLike, R: RegisterLayout<T>> fmt::Debug for RegisterDebugValue<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug_struct = f.debug_struct(R::NAME);
        for info in R::named_fields() {
            debug_struct.field(
                info.name,
                &FieldDebug {
                    info,
                    data: self.data,
                },
            );
        }
        debug_struct.finish()
    }
}
