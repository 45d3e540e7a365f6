// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interrupt vector table layout.
//!
//! The table is the initial stack pointer followed by one slot per
//! exception number. Reserved slots must stay `None`. The table has to be
//! aligned to the next power of two of its size, which for 48 word-sized
//! slots is 256 bytes.
//!
//! A chip crate places the table, usually with
//! `#[link_section = ".vectors"]`, and points VTOR at it when the SCB has
//! one:
//!
//! ```ignore
//! extern "C" {
//!     // _estack is not really a function, but it makes the types work
//!     // You should never actually invoke it!!
//!     fn _estack();
//! }
//!
//! #[link_section = ".vectors"]
//! #[used]
//! pub static VECTORS: VectorTable =
//!     VectorTable::new(_estack, reset_handler, unhandled_interrupt);
//! ```

/// An exception or interrupt handler.
pub type Handler = unsafe extern "C" fn();

/// Number of external interrupt lines of the core.
pub const NUM_INTERRUPTS: usize = 32;

/// Total number of slots, stack pointer included.
pub const NUM_SLOTS: usize = 16 + NUM_INTERRUPTS;

macro_rules! vector_table {
    (
        $(#[$attr:meta])*
        $name:ident { $tick:ident }
    ) => {
        $(#[$attr])*
        #[repr(C)]
        #[cfg_attr(target_pointer_width = "32", repr(align(256)))]
        #[cfg_attr(target_pointer_width = "64", repr(align(512)))]
        pub struct $name {
            /// Initial stack pointer, typed as a handler so the table can
            /// be built from a linker symbol.
            pub stack: Handler,
            pub reset: Handler,
            pub nmi: Option<Handler>,
            pub hard_fault: Option<Handler>,
            pub reserved_n12: Option<Handler>,
            pub reserved_n11: Option<Handler>,
            pub reserved_n10: Option<Handler>,
            pub reserved_n9: Option<Handler>,
            pub reserved_n8: Option<Handler>,
            pub reserved_n7: Option<Handler>,
            pub reserved_n6: Option<Handler>,
            pub supervisor_call: Option<Handler>,
            pub reserved_n4: Option<Handler>,
            pub reserved_n3: Option<Handler>,
            /// PendSV
            pub context_switch: Option<Handler>,
            pub $tick: Option<Handler>,
            pub interrupts: [Option<Handler>; NUM_INTERRUPTS],
        }

        impl $name {
            /// Table with `default` in every slot that is not reserved.
            pub const fn new(stack: Handler, reset: Handler, default: Handler) -> Self {
                let d = Some(default);
                $name {
                    stack,
                    reset,
                    nmi: d,
                    hard_fault: d,
                    reserved_n12: None,
                    reserved_n11: None,
                    reserved_n10: None,
                    reserved_n9: None,
                    reserved_n8: None,
                    reserved_n7: None,
                    reserved_n6: None,
                    supervisor_call: d,
                    reserved_n4: None,
                    reserved_n3: None,
                    context_switch: d,
                    $tick: vector_table!(@tick $tick, d),
                    interrupts: [d; NUM_INTERRUPTS],
                }
            }
        }
    };

    (@tick system_tick, $d:expr) => { $d };
    (@tick reserved_n1, $d:expr) => { None };
}

vector_table! {
    /// Vector table of a core with SysTick.
    VectorTableWithSysTick { system_tick }
}

vector_table! {
    /// Vector table of a core without SysTick. The SysTick slot is reserved.
    VectorTableWithoutSysTick { reserved_n1 }
}

/// Vector table of the configured core.
#[cfg(feature = "systick")]
pub type VectorTable = VectorTableWithSysTick;

/// Vector table of the configured core.
#[cfg(not(feature = "systick"))]
pub type VectorTable = VectorTableWithoutSysTick;
