// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Interrupt-line control at the platform boundary.

/// Operations a peripheral driver needs from the interrupt controller that
/// owns its interrupt line.
///
/// A driver holds a reference to an implementation together with its
/// interrupt-source number, both bound at construction. Routing the source
/// to the peripheral's `handle_interrupt` is the platform's job and happens
/// in the board's interrupt dispatch, not through this trait.
pub trait InterruptController {
    /// Unmask `line` so its interrupt can fire.
    fn enable(&self, line: u32);

    /// Mask `line`.
    fn disable(&self, line: u32);

    /// Whether `line` is currently unmasked.
    fn is_enabled(&self, line: u32) -> bool;
}
