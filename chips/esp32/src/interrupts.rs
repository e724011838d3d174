// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Named interrupt sources for the ESP32 timer groups.
//!
//! Source numbers from the ESP32 TRM interrupt matrix table.

pub const IRQ_TG0_T0_LEVEL: u32 = 14;
pub const IRQ_TG0_T1_LEVEL: u32 = 15;
pub const IRQ_TG0_WDT_LEVEL: u32 = 16;
pub const IRQ_TG0_LACT_LEVEL: u32 = 17;

pub const IRQ_TG1_T0_LEVEL: u32 = 18;
pub const IRQ_TG1_T1_LEVEL: u32 = 19;
pub const IRQ_TG1_WDT_LEVEL: u32 = 20;
pub const IRQ_TG1_LACT_LEVEL: u32 = 21;
