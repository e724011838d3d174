// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Watchdog support for the Espressif ESP32 timer groups.

#![no_std]

pub mod interrupts;
pub mod timg;
