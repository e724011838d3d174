// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Shared kernel interfaces for chip drivers.
//!
//! This crate holds the Hardware Interface Layer (HIL) definitions, the
//! platform boundary traits, and the register and cell utilities that chip
//! crates build on.

#![warn(unreachable_pub)]
#![no_std]

pub mod hil;
pub mod platform;
pub mod utilities;

mod errorcode;
pub use errorcode::ErrorCode;
