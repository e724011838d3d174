// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Interface for staged watchdog timers.
//!
//! A staged watchdog counts down through a sequence of stages, each with a
//! configurable action on expiry: raise an interrupt, reset the system, or
//! nothing. Feeding the watchdog reloads the countdown to the full
//! configured duration. Callers first install a timeout with
//! [`Watchdog::install_timeout`], then commit it to hardware with
//! [`Watchdog::setup`]; whether the watchdog raises a warning interrupt
//! before the final reset stage is derived from whether a client was
//! supplied with the timeout.

use crate::ErrorCode;

/// Countdown window, in watchdog ticks.
///
/// Tick duration is chip specific; see the implementing driver. A watchdog
/// with window support resets the system when fed before `min` ticks have
/// elapsed as well as when `max` ticks elapse without a feed. Hardware
/// without window support only accepts `min == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub min: u32,
    pub max: u32,
}

/// What the watchdog resets when the countdown runs out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetAction {
    /// No reset, only stage actions that were explicitly armed.
    None,
    /// Reset the CPU core, leaving peripherals running.
    CpuCore,
    /// Reset the whole system.
    System,
}

/// A timeout request, validated and stored by
/// [`Watchdog::install_timeout`].
///
/// Supplying a `client` asks the watchdog to raise a warning interrupt one
/// stage before the final reset; omitting it requests an unannounced reset.
pub struct TimeoutConfig<'a> {
    pub action: ResetAction,
    pub window: Window,
    pub client: Option<&'a dyn WatchdogClient>,
}

/// Runtime flags for [`Watchdog::setup`].
///
/// Not every watchdog can honor these; drivers for hardware without the
/// corresponding controls ignore them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Stop the countdown while the system sleeps.
    pub pause_in_sleep: bool,
    /// Stop the countdown while a debugger halts the CPU.
    pub pause_halted_by_debugger: bool,
}

/// Client notified one stage before the watchdog resets the system.
pub trait WatchdogClient {
    /// The watchdog's warning stage expired and the reset stage is now
    /// counting down. Runs in interrupt context: it must be fast and must
    /// not block. Feeding the watchdog from here averts the reset.
    fn timeout_expired(&self, channel: usize);
}

/// A staged watchdog timer.
pub trait Watchdog<'a> {
    /// Validate and store a timeout configuration. Does not touch hardware;
    /// the stored configuration takes effect on the next call to
    /// [`Watchdog::setup`].
    ///
    /// Returns `NOSUPPORT` if the hardware cannot perform the requested
    /// reset action and `INVAL` if the window is out of range for the
    /// hardware. A rejected configuration leaves the previously stored one
    /// untouched.
    fn install_timeout(&self, config: TimeoutConfig<'a>) -> Result<(), ErrorCode>;

    /// Commit the installed configuration to hardware, start the countdown
    /// from the full duration, and arm the warning interrupt if the
    /// configuration has a client. May be called again at any time to
    /// re-arm with a changed configuration.
    ///
    /// Returns `INVAL` if no timeout has been installed.
    fn setup(&self, options: Options) -> Result<(), ErrorCode>;

    /// Reload the countdown to the full configured duration.
    fn feed(&self, channel: usize) -> Result<(), ErrorCode>;

    /// Stop the countdown and disarm the warning interrupt. Idempotent.
    fn disable(&self) -> Result<(), ErrorCode>;
}
