// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Timer group (TimG) watchdog driver.
//!
//! Each of the two ESP32 timer groups carries a main watchdog timer (MWDT)
//! with a four-stage countdown. This driver uses a two-stage policy: stage 0
//! either resets the system outright or raises a level interrupt, stage 1
//! resets the system if that interrupt went unserviced, and stages 2 and 3
//! stay off. Both active stages share one timeout value.
//!
//! The hardware ignores writes to the watchdog configuration block unless
//! `wdtwprotect` holds a magic key, and the datasheet recommends unsealing,
//! making modifications, and sealing for every change. [`TimgWdt::unseal`]
//! turns that protocol into a scoped guard: configuration writes are only
//! reachable through the guard, and dropping it seals the block again. The
//! interrupt enable and clear registers live outside the protected block
//! and are accessed directly.

use core::cell::Cell;

use kernel::hil::watchdog::{Options, ResetAction, TimeoutConfig, Watchdog, WatchdogClient};
use kernel::platform::interrupt::InterruptController;
use kernel::utilities::cells::OptionalCell;
use kernel::utilities::registers::interfaces::{ReadWriteable, Writeable};
use kernel::utilities::registers::{FieldValue, ReadWrite, register_bitfields, register_structs};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

pub const TIMG0_BASE: StaticRef<TimgRegisters> =
    unsafe { StaticRef::new(0x3FF5_F000 as *const TimgRegisters) };

pub const TIMG1_BASE: StaticRef<TimgRegisters> =
    unsafe { StaticRef::new(0x3FF6_0000 as *const TimgRegisters) };

/// Writes to the watchdog configuration block are ignored unless this key
/// sits in `wdtwprotect`.
const WDT_WKEY: u32 = 0x50D8_3AA1;

/// Writing any value to `wdtfeed` reloads the countdown.
const WDT_FEED: u32 = 0xABAD_1DEA;

/// MWDT ticks every 12.5ns. A prescale of 40000 decrements each watchdog
/// stage every 0.5ms, so timeouts are counted in 0.5ms ticks.
const WDT_PRESCALE: u32 = 40_000;

register_structs! {
    pub TimgRegisters {
        // General-purpose timer registers, not used by the watchdog.
        (0x000 => _reserved0),
        (0x048 => wdtconfig0: ReadWrite<u32, WDTCONFIG0::Register>),
        (0x04C => wdtconfig1: ReadWrite<u32, WDTCONFIG1::Register>),
        (0x050 => wdtconfig2: ReadWrite<u32>),
        (0x054 => wdtconfig3: ReadWrite<u32>),
        (0x058 => wdtconfig4: ReadWrite<u32>),
        (0x05C => wdtconfig5: ReadWrite<u32>),
        (0x060 => wdtfeed: ReadWrite<u32>),
        (0x064 => wdtwprotect: ReadWrite<u32>),
        (0x068 => _reserved1),
        (0x098 => int_ena: ReadWrite<u32, INT::Register>),
        (0x09C => int_raw: ReadWrite<u32, INT::Register>),
        (0x0A0 => int_st: ReadWrite<u32, INT::Register>),
        (0x0A4 => int_clr: ReadWrite<u32, INT::Register>),
        (0x0A8 => @END),
    }
}

register_bitfields![u32,
    WDTCONFIG0 [
        APP_CPU_RESET_EN OFFSET(12) NUMBITS(1) [],
        PROC_CPU_RESET_EN OFFSET(13) NUMBITS(1) [],
        FLASHBOOT_MOD_EN OFFSET(14) NUMBITS(1) [],
        SYS_RESET_LENGTH OFFSET(15) NUMBITS(3) [],
        CPU_RESET_LENGTH OFFSET(18) NUMBITS(3) [],
        LEVEL_INT_EN OFFSET(21) NUMBITS(1) [],
        EDGE_INT_EN OFFSET(22) NUMBITS(1) [],
        STG3 OFFSET(23) NUMBITS(2) [
            Off = 0,
            Interrupt = 1,
            ResetCpu = 2,
            ResetSystem = 3
        ],
        STG2 OFFSET(25) NUMBITS(2) [
            Off = 0,
            Interrupt = 1,
            ResetCpu = 2,
            ResetSystem = 3
        ],
        STG1 OFFSET(27) NUMBITS(2) [
            Off = 0,
            Interrupt = 1,
            ResetCpu = 2,
            ResetSystem = 3
        ],
        STG0 OFFSET(29) NUMBITS(2) [
            Off = 0,
            Interrupt = 1,
            ResetCpu = 2,
            ResetSystem = 3
        ],
        EN OFFSET(31) NUMBITS(1) [],
    ],
    WDTCONFIG1 [
        CLK_PRESCALE OFFSET(16) NUMBITS(16) [],
    ],
    INT [
        T0 OFFSET(0) NUMBITS(1) [],
        T1 OFFSET(1) NUMBITS(1) [],
        WDT OFFSET(2) NUMBITS(1) [],
    ],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WdtMode {
    /// Stage 0 resets the system, no warning beforehand.
    Reset,
    /// Stage 0 raises a level interrupt, stage 1 resets the system.
    InterruptReset,
}

/// Write access to the sealed watchdog configuration block.
///
/// Returned by [`TimgWdt::unseal`]; dropping it writes zero back to
/// `wdtwprotect`, which makes the block ignore writes again. Must not be
/// held across driver operations.
struct UnsealedWdt<'a> {
    registers: &'a TimgRegisters,
}

impl UnsealedWdt<'_> {
    fn set_config(&self, config: FieldValue<u32, WDTCONFIG0::Register>) {
        self.registers.wdtconfig0.write(config);
    }

    fn modify_config(&self, config: FieldValue<u32, WDTCONFIG0::Register>) {
        self.registers.wdtconfig0.modify(config);
    }

    fn set_prescaler(&self, prescale: u32) {
        self.registers
            .wdtconfig1
            .write(WDTCONFIG1::CLK_PRESCALE.val(prescale));
    }

    /// Program the stage 0 and stage 1 timeouts. Both armed stages share
    /// one timeout value in this driver.
    fn set_stage_timeouts(&self, ticks: u32) {
        self.registers.wdtconfig2.set(ticks);
        self.registers.wdtconfig3.set(ticks);
    }

    fn feed(&self) {
        self.registers.wdtfeed.set(WDT_FEED);
    }
}

impl Drop for UnsealedWdt<'_> {
    fn drop(&mut self) {
        self.registers.wdtwprotect.set(0);
    }
}

/// One timer group's main watchdog timer.
///
/// Configuration calls must come from a single execution context; the
/// interrupt handler may preempt them at any point but only ever touches
/// the unprotected interrupt registers.
pub struct TimgWdt<'a> {
    registers: StaticRef<TimgRegisters>,
    intc: &'a dyn InterruptController,
    irq: u32,
    client: OptionalCell<&'a dyn WatchdogClient>,
    timeout: OptionalCell<u32>,
    mode: Cell<WdtMode>,
    enabled: Cell<bool>,
}

impl<'a> TimgWdt<'a> {
    pub const fn new(
        base: StaticRef<TimgRegisters>,
        intc: &'a dyn InterruptController,
        irq: u32,
    ) -> TimgWdt<'a> {
        TimgWdt {
            registers: base,
            intc,
            irq,
            client: OptionalCell::empty(),
            timeout: OptionalCell::empty(),
            mode: Cell::new(WdtMode::Reset),
            enabled: Cell::new(false),
        }
    }

    /// Boot-time bring-up. The board must have routed this watchdog's
    /// interrupt source (e.g. [`crate::interrupts::IRQ_TG0_WDT_LEVEL`]) to
    /// [`TimgWdt::handle_interrupt`] before calling this. Unless
    /// `start_disabled` is set, the watchdog starts counting immediately
    /// with whatever stage configuration the hardware reset to.
    pub fn init(&self, start_disabled: bool) {
        if start_disabled {
            let _ = self.disable();
        } else {
            self.enable();
        }
    }

    /// Service the watchdog's stage 0 interrupt. Called from the board's
    /// interrupt dispatch; runs in interrupt context.
    ///
    /// A spurious interrupt with no registered client is not an error: the
    /// pending state still gets cleared so the level interrupt does not
    /// re-trigger immediately.
    pub fn handle_interrupt(&self) {
        self.client.map(|client| client.timeout_expired(0));
        self.registers.int_clr.modify(INT::WDT::SET);
    }

    /// Open the write-protected configuration block. Writes land only
    /// while the returned guard is alive.
    fn unseal(&self) -> UnsealedWdt<'_> {
        self.registers.wdtwprotect.set(WDT_WKEY);
        UnsealedWdt {
            registers: &*self.registers,
        }
    }

    fn enable(&self) {
        let unsealed = self.unseal();
        unsealed.modify_config(WDTCONFIG0::EN::SET);
        drop(unsealed);

        self.enabled.set(true);
    }

    fn set_interrupt_enabled(&self, setting: bool) {
        // Stale pending state must not fire the moment the mask opens.
        self.registers.int_clr.modify(INT::WDT::SET);

        if setting {
            self.registers.int_ena.modify(INT::WDT::SET);
            self.intc.enable(self.irq);
        } else {
            self.registers.int_ena.modify(INT::WDT::CLEAR);
            self.intc.disable(self.irq);
        }
    }
}

impl<'a> Watchdog<'a> for TimgWdt<'a> {
    fn install_timeout(&self, config: TimeoutConfig<'a>) -> Result<(), ErrorCode> {
        if config.action != ResetAction::System {
            return Err(ErrorCode::NOSUPPORT);
        }
        // The MWDT has no warning window: it only counts up to a maximum.
        if config.window.min != 0 || config.window.max == 0 {
            return Err(ErrorCode::INVAL);
        }

        self.timeout.set(config.window.max);
        self.mode.set(match config.client {
            None => WdtMode::Reset,
            Some(_) => WdtMode::InterruptReset,
        });
        self.client.insert(config.client);

        Ok(())
    }

    // The pause options are accepted for interface compatibility; the MWDT
    // has no sleep or debugger pause controls.
    fn setup(&self, _options: Options) -> Result<(), ErrorCode> {
        let timeout = self.timeout.extract().ok_or(ErrorCode::INVAL)?;
        let mode = self.mode.get();

        let stage_config = match mode {
            WdtMode::Reset => {
                // Warm reset on timeout, no interrupt for this mode.
                WDTCONFIG0::STG0::ResetSystem
                    + WDTCONFIG0::STG1::Off
                    + WDTCONFIG0::LEVEL_INT_EN::CLEAR
                    + WDTCONFIG0::EDGE_INT_EN::CLEAR
            }
            WdtMode::InterruptReset => {
                // Level interrupt first, warm reset if it goes unserviced.
                WDTCONFIG0::STG0::Interrupt
                    + WDTCONFIG0::STG1::ResetSystem
                    + WDTCONFIG0::LEVEL_INT_EN::SET
                    + WDTCONFIG0::EDGE_INT_EN::CLEAR
            }
        };

        // Stages 2 and 3 are never used. Hold the target in reset for the
        // longest selectable pulse (3.2us) so peripherals reliably
        // reinitialize, and keep the flash-boot protection mode from
        // re-arming the stages behind our back. Configuration and the
        // enable bit land in one sealed bracket.
        let config = stage_config
            + WDTCONFIG0::STG2::Off
            + WDTCONFIG0::STG3::Off
            + WDTCONFIG0::SYS_RESET_LENGTH.val(7)
            + WDTCONFIG0::CPU_RESET_LENGTH.val(7)
            + WDTCONFIG0::FLASHBOOT_MOD_EN::CLEAR
            + WDTCONFIG0::EN::SET;

        let unsealed = self.unseal();
        unsealed.set_config(config);
        unsealed.set_prescaler(WDT_PRESCALE);
        unsealed.set_stage_timeouts(timeout);
        drop(unsealed);

        self.set_interrupt_enabled(mode == WdtMode::InterruptReset);

        // Start timing from the full duration.
        self.feed(0)?;
        self.enabled.set(true);

        Ok(())
    }

    fn feed(&self, _channel: usize) -> Result<(), ErrorCode> {
        self.unseal().feed();

        Ok(())
    }

    fn disable(&self) -> Result<(), ErrorCode> {
        let unsealed = self.unseal();
        unsealed.modify_config(WDTCONFIG0::EN::CLEAR + WDTCONFIG0::FLASHBOOT_MOD_EN::CLEAR);
        drop(unsealed);

        // The installed mode may have changed since the interrupt line was
        // last armed, so disarm unconditionally. Masking an already-masked
        // line is harmless.
        self.set_interrupt_enabled(false);
        self.enabled.set(false);

        Ok(())
    }
}
