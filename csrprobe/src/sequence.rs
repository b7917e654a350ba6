// This file is part of csrprobe, a register-level smoke test for PCIe attached FPGA cards.
//
// Copyright 2025 Canonical Ltd.
//
// SPDX-License-Identifier: GPL-3.0-only
//
// csrprobe is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License version 3, as published by the Free Software Foundation.
//
// csrprobe is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranties of MERCHANTABILITY, SATISFACTORY QUALITY, or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with this program.  If not, see http://www.gnu.org/licenses/.

//! The scripted smoke test run against a register window.
//!
//! A full run is linear: [`sw_reset`], then [`csr_test`], then [`tx_test`]. Nothing is
//! retried and no status register is polled; the only check made is the scratch read-back.

use crate::config::{SCRATCH_PATTERN, SCRATCH_REG, SW_RESET_REG, TX_FINISH_REG, TX_START_REG};
use crate::error::CsrProbeError;
use crate::registers::RegisterBackend;
use log::{info, warn};
use std::thread::sleep;
use std::time::Duration;

/// Outcome of [`run_smoke_test`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmokeReport {
    /// Value read back from the scratch register after writing [`SCRATCH_PATTERN`].
    pub scratch_readback: u32,
}

impl SmokeReport {
    pub fn scratch_ok(&self) -> bool {
        self.scratch_readback == SCRATCH_PATTERN
    }
}

/// Pulse the software reset of the user logic.
///
/// Asserts reset, waits `hold`, then releases it. There is no acknowledgement from the card,
/// the sequence is purely time based.
pub fn sw_reset(window: &mut impl RegisterBackend, hold: Duration) -> Result<(), CsrProbeError> {
    info!("SW Reset!");
    window.write_u32(SW_RESET_REG, 1)?;
    sleep(hold);
    window.write_u32(SW_RESET_REG, 0)?;
    Ok(())
}

/// Write [`SCRATCH_PATTERN`] to the scratch register and log what reads back.
///
/// # Returns: `Result<u32, CsrProbeError>`
/// * `Ok(u32)` - The value read back, whether or not it matches
/// * `Err(CsrProbeError)` - The window rejected the access
pub fn csr_test(window: &mut impl RegisterBackend) -> Result<u32, CsrProbeError> {
    window.write_u32(SCRATCH_REG, SCRATCH_PATTERN)?;
    let readback = window.read_u32(SCRATCH_REG)?;
    info!("{readback:08X}");
    if readback != SCRATCH_PATTERN {
        warn!("Scratch register read back {readback:08X}, expected {SCRATCH_PATTERN:08X}");
    }
    Ok(readback)
}

/// Start and then finish a transmit. Completion is not checked.
pub fn tx_test(window: &mut impl RegisterBackend) -> Result<(), CsrProbeError> {
    window.write_u32(TX_START_REG, 1)?;
    window.write_u32(TX_FINISH_REG, 1)?;
    Ok(())
}

/// Reset the card, then run the CSR round-trip and transmit tests.
pub fn run_smoke_test(
    window: &mut impl RegisterBackend,
    reset_hold: Duration,
) -> Result<SmokeReport, CsrProbeError> {
    sw_reset(window, reset_hold)?;
    let scratch_readback = csr_test(window)?;
    tx_test(window)?;
    Ok(SmokeReport { scratch_readback })
}
