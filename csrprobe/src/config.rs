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

//! Fixed defaults for the target card and its register map.
//!
//! The register map below describes the user BAR exposed by the XDMA driver on the
//! Bittware 250-SoC reference design. Every offset is a byte offset of a 32-bit register.

use std::time::Duration;

/// The character device exposing the user BAR. Typically `/dev/xdma0_user`.
pub static DEFAULT_DEVICE_PATH: &str = "/dev/xdma0_user";

/// Length in bytes of the register window mapped from the device (64KiB).
pub const WINDOW_SIZE: usize = 64 * 1024;

/// How long the software reset is held asserted before being released.
pub const RESET_HOLD: Duration = Duration::from_secs(1);

/// Scratch/data register. Read/write with no side effects.
pub const SCRATCH_REG: usize = 0x00;

/// Software reset control. Writing `1` asserts reset for all user modules, `0` releases it.
pub const SW_RESET_REG: usize = 0x04;

/// Writing `1` starts a transmit.
pub const TX_START_REG: usize = 0x10;

/// Writing `1` finishes a transmit.
pub const TX_FINISH_REG: usize = 0x14;

/// Pattern written to [`SCRATCH_REG`] by the CSR round-trip test.
pub const SCRATCH_PATTERN: u32 = 0x1234_567A;
