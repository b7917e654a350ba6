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

//! Register access abstraction.
//!
//! Every operation in this crate talks to the card through the [`RegisterBackend`] trait
//! rather than a raw base address. Two implementations exist:
//! - [`DeviceWindow`](crate::device::DeviceWindow) - the memory-mapped user BAR of a real device
//! - [`RamWindow`] - an in-memory window that behaves like ordinary RAM and records every
//!   access, used for `--dry-run` and for tests
//!
//! # Examples
//!
//! ```rust
//! # use csrprobe::registers::{RamWindow, RegisterBackend};
//! # fn example() -> Result<(), csrprobe::error::CsrProbeError> {
//! let mut window = RamWindow::new(64 * 1024);
//! let readback = window.write_readback(0x0, 0xCAFE_F00D)?;
//! assert_eq!(readback, 0xCAFE_F00D);
//! # Ok(())
//! # }
//! ```

use crate::error::CsrProbeError;
use log::trace;
use std::cell::RefCell;
use std::time::Instant;

/// Width in bytes of a single control/status register.
pub const REGISTER_WIDTH: usize = size_of::<u32>();

/// Trait for a window of 32-bit control/status registers.
pub trait RegisterBackend {
    /// Size of the window in bytes.
    fn window_len(&self) -> usize;

    /// Read the 32-bit register at byte `offset`.
    ///
    /// # Returns: `Result<u32, CsrProbeError>`
    /// * `Ok(u32)` - The register value
    /// * `Err(CsrProbeError::Unaligned)` - `offset` is not a multiple of 4
    /// * `Err(CsrProbeError::OutOfRange)` - the register lies past the end of the window
    fn read_u32(&self, offset: usize) -> Result<u32, CsrProbeError>;

    /// Write `value` to the 32-bit register at byte `offset`.
    ///
    /// # Returns: `Result<(), CsrProbeError>`
    /// * `Ok(())` - The write was issued
    /// * `Err(CsrProbeError::Unaligned)` - `offset` is not a multiple of 4
    /// * `Err(CsrProbeError::OutOfRange)` - the register lies past the end of the window
    fn write_u32(&mut self, offset: usize, value: u32) -> Result<(), CsrProbeError>;

    /// Write `value` to the register at `offset`, then immediately read it back.
    ///
    /// # Returns: `Result<u32, CsrProbeError>`
    /// * `Ok(u32)` - The value read back after the write
    /// * `Err(CsrProbeError)` - The offset was rejected
    fn write_readback(&mut self, offset: usize, value: u32) -> Result<u32, CsrProbeError> {
        self.write_u32(offset, value)?;
        self.read_u32(offset)
    }
}

/// Check that a 32-bit register at `offset` is aligned and lies entirely inside a window
/// of `len` bytes.
pub fn check_offset(offset: usize, len: usize) -> Result<(), CsrProbeError> {
    if offset % REGISTER_WIDTH != 0 {
        return Err(CsrProbeError::Unaligned { offset });
    }
    match offset.checked_add(REGISTER_WIDTH) {
        Some(end) if end <= len => Ok(()),
        _ => Err(CsrProbeError::OutOfRange { offset, len }),
    }
}

/// Direction of a recorded register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// A single access made to a [`RamWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterAccess {
    pub kind: AccessKind,
    pub offset: usize,
    pub value: u32,
    pub at: Instant,
}

/// An in-memory register window.
///
/// Registers behave like plain RAM: a read returns whatever was last written, or zero.
/// Every access is appended to a log which can be inspected with [`RamWindow::accesses`].
#[derive(Debug)]
pub struct RamWindow {
    words: Vec<u32>,
    log: RefCell<Vec<RegisterAccess>>,
}

impl RamWindow {
    /// Create a zero-filled window of `len` bytes. Trailing bytes that do not make up a
    /// whole register are not addressable.
    pub fn new(len: usize) -> RamWindow {
        RamWindow {
            words: vec![0; len / REGISTER_WIDTH],
            log: RefCell::new(Vec::new()),
        }
    }

    /// All accesses made so far, oldest first.
    pub fn accesses(&self) -> Vec<RegisterAccess> {
        self.log.borrow().clone()
    }

    /// Only the writes made so far, as `(offset, value)` pairs, oldest first.
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.log
            .borrow()
            .iter()
            .filter(|a| a.kind == AccessKind::Write)
            .map(|a| (a.offset, a.value))
            .collect()
    }

    fn record(&self, kind: AccessKind, offset: usize, value: u32) {
        self.log.borrow_mut().push(RegisterAccess {
            kind,
            offset,
            value,
            at: Instant::now(),
        });
    }
}

impl RegisterBackend for RamWindow {
    fn window_len(&self) -> usize {
        self.words.len() * REGISTER_WIDTH
    }

    fn read_u32(&self, offset: usize) -> Result<u32, CsrProbeError> {
        check_offset(offset, self.window_len())?;
        let value = self.words[offset / REGISTER_WIDTH];
        trace!("ram read  [{offset:#06x}] -> {value:#010x}");
        self.record(AccessKind::Read, offset, value);
        Ok(value)
    }

    fn write_u32(&mut self, offset: usize, value: u32) -> Result<(), CsrProbeError> {
        check_offset(offset, self.window_len())?;
        trace!("ram write [{offset:#06x}] <- {value:#010x}");
        self.words[offset / REGISTER_WIDTH] = value;
        self.record(AccessKind::Write, offset, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;
    use rstest::*;

    #[gtest]
    #[rstest]
    #[case::first(0x0, 0x20, ok(eq(&())))]
    #[case::last(0x1c, 0x20, ok(eq(&())))]
    #[case::unaligned(0x2, 0x20, err(displays_as(contains_substring("not 32-bit aligned"))))]
    #[case::straddles_end(0x20, 0x20, err(displays_as(contains_substring("outside"))))]
    #[case::overflow(usize::MAX - 3, 0x20, err(displays_as(contains_substring("outside"))))]
    #[case::empty_window(0x0, 0x0, err(displays_as(contains_substring("outside"))))]
    fn test_check_offset<M: for<'a> Matcher<&'a std::result::Result<(), CsrProbeError>>>(
        #[case] offset: usize,
        #[case] len: usize,
        #[case] condition: M,
    ) {
        expect_that!(check_offset(offset, len), condition);
    }

    #[gtest]
    fn test_ram_window_starts_zeroed() {
        let window = RamWindow::new(0x100);
        expect_that!(window.window_len(), eq(0x100));
        expect_that!(window.read_u32(0x40), ok(eq(&0u32)));
    }

    #[gtest]
    fn test_write_readback_returns_written_value() {
        let mut window = RamWindow::new(0x100);
        expect_that!(window.write_readback(0x0, 0x1234_567A), ok(eq(&0x1234_567Au32)));
        expect_that!(window.read_u32(0x0), ok(eq(&0x1234_567Au32)));
    }

    #[gtest]
    fn test_write_readback_logs_write_then_read() {
        let mut window = RamWindow::new(0x100);
        window.write_readback(0x8, 7).unwrap();
        let kinds: Vec<AccessKind> = window.accesses().iter().map(|a| a.kind).collect();
        expect_that!(kinds, elements_are![eq(&AccessKind::Write), eq(&AccessKind::Read)]);
        expect_that!(window.writes(), elements_are![eq(&(0x8usize, 7u32))]);
    }

    #[gtest]
    fn test_rejected_access_is_not_recorded() {
        let mut window = RamWindow::new(0x10);
        expect_that!(window.write_u32(0x10, 1), err(anything()));
        expect_that!(window.read_u32(0x3), err(anything()));
        expect_that!(window.accesses(), is_empty());
    }

    #[gtest]
    fn test_partial_trailing_word_is_not_addressable() {
        let window = RamWindow::new(0x12);
        expect_that!(window.window_len(), eq(0x10));
        expect_that!(window.read_u32(0x10), err(anything()));
    }
}
