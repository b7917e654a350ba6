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

use log::{LevelFilter, Log, Metadata, Record};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::NamedTempFile;

/// Create a zero-filled temporary file of `len` bytes to stand in for a device BAR.
///
/// The file is deleted when the returned handle is dropped.
pub fn backing_file(len: usize) -> NamedTempFile {
    let file = NamedTempFile::with_prefix("csrprobe-")
        .unwrap_or_else(|e| panic!("backing_file: failed to create temp file: {e}"));
    file.as_file()
        .set_len(len as u64)
        .unwrap_or_else(|e| panic!("backing_file: failed to size {:?}: {e}", file.path()));
    file
}

/// Read the little-endian 32-bit word at `offset` of the file at `path`.
pub fn read_word(path: &Path, offset: usize) -> u32 {
    let bytes =
        fs::read(path).unwrap_or_else(|e| panic!("read_word: failed to read {path:?}: {e}"));
    let word: [u8; 4] = bytes[offset..offset + 4]
        .try_into()
        .expect("read_word: slice is 4 bytes");
    u32::from_le_bytes(word)
}

/// Logger that keeps every record as `"<level> <message>"`.
struct CapturingLogger {
    lines: Mutex<Vec<String>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(format!("{} {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<CapturingLogger> = OnceLock::new();

/// Install the capturing logger for this test binary. Safe to call from every test.
pub fn capture_logs() {
    let logger = LOGGER.get_or_init(|| CapturingLogger {
        lines: Mutex::new(Vec::new()),
    });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

/// Everything logged so far by any test in this binary.
pub fn captured_logs() -> Vec<String> {
    LOGGER
        .get()
        .and_then(|logger| logger.lines.lock().ok().map(|lines| lines.clone()))
        .unwrap_or_default()
}
