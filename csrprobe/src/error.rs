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

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CsrProbeError {
    #[error("CsrProbeError::IOOpen: Failed to open {file:?}: {e}")]
    IOOpen { file: PathBuf, e: std::io::Error },
    #[error("CsrProbeError::Map: Failed to mmap {len:#x} bytes of {file:?}: {e}")]
    Map {
        file: PathBuf,
        len: usize,
        e: std::io::Error,
    },
    #[error("CsrProbeError::Unaligned: Register offset {offset:#06x} is not 32-bit aligned")]
    Unaligned { offset: usize },
    #[error(
        "CsrProbeError::OutOfRange: Register offset {offset:#06x} is outside the {len:#x} byte window"
    )]
    OutOfRange { offset: usize, len: usize },
    #[error("CsrProbeError::Argument: {0}")]
    Argument(String),
}
