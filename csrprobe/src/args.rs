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

use crate::error::CsrProbeError;

/// Parse a `u32` written either in decimal or as hex with a `0x`/`0X` prefix.
/// Underscores are allowed as digit separators, e.g. `0x1234_567A`.
pub fn parse_u32(s: &str) -> Result<u32, CsrProbeError> {
    let trimmed = s.trim().replace('_', "");
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => trimmed.parse::<u32>(),
    };
    parsed.map_err(|e| CsrProbeError::Argument(format!("'{s}' is not a valid u32: {e}")))
}

/// Like [`parse_u32`], for byte offsets and lengths.
pub fn parse_usize(s: &str) -> Result<usize, CsrProbeError> {
    parse_u32(s).map(|v| v as usize)
}
