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

//! csrprobe - register-level smoke test for PCIe attached FPGA cards.
//!
//! The library half of csrprobe. It provides:
//! - [`device`] - opening and mapping the card's user BAR
//! - [`registers`] - the [`RegisterBackend`](registers::RegisterBackend) trait and an in-memory window
//! - [`sequence`] - the scripted reset, CSR and transmit tests
//! - [`args`] - parsing of numeric command line arguments
//! - [`config`] - device path, window size and register map defaults
//! - [`error`] - the crate wide error type

pub mod args;
pub mod config;
pub mod device;
pub mod error;
pub mod registers;
pub mod sequence;
