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

//! Memory-mapped access to the card's user BAR.
//!
//! The XDMA driver exposes the user BAR of the card as a character device (by default
//! `/dev/xdma0_user`). Mapping that device gives direct access to the control/status
//! registers of the user logic. All accesses go through [`core::ptr::read_volatile`] and
//! [`core::ptr::write_volatile`], so the compiler neither caches nor reorders them.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use csrprobe::device::DeviceWindow;
//! # use csrprobe::registers::RegisterBackend;
//! # use std::path::Path;
//! #
//! # fn example() -> Result<(), csrprobe::error::CsrProbeError> {
//! let mut window = DeviceWindow::open(Path::new("/dev/xdma0_user"), 64 * 1024)?;
//! let readback = window.write_readback(0x0, 0x1234_567A)?;
//! println!("{readback:08X}");
//! # Ok(())
//! # }
//! ```

use crate::error::CsrProbeError;
use crate::registers::{RegisterBackend, check_offset};
use log::{error, info, trace};
use memmap2::{MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

/// Open the device node at `path` for reading and writing.
///
/// # Returns: `Result<File, CsrProbeError>`
/// * `Ok(File)` - The opened device
/// * `Err(CsrProbeError::IOOpen)` - If the device cannot be opened (missing, permissions, etc.)
pub fn open_device(path: &Path) -> Result<File, CsrProbeError> {
    trace!("Attempting to open {path:?}");
    let result = OpenOptions::new().read(true).write(true).open(path);
    match result {
        Ok(file) => {
            info!("Opened {path:?}. fd: {}", file.as_raw_fd());
            Ok(file)
        }
        Err(e) => {
            error!(
                "Failed to open {path:?} with errno {}",
                e.raw_os_error().unwrap_or(0)
            );
            Err(CsrProbeError::IOOpen {
                file: path.into(),
                e,
            })
        }
    }
}

/// Map the first `len` bytes of `file` as shared, read/write memory.
///
/// # Arguments
///
/// * `file` - The opened device
/// * `path` - Path `file` was opened from, used for logging and errors only
/// * `len` - Number of bytes to map, starting at offset 0
///
/// # Returns: `Result<MmapMut, CsrProbeError>`
/// * `Ok(MmapMut)` - The mapping
/// * `Err(CsrProbeError::Map)` - If the kernel refuses the mapping
pub fn map_window(file: &File, path: &Path, len: usize) -> Result<MmapMut, CsrProbeError> {
    trace!("Attempting to map {len:#x} bytes of {path:?}");
    // SAFETY: the mapping is owned by the returned MmapMut and only ever accessed through
    // bounds-checked volatile reads and writes in DeviceWindow.
    let result = unsafe { MmapOptions::new().len(len).map_mut(file) };
    match result {
        Ok(map) => {
            info!("Mapped {path:?}. addr: {:p}", map.as_ptr());
            Ok(map)
        }
        Err(e) => {
            error!(
                "Failed to mmap {path:?} with errno {}",
                e.raw_os_error().unwrap_or(0)
            );
            Err(CsrProbeError::Map {
                file: path.into(),
                len,
                e,
            })
        }
    }
}

/// A mapped register window of a device.
///
/// Owns both the open device and its mapping. Dropping the window unmaps the region and
/// closes the device.
#[derive(Debug)]
pub struct DeviceWindow {
    path: PathBuf,
    map: MmapMut,
    // Kept open for as long as the mapping exists.
    _file: File,
}

impl DeviceWindow {
    /// Open the device at `path` and map `len` bytes of it.
    ///
    /// # Returns: `Result<DeviceWindow, CsrProbeError>`
    /// * `Ok(DeviceWindow)` - Ready for register access
    /// * `Err(CsrProbeError::IOOpen)` - The device could not be opened
    /// * `Err(CsrProbeError::Map)` - The device could not be mapped
    pub fn open(path: &Path, len: usize) -> Result<DeviceWindow, CsrProbeError> {
        let file = open_device(path)?;
        let map = map_window(&file, path, len)?;
        Ok(DeviceWindow {
            path: path.to_owned(),
            map,
            _file: file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegisterBackend for DeviceWindow {
    fn window_len(&self) -> usize {
        self.map.len()
    }

    fn read_u32(&self, offset: usize) -> Result<u32, CsrProbeError> {
        check_offset(offset, self.window_len())?;
        // SAFETY: check_offset guarantees the register lies inside the mapping and is 4-byte
        // aligned relative to the page-aligned base.
        let value = unsafe { self.map.as_ptr().add(offset).cast::<u32>().read_volatile() };
        trace!("read  [{offset:#06x}] -> {value:#010x}");
        Ok(value)
    }

    fn write_u32(&mut self, offset: usize, value: u32) -> Result<(), CsrProbeError> {
        check_offset(offset, self.window_len())?;
        trace!("write [{offset:#06x}] <- {value:#010x}");
        // SAFETY: as in read_u32.
        unsafe {
            self.map
                .as_mut_ptr()
                .add(offset)
                .cast::<u32>()
                .write_volatile(value)
        };
        Ok(())
    }
}
