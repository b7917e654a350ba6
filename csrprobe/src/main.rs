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
//! Opens the card's user BAR, maps a register window and runs a short scripted test:
//! 1. Pulse the software reset of the user logic
//! 2. Write a known pattern to the scratch register and print what reads back
//! 3. Start and finish a transmit
//!
//! Single registers can also be peeked and poked with the `read` and `write` subcommands.
//! Any failure to open or map the device aborts before a single register is touched.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (`trace`, `debug`, `info`, `warn`, `error`
//!   or `off`). Defaults to `info`. `trace` logs every register access.
//!
//! # Examples
//!
//! ```bash
//! # Full smoke test against /dev/xdma0_user
//! sudo csrprobe
//!
//! # Same, against the second card, logging every register access
//! sudo RUST_LOG=trace csrprobe --device /dev/xdma1_user
//!
//! # Peek and poke single registers
//! sudo csrprobe read 0x0
//! sudo csrprobe write 0x0 0xdeadbeef
//!
//! # Exercise the sequence without hardware
//! csrprobe --dry-run --reset-hold-ms 0
//! ```

use clap::{Parser, Subcommand};
use csrprobe::args::{parse_u32, parse_usize};
use csrprobe::config::{DEFAULT_DEVICE_PATH, RESET_HOLD, WINDOW_SIZE};
use csrprobe::device::DeviceWindow;
use csrprobe::error::CsrProbeError;
use csrprobe::registers::{RamWindow, RegisterBackend};
use csrprobe::sequence::run_smoke_test;
use log::{debug, error, info, warn};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "csrprobe")]
#[command(bin_name = "csrprobe")]
#[command(about = "Register-level smoke test for PCIe attached FPGA cards")]
struct Cli {
    #[arg(
        long,
        default_value = DEFAULT_DEVICE_PATH,
        help = "character device exposing the user BAR"
    )]
    device: PathBuf,
    #[arg(
        long,
        default_value_t = WINDOW_SIZE,
        value_parser = parse_usize,
        help = "number of bytes of the device to map"
    )]
    window_size: usize,
    #[arg(
        long,
        default_value_t = RESET_HOLD.as_millis() as u64,
        help = "how long the software reset is held, in milliseconds"
    )]
    reset_hold_ms: u64,
    #[arg(
        long,
        help = "run against an in-memory register window instead of the device"
    )]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Reset the card, then run the CSR round-trip and transmit tests (default)
    Run,
    /// Read a single register
    Read {
        #[arg(value_parser = parse_u32)]
        offset: u32,
    },
    /// Write a single register and print what reads back
    Write {
        #[arg(value_parser = parse_u32)]
        offset: u32,
        #[arg(value_parser = parse_u32)]
        value: u32,
    },
}

/// Initialise `env_logger` with a `[level]  message` layout, defaulting to `info`.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{style}[{}]{style:#}  {}",
                record.level().as_str().to_lowercase(),
                record.args()
            )
        })
        .init();
}

/// Run `command` against an already opened register window.
fn dispatch(
    window: &mut impl RegisterBackend,
    command: Commands,
    reset_hold: Duration,
) -> Result<(), CsrProbeError> {
    match command {
        Commands::Run => {
            let report = run_smoke_test(window, reset_hold)?;
            if report.scratch_ok() {
                info!("Smoke test done");
            } else {
                warn!("Smoke test done, scratch register did not read back as written");
            }
        }
        Commands::Read { offset } => {
            let value = window.read_u32(offset as usize)?;
            println!("{offset:#06x}: {value:08X}");
        }
        Commands::Write { offset, value } => {
            let readback = window.write_readback(offset as usize, value)?;
            println!("{offset:#06x}: {readback:08X}");
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), CsrProbeError> {
    let command = cli.command.unwrap_or(Commands::Run);
    let reset_hold = Duration::from_millis(cli.reset_hold_ms);
    if cli.dry_run {
        info!(
            "Dry run: using an in-memory window of {:#x} bytes",
            cli.window_size
        );
        let mut window = RamWindow::new(cli.window_size);
        dispatch(&mut window, command, reset_hold)
    } else {
        let mut window = DeviceWindow::open(&cli.device, cli.window_size)?;
        dispatch(&mut window, command, reset_hold)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();
    debug!("parsed cli command with {cli:?}");
    run(&cli).inspect_err(|e| error!("{e}"))?;
    Ok(())
}
