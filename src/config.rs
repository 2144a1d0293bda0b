//! Command-line arguments and the scan options derived from them.

use std::time::Duration;

use clap::Parser;

use crate::error::{Result, ScanError};
use crate::models::WrittenUnitMode;

/// List all connected drives and monitor their S.M.A.R.T. status
#[derive(Parser, Debug)]
#[command(name = "drive-health")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Only show a specific device (e.g. sda or /dev/sda)
    pub device: Option<String>,

    /// Show sizes in KiB, MiB, GiB, TiB and PiB
    #[arg(short, long)]
    pub mib: bool,

    /// Seconds to wait for smartctl on each device
    #[arg(short, long, default_value_t = 4.0)]
    pub timeout: f64,

    /// Increase output verbosity
    #[arg(short, long)]
    pub verbose: bool,

    /// Use 32 KB LBAs instead of 512 bytes for the written value (non-NVMe devices)
    #[arg(short, long)]
    pub written: bool,

    /// Print a text table instead of opening the window
    #[arg(short, long)]
    pub print: bool,
}

/// Unit family used when humanizing byte counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizeUnits {
    /// KB, MB, GB ... (powers of 1000)
    #[default]
    Decimal,
    /// KiB, MiB, GiB ... (powers of 1024)
    Binary,
}

/// Everything a scan needs, passed explicitly down the call chain.
#[derive(Clone, Debug)]
pub struct ScanOptions {
    /// Restrict the scan to one kernel device name
    pub device: Option<String>,
    /// Upper bound for one smartctl run
    pub timeout: Duration,
    pub size_units: SizeUnits,
    pub written_mode: WrittenUnitMode,
    /// Show full cell contents
    pub verbose: bool,
    /// Diagnostic utility to invoke
    pub smartctl: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            device: None,
            timeout: Duration::from_secs(4),
            size_units: SizeUnits::Decimal,
            written_mode: WrittenUnitMode::Sector512,
            verbose: false,
            smartctl: String::from("smartctl"),
        }
    }
}

impl TryFrom<&Args> for ScanOptions {
    type Error = ScanError;

    fn try_from(args: &Args) -> Result<Self> {
        let timeout = Duration::try_from_secs_f64(args.timeout)
            .map_err(|e| ScanError::InvalidArgument(format!("timeout {}: {}", args.timeout, e)))?;

        let device = args
            .device
            .as_deref()
            .map(|d| d.strip_prefix("/dev/").unwrap_or(d).to_string());

        Ok(Self {
            device,
            timeout,
            size_units: if args.mib {
                SizeUnits::Binary
            } else {
                SizeUnits::Decimal
            },
            written_mode: if args.written {
                WrittenUnitMode::Block32K
            } else {
                WrittenUnitMode::Sector512
            },
            verbose: args.verbose,
            ..Self::default()
        })
    }
}
