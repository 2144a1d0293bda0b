//! Display rows.
//!
//! Turns one device's diagnostic into a [`DeviceReport`]: identity fields come
//! straight from the parsed mapping, derived values from the analyzer, and
//! anything still missing from sysfs. Every column ends up as text or a
//! sentinel: `-` when absent, `?` when the diagnostic timed out.

use log::debug;

use crate::config::{ScanOptions, SizeUnits};
use crate::models::{AnalysisResult, DeviceClass, DeviceReport, HealthStatus, ParsedDiagnostic};
use crate::scanner::{Diagnostic, Sysfs};
use crate::smart::attributes::{
    DEVICE_MODEL, FIRMWARE_VERSION, MODEL_FAMILY, MODEL_NUMBER, PRODUCT, REVISION, SERIAL_NUMBER,
    SERIAL_NUMBER_SCSI, VENDOR,
};
use crate::smart::{Analyzer, parse};

/// Sentinel for a value the device did not report.
pub const ABSENT: &str = "-";
/// Sentinel for a value lost to a diagnostic timeout.
pub const TIMED_OUT: &str = "?";

const ATA_MODEL_FIELDS: &[&str] = &[MODEL_FAMILY, VENDOR, DEVICE_MODEL, PRODUCT];
const NVME_MODEL_FIELDS: &[&str] = &[MODEL_NUMBER, DEVICE_MODEL];
const OPTICAL_MODEL_FIELDS: &[&str] = &[VENDOR, PRODUCT];
const FIRMWARE_FIELDS: &[&str] = &[FIRMWARE_VERSION, REVISION];
const SERIAL_FIELDS: &[&str] = &[SERIAL_NUMBER, SERIAL_NUMBER_SCSI];

/// Builds the row for one device.
///
/// `class` is None for devices without a rule set; `diagnostic` is None when
/// the utility was not run. Either way the sysfs fallbacks still apply.
pub fn build_report(
    name: &str,
    class: Option<DeviceClass>,
    diagnostic: Option<&Diagnostic>,
    options: &ScanOptions,
    sysfs: &Sysfs,
) -> DeviceReport {
    let mut report = DeviceReport::empty(format!("/dev/{}", name), name);
    report.class = class;

    if let (Some(class), Some(diagnostic)) = (class, diagnostic) {
        let parsed = parse(&diagnostic.output, class);
        let analysis = Analyzer::new(&parsed).analyze(options.written_mode);

        fill_identity(&mut report, &parsed);
        fill_analysis(&mut report, &analysis, options.size_units);
        report.smart_support = parsed.smart_support;

        if diagnostic.timed_out {
            mark_timed_out(&mut report);
        }
    }

    fill_from_sysfs(&mut report, sysfs, options.size_units);

    debug!(
        "{}: health {}, lifetime {}, runtime {}",
        report.dev, report.health, report.lifetime, report.runtime
    );
    report
}

fn fill_identity(report: &mut DeviceReport, parsed: &ParsedDiagnostic) {
    let model_fields = match parsed.class {
        DeviceClass::Nvme => NVME_MODEL_FIELDS,
        DeviceClass::Optical => OPTICAL_MODEL_FIELDS,
        DeviceClass::Ata | DeviceClass::ScsiAtaAlias | DeviceClass::UsbBridge => ATA_MODEL_FIELDS,
    };

    let fields = &parsed.fields;
    if let Some(model) = fields.first_text(model_fields) {
        report.model = model.to_string();
    }
    if let Some(firmware) = fields.first_text(FIRMWARE_FIELDS) {
        report.firmware = firmware.to_string();
    }
    if let Some(serial) = fields.first_text(SERIAL_FIELDS) {
        report.serial = serial.to_string();
    }
}

fn fill_analysis(report: &mut DeviceReport, analysis: &AnalysisResult, units: SizeUnits) {
    report.health = analysis.health.clone();

    if let Some(bytes) = analysis.capacity_bytes {
        report.size = convert_bytes(bytes, 0, units);
    }
    if let Some(hours) = analysis.power_on_hours {
        report.runtime = format_runtime(hours);
    }
    if let Some(bytes) = analysis.bytes_written {
        report.written = convert_bytes(bytes, 1, units);
    }
    if let Some(rotation) = analysis.rotation {
        report.rotation = rotation.to_string();
    }
    if let Some(percent) = analysis.lifetime_percent {
        report.lifetime = format!("{}%", percent);
        report.lifetime_percent = Some(percent);
    }
}

fn mark_timed_out(report: &mut DeviceReport) {
    report.timed_out = true;
    report.health = HealthStatus::Timeout;

    for column in [
        &mut report.runtime,
        &mut report.written,
        &mut report.rotation,
        &mut report.lifetime,
    ] {
        if *column == ABSENT {
            *column = TIMED_OUT.to_string();
        }
    }
}

fn fill_from_sysfs(report: &mut DeviceReport, sysfs: &Sysfs, units: SizeUnits) {
    let name = report.name.clone();

    if report.model == ABSENT {
        if let Some(model) = sysfs.model(&name) {
            report.model = model;
        }
    }
    if report.serial == ABSENT {
        if let Some(serial) = sysfs.serial(&name) {
            report.serial = serial;
        }
    }
    if report.firmware == ABSENT {
        if let Some(firmware) = sysfs.firmware(&name) {
            report.firmware = firmware;
        }
    }
    // Optical media size says nothing about the drive.
    if report.size == ABSENT && report.class != Some(DeviceClass::Optical) {
        if let Some(bytes) = sysfs.size_bytes(&name) {
            report.size = convert_bytes(bytes, 0, units);
        }
    }
}

/// Humanizes a byte count, e.g. `500 GB` or `465.8 GiB`.
pub fn convert_bytes(size: u64, precision: usize, units: SizeUnits) -> String {
    let (names, step) = match units {
        SizeUnits::Decimal => (["B", "KB", "MB", "GB", "TB", "PB"], 1000.0),
        SizeUnits::Binary => (["B", "KiB", "MiB", "GiB", "TiB", "PiB"], 1024.0),
    };

    let mut value = size as f64;
    for unit in &names[..names.len() - 1] {
        if value < step {
            return format!("{:.*} {}", precision, value, unit);
        }
        value /= step;
    }
    format!("{:.*} {}", precision, value, names[names.len() - 1])
}

/// Humanizes power-on hours: hours below a day, days below a year, then years.
pub fn format_runtime(hours: u64) -> String {
    const HOURS_PER_DAY: u64 = 24;
    const HOURS_PER_YEAR: u64 = 365 * HOURS_PER_DAY;

    match hours {
        1 => "1 hour".to_string(),
        h if h < HOURS_PER_DAY => format!("{} hours", h),
        h if h < HOURS_PER_YEAR => format!("{:.1} days", h as f64 / HOURS_PER_DAY as f64),
        h => format!("{:.1} years", h as f64 / HOURS_PER_YEAR as f64),
    }
}

const DEVICE_COLUMN_WIDTH: usize = 8;
const COLUMNS: [(&str, usize); 9] = [
    ("Vendor / Model", 26),
    ("Serial", 21),
    ("Firmware", 10),
    ("Size", 9),
    ("Runtime", 12),
    ("Written", 10),
    ("Rpm", 6),
    ("Life", 6),
    ("S.M.A.R.T.", 10),
];

/// Plain-text table of all reports, one device per line.
pub fn render_table(reports: &[DeviceReport], verbose: bool) -> String {
    let mut out = format!("{:<width$}", "Device", width = DEVICE_COLUMN_WIDTH);
    for (title, width) in COLUMNS {
        out.push_str(&format!("{:<width$}", title, width = width));
    }
    out.push('\n');

    for report in reports {
        out.push_str(&format!("{:<width$}", report.name, width = DEVICE_COLUMN_WIDTH));

        let health = report.health.label();
        let cells: [&str; 9] = [
            report.model.as_str(),
            &report.serial,
            &report.firmware,
            &report.size,
            &report.runtime,
            &report.written,
            &report.rotation,
            &report.lifetime,
            &health,
        ];

        for (cell, (_, width)) in cells.iter().zip(COLUMNS) {
            if verbose {
                out.push_str(&format!("{} | ", cell));
            } else {
                let cell = shorten(cell, width - 1);
                out.push_str(&format!("{:<width$}", cell, width = width));
            }
        }
        out.push('\n');
    }

    out
}

/// Cuts the middle out of `s` so it fits `max_len` characters: `head[..]tail`.
fn shorten(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        return s.to_string();
    }

    let keep = (max_len / 2).saturating_sub(2);
    let head: String = s.chars().take(keep).collect();
    let tail: String = s.chars().skip(len - keep).collect();
    format!("{}[..]{}", head, tail)
}
