use drive_health::config::{ScanOptions, SizeUnits};
use drive_health::models::{
    DeviceClass, HealthStatus, Rotation, Severity, SmartSupport, WrittenUnitMode, WrittenUnits,
};
use drive_health::report::{build_report, render_table};
use drive_health::scanner::{Diagnostic, Sysfs};
use drive_health::smart::{Analyzer, analyze_text, parse};

const SAMSUNG_SATA: &str = include_str!("fixtures/samsung_860_evo.txt");
const CRUCIAL_SATA: &str = include_str!("fixtures/crucial_mx500.txt");
const WD_HDD: &str = include_str!("fixtures/wd_blue_hdd.txt");
const SAMSUNG_NVME: &str = include_str!("fixtures/samsung_970_evo_plus_nvme.txt");
const OPTICAL: &str = include_str!("fixtures/optical_dvdram.txt");
const USB_BRIDGE: &str = include_str!("fixtures/usb_bridge_unknown.txt");
const SMART_DISABLED: &str = include_str!("fixtures/toshiba_smart_disabled.txt");

fn diagnostic(output: &str) -> Diagnostic {
    Diagnostic {
        output: output.to_string(),
        exit_code: Some(0),
        timed_out: false,
    }
}

fn empty_sysfs() -> (tempfile::TempDir, Sysfs) {
    let dir = tempfile::tempdir().unwrap();
    let sysfs = Sysfs::new(dir.path());
    (dir, sysfs)
}

#[test]
fn samsung_sata_ssd() {
    let result = analyze_text(SAMSUNG_SATA, DeviceClass::ScsiAtaAlias, WrittenUnitMode::Sector512);

    assert_eq!(result.capacity_bytes, Some(500_107_862_016));
    assert_eq!(result.power_on_hours, Some(21043));
    assert_eq!(result.written, Some(WrittenUnits::Lbas(29_581_234_567)));
    assert_eq!(result.bytes_written, Some(29_581_234_567 * 512));
    assert_eq!(result.rotation, Some(Rotation::SolidState));
    // Wear reading 92 capped by reserve blocks 97
    assert_eq!(result.lifetime_percent, Some(92));
    assert_eq!(result.health, HealthStatus::Reported("PASSED".into()));
}

#[test]
fn samsung_written_with_32k_blocks() {
    let result = analyze_text(SAMSUNG_SATA, DeviceClass::ScsiAtaAlias, WrittenUnitMode::Block32K);
    assert_eq!(result.bytes_written, Some(29_581_234_567 * 32_000));
}

#[test]
fn crucial_counts_erase_failures_as_sector_errors() {
    let result = analyze_text(CRUCIAL_SATA, DeviceClass::ScsiAtaAlias, WrittenUnitMode::Sector512);

    assert_eq!(result.lifetime_percent, Some(96));
    assert_eq!(result.health, HealthStatus::ErrorCount(2));
    assert_eq!(result.health.to_string(), "2");
    // Attribute 246 is not the written counter
    assert_eq!(result.written, None);
}

#[test]
fn hdd_sums_sector_errors() {
    let result = analyze_text(WD_HDD, DeviceClass::ScsiAtaAlias, WrittenUnitMode::Sector512);

    assert_eq!(result.rotation, Some(Rotation::Rpm(7200)));
    assert_eq!(result.lifetime_percent, None);
    assert_eq!(result.health.to_string(), "5");
    assert_eq!(result.health.severity(), Severity::Critical);
}

#[test]
fn hdd_sector_errors_win_over_udma() {
    let text = WD_HDD.replace(
        "199 UDMA_CRC_Error_Count    0x0032   200   200   000    Old_age   Always       -       0",
        "199 UDMA_CRC_Error_Count    0x0032   200   200   000    Old_age   Always       -       612",
    );
    let result = analyze_text(&text, DeviceClass::Ata, WrittenUnitMode::Sector512);
    assert_eq!(result.health, HealthStatus::ErrorCount(5));

    let clean = text
        .replace("-       3\n", "-       0\n")
        .replace("-       2\n", "-       0\n");
    let result = analyze_text(&clean, DeviceClass::Ata, WrittenUnitMode::Sector512);
    assert_eq!(result.health, HealthStatus::UdmaErrors);
}

#[test]
fn failed_self_assessment_is_reported_verbatim() {
    let text = WD_HDD.replace("test result: PASSED", "test result: FAILED!");
    let result = analyze_text(&text, DeviceClass::ScsiAtaAlias, WrittenUnitMode::Sector512);

    // Sector errors are only summed for a passing drive
    assert_eq!(result.health, HealthStatus::Reported("FAILED!".into()));
    assert_eq!(result.health.severity(), Severity::Critical);
}

#[test]
fn nvme_ssd() {
    let result = analyze_text(SAMSUNG_NVME, DeviceClass::Nvme, WrittenUnitMode::Sector512);

    assert_eq!(result.capacity_bytes, Some(1_000_204_886_016));
    assert_eq!(result.power_on_hours, Some(4321));
    assert_eq!(result.written, Some(WrittenUnits::NvmeDataUnits(12_345_678)));
    assert_eq!(result.bytes_written, Some(12_345_678 * 512_000));
    assert_eq!(result.rotation, Some(Rotation::Nvme));
    assert_eq!(result.lifetime_percent, Some(97));
    assert_eq!(result.health.label(), "OK");
}

#[test]
fn nvme_written_ignores_lba_mode() {
    let a = analyze_text(SAMSUNG_NVME, DeviceClass::Nvme, WrittenUnitMode::Sector512);
    let b = analyze_text(SAMSUNG_NVME, DeviceClass::Nvme, WrittenUnitMode::Block32K);
    assert_eq!(a.bytes_written, b.bytes_written);
}

#[test]
fn nvme_verdicts_in_priority_order() {
    let warned = SAMSUNG_NVME
        .replace("Critical Warning:                   0x00", "Critical Warning:                   0x04")
        .replace("Warning  Comp. Temperature Time:    0", "Warning  Comp. Temperature Time:    12")
        .replace("Media and Data Integrity Errors:    0", "Media and Data Integrity Errors:    7");
    let result = analyze_text(&warned, DeviceClass::Nvme, WrittenUnitMode::Sector512);
    assert_eq!(result.health.to_string(), "WARN");

    let hot = warned.replace("0x04", "0x00");
    let result = analyze_text(&hot, DeviceClass::Nvme, WrittenUnitMode::Sector512);
    assert_eq!(result.health.to_string(), "TEMP E");

    let worn = hot.replace("Warning  Comp. Temperature Time:    12", "Warning  Comp. Temperature Time:    0");
    let result = analyze_text(&worn, DeviceClass::Nvme, WrittenUnitMode::Sector512);
    assert_eq!(result.health, HealthStatus::ErrorCount(7));
}

#[test]
fn nvme_ignores_ata_attributes() {
    // An ATA attribute table pasted into NVMe output must not leak into NVMe rules.
    let text = format!("{}\n{}", SAMSUNG_NVME, WD_HDD);
    let parsed = parse(&text, DeviceClass::Nvme);
    assert!(parsed.fields.attribute(5).is_none());
    assert_eq!(Analyzer::new(&parsed).rotation(), Some(Rotation::Nvme));
}

#[test]
fn optical_drive_has_no_smart() {
    let result = analyze_text(OPTICAL, DeviceClass::Optical, WrittenUnitMode::Sector512);

    assert_eq!(result.capacity_bytes, None);
    assert_eq!(result.power_on_hours, None);
    assert_eq!(result.rotation, None);
    assert_eq!(result.lifetime_percent, None);
    assert_eq!(result.health, HealthStatus::NoSmart);
    assert_eq!(result.health.to_string(), "-");
}

#[test]
fn unknown_usb_bridge() {
    for class in [DeviceClass::UsbBridge, DeviceClass::ScsiAtaAlias] {
        let parsed = parse(USB_BRIDGE, class);
        assert!(parsed.usb_bridge);
        assert_eq!(parsed.health, "UNKNOWN");

        let result = Analyzer::new(&parsed).analyze(WrittenUnitMode::Sector512);
        assert_eq!(result.health, HealthStatus::UsbBridge);
        assert_eq!(result.health.to_string(), "USBB");
        assert_eq!(result.capacity_bytes, None);
    }
}

#[test]
fn failed_drive_behind_usb_bridge_is_not_masked() {
    let text = format!(
        "{}SMART overall-health self-assessment test result: FAILED!\n",
        USB_BRIDGE
    );
    let result = analyze_text(&text, DeviceClass::UsbBridge, WrittenUnitMode::Sector512);

    assert_eq!(result.health, HealthStatus::Reported("FAILED!".into()));
    assert_eq!(result.health.severity(), Severity::Critical);
}

#[test]
fn disabled_smart_keeps_information_fields() {
    let parsed = parse(SMART_DISABLED, DeviceClass::ScsiAtaAlias);
    assert_eq!(parsed.smart_support, SmartSupport::Disabled);

    let result = Analyzer::new(&parsed).analyze(WrittenUnitMode::Sector512);
    assert_eq!(result.health, HealthStatus::Disabled);
    assert_eq!(result.health.to_string(), "DSBLD");
    assert_eq!(result.capacity_bytes, Some(500_107_862_016));
    assert_eq!(result.rotation, Some(Rotation::Rpm(5400)));
    assert_eq!(result.power_on_hours, None);
}

#[test]
fn report_rows_from_fixtures() {
    let (_dir, sysfs) = empty_sysfs();
    let options = ScanOptions::default();

    let sata = build_report(
        "sda",
        Some(DeviceClass::ScsiAtaAlias),
        Some(&diagnostic(SAMSUNG_SATA)),
        &options,
        &sysfs,
    );
    assert_eq!(sata.dev, "/dev/sda");
    assert_eq!(sata.model, "Samsung based SSDs");
    assert_eq!(sata.serial, "S3Z2NB0K123456A");
    assert_eq!(sata.firmware, "RVT02B6Q");
    assert_eq!(sata.size, "500 GB");
    assert_eq!(sata.runtime, "2.4 years");
    assert_eq!(sata.written, "15.1 TB");
    assert_eq!(sata.rotation, "SSD");
    assert_eq!(sata.lifetime, "92%");
    assert_eq!(sata.smart_support, SmartSupport::Enabled);

    let nvme = build_report(
        "nvme0n1",
        Some(DeviceClass::Nvme),
        Some(&diagnostic(SAMSUNG_NVME)),
        &options,
        &sysfs,
    );
    assert_eq!(nvme.model, "Samsung SSD 970 EVO Plus 1TB");
    assert_eq!(nvme.size, "1 TB");
    assert_eq!(nvme.runtime, "180.0 days");
    assert_eq!(nvme.written, "6.3 TB");
    assert_eq!(nvme.rotation, "NVME");
    assert_eq!(nvme.lifetime, "97%");

    let optical = build_report(
        "sr0",
        Some(DeviceClass::Optical),
        Some(&diagnostic(OPTICAL)),
        &options,
        &sysfs,
    );
    assert_eq!(optical.model, "HL-DT-ST");
    assert_eq!(optical.firmware, "LG00");
    assert_eq!(optical.size, "-");
    assert_eq!(optical.health.label(), "NO SMART");

    let table = render_table(&[sata, nvme, optical], false);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Device"));
    assert!(lines[1].starts_with("sda"));
    assert!(lines[2].contains("NVME"));
    assert!(lines[3].contains("NO SMART"));
}

#[test]
fn binary_units_for_sizes() {
    let (_dir, sysfs) = empty_sysfs();
    let options = ScanOptions {
        size_units: SizeUnits::Binary,
        ..ScanOptions::default()
    };

    let report = build_report(
        "sda",
        Some(DeviceClass::ScsiAtaAlias),
        Some(&diagnostic(SAMSUNG_SATA)),
        &options,
        &sysfs,
    );
    assert_eq!(report.size, "466 GiB");
}

#[test]
fn timed_out_diagnostic_keeps_partial_fields() {
    let (_dir, sysfs) = empty_sysfs();
    let partial = SAMSUNG_NVME
        .split("=== START OF SMART DATA SECTION ===")
        .next()
        .unwrap();
    let timed_out = Diagnostic {
        output: partial.to_string(),
        exit_code: None,
        timed_out: true,
    };

    let report = build_report(
        "nvme0n1",
        Some(DeviceClass::Nvme),
        Some(&timed_out),
        &ScanOptions::default(),
        &sysfs,
    );

    assert!(report.timed_out);
    assert_eq!(report.health, HealthStatus::Timeout);
    assert_eq!(report.health.label(), "TIME-OUT");
    assert_eq!(report.model, "Samsung SSD 970 EVO Plus 1TB");
    assert_eq!(report.size, "1 TB");
    assert_eq!(report.runtime, "?");
    assert_eq!(report.written, "?");
    assert_eq!(report.lifetime, "?");
    assert_eq!(report.lifetime_percent, None);
}
