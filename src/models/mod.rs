// Data models for device classes, parsed diagnostic fields and analysis results

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ScanError;

/// Rule-set selector for one device.
/// Chosen from the kernel device name before parsing and fixed for the whole analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    /// Legacy IDE/ATA disk (hd*)
    Ata,
    /// Disk on the SCSI layer speaking ATA underneath (sd*, vd*)
    ScsiAtaAlias,
    /// NVMe namespace (nvme*)
    Nvme,
    /// Optical drive (sr*)
    Optical,
    /// ATA disk attached through a USB bridge
    UsbBridge,
}

impl DeviceClass {
    /// Maps a kernel name (`sda`, `/dev/nvme0n1`) to its class.
    /// Names without a rule set are rejected instead of guessed.
    pub fn from_device_name(name: &str) -> Result<Self, ScanError> {
        let name = name.rsplit('/').next().unwrap_or(name);

        if name.starts_with("nvme") {
            Ok(DeviceClass::Nvme)
        } else if name.starts_with("hd") {
            Ok(DeviceClass::Ata)
        } else if name.starts_with("sd") || name.starts_with("vd") {
            Ok(DeviceClass::ScsiAtaAlias)
        } else if name.starts_with("sr") {
            Ok(DeviceClass::Optical)
        } else {
            Err(ScanError::UnknownDeviceClass(name.to_string()))
        }
    }

    /// True for every class that reads the ATA attribute table.
    pub fn uses_ata_rules(self) -> bool {
        matches!(
            self,
            DeviceClass::Ata | DeviceClass::ScsiAtaAlias | DeviceClass::UsbBridge
        )
    }

    /// Short protocol label for display.
    pub fn label(self) -> &'static str {
        match self {
            DeviceClass::Ata => "ATA",
            DeviceClass::ScsiAtaAlias => "SATA",
            DeviceClass::Nvme => "NVMe",
            DeviceClass::Optical => "Optical",
            DeviceClass::UsbBridge => "USB",
        }
    }
}

/// One row of the ATA SMART attribute table.
/// All columns stay textual; numeric interpretation belongs to the analyzer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeRecord {
    /// Attribute name as printed (e.g. Reallocated_Sector_Ct)
    pub name: String,
    /// Hex flag word (e.g. 0x0033)
    pub flag: String,
    /// Normalized current value
    pub value: String,
    /// Worst normalized value ever recorded
    pub worst: String,
    /// Failure threshold
    pub thresh: String,
    /// Pre-fail or Old_age
    pub attr_type: String,
    /// Always or Offline
    pub updated: String,
    /// When the attribute last failed, `-` if never
    pub when_failed: String,
    /// Raw value, verbatim (may carry a suffix such as `(Min/Max 20/45)`)
    pub raw_value: String,
}

/// Column selector for [`AttributeRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeColumn {
    Value,
    Worst,
    Threshold,
    Raw,
}

impl AttributeRecord {
    pub fn column(&self, column: AttributeColumn) -> &str {
        match column {
            AttributeColumn::Value => &self.value,
            AttributeColumn::Worst => &self.worst,
            AttributeColumn::Threshold => &self.thresh,
            AttributeColumn::Raw => &self.raw_value,
        }
    }
}

/// Value stored under one field name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// `<label>: <value>` line
    Text(String),
    /// ATA attribute table row, keyed by its numeric ID
    Attribute(AttributeRecord),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Attribute(_) => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&AttributeRecord> {
        match self {
            FieldValue::Attribute(a) => Some(a),
            FieldValue::Text(_) => None,
        }
    }
}

/// Flat mapping of field names to values extracted from one diagnostic run.
/// Absence of a key means "unknown", never an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldMapping {
    fields: BTreeMap<String, FieldValue>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a text field; a repeated label replaces the earlier value.
    pub fn insert_text(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.fields
            .insert(label.into(), FieldValue::Text(value.into()));
    }

    /// Inserts an attribute row under its numeric ID.
    pub fn insert_attribute(&mut self, id: impl Into<String>, record: AttributeRecord) {
        self.fields
            .insert(id.into(), FieldValue::Attribute(record));
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Non-empty text value stored under `label`.
    pub fn text(&self, label: &str) -> Option<&str> {
        self.fields
            .get(label)
            .and_then(FieldValue::as_text)
            .filter(|s| !s.is_empty())
    }

    /// Attribute row for a SMART attribute ID.
    pub fn attribute(&self, id: u8) -> Option<&AttributeRecord> {
        self.fields
            .get(id.to_string().as_str())
            .and_then(FieldValue::as_attribute)
    }

    /// First non-empty text value among `labels`, in priority order.
    pub fn first_text(&self, labels: &[&str]) -> Option<&str> {
        labels.iter().find_map(|label| self.text(label))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// State of the `SMART support is:` line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SmartSupport {
    Enabled,
    Disabled,
    #[default]
    Unknown,
}

impl fmt::Display for SmartSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SmartSupport::Enabled => "Enabled",
            SmartSupport::Disabled => "Disabled",
            SmartSupport::Unknown => "UNKNOWN",
        })
    }
}

/// Self-assessment placeholder until a health line is found.
pub const UNKNOWN_HEALTH: &str = "UNKNOWN";

/// Everything the parser extracts from one diagnostic text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedDiagnostic {
    /// Class the text was parsed for
    pub class: DeviceClass,
    /// Information fields plus the class-specific SMART section
    pub fields: FieldMapping,
    /// Overall self-assessment string, `UNKNOWN` when absent
    pub health: String,
    /// SMART support state
    pub smart_support: SmartSupport,
    /// The utility reported an unknown USB bridge
    pub usb_bridge: bool,
    /// Lowercase Vendor + Model Family + Product, used for vendor matching
    pub vendor_signature: String,
}

impl ParsedDiagnostic {
    /// Result of parsing nothing: all fields absent, health `UNKNOWN`.
    pub fn empty(class: DeviceClass) -> Self {
        Self {
            class,
            fields: FieldMapping::new(),
            health: String::from(UNKNOWN_HEALTH),
            smart_support: SmartSupport::Unknown,
            usb_bridge: false,
            vendor_signature: String::new(),
        }
    }

    /// Whether the text carried a self-assessment line.
    pub fn has_health_line(&self) -> bool {
        self.health != UNKNOWN_HEALTH
    }
}

/// Rotation descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    /// Any NVMe device
    Nvme,
    /// ATA device reporting `Solid State Device`
    SolidState,
    /// Spinning disk speed in rpm
    Rpm(u32),
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Nvme => f.write_str("NVME"),
            Rotation::SolidState => f.write_str("SSD"),
            Rotation::Rpm(rpm) => write!(f, "{rpm}"),
        }
    }
}

/// Size of one LBA when scaling ATA written counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrittenUnitMode {
    /// 512-byte LBAs
    #[default]
    Sector512,
    /// 32 KB LBAs used by some SSD firmware
    Block32K,
}

/// Raw written counter together with its unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrittenUnits {
    /// ATA Total_LBAs_Written
    Lbas(u64),
    /// NVMe data units (1000 × 512 bytes each)
    NvmeDataUnits(u64),
}

impl WrittenUnits {
    pub fn bytes(self, mode: WrittenUnitMode) -> u64 {
        match self {
            WrittenUnits::Lbas(n) => match mode {
                WrittenUnitMode::Sector512 => n.saturating_mul(512),
                WrittenUnitMode::Block32K => n.saturating_mul(32_000),
            },
            WrittenUnits::NvmeDataUnits(n) => n.saturating_mul(512 * 1000),
        }
    }
}

/// Display severity of a health verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Good,
    Critical,
    Timeout,
    Info,
    NoSmart,
}

/// Single-word or numeric health verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HealthStatus {
    /// SMART support switched off (DSBLD)
    Disabled,
    /// UDMA CRC errors above the limit (UDMA)
    UdmaErrors,
    /// Sum of sector or media errors, rendered as the number
    ErrorCount(u64),
    /// NVMe critical warning bits set (WARN)
    CriticalWarning,
    /// NVMe composite temperature time, first branch (TEMP E)
    TemperatureError,
    /// NVMe composite temperature time, second branch (TEMP W)
    TemperatureWarning,
    /// Unknown USB bridge, no SMART access (USBB)
    UsbBridge,
    /// Device class without SMART (`-`)
    NoSmart,
    /// The diagnostic utility timed out (TIMEOUT)
    Timeout,
    /// Self-assessment string as printed (PASSED, OK, FAILED!, UNKNOWN, ...)
    Reported(String),
}

impl HealthStatus {
    /// Whether a self-assessment string counts as a pass.
    pub fn is_pass_literal(s: &str) -> bool {
        matches!(s, "PASSED" | "OK")
    }

    /// Fixed-width label shown in tables.
    pub fn label(&self) -> String {
        match self {
            HealthStatus::Reported(s) if Self::is_pass_literal(s) => "OK".to_string(),
            HealthStatus::Disabled => "DISABLED".to_string(),
            HealthStatus::UdmaErrors => "UltraDMA".to_string(),
            HealthStatus::Timeout => "TIME-OUT".to_string(),
            HealthStatus::UsbBridge => "USB-BRIDGE".to_string(),
            HealthStatus::NoSmart => "NO SMART".to_string(),
            other => other.to_string(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            HealthStatus::Reported(s) if Self::is_pass_literal(s) => Severity::Good,
            HealthStatus::Reported(s) if s == UNKNOWN_HEALTH => Severity::Info,
            HealthStatus::UsbBridge => Severity::Info,
            HealthStatus::Timeout => Severity::Timeout,
            HealthStatus::NoSmart => Severity::NoSmart,
            _ => Severity::Critical,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Disabled => f.write_str("DSBLD"),
            HealthStatus::UdmaErrors => f.write_str("UDMA"),
            HealthStatus::ErrorCount(n) => write!(f, "{n}"),
            HealthStatus::CriticalWarning => f.write_str("WARN"),
            HealthStatus::TemperatureError => f.write_str("TEMP E"),
            HealthStatus::TemperatureWarning => f.write_str("TEMP W"),
            HealthStatus::UsbBridge => f.write_str("USBB"),
            HealthStatus::NoSmart => f.write_str("-"),
            HealthStatus::Timeout => f.write_str("TIMEOUT"),
            HealthStatus::Reported(s) => f.write_str(s),
        }
    }
}

/// Derived telemetry for one device. Built fresh per analysis, never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Capacity in bytes
    pub capacity_bytes: Option<u64>,
    /// Accumulated power-on time in hours
    pub power_on_hours: Option<u64>,
    /// Raw written counter with its unit
    pub written: Option<WrittenUnits>,
    /// Written counter scaled to bytes with the requested LBA mode
    pub bytes_written: Option<u64>,
    /// Rotation descriptor
    pub rotation: Option<Rotation>,
    /// Estimated remaining lifetime, 0-100
    pub lifetime_percent: Option<u8>,
    /// Health verdict
    pub health: HealthStatus,
}

/// Display row for one device.
/// Every text column holds either a value or a sentinel (`-` absent, `?` timed out).
#[derive(Clone, Debug)]
pub struct DeviceReport {
    /// Device path (e.g., /dev/nvme0n1, /dev/sda)
    pub dev: String,
    /// Kernel name (e.g., nvme0n1, sda)
    pub name: String,
    /// Rule set used, None when the name has no class (e.g. mmcblk)
    pub class: Option<DeviceClass>,
    /// Vendor and model
    pub model: String,
    /// Serial number
    pub serial: String,
    /// Firmware version
    pub firmware: String,
    /// Humanized capacity (e.g., "500 GB")
    pub size: String,
    /// Humanized power-on time (e.g., "2.3 years")
    pub runtime: String,
    /// Humanized bytes written
    pub written: String,
    /// SSD, NVME or rpm
    pub rotation: String,
    /// Remaining lifetime text (e.g., "87%")
    pub lifetime: String,
    /// Remaining lifetime for color banding
    pub lifetime_percent: Option<u8>,
    /// Health verdict
    pub health: HealthStatus,
    /// SMART support state as reported
    pub smart_support: SmartSupport,
    /// The diagnostic utility did not finish in time
    pub timed_out: bool,
}

impl DeviceReport {
    /// Creates a row where every column is the absent sentinel.
    pub fn empty(dev: impl Into<String>, name: impl Into<String>) -> Self {
        let absent = || String::from("-");
        Self {
            dev: dev.into(),
            name: name.into(),
            class: None,
            model: absent(),
            serial: absent(),
            firmware: absent(),
            size: absent(),
            runtime: absent(),
            written: absent(),
            rotation: absent(),
            lifetime: absent(),
            lifetime_percent: None,
            health: HealthStatus::NoSmart,
            smart_support: SmartSupport::Unknown,
            timed_out: false,
        }
    }
}
