//! Rule sets keyed by device class and vendor signature.
//!
//! Every derivation is a plain function of the parsed diagnostic, collected
//! per class in a [`ClassRules`] table. Vendor-specific lifetime and error
//! accounting lives in [`VENDOR_RULES`]; supporting another SSD family is a
//! new table entry.

use super::attributes::*;
use super::numeric::{leading_number, parse_flag};
use crate::models::{
    AttributeColumn, DeviceClass, FieldMapping, HealthStatus, ParsedDiagnostic, Rotation,
    WrittenUnits,
};

/// Derivations for one device class.
pub struct ClassRules {
    pub capacity: fn(&ParsedDiagnostic) -> Option<u64>,
    pub power_on_hours: fn(&ParsedDiagnostic) -> Option<u64>,
    pub written: fn(&ParsedDiagnostic) -> Option<WrittenUnits>,
    pub rotation: fn(&ParsedDiagnostic) -> Option<Rotation>,
    pub lifetime: fn(&ParsedDiagnostic) -> Option<u8>,
    /// Class-specific verdict; None hands over to the generic fallbacks
    pub health: fn(&ParsedDiagnostic) -> Option<HealthStatus>,
    /// False for classes that never carry SMART data
    pub reports_smart: bool,
}

static ATA_RULES: ClassRules = ClassRules {
    capacity: ata_capacity,
    power_on_hours: ata_power_on_hours,
    written: ata_written,
    rotation: ata_rotation,
    lifetime: ata_lifetime,
    health: ata_health,
    reports_smart: true,
};

static NVME_RULES: ClassRules = ClassRules {
    capacity: nvme_capacity,
    power_on_hours: nvme_power_on_hours,
    written: nvme_written,
    rotation: nvme_rotation,
    lifetime: nvme_lifetime,
    health: nvme_health,
    reports_smart: true,
};

static OPTICAL_RULES: ClassRules = ClassRules {
    capacity: absent::<u64>,
    power_on_hours: absent::<u64>,
    written: absent::<WrittenUnits>,
    rotation: absent::<Rotation>,
    lifetime: absent::<u8>,
    health: absent::<HealthStatus>,
    reports_smart: false,
};

pub fn class_rules(class: DeviceClass) -> &'static ClassRules {
    match class {
        DeviceClass::Ata | DeviceClass::ScsiAtaAlias | DeviceClass::UsbBridge => &ATA_RULES,
        DeviceClass::Nvme => &NVME_RULES,
        DeviceClass::Optical => &OPTICAL_RULES,
    }
}

/// Lifetime and error-accounting rules for one SSD vendor.
pub struct VendorRule {
    /// Lowercase substring searched in the vendor signature
    pub needle: &'static str,
    /// Wear readings tried in order; the first attribute present wins
    pub wear: &'static [(u8, AttributeColumn)],
    /// Reading that caps the wear value; used alone when no wear reading exists
    pub cap: Option<(u8, AttributeColumn)>,
    /// Attributes added to the sector-error sum on top of the common ones
    pub sector_errors: &'static [u8],
}

/// Checked in order; the first needle found in the signature applies.
pub static VENDOR_RULES: &[VendorRule] = &[
    VendorRule {
        needle: "samsung",
        wear: &[
            (ATTR_WEAR_LEVELING_COUNT, AttributeColumn::Raw),
            (ATTR_WEAR_LEVELING_COUNT_LEGACY, AttributeColumn::Raw),
        ],
        cap: Some((ATTR_USED_RESERVE_BLOCK_COUNT, AttributeColumn::Raw)),
        sector_errors: &[],
    },
    VendorRule {
        needle: "crucial",
        wear: &[(ATTR_PERCENT_LIFETIME_REMAIN, AttributeColumn::Raw)],
        cap: None,
        sector_errors: &[ATTR_ERASE_FAIL_COUNT],
    },
    VendorRule {
        needle: "ocz",
        wear: &[(ATTR_REMAINING_LIFETIME_PERC, AttributeColumn::Raw)],
        cap: None,
        sector_errors: &[],
    },
];

pub fn vendor_rule(signature: &str) -> Option<&'static VendorRule> {
    VENDOR_RULES
        .iter()
        .find(|rule| signature.contains(rule.needle))
}

impl VendorRule {
    pub fn lifetime(&self, fields: &FieldMapping) -> Option<u8> {
        let wear = self
            .wear
            .iter()
            .find_map(|&(id, column)| fields.attribute(id).map(|record| (record, column)))
            .and_then(|(record, column)| leading_number(record.column(column)));
        let cap = self
            .cap
            .and_then(|(id, column)| fields.attribute(id).map(|record| (record, column)))
            .and_then(|(record, column)| leading_number(record.column(column)));

        let lifetime = match (wear, cap) {
            (Some(w), Some(c)) => w.min(c),
            (Some(w), None) => w,
            (None, Some(c)) => c,
            (None, None) => return None,
        };
        u8::try_from(lifetime.min(100)).ok()
    }
}

// Common ATA sector-error counters
const SECTOR_ERROR_ATTRIBUTES: [u8; 2] = [ATTR_REALLOCATED_SECTOR_CT, ATTR_CURRENT_PENDING_SECTOR];

// TODO: one of these should read "Critical Comp. Temperature Time" once the
// mapping of TEMP E / TEMP W to the two NVMe counters is confirmed; with both
// entries on the warning counter the second can never match.
static NVME_TEMPERATURE_RULES: [(&str, HealthStatus); 2] = [
    (NVME_WARNING_TEMP_TIME, HealthStatus::TemperatureError),
    (NVME_WARNING_TEMP_TIME, HealthStatus::TemperatureWarning),
];

fn absent<T>(_: &ParsedDiagnostic) -> Option<T> {
    None
}

fn raw_number(fields: &FieldMapping, id: u8) -> Option<u64> {
    fields
        .attribute(id)
        .and_then(|record| leading_number(&record.raw_value))
}

fn text_number(fields: &FieldMapping, label: &str) -> Option<u64> {
    fields.text(label).and_then(leading_number)
}

fn ata_capacity(diag: &ParsedDiagnostic) -> Option<u64> {
    text_number(&diag.fields, USER_CAPACITY)
}

fn ata_power_on_hours(diag: &ParsedDiagnostic) -> Option<u64> {
    raw_number(&diag.fields, ATTR_POWER_ON_HOURS)
}

fn ata_written(diag: &ParsedDiagnostic) -> Option<WrittenUnits> {
    raw_number(&diag.fields, ATTR_TOTAL_LBAS_WRITTEN).map(WrittenUnits::Lbas)
}

fn ata_rotation(diag: &ParsedDiagnostic) -> Option<Rotation> {
    let rate = diag.fields.text(ROTATION_RATE)?;
    if rate == SOLID_STATE_DEVICE {
        return Some(Rotation::SolidState);
    }
    let (rpm, _) = rate.split_once(" rpm")?;
    leading_number(rpm)
        .and_then(|n| u32::try_from(n).ok())
        .map(Rotation::Rpm)
}

fn ata_lifetime(diag: &ParsedDiagnostic) -> Option<u8> {
    vendor_rule(&diag.vendor_signature).and_then(|rule| rule.lifetime(&diag.fields))
}

fn ata_health(diag: &ParsedDiagnostic) -> Option<HealthStatus> {
    if !HealthStatus::is_pass_literal(&diag.health) {
        return None;
    }

    let fields = &diag.fields;
    let mut verdict = None;

    if raw_number(fields, ATTR_UDMA_CRC_ERROR_COUNT).is_some_and(|n| n >= UDMA_CRC_ERROR_LIMIT) {
        verdict = Some(HealthStatus::UdmaErrors);
    }

    let vendor_errors = vendor_rule(&diag.vendor_signature)
        .map(|rule| rule.sector_errors)
        .unwrap_or_default();
    let sector_sum = SECTOR_ERROR_ATTRIBUTES
        .iter()
        .chain(vendor_errors)
        .filter_map(|&id| raw_number(fields, id))
        .fold(0u64, u64::saturating_add);

    if sector_sum > 0 {
        verdict = Some(HealthStatus::ErrorCount(sector_sum));
    }

    verdict
}

fn nvme_capacity(diag: &ParsedDiagnostic) -> Option<u64> {
    [NVME_TOTAL_CAPACITY, NVME_NAMESPACE_CAPACITY]
        .iter()
        .find_map(|label| text_number(&diag.fields, label))
}

fn nvme_power_on_hours(diag: &ParsedDiagnostic) -> Option<u64> {
    text_number(&diag.fields, NVME_POWER_ON_HOURS)
}

fn nvme_written(diag: &ParsedDiagnostic) -> Option<WrittenUnits> {
    text_number(&diag.fields, NVME_DATA_UNITS_WRITTEN).map(WrittenUnits::NvmeDataUnits)
}

fn nvme_rotation(_: &ParsedDiagnostic) -> Option<Rotation> {
    Some(Rotation::Nvme)
}

fn nvme_lifetime(diag: &ParsedDiagnostic) -> Option<u8> {
    let used = text_number(&diag.fields, NVME_PERCENTAGE_USED)?;
    u8::try_from(100 - used.min(100)).ok()
}

fn nvme_health(diag: &ParsedDiagnostic) -> Option<HealthStatus> {
    let fields = &diag.fields;

    if fields
        .text(NVME_CRITICAL_WARNING)
        .and_then(parse_flag)
        .is_some_and(|bits| bits != 0)
    {
        return Some(HealthStatus::CriticalWarning);
    }

    for (label, status) in &NVME_TEMPERATURE_RULES {
        if text_number(fields, label).is_some_and(|minutes| minutes > 0) {
            return Some(status.clone());
        }
    }

    text_number(fields, NVME_MEDIA_ERRORS)
        .filter(|&errors| errors > 0)
        .map(HealthStatus::ErrorCount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttributeRecord;

    fn record(value: &str, raw: &str) -> AttributeRecord {
        AttributeRecord {
            value: value.into(),
            raw_value: raw.into(),
            ..Default::default()
        }
    }

    #[test]
    fn vendor_rules_match_in_order() {
        assert_eq!(vendor_rule("samsung based ssds").map(|r| r.needle), Some("samsung"));
        assert_eq!(
            vendor_rule("crucial/micron client ssds").map(|r| r.needle),
            Some("crucial")
        );
        assert_eq!(vendor_rule("ocz vertex").map(|r| r.needle), Some("ocz"));
        assert!(vendor_rule("western digital blue").is_none());
    }

    #[test]
    fn samsung_cap_alone_is_the_lifetime() {
        let mut fields = FieldMapping::new();
        fields.insert_attribute("179", record("100", "42"));
        let samsung = vendor_rule("samsung").unwrap();
        assert_eq!(samsung.lifetime(&fields), Some(42));
    }

    #[test]
    fn samsung_prefers_177_over_173() {
        let mut fields = FieldMapping::new();
        fields.insert_attribute("177", record("099", "91"));
        fields.insert_attribute("173", record("097", "55"));
        let samsung = vendor_rule("samsung").unwrap();
        assert_eq!(samsung.lifetime(&fields), Some(91));

        fields.remove("177");
        assert_eq!(samsung.lifetime(&fields), Some(55));
    }

    #[test]
    fn lifetime_is_clamped_to_100() {
        let mut fields = FieldMapping::new();
        fields.insert_attribute("209", record("100", "250"));
        assert_eq!(vendor_rule("ocz").unwrap().lifetime(&fields), Some(100));
    }

    #[test]
    fn malformed_raw_value_is_absent() {
        let mut fields = FieldMapping::new();
        fields.insert_attribute("202", record("100", "n/a"));
        assert_eq!(vendor_rule("crucial").unwrap().lifetime(&fields), None);
    }

    #[test]
    fn optical_rules_derive_nothing() {
        let rules = class_rules(DeviceClass::Optical);
        let diag = ParsedDiagnostic::empty(DeviceClass::Optical);
        assert!(!rules.reports_smart);
        assert_eq!((rules.capacity)(&diag), None);
        assert_eq!((rules.rotation)(&diag), None);
        assert_eq!((rules.health)(&diag), None);
    }

    #[test]
    fn alias_classes_share_ata_rules() {
        assert!(std::ptr::eq(
            class_rules(DeviceClass::ScsiAtaAlias),
            class_rules(DeviceClass::Ata)
        ));
        assert!(std::ptr::eq(
            class_rules(DeviceClass::UsbBridge),
            class_rules(DeviceClass::Ata)
        ));
    }
}
