//! Diagnostic text parser.
//!
//! Splits `smartctl -a` output into its information and SMART data sections
//! and flattens both into a [`FieldMapping`]. Nothing here fails: text that
//! does not match simply leaves fields absent.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use super::attributes::{
    ATA_SMART_SECTION, INFORMATION_SECTION, MODEL_FAMILY, NVME_SMART_SECTION, PRODUCT,
    USB_BRIDGE_MARKER, VENDOR,
};
use crate::models::{AttributeRecord, DeviceClass, FieldMapping, ParsedDiagnostic, SmartSupport};

static LABEL_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*([^:\r\n]*[^:\s])[ \t]*:[ \t]+(\S[^\r\n]*?)[ \t]*\r?$")
        .expect("static regex must compile")
});

static HEALTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^(?:SMART overall-health self-assessment test result|SMART Health Status):[ \t]*(\S[^\r\n]*?)[ \t]*\r?$",
    )
    .expect("static regex must compile")
});

static SUPPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SMART support is:[ \t]*(Enabled|Disabled)").expect("static regex must compile")
});

// ID NAME FLAG VALUE WORST THRESH TYPE UPDATED WHEN_FAILED RAW_VALUE
static ATTRIBUTE_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(\d{1,3})[ \t]+(\S+)[ \t]+(0x[0-9a-fA-F]+)[ \t]+(\d+)[ \t]+(\d+)[ \t]+(\S+)[ \t]+(\S+)[ \t]+(\S+)[ \t]+(\S+)[ \t]+(\S[^\r\n]*?)[ \t]*\r?$",
    )
    .expect("static regex must compile")
});

/// Parses one diagnostic text for a device of the given class.
pub fn parse(raw: &str, class: DeviceClass) -> ParsedDiagnostic {
    let mut parsed = ParsedDiagnostic::empty(class);

    if let Some(caps) = SUPPORT_RE.captures(raw) {
        parsed.smart_support = if &caps[1] == "Enabled" {
            SmartSupport::Enabled
        } else {
            SmartSupport::Disabled
        };
    }

    if let Some(caps) = HEALTH_RE.captures(raw) {
        parsed.health = caps[1].to_string();
    }

    parsed.usb_bridge = raw.contains(USB_BRIDGE_MARKER);

    let (info, smart) = split_sections(raw, class, parsed.smart_support);
    extract_labels(info, &mut parsed.fields);

    if class.uses_ata_rules() {
        if parsed.smart_support == SmartSupport::Enabled {
            extract_attributes(smart, &mut parsed.fields);
        }
    } else if class == DeviceClass::Nvme {
        extract_labels(smart, &mut parsed.fields);
    }

    parsed.vendor_signature = vendor_signature(&parsed.fields);

    debug!(
        "parsed {:?} diagnostic: {} fields, health {:?}, support {}, usb bridge {}",
        class,
        parsed.fields.len(),
        parsed.health,
        parsed.smart_support,
        parsed.usb_bridge
    );

    parsed
}

/// Returns the (information, SMART data) halves of the text.
/// A missing delimiter leaves the SMART half empty.
fn split_sections(raw: &str, class: DeviceClass, support: SmartSupport) -> (&str, &str) {
    if class == DeviceClass::Optical || support == SmartSupport::Disabled {
        let info = raw
            .split_once(INFORMATION_SECTION)
            .map_or(raw, |(_, rest)| rest);
        return (info, "");
    }

    let marker = if class == DeviceClass::Nvme {
        NVME_SMART_SECTION
    } else {
        ATA_SMART_SECTION
    };
    raw.split_once(marker).unwrap_or((raw, ""))
}

/// Adds every `<label>: <value>` line as a text field; later lines win.
fn extract_labels(section: &str, fields: &mut FieldMapping) {
    for caps in LABEL_LINE_RE.captures_iter(section) {
        fields.insert_text(caps[1].trim(), caps[2].trim());
    }
}

fn extract_attributes(section: &str, fields: &mut FieldMapping) {
    for caps in ATTRIBUTE_ROW_RE.captures_iter(section) {
        let record = AttributeRecord {
            name: caps[2].to_string(),
            flag: caps[3].to_string(),
            value: caps[4].to_string(),
            worst: caps[5].to_string(),
            thresh: caps[6].to_string(),
            attr_type: caps[7].to_string(),
            updated: caps[8].to_string(),
            when_failed: caps[9].to_string(),
            raw_value: caps[10].to_string(),
        };
        fields.insert_attribute(&caps[1], record);
    }
}

fn vendor_signature(fields: &FieldMapping) -> String {
    [VENDOR, MODEL_FAMILY, PRODUCT]
        .iter()
        .filter_map(|label| fields.text(label))
        .map(str::to_lowercase)
        .collect()
}
