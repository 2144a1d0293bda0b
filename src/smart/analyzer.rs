//! Telemetry analyzer.
//!
//! Each query reads the same immutable [`ParsedDiagnostic`] through the rule
//! set of its device class. Queries are independent: none caches, mutates or
//! depends on the result of another.

use super::rules::{ClassRules, class_rules};
use crate::models::{
    AnalysisResult, HealthStatus, ParsedDiagnostic, Rotation, SmartSupport, WrittenUnitMode,
    WrittenUnits,
};

pub struct Analyzer<'a> {
    diagnostic: &'a ParsedDiagnostic,
    rules: &'static ClassRules,
}

impl<'a> Analyzer<'a> {
    pub fn new(diagnostic: &'a ParsedDiagnostic) -> Self {
        Self {
            diagnostic,
            rules: class_rules(diagnostic.class),
        }
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> Option<u64> {
        (self.rules.capacity)(self.diagnostic)
    }

    /// Accumulated power-on hours.
    pub fn power_on_hours(&self) -> Option<u64> {
        (self.rules.power_on_hours)(self.diagnostic)
    }

    /// Raw written counter, unscaled.
    pub fn written_units(&self) -> Option<WrittenUnits> {
        (self.rules.written)(self.diagnostic)
    }

    /// Written counter in bytes. `mode` only affects ATA LBA counters.
    pub fn bytes_written(&self, mode: WrittenUnitMode) -> Option<u64> {
        self.written_units().map(|units| units.bytes(mode))
    }

    pub fn rotation(&self) -> Option<Rotation> {
        (self.rules.rotation)(self.diagnostic)
    }

    /// Remaining lifetime in percent.
    pub fn lifetime_percent(&self) -> Option<u8> {
        (self.rules.lifetime)(self.diagnostic)
    }

    /// Health verdict, first match wins:
    /// disabled support, the class verdict, the USB bridge marker when no
    /// self-assessment line was captured, then the self-assessment as printed.
    pub fn health(&self) -> HealthStatus {
        let diagnostic = self.diagnostic;

        if !self.rules.reports_smart {
            return if diagnostic.usb_bridge {
                HealthStatus::UsbBridge
            } else {
                HealthStatus::NoSmart
            };
        }

        if diagnostic.smart_support == SmartSupport::Disabled {
            return HealthStatus::Disabled;
        }

        if let Some(verdict) = (self.rules.health)(diagnostic) {
            return verdict;
        }

        if diagnostic.usb_bridge && !diagnostic.has_health_line() {
            return HealthStatus::UsbBridge;
        }

        HealthStatus::Reported(diagnostic.health.clone())
    }

    /// Runs every derivation.
    pub fn analyze(&self, mode: WrittenUnitMode) -> AnalysisResult {
        AnalysisResult {
            capacity_bytes: self.capacity(),
            power_on_hours: self.power_on_hours(),
            written: self.written_units(),
            bytes_written: self.bytes_written(mode),
            rotation: self.rotation(),
            lifetime_percent: self.lifetime_percent(),
            health: self.health(),
        }
    }
}
