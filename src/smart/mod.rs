// Telemetry extraction and health scoring for smartctl output

pub mod analyzer;
pub mod attributes;
pub mod numeric;
pub mod parser;
pub mod rules;

pub use analyzer::Analyzer;
pub use parser::parse;

use crate::models::{AnalysisResult, DeviceClass, WrittenUnitMode};

/// Parses `raw` once and runs every derivation on the result.
pub fn analyze_text(raw: &str, class: DeviceClass, mode: WrittenUnitMode) -> AnalysisResult {
    let parsed = parse(raw, class);
    Analyzer::new(&parsed).analyze(mode)
}
