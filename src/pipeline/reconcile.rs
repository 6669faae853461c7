//! Unit Reconciler: printed unit → the registry's canonical unit.

use serde::Serialize;

use crate::models::{AbnormalFlag, BenchmarkEntry, UnitConfidence};
use crate::pipeline::extraction::numeric::parse_number;
use crate::pipeline::extraction::{InlineRange, ResolvedMatch};
use crate::pipeline_config::NumberLocale;
use crate::registry::units::same_unit;
use crate::registry::BenchmarkRegistry;

/// A match with its value expressed in the canonical unit (when possible).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledValue {
    pub test_id: String,
    /// In `unit`. `None` for qualitative results.
    pub numeric_value: Option<f64>,
    pub value_text: Option<String>,
    /// Canonical unit, or the printed unit when `Unresolved`.
    pub unit: String,
    pub printed_unit: String,
    pub unit_confidence: UnitConfidence,
    /// Printed range, converted alongside the value.
    pub inline_range: Option<InlineRange>,
    pub report_flag: Option<AbnormalFlag>,
    pub source_offset: usize,
}

/// Reconcile one resolved match. `None` when the printed value does not
/// parse as a number under `locale`.
pub fn reconcile(
    found: &ResolvedMatch,
    entry: &BenchmarkEntry,
    registry: &BenchmarkRegistry,
    locale: NumberLocale,
) -> Option<ReconciledValue> {
    let raw = &found.raw;
    let printed = raw.raw_unit.trim();

    if raw.qualitative {
        return Some(ReconciledValue {
            test_id: found.test_id.clone(),
            numeric_value: None,
            value_text: Some(raw.raw_value.clone()),
            unit: entry.canonical_unit.clone(),
            printed_unit: printed.to_string(),
            unit_confidence: UnitConfidence::Exact,
            inline_range: None,
            report_flag: raw.report_flag,
            source_offset: raw.source_offset,
        });
    }

    let value = parse_number(&raw.raw_value, locale)?;
    let mut reconciled = ReconciledValue {
        test_id: found.test_id.clone(),
        numeric_value: Some(value),
        value_text: None,
        unit: entry.canonical_unit.clone(),
        printed_unit: printed.to_string(),
        unit_confidence: UnitConfidence::Exact,
        inline_range: raw.inline_range,
        report_flag: raw.report_flag,
        source_offset: raw.source_offset,
    };

    if printed.is_empty() {
        if !entry.is_unitless() {
            reconciled.unit_confidence = UnitConfidence::Assumed;
        }
    } else if same_unit(printed, &entry.canonical_unit) {
        reconciled.unit_confidence = UnitConfidence::Exact;
    } else if let Some(conversion) = registry.conversion_for(&found.test_id, printed) {
        reconciled.numeric_value = Some(conversion.to_canonical(value));
        reconciled.inline_range = raw.inline_range.map(|range| InlineRange {
            low: range.low.map(|v| conversion.to_canonical(v)),
            high: range.high.map(|v| conversion.to_canonical(v)),
        });
        reconciled.unit_confidence = UnitConfidence::Converted;
    } else {
        tracing::debug!(
            test_id = %found.test_id,
            printed_unit = printed,
            canonical_unit = %entry.canonical_unit,
            "Unit unresolved"
        );
        reconciled.unit = printed.to_string();
        reconciled.unit_confidence = UnitConfidence::Unresolved;
    }

    Some(reconciled)
}
